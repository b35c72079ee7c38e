mod course;
mod preference_override;

pub use course::{
    Course, Enrollment, EnrollmentState, FeatureFlag, FeatureState, MUTE_NOTIFICATIONS_BY_COURSE,
};
pub use preference_override::{ContextRef, NotificationOverride};
