use serde::{Deserialize, Serialize};

/// Course entity. The course is the context notification preferences are
/// overridden against; `root_account_id` scopes feature-flag lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub root_account_id: String,
}

/// Enrollment state codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentState {
    Active,
    Completed,
    Deleted,
}

impl EnrollmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentState::Active => "active",
            EnrollmentState::Completed => "completed",
            EnrollmentState::Deleted => "deleted",
        }
    }
}

/// A user's membership in a course. An active enrollment is what grants read
/// access on the course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub user_id: String,
    pub course_id: String,
    pub state: EnrollmentState,
}

/// Feature flag state codes. Absent flag documents read as `Off`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureState {
    On,
    Off,
}

/// Root-account-scoped feature toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub account_id: String,
    pub feature: String,
    pub state: FeatureState,
}

/// Feature gating whether per-course notification overrides may be written.
pub const MUTE_NOTIFICATIONS_BY_COURSE: &str = "mute_notifications_by_course";
