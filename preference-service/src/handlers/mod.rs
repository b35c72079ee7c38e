mod health;
mod overrides;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use overrides::{enable_notifications, notifications_enabled};
