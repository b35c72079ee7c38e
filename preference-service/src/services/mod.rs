//! Services layer for preference-service.
//!
//! Holds the storage abstractions (override store, course directory), their
//! MongoDB and in-memory implementations, and JWT validation.

mod courses;
mod database;
mod jwt;
pub mod metrics;
mod overrides;

pub use courses::{CourseDirectory, MemoryCourseDirectory};
pub use database::PreferenceDb;
pub use jwt::{AccessTokenClaims, JwtService};
pub use metrics::{get_metrics, init_metrics};
pub use overrides::{MemoryOverrideStore, OverrideStore};
