use async_trait::async_trait;
use mongodb::bson::doc;
use service_core::error::AppError;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::models::{Course, EnrollmentState, FeatureState};
use crate::services::PreferenceDb;

/// Course resolution and the two capabilities the override endpoints need
/// from a context: a read-permission check and a root-account feature flag.
#[async_trait]
pub trait CourseDirectory: Send + Sync {
    async fn find_course(&self, course_id: &str) -> Result<Option<Course>, AppError>;

    /// Whether the user currently holds read access on the course.
    async fn grants_read(&self, user_id: &str, course_id: &str) -> Result<bool, AppError>;

    /// Whether a feature flag is enabled on the given root account.
    async fn feature_enabled(&self, account_id: &str, feature: &str) -> Result<bool, AppError>;
}

#[async_trait]
impl CourseDirectory for PreferenceDb {
    async fn find_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        self.courses()
            .find_one(doc! { "_id": course_id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find course {}: {}", course_id, e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }

    async fn grants_read(&self, user_id: &str, course_id: &str) -> Result<bool, AppError> {
        let enrollment = self
            .enrollments()
            .find_one(
                doc! {
                    "user_id": user_id,
                    "course_id": course_id,
                    "state": EnrollmentState::Active.as_str(),
                },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to check enrollment for {}: {}", user_id, e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(enrollment.is_some())
    }

    async fn feature_enabled(&self, account_id: &str, feature: &str) -> Result<bool, AppError> {
        let flag = self
            .feature_flags()
            .find_one(
                doc! { "account_id": account_id, "feature": feature },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to read feature flag {}: {}", feature, e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(flag.map(|f| f.state == FeatureState::On).unwrap_or(false))
    }
}

/// In-memory course directory used by integration tests.
#[derive(Default)]
pub struct MemoryCourseDirectory {
    courses: Mutex<HashMap<String, Course>>,
    enrollments: Mutex<HashSet<(String, String)>>,
    features: Mutex<HashSet<(String, String)>>,
}

impl MemoryCourseDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_course(&self, course: Course) {
        self.courses
            .lock()
            .expect("course lock poisoned")
            .insert(course.id.clone(), course);
    }

    pub fn enroll(&self, user_id: &str, course_id: &str) {
        self.enrollments
            .lock()
            .expect("enrollment lock poisoned")
            .insert((user_id.to_string(), course_id.to_string()));
    }

    pub fn unenroll(&self, user_id: &str, course_id: &str) {
        self.enrollments
            .lock()
            .expect("enrollment lock poisoned")
            .remove(&(user_id.to_string(), course_id.to_string()));
    }

    pub fn set_feature(&self, account_id: &str, feature: &str, enabled: bool) {
        let mut features = self.features.lock().expect("feature lock poisoned");
        let key = (account_id.to_string(), feature.to_string());
        if enabled {
            features.insert(key);
        } else {
            features.remove(&key);
        }
    }
}

#[async_trait]
impl CourseDirectory for MemoryCourseDirectory {
    async fn find_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        Ok(self
            .courses
            .lock()
            .expect("course lock poisoned")
            .get(course_id)
            .cloned())
    }

    async fn grants_read(&self, user_id: &str, course_id: &str) -> Result<bool, AppError> {
        Ok(self
            .enrollments
            .lock()
            .expect("enrollment lock poisoned")
            .contains(&(user_id.to_string(), course_id.to_string())))
    }

    async fn feature_enabled(&self, account_id: &str, feature: &str) -> Result<bool, AppError> {
        Ok(self
            .features
            .lock()
            .expect("feature lock poisoned")
            .contains(&(account_id.to_string(), feature.to_string())))
    }
}
