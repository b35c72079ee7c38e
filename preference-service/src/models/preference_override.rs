use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Reference to the entity a notification preference is scoped against.
///
/// Only courses exist today, but the (type, id) pair is stored so further
/// context types can share the same collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRef {
    pub context_type: String,
    pub context_id: String,
}

impl ContextRef {
    pub fn course(course_id: &str) -> Self {
        Self {
            context_type: "Course".to_string(),
            context_id: course_id.to_string(),
        }
    }
}

impl std::fmt::Display for ContextRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.context_type, self.context_id)
    }
}

/// A persisted per-user, per-context notification switch.
///
/// At most one document exists per (user, context) key; writes go through an
/// atomic upsert so concurrent updates settle last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationOverride {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub context_type: String,
    pub context_id: String,
    pub enabled: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_utc: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_utc: DateTime<Utc>,
}
