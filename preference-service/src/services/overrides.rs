use async_trait::async_trait;
use mongodb::{
    bson::{DateTime as BsonDateTime, doc},
    options::UpdateOptions,
};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::ContextRef;
use crate::services::PreferenceDb;

/// Storage for per-user, per-context notification overrides.
///
/// When no override document exists the store reports `true`: notifications
/// are on by default and an override exists to mute a context.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Whether notifications are enabled for (user, context).
    async fn enabled_for(&self, user_id: &str, context: &ContextRef) -> Result<bool, AppError>;

    /// Idempotent upsert of the override for (user, context).
    async fn enable_for_context(
        &self,
        user_id: &str,
        context: &ContextRef,
        enable: bool,
    ) -> Result<(), AppError>;

    /// Liveness of the backing store.
    async fn health_check(&self) -> Result<(), AppError>;
}

#[async_trait]
impl OverrideStore for PreferenceDb {
    async fn enabled_for(&self, user_id: &str, context: &ContextRef) -> Result<bool, AppError> {
        let filter = doc! {
            "user_id": user_id,
            "context_type": &context.context_type,
            "context_id": &context.context_id,
        };

        let existing = self.overrides().find_one(filter, None).await.map_err(|e| {
            tracing::error!("Failed to look up notification override: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(existing.map(|o| o.enabled).unwrap_or(true))
    }

    async fn enable_for_context(
        &self,
        user_id: &str,
        context: &ContextRef,
        enable: bool,
    ) -> Result<(), AppError> {
        let now = BsonDateTime::now();
        let filter = doc! {
            "user_id": user_id,
            "context_type": &context.context_type,
            "context_id": &context.context_id,
        };
        let update = doc! {
            "$set": { "enabled": enable, "updated_utc": now },
            "$setOnInsert": {
                "user_id": user_id,
                "context_type": &context.context_type,
                "context_id": &context.context_id,
                "created_utc": now,
            },
        };

        self.overrides()
            .update_one(
                filter,
                update,
                UpdateOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert notification override: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::debug!(user_id = %user_id, context = %context, enabled = enable,
            "Notification override written");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        PreferenceDb::health_check(self).await
    }
}

/// In-memory override store used by integration tests.
#[derive(Default)]
pub struct MemoryOverrideStore {
    inner: Mutex<HashMap<(String, String, String), bool>>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(user_id: &str, context: &ContextRef) -> (String, String, String) {
        (
            user_id.to_string(),
            context.context_type.clone(),
            context.context_id.clone(),
        )
    }
}

#[async_trait]
impl OverrideStore for MemoryOverrideStore {
    async fn enabled_for(&self, user_id: &str, context: &ContextRef) -> Result<bool, AppError> {
        let inner = self.inner.lock().expect("override store lock poisoned");
        Ok(inner
            .get(&Self::key(user_id, context))
            .copied()
            .unwrap_or(true))
    }

    async fn enable_for_context(
        &self,
        user_id: &str,
        context: &ContextRef,
        enable: bool,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().expect("override store lock poisoned");
        inner.insert(Self::key(user_id, context), enable);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_to_enabled_without_override() {
        let store = MemoryOverrideStore::new();
        let ctx = ContextRef::course("course-1");
        assert!(store.enabled_for("user-1", &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn upsert_is_idempotent_and_keyed_per_context() {
        let store = MemoryOverrideStore::new();
        let ctx_a = ContextRef::course("course-a");
        let ctx_b = ContextRef::course("course-b");

        store
            .enable_for_context("user-1", &ctx_a, false)
            .await
            .unwrap();
        store
            .enable_for_context("user-1", &ctx_a, false)
            .await
            .unwrap();

        assert!(!store.enabled_for("user-1", &ctx_a).await.unwrap());
        assert!(store.enabled_for("user-1", &ctx_b).await.unwrap());
        assert!(store.enabled_for("user-2", &ctx_a).await.unwrap());
    }
}
