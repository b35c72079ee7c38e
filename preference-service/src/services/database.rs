use crate::models::{Course, Enrollment, FeatureFlag, NotificationOverride};
use mongodb::{
    Client as MongoClient, Collection, Database, IndexModel, bson::doc, options::IndexOptions,
};
use service_core::error::AppError;

/// MongoDB access for preference-service.
///
/// Backs both the [`OverrideStore`](crate::services::OverrideStore) and
/// [`CourseDirectory`](crate::services::CourseDirectory) traits.
#[derive(Clone)]
pub struct PreferenceDb {
    client: MongoClient,
    db: Database,
}

impl PreferenceDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for preference-service");

        // Unique compound key makes the upsert in enable_for_context atomic
        // per (user, context): concurrent writers settle last-write-wins on
        // one document instead of racing to insert duplicates.
        let override_key_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "context_type": 1, "context_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("override_key_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.overrides()
            .create_index(override_key_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create override key index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let enrollment_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("enrollment_membership_idx".to_string())
                    .build(),
            )
            .build();

        self.enrollments()
            .create_index(enrollment_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create enrollment index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let feature_flag_index = IndexModel::builder()
            .keys(doc! { "account_id": 1, "feature": 1 })
            .options(
                IndexOptions::builder()
                    .name("feature_flag_key_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.feature_flags()
            .create_index(feature_flag_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create feature flag index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub fn overrides(&self) -> Collection<NotificationOverride> {
        self.db.collection("notification_overrides")
    }

    pub fn courses(&self) -> Collection<Course> {
        self.db.collection("courses")
    }

    pub fn enrollments(&self) -> Collection<Enrollment> {
        self.db.collection("enrollments")
    }

    pub fn feature_flags(&self) -> Collection<FeatureFlag> {
        self.db.collection("feature_flags")
    }
}
