//! Test helper module for preference-service integration tests.

#![allow(dead_code)]

use preference_service::config::{JwtConfig, MongoConfig, PreferenceConfig, RateLimitConfig};
use preference_service::models::{Course, MUTE_NOTIFICATIONS_BY_COURSE};
use preference_service::services::{JwtService, MemoryCourseDirectory, MemoryOverrideStore};
use preference_service::{AppState, build_router};
use service_core::config::Config as CoreConfig;
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const TEST_JWT_SECRET: &str = "integration-test-signing-secret";

/// Test application with a running HTTP server over in-memory stores.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub jwt: JwtService,
    pub courses: Arc<MemoryCourseDirectory>,
    pub overrides: Arc<MemoryOverrideStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_ip_limit(10_000).await
    }

    /// Spawn with a specific global IP rate limit for limiter tests.
    pub async fn spawn_with_ip_limit(global_ip_limit: u32) -> Self {
        let config = PreferenceConfig {
            common: CoreConfig {
                port: 0,
                log_level: "debug".to_string(),
            },
            mongodb: MongoConfig {
                // Unused: tests run against the in-memory stores
                uri: "mongodb://localhost:27017".to_string(),
                database: "preference_test".to_string(),
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
                access_token_expiry_minutes: 15,
            },
            rate_limit: RateLimitConfig {
                global_ip_limit,
                global_ip_window_seconds: 60,
            },
            otlp_endpoint: None,
        };

        let jwt = JwtService::new(&config.jwt).expect("Failed to create JWT service");
        let courses = Arc::new(MemoryCourseDirectory::new());
        let overrides = Arc::new(MemoryOverrideStore::new());
        let ip_rate_limiter = create_ip_rate_limiter(
            config.rate_limit.global_ip_limit,
            config.rate_limit.global_ip_window_seconds,
        );

        let state = AppState {
            config,
            jwt: jwt.clone(),
            overrides: overrides.clone(),
            courses: courses.clone(),
            ip_rate_limiter,
        };

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener.local_addr().unwrap().port();
        let router = build_router(state);

        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
            )
            .await
            .ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            jwt,
            courses,
            overrides,
        }
    }

    /// Mint a valid access token for a user.
    pub fn token_for(&self, user_id: &str) -> String {
        self.jwt
            .generate_access_token(user_id)
            .expect("Failed to generate token")
    }

    /// Seed a course under a root account.
    pub fn seed_course(&self, course_id: &str, account_id: &str) {
        self.courses.add_course(Course {
            id: course_id.to_string(),
            name: format!("Course {}", course_id),
            root_account_id: account_id.to_string(),
        });
    }

    /// Turn the override feature on for an account.
    pub fn enable_override_feature(&self, account_id: &str) {
        self.courses
            .set_feature(account_id, MUTE_NOTIFICATIONS_BY_COURSE, true);
    }

    pub fn enabled_url(&self, course_id: &str) -> String {
        format!(
            "{}/api/v1/users/self/courses/{}/notifications_enabled",
            self.address, course_id
        )
    }

    pub fn enable_url(&self, course_id: &str) -> String {
        format!(
            "{}/api/v1/users/self/courses/{}/enable_notifications",
            self.address, course_id
        )
    }

    pub async fn get_enabled(&self, token: &str, course_id: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(self.enabled_url(course_id))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_enable(
        &self,
        token: &str,
        course_id: &str,
        enable: serde_json::Value,
    ) -> reqwest::Response {
        reqwest::Client::new()
            .put(self.enable_url(course_id))
            .bearer_auth(token)
            .json(&serde_json::json!({ "enable": enable }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Assert a `{ "enabled": <bool> }` body.
pub async fn assert_enabled_body(response: reqwest::Response, expected: bool) {
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, serde_json::json!({ "enabled": expected }));
}
