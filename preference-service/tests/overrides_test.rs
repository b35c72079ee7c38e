mod common;

use common::{TestApp, assert_enabled_body};
use reqwest::{Client, StatusCode};
use serde_json::json;

// =============================================================================
// Authentication and course resolution
// =============================================================================

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    let client = Client::new();

    let response = client
        .get(app.enabled_url("c1"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .put(app.enable_url("c1"))
        .json(&json!({ "enable": true }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");

    let response = app.get_enabled("not-a-jwt", "c1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_course_returns_not_found() {
    let app = TestApp::spawn().await;
    let token = app.token_for("user-1");

    let response = app.get_enabled(&token, "missing-course").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.put_enable(&token, "missing-course", json!(true)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// GetEnabled
// =============================================================================

#[tokio::test]
async fn notifications_default_to_enabled() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    let token = app.token_for("user-1");

    let response = app.get_enabled(&token, "c1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, true).await;
}

#[tokio::test]
async fn read_requires_no_enrollment() {
    // Reads have no permission gate beyond authentication.
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    let token = app.token_for("outsider");

    let response = app.get_enabled(&token, "c1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// SetEnabled
// =============================================================================

#[tokio::test]
async fn set_then_get_round_trip() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    let response = app.put_enable(&token, "c1", json!(false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, false).await;

    let response = app.get_enabled(&token, "c1").await;
    assert_enabled_body(response, false).await;

    let response = app.put_enable(&token, "c1", json!(true)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, true).await;

    let response = app.get_enabled(&token, "c1").await;
    assert_enabled_body(response, true).await;
}

#[tokio::test]
async fn writes_are_forbidden_without_feature_flag() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    // Feature off: even a disable is rejected, regardless of permissions.
    let response = app.put_enable(&token, "c1", json!(true)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.put_enable(&token, "c1", json!(false)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Nothing was written.
    let response = app.get_enabled(&token, "c1").await;
    assert_enabled_body(response, true).await;
}

#[tokio::test]
async fn enabling_requires_current_read_access() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    // Mute while enrolled, then drop out of the course.
    let response = app.put_enable(&token, "c1", json!(false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    app.courses.unenroll("user-1", "c1");

    // Re-enabling now requires access the user no longer has.
    let response = app.put_enable(&token, "c1", json!(true)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The stored override is untouched.
    let response = app.get_enabled(&token, "c1").await;
    assert_enabled_body(response, false).await;
}

#[tokio::test]
async fn disabling_is_allowed_after_losing_access() {
    // A user removed from a course can still silence its notifications.
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    let token = app.token_for("user-1");

    let response = app.put_enable(&token, "c1", json!(false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, false).await;
}

#[tokio::test]
async fn setting_the_same_value_twice_is_idempotent() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    let response = app.put_enable(&token, "c1", json!(true)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, true).await;

    let response = app.put_enable(&token, "c1", json!(true)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, true).await;
}

#[tokio::test]
async fn overrides_are_scoped_per_course_and_user() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.seed_course("c2", "acct-1");
    app.enable_override_feature("acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    let response = app.put_enable(&token, "c1", json!(false)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Other course, other user: both untouched.
    let response = app.get_enabled(&token, "c2").await;
    assert_enabled_body(response, true).await;

    let other = app.token_for("user-2");
    let response = app.get_enabled(&other, "c1").await;
    assert_enabled_body(response, true).await;
}

// =============================================================================
// Loose boolean parameter encodings
// =============================================================================

#[tokio::test]
async fn truthy_encodings_enable() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    for value in [json!(true), json!("true"), json!("1"), json!(1)] {
        let response = app.put_enable(&token, "c1", value.clone()).await;
        assert_eq!(response.status(), StatusCode::OK, "value: {}", value);
        assert_enabled_body(response, true).await;
    }
}

#[tokio::test]
async fn falsy_encodings_disable() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    for value in [json!(false), json!("false"), json!("0"), json!(0)] {
        let response = app.put_enable(&token, "c1", value.clone()).await;
        assert_eq!(response.status(), StatusCode::OK, "value: {}", value);
        assert_enabled_body(response, false).await;
    }
}

#[tokio::test]
async fn query_string_encoding_is_accepted() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    app.courses.enroll("user-1", "c1");
    let token = app.token_for("user-1");

    let response = Client::new()
        .put(app.enable_url("c1"))
        .query(&[("enable", "0")])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, false).await;

    let response = Client::new()
        .put(app.enable_url("c1"))
        .query(&[("enable", "true")])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, true).await;
}

#[tokio::test]
async fn absent_parameter_resolves_to_disable() {
    let app = TestApp::spawn().await;
    app.seed_course("c1", "acct-1");
    app.enable_override_feature("acct-1");
    // Deliberately not enrolled: absent means disable, which needs no access.
    let token = app.token_for("user-1");

    let response = Client::new()
        .put(app.enable_url("c1"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_enabled_body(response, false).await;
}
