use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::middleware::AuthUser;
use crate::models::{ContextRef, Course, MUTE_NOTIFICATIONS_BY_COURSE};
use crate::services::metrics::{record_override_read, record_override_write};
use crate::utils::{str_to_boolean, value_to_boolean};
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct EnableQuery {
    pub enable: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnableBody {
    pub enable: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct EnabledResponse {
    pub enabled: bool,
}

/// Show whether notifications are enabled for a course.
///
/// `GET /api/v1/users/self/courses/:course_id/notifications_enabled`
///
/// Requires authentication only; there is no additional permission gate on
/// reads. Returns `{ "enabled": <bool> }`.
#[axum::debug_handler]
pub async fn notifications_enabled(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<EnabledResponse>, AppError> {
    let course = resolve_course(&state, &course_id).await?;
    let context = ContextRef::course(&course.id);

    let enabled = state.overrides.enabled_for(user.id(), &context).await?;
    record_override_read(&context.context_type);

    Ok(Json(EnabledResponse { enabled }))
}

/// Enable or disable notifications for a course.
///
/// `PUT /api/v1/users/self/courses/:course_id/enable_notifications`
///
/// The `enable` parameter is accepted from the JSON body or the query string
/// and coerced from common boolean encodings. Writing requires the
/// `mute_notifications_by_course` feature on the course's root account;
/// enabling additionally requires current read access on the course. Returns
/// `{ "enabled": <bool> }` re-read after the write.
#[axum::debug_handler]
pub async fn enable_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
    Query(query): Query<EnableQuery>,
    body: Option<Json<EnableBody>>,
) -> Result<Json<EnabledResponse>, AppError> {
    let course = resolve_course(&state, &course_id).await?;

    let feature_on = state
        .courses
        .feature_enabled(&course.root_account_id, MUTE_NOTIFICATIONS_BY_COURSE)
        .await?;
    if !feature_on {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "notification overrides are not enabled for this account"
        )));
    }

    let enable = resolve_enable_param(&query, body.as_deref());

    // Enabling requires current read access. Disabling never does: a user
    // removed from a course must still be able to silence its notifications.
    if enable && !state.courses.grants_read(user.id(), &course.id).await? {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "insufficient permission to enable notifications for course {}",
            course.id
        )));
    }

    let context = ContextRef::course(&course.id);
    state
        .overrides
        .enable_for_context(user.id(), &context, enable)
        .await?;
    record_override_write(&context.context_type, enable);

    // Re-read rather than echoing the input so the response reflects what the
    // store actually holds.
    let enabled = state.overrides.enabled_for(user.id(), &context).await?;

    Ok(Json(EnabledResponse { enabled }))
}

async fn resolve_course(state: &AppState, course_id: &str) -> Result<Course, AppError> {
    state
        .courses
        .find_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("course {} not found", course_id)))
}

/// Body parameter wins over the query string, mirroring form/query merging in
/// the web frontends this API serves. Absent everywhere means `false`.
fn resolve_enable_param(query: &EnableQuery, body: Option<&EnableBody>) -> bool {
    if let Some(value) = body.and_then(|b| b.enable.as_ref()) {
        return value_to_boolean(value);
    }
    if let Some(raw) = query.enable.as_deref() {
        return str_to_boolean(raw);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_takes_precedence_over_query() {
        let query = EnableQuery {
            enable: Some("false".to_string()),
        };
        let body = EnableBody {
            enable: Some(json!(true)),
        };
        assert!(resolve_enable_param(&query, Some(&body)));
    }

    #[test]
    fn falls_back_to_query_then_false() {
        let query = EnableQuery {
            enable: Some("1".to_string()),
        };
        assert!(resolve_enable_param(&query, None));

        let empty = EnableQuery { enable: None };
        assert!(!resolve_enable_param(&empty, None));
        assert!(!resolve_enable_param(&empty, Some(&EnableBody::default())));
    }
}
