use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::ActivityDirectory;
use crate::services::activities_service::{self, ActivityError, ParticipantEmail};
use crate::web::router::AppState;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

fn error_response(e: ActivityError) -> (StatusCode, Json<Value>) {
    (e.status(), Json(serde_json::json!({ "detail": e.to_string() })))
}

fn rejection_response(status: StatusCode, body_text: String) -> (StatusCode, Json<Value>) {
    warn!(%status, detail = %body_text, "malformed request");
    (status, Json(serde_json::json!({ "detail": body_text })))
}

/// Resolves the path and query extractors into an activity name and a
/// validated email, answering malformed input with a `detail` body.
fn request_target(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<(String, ParticipantEmail), (StatusCode, Json<Value>)> {
    let Path(activity_name) = path.map_err(|r| rejection_response(r.status(), r.body_text()))?;
    let Query(query) = query.map_err(|r| rejection_response(r.status(), r.body_text()))?;
    let email =
        ParticipantEmail::parse(query.email.as_deref().unwrap_or("")).map_err(error_response)?;
    Ok((activity_name, email))
}

pub async fn list_activities_handler(State(state): State<AppState>) -> Json<ActivityDirectory> {
    Json(activities_service::list_activities(&state.store).await)
}

pub async fn signup_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult {
    let (activity_name, email) = request_target(path, query)?;
    activities_service::signup(&state.store, &activity_name, &email, state.policy)
        .await
        .map(|message| Json(serde_json::json!({ "message": message })))
        .map_err(error_response)
}

pub async fn unregister_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult {
    let (activity_name, email) = request_target(path, query)?;
    activities_service::unregister(&state.store, &activity_name, &email)
        .await
        .map(|message| Json(serde_json::json!({ "message": message })))
        .map_err(error_response)
}
