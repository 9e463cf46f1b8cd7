//! Legacy course and comment routes. Nothing backs them; they validate the
//! request and answer with a null id.

use axum::{
    extract::Path,
    response::Json,
    routing::{delete, put},
    Router,
};
use relay_shared::{CourseUpdateRequest, DeleteCommentRequest, IdBody, RelayError};
use serde_json::Value;
use tracing::info;
use crate::{app_state::AppState, error::ApiError};

pub async fn update_course(
    Path(course_id): Path<String>,
    Json(payload): Json<CourseUpdateRequest>,
) -> Result<Json<IdBody>, ApiError> {
    let has_username = payload.username.as_deref().is_some_and(|u| !u.is_empty());
    if !has_username || payload.accepted.is_none() || payload.editing.is_none() {
        return Err(ApiError(RelayError::InvalidInput(
            "username, accepted, and editing are required".to_string(),
        )));
    }

    if course_id.trim().is_empty() {
        return Err(ApiError(RelayError::InvalidInput("Course ID is required.".to_string())));
    }

    info!("Legacy course update for {} ignored", course_id);
    Ok(Json(IdBody { id: Value::Null }))
}

pub async fn delete_comment(Json(payload): Json<DeleteCommentRequest>) -> Result<Json<IdBody>, ApiError> {
    let has_username = payload.username.as_deref().is_some_and(|u| !u.is_empty());
    let has_comment_id = payload.comment_id.as_ref().is_some_and(Value::is_number);
    if !has_username || !has_comment_id {
        return Err(ApiError(RelayError::InvalidInput("Comment ID is required".to_string())));
    }

    info!(
        "Legacy comment delete for course {:?} ignored",
        payload.course_id.as_deref().unwrap_or_default()
    );
    Ok(Json(IdBody { id: Value::Null }))
}

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses/:course_id", put(update_course))
        .route("/comments", delete(delete_comment))
}
