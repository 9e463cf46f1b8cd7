use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::Value;
use crate::{app_state::AppState, error::ApiError};

pub async fn get_groups(State(app_state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let groups = app_state.helpdesk.get_json(&["groups"]).await?;
    Ok(Json(groups))
}

pub fn group_routes() -> Router<AppState> {
    Router::new().route("/groups", get(get_groups))
}
