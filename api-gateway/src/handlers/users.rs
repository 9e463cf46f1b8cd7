use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use relay_shared::{RelayError, User};
use serde_json::Value;
use tracing::info;
use crate::{app_state::AppState, error::ApiError};

const CREATE_USER_ERROR_MESSAGE: &str = "An error occurred while creating the customer.";
const NO_USER_WITH_MAIL_MESSAGE: &str = "No user found with that email.";

// 获取用户列表
pub async fn get_users(State(app_state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = app_state.helpdesk.get_json(&["users"]).await?;
    Ok(Json(users))
}

// 获取单个用户详情
pub async fn get_user(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let user = app_state.helpdesk.get_json(&["users", &user_id]).await?;
    Ok(Json(user))
}

/// The user whose email is `mail`, ignoring ASCII case.
///
/// The helpdesk search is full text, so its hits are filtered down to the
/// exact address.
pub async fn get_user_by_mail(
    Path(mail): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let result = app_state
        .helpdesk
        .get_json_with_query(&["users", "search"], &[("query", mail.clone())])
        .await?;

    // 上游可能返回数组或 { users: [...] }
    let hits = match result {
        Value::Array(users) => users,
        Value::Object(mut body) => match body.remove("users") {
            Some(Value::Array(users)) => users,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    hits.into_iter()
        .find(|user| {
            user.get("email")
                .and_then(Value::as_str)
                .map_or(false, |email| email.eq_ignore_ascii_case(&mail))
        })
        .map(Json)
        .ok_or_else(|| ApiError(RelayError::NotFound(NO_USER_WITH_MAIL_MESSAGE.to_string())))
}

/// Closest user by display name.
pub async fn search_user(
    Path(name): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    info!("Searching user directory for {:?}", name);
    let user = app_state.locator.find_closest_user(&name).await?;
    Ok(Json(user))
}

// 创建新用户
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let created = app_state
        .helpdesk
        .post_json(&["users"], &payload)
        .await
        .map_err(|e| ApiError::masked(e, CREATE_USER_ERROR_MESSAGE))?;

    let id = created.get("id").cloned().unwrap_or(Value::Null);
    info!("Created helpdesk user {}", id);
    Ok((StatusCode::CREATED, Json(id)))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route("/users/:user_id", get(get_user))
        .route("/users/mail/:mail", get(get_user_by_mail))
        .route("/users/search/:name", get(search_user))
}
