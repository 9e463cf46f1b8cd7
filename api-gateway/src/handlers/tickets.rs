use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use relay_shared::{
    messages_for_recipient, IdBody, RelayError, TicketArticle, TicketMessage, TicketUpdatePayload,
    TicketUpdateRequest,
};
use serde_json::Value;
use tracing::{info, warn};
use crate::{app_state::AppState, error::ApiError};

const CREATE_TICKET_ERROR_MESSAGE: &str = "An error occurred while creating the ticket.";

pub async fn get_ticket(
    Path(ticket_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let ticket = app_state.helpdesk.get_json(&["tickets", &ticket_id]).await?;
    Ok(Json(ticket))
}

// 创建工单，任何失败都返回 500
pub async fn create_ticket(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let created = app_state
        .helpdesk
        .post_json(&["tickets"], &payload)
        .await
        .map_err(|e| {
            warn!("Error creating ticket: {}", e);
            ApiError(RelayError::Transport(CREATE_TICKET_ERROR_MESSAGE.to_string()))
        })?;

    let id = created.get("id").cloned().unwrap_or(Value::Null);
    info!("Created ticket {}", id);
    Ok((StatusCode::CREATED, Json(id)))
}

pub async fn update_ticket(
    Path(ticket_id): Path<String>,
    State(app_state): State<AppState>,
    Json(payload): Json<TicketUpdateRequest>,
) -> Result<Json<IdBody>, ApiError> {
    send_update(&app_state, &ticket_id, payload, None, None).await
}

/// Update a ticket and address its message from `author` to `recipient`.
pub async fn update_ticket_addressed(
    Path((ticket_id, author, recipient)): Path<(String, String, String)>,
    State(app_state): State<AppState>,
    Json(payload): Json<TicketUpdateRequest>,
) -> Result<Json<IdBody>, ApiError> {
    send_update(&app_state, &ticket_id, payload, Some(&author), Some(&recipient)).await
}

async fn send_update(
    app_state: &AppState,
    ticket_id: &str,
    request: TicketUpdateRequest,
    author: Option<&str>,
    recipient: Option<&str>,
) -> Result<Json<IdBody>, ApiError> {
    if request.is_empty() {
        return Err(ApiError(RelayError::InvalidInput(
            "At least one of title, state, priority, group or message is required".to_string(),
        )));
    }

    let payload = TicketUpdatePayload::from_request(request, author, recipient);
    let updated = app_state.helpdesk.put_json(&["tickets", ticket_id], &payload).await?;

    info!("Updated ticket {}", ticket_id);
    Ok(Json(IdBody {
        id: updated.get("id").cloned().unwrap_or(Value::Null),
    }))
}

pub async fn close_ticket(
    Path((ticket_id, author)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<Json<IdBody>, ApiError> {
    let payload = TicketUpdatePayload::close(&author);
    let closed = app_state.helpdesk.put_json(&["tickets", &ticket_id], &payload).await?;

    info!("Ticket {} closed by {}", ticket_id, author);
    Ok(Json(IdBody {
        id: closed.get("id").cloned().unwrap_or(Value::Null),
    }))
}

/// Messages on a ticket that are visible to `recipient`.
pub async fn get_ticket_messages(
    Path((ticket_id, recipient)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<TicketMessage>>, ApiError> {
    let body = app_state
        .helpdesk
        .get_json(&["ticket_articles", "by_ticket", &ticket_id])
        .await?;
    let articles: Vec<TicketArticle> = serde_json::from_value(body).map_err(RelayError::from)?;

    Ok(Json(messages_for_recipient(articles, &recipient)))
}

pub fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/:ticket_id", get(get_ticket))
        .route("/ticket", post(create_ticket))
        .route("/ticket/:ticket_id", put(update_ticket))
        // 第二段在 GET 时是收件人，在 DELETE 时是操作人
        .route("/ticket/:ticket_id/:party", get(get_ticket_messages).delete(close_ticket))
        // 参数名需与上一条路由一致，这里 :party 即作者
        .route("/ticket/:ticket_id/:party/:recipient", put(update_ticket_addressed))
}
