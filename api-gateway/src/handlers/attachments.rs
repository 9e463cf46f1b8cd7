use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use relay_shared::AttachmentContent;
use tracing::debug;
use crate::{app_state::AppState, error::ApiError, upstream::UpstreamBinary};

/// Relay an article attachment as base64 JSON.
pub async fn get_attachment(
    Path((article_id, ticket_id, attachment_id)): Path<(String, String, String)>,
    State(app_state): State<AppState>,
) -> Result<Json<AttachmentContent>, ApiError> {
    let binary = app_state
        .helpdesk
        .get_binary(&["ticket_attachment", &ticket_id, &article_id, &attachment_id])
        .await?;

    debug!(
        "Relaying attachment {} of ticket {} ({} bytes)",
        attachment_id,
        ticket_id,
        binary.bytes.len()
    );
    Ok(Json(encode_attachment(binary)))
}

pub fn encode_attachment(binary: UpstreamBinary) -> AttachmentContent {
    AttachmentContent {
        filename: binary.filename,
        content_type: binary.content_type,
        size: binary.bytes.len(),
        data: STANDARD.encode(&binary.bytes),
    }
}

pub fn attachment_routes() -> Router<AppState> {
    Router::new().route("/attachment/:id/:ticket_id/:attachment_id", get(get_attachment))
}
