use axum::{extract::State, response::Json, routing::get, Router};
use relay_shared::now_utc;
use serde_json::{json, Value};
use crate::app_state::AppState;

const SERVICE_NAME: &str = "helpdesk-relay";

pub const INDEX_MESSAGE: &str = "Welcome to the helpdesk relay API!\n\nValid endpoints are:\n\n\
/ - You are here, this displays info about the API\n\
/api/health - Health check\n\
/api/groups - Lists helpdesk groups\n\
/api/users - Lists users, POST creates a user\n\
/api/users/:userID - Returns one user\n\
/api/users/mail/:mail - Looks a user up by email\n\
/api/users/search/:name - Returns the user whose name is closest to :name\n\
/api/tickets/:ticketID - Returns one ticket\n\
/api/ticket - POST creates a ticket\n\
/api/ticket/:ticketID/:recipient - Returns the ticket messages visible to :recipient\n\
/api/attachment/:id/:ticket_id/:attachment_id - Returns an attachment as base64";

pub async fn index_handler() -> Json<Value> {
    Json(json!({ "message": INDEX_MESSAGE }))
}

pub async fn health_check(State(app_state): State<AppState>) -> Json<Value> {
    let health_data = json!({
        "status": "healthy",
        "timestamp": now_utc().timestamp(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": app_state.uptime_seconds()
    });

    Json(health_data)
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check))
}
