use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn, error};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub async fn request_logging(
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!("Incoming request [{}]: {} {}", request_id, method, uri);

    let mut response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if status.is_success() {
        info!("Request completed [{}]: {} {} - {}ms", request_id, method, uri, duration.as_millis());
    } else if status.is_client_error() {
        warn!("Client error [{}]: {} {} - {} ({}ms)", request_id, method, uri, status, duration.as_millis());
    } else {
        error!("Server error [{}]: {} {} - {} ({}ms)", request_id, method, uri, status, duration.as_millis());
    }

    response
}
