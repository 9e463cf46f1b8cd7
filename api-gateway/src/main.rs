use anyhow::Result;
use axum::{http::Method, routing::get, Router};
use relay_shared::load_config;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod error;
mod handlers;
mod middleware;
mod upstream;


use app_state::AppState;
use handlers::{
    attachments::attachment_routes, courses::course_routes, groups::group_routes,
    health::health_routes, tickets::ticket_routes, users::user_routes,
};
use middleware::request_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 加载配置
    let config = load_config()?;
    info!("Configuration loaded successfully");
    info!("Relaying to {}", config.upstream.base());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // 创建应用状态
    let app_state = AppState::new(config)?;

    // 构建应用
    let app = create_app(app_state);

    // 启动服务器
    info!("Helpdesk relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn create_app(app_state: AppState) -> Router {
    // 创建中间件层
    let middleware_layer = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                    Method::HEAD,
                ]),
        )
        .layer(axum::middleware::from_fn(request_logging))
        .into_inner();

    // 所有 API 路由挂在 /api 下
    let api = Router::new()
        .merge(health_routes())
        .merge(group_routes())
        .merge(user_routes())
        .merge(ticket_routes())
        .merge(attachment_routes())
        .merge(course_routes());

    Router::new()
        .route("/", get(handlers::health::index_handler))
        .nest("/api", api)
        .layer(middleware_layer)
        .with_state(app_state)
}
