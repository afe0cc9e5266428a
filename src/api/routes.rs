use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

use super::handlers::{
    get_config, health, index, restart_app, save_config, settings_page, setup_page, test_cookies,
    AppState,
};

/// 创建 Web UI 路由。未匹配的路径回落到静态资源目录
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.assets_dir);

    Router::new()
        .route("/", get(index))
        .route("/setup", get(setup_page))
        .route("/settings", get(settings_page))
        .route("/api/config", get(get_config).post(save_config))
        .route("/api/test-cookies", post(test_cookies))
        .route("/api/restart-app", post(restart_app))
        .route("/api/health", get(health))
        .fallback_service(assets)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(tracing::Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}
