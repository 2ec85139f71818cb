use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::RelayConfig;
use crate::features::health::handler::health_check;
use crate::features::relay::create_relay_router;
use crate::openapi::ApiDoc;
use crate::request_id::{make_request_span, request_id_middleware};
use crate::state::AppState;

/// 组装完整路由（main 与集成测试共用）
pub fn build_router(state: AppState, relay: &RelayConfig) -> Router {
    Router::<AppState>::new()
        .route("/health", get(health_check))
        .merge(create_relay_router(relay.upload_limit()))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        // request_id 需位于 TraceLayer 之外，span 构造时才能读到
        .layer(axum::middleware::from_fn(request_id_middleware))
}
