use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::AppState;

/// 转发服务自身状态；`downstream` 只是配置中的地址，不代表识别服务可用
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[schema(example = "face-relay")]
    pub service: &'static str,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// 上传会被转发到的识别服务地址
    #[schema(example = "http://127.0.0.1:5000/recognize-face")]
    pub downstream: String,
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "转发服务存活检查",
    description = "只要进程能处理请求就返回 200，并附带当前转发目标。不向识别服务发起任何请求，识别服务宕机不影响此端点。",
    responses((status = 200, description = "转发服务在线", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        downstream: state.recognition.endpoint().to_string(),
    })
}
