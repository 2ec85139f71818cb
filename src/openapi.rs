use utoipa::openapi::server::ServerBuilder;
use utoipa::{Modify, OpenApi};

/// 为 Swagger UI 提供 Servers 配置（所有接口都挂在根路径下）。
struct ApiServers;

impl Modify for ApiServers {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let root = ServerBuilder::new()
            .url("/")
            .description(Some("根路径"))
            .build();
        openapi.servers = Some(vec![root]);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::health_check,
        crate::features::relay::handler::upload_face,
    ),
    components(schemas(
        crate::features::health::handler::HealthResponse,
        crate::features::relay::handler::UploadFaceForm,
    )),
    modifiers(&ApiServers),
    tags(
        (
            name = "Relay",
            description = "上传转发：接收图片并转发给人脸识别服务，响应原样透传。"
        ),
        (name = "Health", description = "健康检查：服务探活。"),
    ),
    info(
        title = "Face Relay API",
        version = env!("CARGO_PKG_VERSION"),
        description = "人脸识别上传转发服务（Axum + utoipa）。"
    )
)]
pub struct ApiDoc;
