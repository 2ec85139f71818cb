use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{HeaderValue, Method, StatusCode, header},
    response::Response,
    routing::post,
};
use futures_util::TryStreamExt;

use crate::error::AppError;
use crate::state::AppState;

use super::models::{FILE_FIELD, PassthroughPolicy, UploadedFile};

/// 上传端点路径
pub const UPLOAD_PATH: &str = "/upload-face";

/// OpenAPI 用的表单描述（实际解析走 `Multipart` 流式读取）
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct UploadFaceForm {
    /// 待识别的图片文件（原样转发，不做校验）
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/upload-face",
    summary = "上传人脸图片并转发识别",
    description = "接收 multipart 表单中的 `file` 字段，重新封装为 multipart 请求转发给识别服务，并将识别服务的响应原样回写。默认情况下状态码固定为 200、Content-Type 固定为 application/json。",
    request_body(content = UploadFaceForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "识别服务响应（原样透传）", body = serde_json::Value, content_type = "application/json"),
        (status = 400, description = "缺少 file 字段", body = String, content_type = "text/plain"),
        (status = 405, description = "仅支持 POST", body = String, content_type = "text/plain"),
        (status = 413, description = "超过配置的上传上限（默认不限制）", body = String, content_type = "text/plain"),
        (status = 500, description = "构造请求失败或调用识别服务失败", body = String, content_type = "text/plain")
    ),
    tag = "Relay"
)]
pub async fn upload_face(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!("非 multipart 请求: {}", e);
        AppError::MissingFile
    })?;
    let file = read_upload(multipart).await?;

    let file_name = file.file_name.clone();
    if file.is_empty() {
        tracing::debug!(file_name = %file_name, "上传文件为空，照常转发");
    }
    tracing::info!(
        file_name = %file_name,
        size = file.len(),
        content_type = file.content_type.as_deref().unwrap_or("-"),
        "转发到识别服务"
    );

    let started = Instant::now();
    let upstream = state.recognition.relay(file).await.inspect_err(|e| {
        tracing::warn!(file_name = %file_name, "转发失败: {}", e);
    })?;

    tracing::info!(
        file_name = %file_name,
        status = upstream.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "识别服务已响应"
    );

    Ok(passthrough_response(upstream, state.passthrough))
}

/// 非 POST 方法统一返回 405
pub async fn method_not_allowed(method: Method) -> AppError {
    tracing::debug!(%method, "上传端点不支持该方法");
    AppError::MethodNotAllowed
}

/// 取第一个带文件名的 `file` 分片；其余字段跳过。
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(inbound_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().and_then(base_file_name).map(str::to_owned)
        else {
            // 没有文件名的 `file` 是普通表单值，不算文件
            continue;
        };
        let content_type = field.content_type().map(str::to_owned);

        let bytes = field.bytes().await.map_err(inbound_error)?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::MissingFile)
}

/// 只保留最后一个路径分隔符之后的部分；`.`、`..` 与空串视为没有文件名。
fn base_file_name(raw: &str) -> Option<&str> {
    raw.rsplit(['/', '\\'])
        .next()
        .filter(|name| !matches!(*name, "" | "." | ".."))
}

/// 读取入站 multipart 出错：超出上限报 413，其余一律按缺少文件处理。
fn inbound_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("上传超过配置的上限: {}", err);
        AppError::PayloadTooLarge(err.body_text())
    } else {
        tracing::warn!("读取 multipart 失败: {}", err);
        AppError::MissingFile
    }
}

/// 将下游响应流式回写给调用方
fn passthrough_response(upstream: reqwest::Response, policy: PassthroughPolicy) -> Response {
    let status = if policy.forward_status {
        upstream.status()
    } else {
        StatusCode::OK
    };

    let content_type = policy
        .forward_content_type
        .then(|| upstream.headers().get(header::CONTENT_TYPE).cloned())
        .flatten()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let stream = upstream.bytes_stream().inspect_err(|e| {
        // 响应头已发出，只能中断连接
        tracing::warn!("回写识别服务响应中断: {}", e);
    });

    let mut res = Response::new(Body::from_stream(stream));
    *res.status_mut() = status;
    res.headers_mut().insert(header::CONTENT_TYPE, content_type);
    res
}

/// `upload_limit` 为 None 时不限制请求体大小（大文件照常转发）
pub fn create_relay_router(upload_limit: Option<usize>) -> Router<AppState> {
    let body_limit = match upload_limit {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };
    Router::new()
        .route(UPLOAD_PATH, post(upload_face).fallback(method_not_allowed))
        .layer(body_limit)
}
