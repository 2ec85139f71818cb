use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use config::ConfigError;
use thiserror::Error;

/// 单次转发请求内的错误类型
///
/// 所有错误都在处理器边界内转换为 HTTP 状态码与纯文本说明，不做自动重试。
#[derive(Error, Debug)]
pub enum AppError {
    /// 非 POST 方法访问上传端点
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 请求中缺少名为 `file` 的文件字段（或 multipart 无法解析）
    #[error("No file provided")]
    MissingFile,

    /// 入站请求体超过配置的上限（仅在配置了 relay.max_upload_bytes 时出现）
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// 构造下游请求失败
    #[error("Failed to create request: {0}")]
    RequestConstruction(String),

    /// 调用下游识别服务失败（连接被拒、DNS、TLS、超时等）
    #[error("Failed to call recognition service err: {0}")]
    UpstreamCall(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RequestConstruction(_) | AppError::UpstreamCall(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // `String` 的 IntoResponse 会带上 text/plain; charset=utf-8
        (self.status_code(), self.to_string()).into_response()
    }
}

/// 启动阶段错误（配置、下游地址、监听端口）
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("配置加载失败: {0}")]
    Config(#[from] ConfigError),

    #[error("下游地址无效: {0}")]
    InvalidDownstreamUrl(String),

    #[error("HTTP Client 初始化失败: {0}")]
    HttpClient(String),

    #[error("监听地址绑定失败 {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let detail = error_chain(&err);
        if err.is_builder() {
            AppError::RequestConstruction(detail)
        } else {
            AppError::UpstreamCall(detail)
        }
    }
}

/// 拼接完整的错误链；reqwest 的 Display 不含底层原因（如 connection refused）。
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
