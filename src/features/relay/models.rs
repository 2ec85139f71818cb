use axum::body::Bytes;

use crate::config::RelayConfig;

/// 上游/下游约定的文件字段名
pub const FILE_FIELD: &str = "file";

/// 下游 multipart 中文件分片声明的类型（与旧实现的 form-file 一致）
pub const FORM_FILE_MIME: &str = "application/octet-stream";

/// 从入站 multipart 中取出的文件
///
/// 生命周期仅限单次请求，由处理器独占。
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 客户端提交的文件名（去掉路径部分后转发）
    pub file_name: String,
    /// 客户端声明的类型，仅用于日志，不参与转发
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// 下游响应如何回写给调用方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassthroughPolicy {
    /// 为 true 时透传下游 Content-Type，否则固定为 application/json
    pub forward_content_type: bool,
    /// 为 true 时透传下游状态码，否则固定为 200
    pub forward_status: bool,
}

impl From<&RelayConfig> for PassthroughPolicy {
    fn from(cfg: &RelayConfig) -> Self {
        Self {
            forward_content_type: cfg.forward_content_type,
            forward_status: cfg.forward_status,
        }
    }
}
