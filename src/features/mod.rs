/// 健康检查
pub mod health;

/// 上传转发（入站 multipart -> 识别服务 -> 原样回写）
pub mod relay;
