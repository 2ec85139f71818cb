use std::sync::Arc;

use crate::config::RelayConfig;
use crate::error::StartupError;
use crate::features::relay::{PassthroughPolicy, RecognitionClient};

/// 聚合的应用共享状态（只读，请求间不共享可变数据）
#[derive(Clone)]
pub struct AppState {
    /// 下游识别服务客户端
    pub recognition: Arc<RecognitionClient>,
    /// 下游响应回写策略
    pub passthrough: PassthroughPolicy,
}

impl AppState {
    pub fn new(relay: &RelayConfig) -> Result<Self, StartupError> {
        Ok(Self {
            recognition: Arc::new(RecognitionClient::new(relay)?),
            passthrough: PassthroughPolicy::from(relay),
        })
    }
}
