use reqwest::Client;

use crate::config::RelayConfig;

/// 出站请求的 User-Agent
pub const USER_AGENT: &str = concat!("face-relay/", env!("CARGO_PKG_VERSION"));

/// 构建转发用的 HTTP Client。
///
/// 说明：
/// - `Client` 内部带连接池且线程安全，进程内只构建一次并挂在 `AppState` 上复用。
/// - 超时均为可选项；未配置时沿用 reqwest 默认行为（不设总超时）。
pub fn build_relay_client(cfg: &RelayConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = cfg.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = cfg.connect_timeout() {
        builder = builder.connect_timeout(connect_timeout);
    }
    builder.build()
}
