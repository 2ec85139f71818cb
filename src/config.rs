use config::{Config as ConfigBuilder, ConfigError, Environment, File, Source};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 识别服务默认地址（旧部署中写死在代码里的地址）
pub const DEFAULT_DOWNSTREAM_URL: &str =
    "https://bug-free-palm-tree-4xjq6r9j9jc7wvj-5000.app.github.dev/recognize-face";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 转发配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// 下游识别服务地址（完整 URL，含路径）
    pub downstream_url: String,
    /// 下游请求总超时（秒），0 表示不限制
    pub timeout_secs: u64,
    /// 下游建连超时（秒），0 表示不限制
    pub connect_timeout_secs: u64,
    /// 入站请求体上限（字节），0 表示不限制
    pub max_upload_bytes: usize,
    /// 是否透传下游的 Content-Type（默认统一声明为 application/json）
    pub forward_content_type: bool,
    /// 是否透传下游状态码（默认统一返回 200）
    pub forward_status: bool,
}

impl RelayConfig {
    /// 入站请求体上限；未配置时返回 None
    pub fn upload_limit(&self) -> Option<usize> {
        (self.max_upload_bytes > 0).then_some(self.max_upload_bytes)
    }

    /// 下游请求总超时；未配置时返回 None
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// 下游建连超时；未配置时返回 None
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            downstream_url: DEFAULT_DOWNSTREAM_URL.to_string(),
            timeout_secs: 0,
            connect_timeout_secs: 0,
            max_upload_bytes: 0,
            forward_content_type: false,
            forward_status: false,
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// 等待在途请求完成的最长时间（秒）
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// 转发配置
    #[serde(default)]
    pub relay: RelayConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    ///
    /// 配置文件可缺省；环境变量形如 `APP_RELAY__DOWNSTREAM_URL`、`APP_SERVER__PORT`。
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();
        tracing::info!("正在从 {:?} 加载配置文件", config_path);

        Self::load_from(File::from(config_path).required(false))
    }

    /// 以给定来源为基础加载配置，环境变量覆盖优先级最高
    pub fn load_from<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let builder = ConfigBuilder::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = builder.try_deserialize()?;
        tracing::debug!(
            "配置加载完成: downstream_url = {}, timeout_secs = {}",
            config.relay.downstream_url,
            config.relay.timeout_secs
        );
        Ok(config)
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
