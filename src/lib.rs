/// 路由组装
pub mod app;

/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// 优雅退出管理模块
pub mod shutdown;

/// HTTP Client 构建
pub mod http;

/// OpenAPI 文档
pub mod openapi;

/// request_id 中间件
pub mod request_id;

// 导出常用类型供外部使用
pub use config::AppConfig;
pub use error::{AppError, StartupError};
pub use shutdown::{ShutdownManager, ShutdownReason};
pub use state::AppState;
