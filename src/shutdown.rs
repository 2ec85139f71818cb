//! 优雅退出管理模块
//!
//! 监听 SIGINT/SIGTERM（Windows 下为 Ctrl+C），记录第一次退出原因，
//! 供 `axum::serve(..).with_graceful_shutdown(..)` 等待。

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// 退出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// 用户中断信号 (Ctrl+C)
    Interrupt,
    /// 终止信号 (SIGTERM)
    Terminate,
    /// 应用请求退出
    Application,
}

/// 优雅退出管理器
///
/// 可随意克隆；所有副本共享同一个退出状态。
#[derive(Debug, Clone)]
pub struct ShutdownManager {
    reason_tx: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (reason_tx, _) = watch::channel(None);
        Self {
            reason_tx: Arc::new(reason_tx),
        }
    }

    /// 触发优雅退出；只有第一次触发生效
    pub fn trigger_shutdown(&self, reason: ShutdownReason) {
        let first = self.reason_tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        });

        if first {
            info!("触发优雅退出: {:?}", reason);
        } else {
            debug!("重复的退出信号被忽略: {:?}", reason);
        }
    }

    /// 检查是否正在关闭
    pub fn is_shutting_down(&self) -> bool {
        self.reason_tx.borrow().is_some()
    }

    /// 等待退出信号；先触发后等待也会立即返回
    pub async fn wait_for_shutdown(&self) -> ShutdownReason {
        let mut rx = self.reason_tx.subscribe();
        match rx.wait_for(Option::is_some).await {
            Ok(reason) => (*reason).unwrap_or(ShutdownReason::Application),
            // Sender 与 self 同生命周期，不会提前关闭
            Err(_) => ShutdownReason::Application,
        }
    }

    /// 启动信号处理器
    pub fn start_signal_handler(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;
            let manager = self.clone();

            tokio::spawn(async move {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("接收到SIGINT信号 (Ctrl+C)");
                        manager.trigger_shutdown(ShutdownReason::Interrupt);
                    }
                    _ = sigterm.recv() => {
                        info!("接收到SIGTERM信号");
                        manager.trigger_shutdown(ShutdownReason::Terminate);
                    }
                }
            });
        }

        #[cfg(windows)]
        {
            let manager = self.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("监听Ctrl+C信号失败: {}", e);
                    return;
                }
                info!("接收到Ctrl+C信号");
                manager.trigger_shutdown(ShutdownReason::Interrupt);
            });
        }

        Ok(())
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
