use std::future::IntoFuture;

use face_relay::app::build_router;
use face_relay::features::relay::UPLOAD_PATH;
use face_relay::{AppConfig, AppState, ShutdownManager, StartupError};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "face_relay=info,tower_http=info".into()),
        )
        .init();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("{}", StartupError::from(e));
        std::process::exit(1);
    }
    let config = AppConfig::global();

    let shutdown_manager = ShutdownManager::new();
    if let Err(e) = shutdown_manager.start_signal_handler() {
        tracing::error!("信号处理器启动失败: {}", e);
        std::process::exit(1);
    }

    let app_state = match AppState::new(&config.relay) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let downstream = app_state.recognition.endpoint().clone();
    let app = build_router(app_state, &config.relay);

    let addr = config.server_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            let err = StartupError::Bind {
                addr: addr.clone(),
                reason: e.to_string(),
            };
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    };

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Upload: http://{}{}", addr, UPLOAD_PATH);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("Downstream: {}", downstream);

    let signal = shutdown_manager.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let reason = signal.wait_for_shutdown().await;
            tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
        })
        .into_future();

    // 收到退出信号后最多再等待 shutdown.timeout_secs 让在途请求完成
    let drain_timeout = config.shutdown.timeout_duration();
    let drain_deadline = async {
        shutdown_manager.wait_for_shutdown().await;
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        res = server => {
            if let Err(e) = res {
                tracing::error!("服务器运行错误: {}", e);
                std::process::exit(1);
            }
            tracing::info!("服务器已优雅关闭");
        }
        _ = drain_deadline => {
            tracing::warn!(
                "优雅退出超时（{}秒），强制退出",
                config.shutdown.timeout_secs
            );
        }
    }
}
