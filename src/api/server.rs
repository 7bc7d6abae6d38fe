//! HTTP Server 实现
//!
//! 使用 axum 创建 HTTP Server，支持启动与优雅关闭。

use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{self, AppState};
use crate::config::AppConfig;

/// Server 控制句柄
///
/// 用于控制 Server 的生命周期，drop 时自动关闭
pub struct ServerHandle {
    /// 关闭信号发送器
    shutdown_tx: Option<oneshot::Sender<()>>,
    /// 实际绑定的地址
    addr: SocketAddr,
}

impl ServerHandle {
    /// 获取实际绑定的地址（端口为 0 时由系统分配）
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// 关闭 Server
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// 创建路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/auth", get(handlers::auth_challenge))
        .route("/api/notion", get(handlers::latest_note_url))
        .route(
            "/api/notion/latest",
            get(handlers::latest_journal_url).put(handlers::append_to_latest_journal),
        )
        .route(
            "/api/notion/task",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/notion/task/new",
            get(handlers::new_task_ping).post(handlers::create_task),
        )
        .route("/api/notion/routine", put(handlers::update_routine))
        .route("/api/notion/journal-task", post(handlers::link_today_tasks))
        .route("/api/notion/toggl", post(handlers::publish_toggl_summary))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// HTTP Server
pub struct ApiServer {
    config: AppConfig,
}

impl ApiServer {
    /// 创建新的 Server 实例
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 启动 Server
    ///
    /// # Arguments
    /// * `addr` - 可选监听地址，如果不提供则使用配置中的 HOST/PORT
    ///
    /// # Returns
    /// ServerHandle 用于控制 Server 生命周期
    pub async fn start(&self, addr: Option<SocketAddr>) -> Result<ServerHandle, String> {
        let addr = addr.unwrap_or_else(|| self.config.bind_addr());
        let state = Arc::new(AppState::new(self.config.clone()));
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read local address: {}", e))?;

        // 创建关闭信号
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        // 在后台运行 Server
        tokio::spawn(async move {
            let graceful = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = graceful.await {
                log::error!("Server error: {}", e);
            }
        });

        log::info!("Listening on http://{}", addr);
        Ok(ServerHandle {
            shutdown_tx: Some(shutdown_tx),
            addr,
        })
    }
}
