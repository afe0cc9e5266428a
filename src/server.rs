use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::{create_router, AppState, WebUiState};
use crate::config::Settings;
use crate::error::{Result, WebUiError};
use crate::storage::ConfigStore;

/// 正在运行的 Web UI 实例。每个句柄独占自己的监听器和存储
pub struct WebUiHandle {
    local_addr: SocketAddr,
    state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

/// 预热镜像、绑定端口并在后台运行服务，绑定成功后返回
pub async fn start(settings: Settings) -> Result<WebUiHandle> {
    let store = ConfigStore::new(
        settings.config_path.clone(),
        settings.default_config_path.clone(),
    );
    let configured = store.exists_and_load().await.is_some();

    let state = Arc::new(WebUiState {
        store,
        assets_dir: settings.assets_dir.clone(),
    });
    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = TcpListener::bind(&addr).await.map_err(WebUiError::Bind)?;
    let local_addr = listener.local_addr().map_err(WebUiError::Bind)?;

    let (tx, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await
    });

    tracing::info!("HoyoLab Auto Web UI started");
    tracing::info!("Access at: http://localhost:{}", local_addr.port());
    if configured {
        let mirror = state.store.mirror();
        let (accounts, platforms) = mirror
            .document
            .as_ref()
            .map_or((0, 0), |d| (d.account_count(), d.platform_count()));
        tracing::info!(
            "Settings Panel is ready ({} accounts, {} platforms in {})",
            accounts,
            platforms,
            state.store.config_path().display()
        );
    } else {
        tracing::info!("Setup Wizard is ready");
    }

    Ok(WebUiHandle {
        local_addr,
        state,
        shutdown: Some(tx),
        task: Some(task),
    })
}

impl WebUiHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn config_exists(&self) -> bool {
        self.state.store.mirror_exists()
    }

    /// 关闭监听器并等待后台任务结束。已停止时为空操作
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        match task.await {
            Ok(result) => result?,
            Err(e) => tracing::warn!("Web UI 服务任务异常退出: {}", e),
        }
        tracing::info!("Web UI stopped");
        Ok(())
    }

    /// 消耗句柄并停止服务
    pub async fn stopped(mut self) -> Result<()> {
        self.stop().await
    }
}
