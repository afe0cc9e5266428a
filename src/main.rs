pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod server;
pub mod storage;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let handle = match server::start(settings).await {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to start web UI: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听退出信号: {}", e);
    }

    if let Err(e) = handle.stopped().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
