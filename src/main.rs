// Journal Bridge 服务入口

use env_logger::Env;

use journal_bridge::api::ApiServer;
use journal_bridge::AppConfig;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let handle = match ApiServer::new(config).start(None).await {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
    handle.shutdown();
}
