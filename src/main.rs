use std::process;

use order_packer::api;
use order_packer::config::AppConfig;

#[tokio::main]
async fn main() {
    // .env may set RUST_LOG, so it is read before the logger starts.
    let dotenv_result = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = dotenv_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            log::warn!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();
    let api_config = app_config.api.clone();
    let batch_config = app_config.batch.clone();

    log::info!("🚀 Packing service starting...");
    if let Err(err) = api::start_api_server(api_config, batch_config).await {
        log::error!("❌ API server terminated with an error: {err}");
        process::exit(1);
    }
}
