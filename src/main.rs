mod api;
mod config;
mod handler;
mod http;
mod logger;
mod server;
mod upload;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("[CONFIG] Using {workers} worker threads"));
    } else {
        logger::log_info("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = config::AppState::new(cfg)?;
    let server = server::Server::bind(std::sync::Arc::clone(&state))?;

    logger::log_server_start(&server.local_addr()?, &state.config);
    logger::log_debug(&format!(
        "[CONFIG] Uploads staged in {}",
        state.uploads.dir().display()
    ));

    server::start_signal_handler(server.handle());
    server.run().await;

    logger::log_info("Server stopped");
    Ok(())
}
