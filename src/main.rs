use clap::Parser;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

mod analyzer;
mod cli;
mod config;
mod dataset;
mod dispatch;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Args::parse();
    let cfg = config::Config::load_from(&args.config, &args.overrides())?;

    if let Err(e) = logger::init(&cfg) {
        eprintln!("Failed to initialize logging: {e}");
    }

    // Worker thread count follows `server.workers`, defaulting to CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    let state = Arc::new(config::AppState::new(&cfg)?);
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    logger::log_server_start(&addr, &cfg);

    let drain_timeout = Duration::from_secs(cfg.performance.write_timeout);
    server::start_server_loop(
        listener,
        state,
        active_connections,
        Arc::clone(&signals.shutdown),
        drain_timeout,
    )
    .await;

    tracing::info!("Server stopped");
    Ok(())
}
