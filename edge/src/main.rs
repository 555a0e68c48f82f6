use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{middleware, App, HttpServer};
use clap::Parser;
use common::AppConfig;
use edge::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "edge", about = "Edge-side speculative decoding inference router")]
struct Cli {
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    cache_snapshot: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let app_config = if cli.config.exists() {
        match AppConfig::from_file(&cli.config) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!("fatal: failed to load config {}: {e}", cli.config.display());
                std::process::exit(1);
            }
        }
    } else {
        tracing::warn!("no config file at {}, using defaults", cli.config.display());
        AppConfig::default()
    };

    let mut edge_config = app_config.edge;
    if let Some(port) = cli.port {
        edge_config.server.port = port;
    }
    let host = edge_config.server.host.clone();
    let port = edge_config.server.port;

    let state = Arc::new(AppState::new(edge_config, &app_config.communication.cloud_endpoint, cli.cache_snapshot));
    let data = edge::app_data(state.clone());

    tracing::info!("edge listening on {host}:{port}");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(edge::cors_layer())
            .wrap(middleware::Logger::default())
            .configure(edge::configure_app)
    })
    .bind((host.as_str(), port))?
    .run();

    let server_handle = server.handle();
    let shutdown_state = state.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received, persisting cache and stopping");
        shutdown_state.persist_cache();
        server_handle.stop(true).await;
    });

    server.await
}
