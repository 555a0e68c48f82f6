use std::path::PathBuf;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use cloud::state::AppState;
use common::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "cloud", about = "Cloud-side draft verification collaborator")]
struct Cli {
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[arg(long)]
    port: Option<u16>,
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

    let mut cloud_config = app_config.cloud;
    if let Some(port) = cli.port {
        cloud_config.server.port = port;
    }
    let host = cloud_config.server.host.clone();
    let port = cloud_config.server.port;

    let data = web::Data::new(AppState::new(cloud_config));

    tracing::info!("cloud listening on {host}:{port}");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(cloud::cors_layer())
            .wrap(middleware::Logger::default())
            .configure(cloud::configure_app)
    })
    .bind((host.as_str(), port))?
    .run();

    let server_handle = server.handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received, stopping");
        server_handle.stop(true).await;
    });

    server.await
}
