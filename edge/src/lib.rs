//! The edge process: wires `StateMonitor`, `DecisionModule` and the
//! `Orchestrator` behind an `actix-web` HTTP surface.
//!
//! Bootstrap shape grounded in `kernel::main` (tokio::main, tracing-subscriber
//! init, ctrl-c-driven shutdown) and `monitoring_service::http_server`'s
//! CORS + `middleware::Logger` + route-table server setup.

pub mod handlers;
pub mod kv_cache;
pub mod state;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web};

use crate::state::AppState;

/// Builds the route table and shared state, factored out of `main` so
/// integration tests can exercise the same app via `actix_web::test`.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
) {
    cfg.route("/inference", web::post().to(handlers::inference))
        .route("/draft", web::post().to(handlers::draft))
        .route("/health", web::get().to(handlers::health))
        .route("/cache/stats", web::get().to(handlers::cache_stats))
        .route("/admin/simulate", web::post().to(handlers::admin_simulate));
}

pub fn app_data(state: Arc<AppState>) -> web::Data<Arc<AppState>> {
    web::Data::new(state)
}

pub fn cors_layer() -> Cors {
    Cors::default().allow_any_origin().allow_any_method().allow_any_header()
}

pub use middleware::Logger;
