//! The cloud collaborator: a minimal real HTTP service standing in for the
//! vLLM-backed verifier, exercising the LCP-based verify protocol honestly
//! without implementing actual model inference (explicit non-goal).

pub mod continuation;
pub mod handlers;
pub mod state;

use actix_cors::Cors;
use actix_web::web;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.route("/verify", web::post().to(handlers::verify))
        .route("/verify/batch", web::post().to(handlers::verify_batch))
        .route("/inference/direct", web::post().to(handlers::inference_direct))
        .route("/health", web::get().to(handlers::health))
        .route("/cache/stats", web::get().to(handlers::cache_stats));
}

pub fn cors_layer() -> Cors {
    Cors::default().allow_any_origin().allow_any_method().allow_any_header()
}
