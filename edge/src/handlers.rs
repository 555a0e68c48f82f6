//! HTTP handlers for the edge process's inference surface.
//!
//! Route shapes and the shared-`web::Data<AppState>` pattern are grounded in
//! `monitoring_service::http_server`'s handler functions.

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use common::{DecisionContext, InferenceRequest, NetworkStats, SystemStats};
use serde::Deserialize;
use tracing::{error, warn};

use crate::state::AppState;

pub async fn inference(state: web::Data<Arc<AppState>>, body: web::Json<InferenceRequest>) -> impl Responder {
    let request = body.into_inner();
    if request.prompt.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "prompt must not be empty" }));
    }

    let system = state.monitor.sample_system();
    let network = state.monitor.probe_network(false).await;

    let context = DecisionContext {
        request: request.clone(),
        system,
        requirements: request.requirements,
        network: Some(network),
    };

    let plan = state.decision.decide(context);

    match state.orchestrator.execute(&plan, &request).await {
        Ok((response, record)) => {
            state.decision.record_execution(record);
            state.cache.insert(request.prompt, response.tokens.iter().map(|_| 0u32).collect(), response.tokens.len());
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            error!("inference request failed: {e}");
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

pub async fn draft(state: web::Data<Arc<AppState>>, body: web::Json<InferenceRequest>) -> impl Responder {
    let request = body.into_inner();
    if request.prompt.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "prompt must not be empty" }));
    }

    match state.draft_engine.generate_draft(&request.prompt, request.max_tokens).await {
        Ok((draft, metrics, latency)) => HttpResponse::Ok().json(serde_json::json!({
            "text": draft.text,
            "confidence": metrics,
            "latency_ms": latency.as_secs_f32() * 1000.0,
        })),
        Err(e) => {
            warn!("draft request failed: {e}");
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

pub async fn health(state: web::Data<Arc<AppState>>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "component": "edge",
        "cache_stats": state.cache.stats(),
        "confidence_strategy": state.config.confidence.strategy,
    }))
}

pub async fn cache_stats(state: web::Data<Arc<AppState>>) -> impl Responder {
    HttpResponse::Ok().json(state.cache.stats())
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub system: Option<SystemStats>,
    pub network: Option<NetworkStats>,
}

pub async fn admin_simulate(state: web::Data<Arc<AppState>>, body: web::Json<SimulateRequest>) -> impl Responder {
    let body = body.into_inner();
    if body.system.is_some() {
        state.monitor.set_simulation_system(body.system);
    }
    if body.network.is_some() {
        state.monitor.set_simulation_network(body.network);
    }
    HttpResponse::Ok().json(serde_json::json!({ "status": "applied" }))
}
