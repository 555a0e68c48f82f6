//! HTTP handlers implementing the cloud collaborator's verify/inference
//! surface. Mirrors `edge::handlers`' shared-`web::Data` shape.

use std::time::Instant;

use actix_web::{web, HttpResponse, Responder};
use common::{verify_by_longest_common_prefix, VerifyRequest, VerifyResponse};
use serde::{Deserialize, Serialize};

use crate::continuation::generate_ground_truth;
use crate::state::{AppState, RequestStats};

pub async fn verify(state: web::Data<AppState>, body: web::Json<VerifyRequest>) -> impl Responder {
    let request = body.into_inner();
    let response = run_verify(&state, &request);
    HttpResponse::Ok().json(response)
}

pub async fn verify_batch(state: web::Data<AppState>, body: web::Json<Vec<VerifyRequest>>) -> impl Responder {
    let responses: Vec<VerifyResponse> = body.into_inner().iter().map(|r| run_verify(&state, r)).collect();
    HttpResponse::Ok().json(responses)
}

fn run_verify(state: &AppState, request: &VerifyRequest) -> VerifyResponse {
    let start = Instant::now();
    let ground_truth = generate_ground_truth(&request.prompt, &request.draft_text);
    let latency_ms = start.elapsed().as_secs_f32() * 1000.0;
    state.record_request();
    verify_by_longest_common_prefix(&request.prompt, &request.draft_text, &ground_truth, latency_ms)
}

#[derive(Debug, Deserialize)]
pub struct DirectRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct DirectResponse {
    pub text: String,
}

pub async fn inference_direct(state: web::Data<AppState>, body: web::Json<DirectRequest>) -> impl Responder {
    let request = body.into_inner();
    state.record_request();
    let draft_budget = "x".repeat(request.max_tokens.min(64) as usize);
    let continuation = generate_ground_truth(&request.prompt, &draft_budget);
    HttpResponse::Ok().json(DirectResponse {
        text: format!("{}{}", request.prompt, continuation),
    })
}

pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "component": "cloud",
        "cache_stats": state.cache_stats(),
    }))
}

pub async fn cache_stats(state: web::Data<AppState>) -> impl Responder {
    let stats: RequestStats = state.cache_stats();
    HttpResponse::Ok().json(stats)
}
