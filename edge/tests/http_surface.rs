use std::sync::Arc;

use actix_web::{middleware, test, App};
use common::EdgeConfig;
use edge::state::AppState;

fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(EdgeConfig::default(), "http://127.0.0.1:1", None))
}

#[actix_web::test]
async fn health_reports_edge_component() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(edge::app_data(state))
            .wrap(middleware::Logger::default())
            .configure(edge::configure_app),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["component"], "edge");
    assert_eq!(resp["status"], "ok");
}

#[actix_web::test]
async fn inference_with_empty_prompt_is_rejected() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(edge::app_data(state))
            .configure(edge::configure_app),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/inference")
        .set_json(serde_json::json!({ "prompt": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn inference_without_cloud_falls_back_to_edge_only() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(edge::app_data(state))
            .configure(edge::configure_app),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/inference")
        .set_json(serde_json::json!({ "prompt": "hello there", "requirements": { "privacy_level": "confidential" } }))
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["strategy"], "edge_only");
    assert_eq!(resp["used_draft_verify"], false);
}

#[actix_web::test]
async fn admin_simulate_overrides_subsequent_health_sampling() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(edge::app_data(state.clone()))
            .configure(edge::configure_app),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/admin/simulate")
        .set_json(serde_json::json!({ "system": { "cpu_usage": 97.0, "memory_available_mb": 4000.0, "gpu_usage": 0.0, "gpu_memory_free_mb": 0.0, "device_type": "cpu", "timestamp_ms": 0 } }))
        .to_request();
    let _ = test::call_service(&app, req).await;

    assert_eq!(state.monitor.sample_system().cpu_usage, 97.0);
}

#[actix_web::test]
async fn cache_stats_start_empty() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(edge::app_data(state))
            .configure(edge::configure_app),
    )
    .await;

    let req = test::TestRequest::get().uri("/cache/stats").to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["entries"], 0);
}
