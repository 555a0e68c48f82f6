use actix_web::{test, web, App};
use cloud::state::AppState;
use common::CloudConfig;

fn test_app_data() -> web::Data<AppState> {
    web::Data::new(AppState::new(CloudConfig::default()))
}

#[actix_web::test]
async fn health_reports_cloud_component() {
    let app = test::init_service(App::new().app_data(test_app_data()).configure(cloud::configure_app)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["component"], "cloud");
}

#[actix_web::test]
async fn verify_with_empty_draft_is_trivially_accepted() {
    let app = test::init_service(App::new().app_data(test_app_data()).configure(cloud::configure_app)).await;

    let req = test::TestRequest::post()
        .uri("/verify")
        .set_json(serde_json::json!({ "prompt": "hi", "draft_text": "", "confidence_threshold": 0.8 }))
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["acceptance_rate"], 1.0);
}

#[actix_web::test]
async fn verify_batch_returns_one_response_per_request() {
    let app = test::init_service(App::new().app_data(test_app_data()).configure(cloud::configure_app)).await;

    let req = test::TestRequest::post()
        .uri("/verify/batch")
        .set_json(serde_json::json!([
            { "prompt": "a", "draft_text": "x", "confidence_threshold": 0.5 },
            { "prompt": "b", "draft_text": "y", "confidence_threshold": 0.5 },
        ]))
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn inference_direct_extends_the_prompt() {
    let app = test::init_service(App::new().app_data(test_app_data()).configure(cloud::configure_app)).await;

    let req = test::TestRequest::post()
        .uri("/inference/direct")
        .set_json(serde_json::json!({ "prompt": "once upon a time", "max_tokens": 16 }))
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(resp["text"].as_str().unwrap().starts_with("once upon a time"));
}

#[actix_web::test]
async fn cache_stats_counts_served_requests() {
    let app = test::init_service(App::new().app_data(test_app_data()).configure(cloud::configure_app)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let _ = test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/cache/stats").to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["requests_served"], 0);
}
