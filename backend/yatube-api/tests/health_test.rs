mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use common::Fixture;

#[actix_web::test]
async fn probes_report_healthy_storage() {
    let fx = Fixture::new();
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "ok");

    let req = test::TestRequest::get()
        .uri("/api/v1/health/ready/")
        .to_request();
    let ready: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ready["ready"], true);
    assert_eq!(ready["checks"]["storage"]["status"], "healthy");

    let req = test::TestRequest::get()
        .uri("/api/v1/health/live")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn metrics_are_exposed_in_text_format() {
    let fx = Fixture::new();
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/groups").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
}

#[actix_web::test]
async fn rejected_tokens_are_counted_under_their_route() {
    let fx = Fixture::new();
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains(r#"method="GET",path="/api/v1/posts",status="401""#));
}
