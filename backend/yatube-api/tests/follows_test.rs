mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::{bearer, Fixture};

#[actix_web::test]
async fn follow_requires_authentication() {
    let fx = Fixture::new();
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/follow/").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .set_json(json!({"following": "leo"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn cannot_follow_yourself_even_with_forged_user() {
    let fx = Fixture::new();
    let leo = fx.user("leo").await;
    fx.user("ann").await;
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(bearer(&leo))
        .set_json(json!({"user": "ann", "following": "leo"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"]["following"][0], "cannot follow yourself");
    assert_eq!(fx.repo.follow_count().await, 0);
}

#[actix_web::test]
async fn duplicate_follow_fails_and_keeps_one_edge() {
    let fx = Fixture::new();
    let leo = fx.user("leo").await;
    fx.user("ann").await;
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(bearer(&leo))
        .set_json(json!({"following": "ann"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created, json!({"user": "leo", "following": "ann"}));

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(bearer(&leo))
        .set_json(json!({"following": "ann"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["fields"]["non_field_errors"][0],
        "The fields user, following must make a unique set."
    );
    assert_eq!(fx.repo.follow_count().await, 1);
}

#[actix_web::test]
async fn unknown_or_missing_following_is_a_field_error() {
    let fx = Fixture::new();
    let leo = fx.user("leo").await;
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(bearer(&leo))
        .set_json(json!({"following": "ghost"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["fields"]["following"][0],
        "Object with username=ghost does not exist."
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(bearer(&leo))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"]["following"][0], "This field is required.");
}

#[actix_web::test]
async fn list_is_scoped_to_requester_and_searchable() {
    let fx = Fixture::new();
    let leo = fx.user("leo").await;
    let ann = fx.user("ann").await;
    fx.user("annabel").await;
    fx.user("bob").await;
    let app = test::init_service(fx.app()).await;

    for following in ["annabel", "bob"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/follow/")
            .insert_header(bearer(&leo))
            .set_json(json!({"following": following}))
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(bearer(&ann))
        .set_json(json!({"following": "leo"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/follow/")
        .insert_header(bearer(&leo))
        .to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        all,
        json!([
            {"user": "leo", "following": "annabel"},
            {"user": "leo", "following": "bob"}
        ])
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/follow/?search=ANN")
        .insert_header(bearer(&leo))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found, json!([{"user": "leo", "following": "annabel"}]));

    let req = test::TestRequest::get()
        .uri("/api/v1/follow/?search=ann%20zzz")
        .insert_header(bearer(&leo))
        .to_request();
    let none: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(none, json!([]));
}

#[actix_web::test]
async fn follows_cannot_be_updated_or_deleted() {
    let fx = Fixture::new();
    let leo = fx.user("leo").await;
    let app = test::init_service(fx.app()).await;

    let req = test::TestRequest::delete()
        .uri("/api/v1/follow/1/")
        .insert_header(bearer(&leo))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}
