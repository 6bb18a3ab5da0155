//! Localised error envelopes selected by Accept-Language

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::*;
use qr_api::create_app;
use qr_shared::Environment;

#[actix_web::test]
async fn test_token_errors_in_indonesian() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), jwt_config(), Environment::Development)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/attendance-sessions/{}/token", INACTIVE_SESSION))
        .insert_header(lecturer())
        .insert_header(("Accept-Language", "id-ID,id;q=0.9,en;q=0.8"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Sesi presensi tidak aktif");
}

#[actix_web::test]
async fn test_token_errors_default_to_english() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), jwt_config(), Environment::Development)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/redeem")
        .insert_header(student())
        .set_json(json!({ "token": "NOPE" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");
    assert_eq!(body["message"], "Token is invalid or has expired");
}

#[actix_web::test]
async fn test_unauthorized_in_indonesian() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), jwt_config(), Environment::Development)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/tokens/stats")
        .insert_header(("Accept-Language", "id"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Token autentikasi tidak ada atau tidak valid");
}

#[actix_web::test]
async fn test_forbidden_in_indonesian() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), jwt_config(), Environment::Development)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/attendance-sessions/{}/token", OPEN_SESSION))
        .insert_header(bearer("dosen-99", "dosen"))
        .insert_header(("Accept-Language", "id"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Anda tidak berhak mengelola sesi presensi ini");
}
