//! HTTP-surface tests that run without a database: routing, auth guarding
//! and the response envelope shape.
use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;

use vidstream_service::config::JwtConfig;
use vidstream_service::error::Result;
use vidstream_service::routes::configure_routes;
use vidstream_service::security::TokenSigner;
use vidstream_service::services::{MediaAsset, MediaStore, TokenService};
use vidstream_service::AppState;

struct StubMediaStore;

#[async_trait]
impl MediaStore for StubMediaStore {
    async fn upload(&self, _filename: &str, _bytes: Vec<u8>) -> Result<MediaAsset> {
        Ok(MediaAsset {
            url: "https://media.example.com/stub.png".to_string(),
            duration: Some(1.0),
        })
    }

    async fn delete(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

/// State over a lazy pool: connections are only attempted when a handler
/// actually queries, so DB-free paths stay testable.
fn test_state() -> AppState {
    let pool = PgPoolOptions::new()
        // Fail fast: nothing listens on this address.
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy("postgres://postgres@localhost:1/unreachable")
        .unwrap();

    let signer = TokenSigner::new(&JwtConfig {
        access_secret: "access-secret-for-tests".to_string(),
        refresh_secret: "refresh-secret-for-tests".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 604800,
    });

    AppState::new(pool.clone(), TokenService::new(pool, signer), Arc::new(StubMediaStore))
}

#[actix_rt::test]
async fn test_health_answers_with_success_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["success"], true);
    // No database behind the lazy pool, so the probe reports it down.
    assert_eq!(body["data"]["database"], "down");
}

#[actix_rt::test]
async fn test_protected_route_without_token_is_401() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/currentUser")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 401);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["success"], false);
    assert!(body["errors"].as_array().is_some());
}

#[actix_rt::test]
async fn test_garbage_bearer_token_is_401() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/logout")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_refresh_without_any_token_is_401() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/refreshToken")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_listing_rejects_zero_page() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/videos?page=0")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_rt::test]
async fn test_login_requires_username_or_email() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(serde_json::json!({ "password": "whatever" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 400);
}
