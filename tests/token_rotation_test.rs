//! Refresh rotation properties against a real Postgres.
//!
//! Run with `DATABASE_URL` pointing at a scratch database:
//! `cargo test -- --ignored`
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use vidstream_service::config::JwtConfig;
use vidstream_service::db::{run_migrations, user_repo};
use vidstream_service::models::PublicUser;
use vidstream_service::security::TokenSigner;
use vidstream_service::services::TokenService;

async fn setup() -> (PgPool, TokenService) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    run_migrations(&pool).await.expect("migrations failed");

    let signer = TokenSigner::new(&JwtConfig {
        access_secret: "rotation-test-access-secret".to_string(),
        refresh_secret: "rotation-test-refresh-secret".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 604800,
    });

    (pool.clone(), TokenService::new(pool, signer))
}

async fn seed_user(pool: &PgPool) -> PublicUser {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let user = user_repo::create_user(
        pool,
        &format!("rotator_{suffix}"),
        &format!("rotator_{suffix}@example.com"),
        "Rotation Tester",
        "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$placeholderhash",
        "https://media.example.com/avatar.png",
        None,
    )
    .await
    .expect("failed to seed user");
    user.into()
}

#[actix_rt::test]
#[ignore = "requires a running Postgres"]
async fn test_refresh_token_is_single_use() {
    let (pool, tokens) = setup().await;
    let user = seed_user(&pool).await;

    let pair = tokens.issue_pair(&user).await.unwrap();

    let (_, rotated) = tokens.rotate(&pair.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);

    // The consumed token must not rotate a second time.
    assert!(tokens.rotate(&pair.refresh_token).await.is_err());

    // The freshly-issued one must.
    assert!(tokens.rotate(&rotated.refresh_token).await.is_ok());
}

#[actix_rt::test]
#[ignore = "requires a running Postgres"]
async fn test_revoke_invalidates_outstanding_refresh_token() {
    let (pool, tokens) = setup().await;
    let user = seed_user(&pool).await;

    let pair = tokens.issue_pair(&user).await.unwrap();
    tokens.revoke(user.id).await.unwrap();

    assert!(tokens.rotate(&pair.refresh_token).await.is_err());
}

#[actix_rt::test]
#[ignore = "requires a running Postgres"]
async fn test_password_change_clears_refresh_slot() {
    let (pool, tokens) = setup().await;
    let user = seed_user(&pool).await;

    let pair = tokens.issue_pair(&user).await.unwrap();

    user_repo::update_password(&pool, user.id, "$argon2id$v=19$m=19456,t=2,p=1$bmV3$newhash")
        .await
        .unwrap();

    assert!(tokens.rotate(&pair.refresh_token).await.is_err());
}
