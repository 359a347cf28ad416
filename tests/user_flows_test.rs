//! Account flows against a real Postgres. Run with `cargo test -- --ignored`.
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use vidstream_service::db::{run_migrations, user_repo};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    run_migrations(&pool).await.expect("migrations failed");
    pool
}

#[actix_rt::test]
#[ignore = "requires a running Postgres"]
async fn test_duplicate_identity_is_detected_case_insensitively() {
    let pool = pool().await;
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("dupe_{suffix}");
    let email = format!("dupe_{suffix}@example.com");

    user_repo::create_user(
        &pool,
        &username,
        &email,
        "First Claimant",
        "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$placeholderhash",
        "https://media.example.com/avatar.png",
        None,
    )
    .await
    .unwrap();

    assert!(user_repo::identity_exists(&pool, &username, "other@example.com")
        .await
        .unwrap());
    assert!(
        user_repo::identity_exists(&pool, &username.to_uppercase(), "other@example.com")
            .await
            .unwrap()
    );
    assert!(
        user_repo::identity_exists(&pool, "someone_else", &email.to_uppercase())
            .await
            .unwrap()
    );
    assert!(
        !user_repo::identity_exists(&pool, "someone_else", "other@example.com")
            .await
            .unwrap()
    );
}

#[actix_rt::test]
#[ignore = "requires a running Postgres"]
async fn test_login_lookup_accepts_username_or_email() {
    let pool = pool().await;
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("login_{suffix}");
    let email = format!("login_{suffix}@example.com");

    let created = user_repo::create_user(
        &pool,
        &username,
        &email,
        "Login Tester",
        "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$placeholderhash",
        "https://media.example.com/avatar.png",
        None,
    )
    .await
    .unwrap();

    let by_username = user_repo::find_by_login(&pool, Some(&username), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_username.id, created.id);

    let by_email = user_repo::find_by_login(&pool, None, Some(&email))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(user_repo::find_by_login(&pool, Some("missing_user"), None)
        .await
        .unwrap()
        .is_none());
}
