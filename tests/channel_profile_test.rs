//! Channel profile aggregation against a real Postgres.
//!
//! Run with `DATABASE_URL` pointing at a scratch database:
//! `cargo test -- --ignored`
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use vidstream_service::db::{run_migrations, subscription_repo, user_repo};
use vidstream_service::models::PublicUser;
use vidstream_service::readmodel::channel::channel_profile;

async fn setup() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    run_migrations(&pool).await.expect("migrations failed");
    pool
}

async fn seed_user(pool: &PgPool, handle: &str) -> PublicUser {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let user = user_repo::create_user(
        pool,
        &format!("{handle}_{suffix}"),
        &format!("{handle}_{suffix}@example.com"),
        "Channel Tester",
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
async fn test_subscriber_count_and_membership_flag() {
    let pool = setup().await;

    let first_fan = seed_user(&pool, "fan_one").await;
    let second_fan = seed_user(&pool, "fan_two").await;
    let channel = seed_user(&pool, "channel").await;
    let bystander = seed_user(&pool, "bystander").await;

    subscription_repo::subscribe(&pool, first_fan.id, channel.id)
        .await
        .unwrap();
    subscription_repo::subscribe(&pool, second_fan.id, channel.id)
        .await
        .unwrap();

    // Both fans count; the fan asking sees their own membership.
    let as_fan = channel_profile(&pool, &channel.username, first_fan.id)
        .await
        .unwrap()
        .expect("channel must resolve");
    assert_eq!(as_fan.subscribers_count, 2);
    assert!(as_fan.is_subscribed);

    // An unrelated viewer sees the same count but no membership.
    let as_bystander = channel_profile(&pool, &channel.username, bystander.id)
        .await
        .unwrap()
        .expect("channel must resolve");
    assert_eq!(as_bystander.subscribers_count, 2);
    assert!(!as_bystander.is_subscribed);

    // The channel follows nobody, and subscribing does not inflate the
    // channel's own outbound count for its fans.
    assert_eq!(as_fan.subscribed_to_count, 0);
    let fan_profile = channel_profile(&pool, &first_fan.username, bystander.id)
        .await
        .unwrap()
        .expect("fan must resolve");
    assert_eq!(fan_profile.subscribers_count, 0);
    assert_eq!(fan_profile.subscribed_to_count, 1);
}

#[actix_rt::test]
#[ignore = "requires a running Postgres"]
async fn test_case_insensitive_username_lookup() {
    let pool = setup().await;
    let channel = seed_user(&pool, "mixedcase").await;

    let found = channel_profile(&pool, &channel.username.to_uppercase(), channel.id)
        .await
        .unwrap();
    assert!(found.is_some());
}
