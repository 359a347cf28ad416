/// Subscription edges: {subscriber, channel}, both referencing users.
/// Duplicate subscribe actions are idempotent (unique edge, upsert semantics).
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ChannelCard;

/// Create the edge if absent. Returns true when a new edge was inserted.
pub async fn subscribe(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO subscriptions (subscriber_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT (subscriber_id, channel_id) DO NOTHING
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove the edge. Returns true when an edge existed.
pub async fn unsubscribe(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2",
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Users subscribed to the given channel, newest first.
pub async fn subscribers_of(
    pool: &PgPool,
    channel_id: Uuid,
) -> Result<Vec<ChannelCard>, sqlx::Error> {
    sqlx::query_as::<_, ChannelCard>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await
}

/// Channels the given user is subscribed to, newest first.
pub async fn channels_of(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Vec<ChannelCard>, sqlx::Error> {
    sqlx::query_as::<_, ChannelCard>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(subscriber_id)
    .fetch_all(pool)
    .await
}
