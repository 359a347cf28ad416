use sqlx::PgPool;
use uuid::Uuid;

/// Record that the user watched a video. Re-watching bumps the entry to the
/// front of the ordered history.
pub async fn record_watch(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;
    Ok(())
}
