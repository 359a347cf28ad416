use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Video;

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, thumbnail_url, \
                             duration_seconds, is_published, created_at, updated_at";

pub async fn create_video(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: &str,
    video_url: &str,
    thumbnail_url: &str,
    duration_seconds: f64,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url, duration_seconds)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(video_url)
    .bind(thumbnail_url)
    .bind(duration_seconds)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive title collision check.
pub async fn title_exists(pool: &PgPool, title: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM videos WHERE LOWER(title) = LOWER($1))",
    )
    .bind(title)
    .fetch_one(pool)
    .await
}

pub async fn update_details(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    thumbnail_url: Option<&str>,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            thumbnail_url = COALESCE($4, thumbnail_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(thumbnail_url)
    .fetch_one(pool)
    .await
}

pub async fn delete_video(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn toggle_publish(pool: &PgPool, id: Uuid) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos SET is_published = NOT is_published, updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_one(pool)
    .await
}
