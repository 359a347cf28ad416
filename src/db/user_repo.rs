/// User repository - handles all database operations for users
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PublicUser, User};

const USER_COLUMNS: &str = "id, username, email, full_name, avatar_url, cover_image_url, \
                            password_hash, refresh_token_hash, created_at, updated_at";

const PUBLIC_COLUMNS: &str =
    "id, username, email, full_name, avatar_url, cover_image_url, created_at";

/// Create a new user. Username and email are stored lowercased.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password_hash: &str,
    avatar_url: &str,
    cover_image_url: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, full_name, password_hash, avatar_url, cover_image_url)
        VALUES (LOWER($1), LOWER($2), $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .bind(avatar_url)
    .bind(cover_image_url)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Sanitized projection used by the session middleware and response bodies.
pub async fn find_public_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PublicUser>, sqlx::Error> {
    sqlx::query_as::<_, PublicUser>(&format!(
        "SELECT {PUBLIC_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Find a user by username or email (login accepts either).
pub async fn find_by_login(
    pool: &PgPool,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users
        WHERE ($1::text IS NOT NULL AND username = LOWER($1))
           OR ($2::text IS NOT NULL AND email = LOWER($2))
        "#
    ))
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Check whether the username or email is already taken.
pub async fn identity_exists(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = LOWER($1) OR email = LOWER($2))",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await
}

/// Check whether an email belongs to another user.
pub async fn email_taken(
    pool: &PgPool,
    email: &str,
    exclude_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = LOWER($1) AND id <> $2)",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

pub async fn update_account(
    pool: &PgPool,
    id: Uuid,
    full_name: Option<&str>,
    email: Option<&str>,
) -> Result<PublicUser, sqlx::Error> {
    sqlx::query_as::<_, PublicUser>(&format!(
        r#"
        UPDATE users SET
            full_name = COALESCE($2, full_name),
            email = COALESCE(LOWER($3), email),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {PUBLIC_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(full_name)
    .bind(email)
    .fetch_one(pool)
    .await
}

/// Update the password hash. Clears the refresh slot so existing sessions
/// must log in again.
pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET password_hash = $2, refresh_token_hash = NULL, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_avatar_url(pool: &PgPool, id: Uuid, url: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET avatar_url = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(url)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_cover_image_url(pool: &PgPool, id: Uuid, url: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET cover_image_url = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(url)
        .execute(pool)
        .await?;
    Ok(())
}

/// Unconditionally replace the stored refresh digest (login / fresh issuance).
pub async fn store_refresh_token(
    pool: &PgPool,
    id: Uuid,
    digest: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET refresh_token_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(digest)
        .execute(pool)
        .await?;
    Ok(())
}

/// Atomic compare-and-replace of the refresh slot. Returns false when the
/// presented digest no longer matches the stored one (rotation replay).
pub async fn replace_refresh_token(
    pool: &PgPool,
    id: Uuid,
    presented_digest: &str,
    new_digest: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users SET refresh_token_hash = $3, updated_at = NOW()
        WHERE id = $1 AND refresh_token_hash = $2
        "#,
    )
    .bind(id)
    .bind(presented_digest)
    .bind(new_digest)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Clear the refresh slot, invalidating all outstanding refresh tokens.
pub async fn clear_refresh_token(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET refresh_token_hash = NULL, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
