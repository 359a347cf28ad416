//! Account lifecycle: registration, sessions, profile and channel reads.
use actix_multipart::Multipart;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest,
    UpdateAccountRequest,
};
use crate::readmodel;
use crate::response::ApiResponse;
use crate::security::password;
use crate::services::media::swap_media;
use crate::AppState;

fn auth_cookie(name: &'static str, value: &str) -> Cookie<'static> {
    Cookie::build(name, value.to_owned())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .finish()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name, "")
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// POST /api/v1/users/register (multipart: text fields + avatar/coverImage files)
pub async fn register(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let form = super::collect_form(payload).await?;

    let request = RegisterRequest {
        username: form.text("username")?.trim().to_string(),
        email: form.text("email")?.trim().to_string(),
        full_name: form.text("fullName")?.trim().to_string(),
        password: form.text("password")?.to_string(),
    };
    request.validate()?;

    if user_repo::identity_exists(&state.db, &request.username, &request.email).await? {
        return Err(AppError::Conflict(
            "a user with that username or email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&request.password)?;

    let avatar = form.file("avatar")?;
    let avatar_asset = state
        .media
        .upload(&avatar.filename, avatar.bytes.clone())
        .await?;

    let cover_url = match form.optional_file("coverImage") {
        Some(cover) => Some(
            state
                .media
                .upload(&cover.filename, cover.bytes.clone())
                .await?
                .url,
        ),
        None => None,
    };

    let user = user_repo::create_user(
        &state.db,
        &request.username,
        &request.email,
        &request.full_name,
        &password_hash,
        &avatar_asset.url,
        cover_url.as_deref(),
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(ApiResponse::created(
        crate::models::PublicUser::from(user),
        "user registered successfully",
    ))
}

/// POST /api/v1/users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    if request.username.is_none() && request.email.is_none() {
        return Err(AppError::Validation(
            "username or email is required".to_string(),
        ));
    }

    let user = user_repo::find_by_login(
        &state.db,
        request.username.as_deref(),
        request.email.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("user does not exist".to_string()))?;

    password::verify_password(&request.password, &user.password_hash)?;

    let public = crate::models::PublicUser::from(user);
    let pair = state.tokens.issue_pair(&public).await?;

    tracing::info!(user_id = %public.id, "user logged in");

    let body = ApiResponse::new(
        200,
        LoginResponse {
            user: public,
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
        },
        "logged in successfully",
    );

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(ACCESS_TOKEN_COOKIE, &pair.access_token))
        .cookie(auth_cookie(REFRESH_TOKEN_COOKIE, &pair.refresh_token))
        .json(body))
}

/// POST /api/v1/users/logout
pub async fn logout(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    state.tokens.revoke(user.0.id).await?;

    Ok(HttpResponse::Ok()
        .cookie(expired_cookie(ACCESS_TOKEN_COOKIE))
        .cookie(expired_cookie(REFRESH_TOKEN_COOKIE))
        .json(ApiResponse::new(
            200,
            serde_json::json!({}),
            "logged out successfully",
        )))
}

/// POST /api/v1/users/refreshToken (token from cookie or body)
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse> {
    let presented = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token))
        .ok_or_else(|| AppError::Authentication("refresh token is required".to_string()))?;

    let (_, pair) = state.tokens.rotate(&presented).await?;

    let body = ApiResponse::new(200, pair.clone(), "access token refreshed");
    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(ACCESS_TOKEN_COOKIE, &pair.access_token))
        .cookie(auth_cookie(REFRESH_TOKEN_COOKIE, &pair.refresh_token))
        .json(body))
}

/// PATCH /api/v1/users/changePassword
pub async fn change_password(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();

    let row = user_repo::find_by_id(&state.db, user.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user no longer exists".to_string()))?;

    password::verify_password(&request.old_password, &row.password_hash)
        .map_err(|_| AppError::Validation("old password is incorrect".to_string()))?;

    let new_hash = password::hash_password(&request.new_password)?;
    // Also clears the refresh slot, so other sessions must log in again.
    user_repo::update_password(&state.db, user.0.id, &new_hash).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "password changed successfully",
    ))
}

/// GET /api/v1/users/currentUser
pub async fn current_user(user: CurrentUser) -> Result<HttpResponse> {
    Ok(ApiResponse::ok(user.0, "current user fetched"))
}

/// PATCH /api/v1/users/updateAccountDetails
pub async fn update_account(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    if request.full_name.is_none() && request.email.is_none() {
        return Err(AppError::Validation(
            "nothing to update: provide fullName or email".to_string(),
        ));
    }

    if let Some(email) = request.email.as_deref() {
        if user_repo::email_taken(&state.db, email, user.0.id).await? {
            return Err(AppError::Conflict(
                "that email is already in use".to_string(),
            ));
        }
    }

    let updated = user_repo::update_account(
        &state.db,
        user.0.id,
        request.full_name.as_deref(),
        request.email.as_deref(),
    )
    .await?;

    Ok(ApiResponse::ok(updated, "account details updated"))
}

/// PATCH /api/v1/users/avatar (multipart: avatar file)
pub async fn update_avatar(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = super::collect_form(payload).await?;
    let file = form.file("avatar")?;

    let db = state.db.clone();
    let user_id = user.0.id;
    let url = swap_media(
        state.media.as_ref(),
        &file.filename,
        file.bytes.clone(),
        Some(user.0.avatar_url.as_str()),
        |url| async move {
            user_repo::set_avatar_url(&db, user_id, &url).await?;
            Ok(())
        },
    )
    .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "avatarUrl": url }),
        "avatar updated",
    ))
}

/// PATCH /api/v1/users/coverImage (multipart: coverImage file)
pub async fn update_cover_image(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = super::collect_form(payload).await?;
    let file = form.file("coverImage")?;

    let db = state.db.clone();
    let user_id = user.0.id;
    let url = swap_media(
        state.media.as_ref(),
        &file.filename,
        file.bytes.clone(),
        user.0.cover_image_url.as_deref(),
        |url| async move {
            user_repo::set_cover_image_url(&db, user_id, &url).await?;
            Ok(())
        },
    )
    .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "coverImageUrl": url }),
        "cover image updated",
    ))
}

/// GET /api/v1/users/c/{username}
pub async fn channel_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let profile = readmodel::channel::channel_profile(&state.db, &username, user.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("channel {username} does not exist")))?;

    Ok(ApiResponse::ok(profile, "channel profile fetched"))
}

/// GET /api/v1/users/history
pub async fn watch_history(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    let entries = readmodel::history::watch_history(&state.db, user.0.id).await?;
    Ok(ApiResponse::ok(entries, "watch history fetched"))
}
