//! Video CRUD plus the paginated public listing.
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db::{video_repo, watch_history_repo};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::VideoListQuery;
use crate::readmodel::listing;
use crate::response::ApiResponse;
use crate::AppState;

/// GET /api/v1/videos
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<VideoListQuery>,
) -> Result<HttpResponse> {
    let page = listing::list_videos(&state.db, &query).await?;
    Ok(ApiResponse::ok(page, "videos fetched"))
}

/// POST /api/v1/videos (multipart: title, description, videoFile, thumbnail)
pub async fn publish(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = super::collect_form(payload).await?;

    let title = form.text("title")?.trim().to_string();
    let description = form.optional_text("description").unwrap_or("").to_string();
    let video_file = form.file("videoFile")?;
    let thumbnail = form.file("thumbnail")?;

    if video_repo::title_exists(&state.db, &title).await? {
        return Err(AppError::Conflict(format!(
            "a video titled \"{title}\" already exists"
        )));
    }

    let video_asset = state
        .media
        .upload(&video_file.filename, video_file.bytes.clone())
        .await?;
    let duration_seconds = video_asset.duration.ok_or_else(|| {
        AppError::Upstream("media host returned no duration for the video".to_string())
    })?;

    let thumbnail_asset = state
        .media
        .upload(&thumbnail.filename, thumbnail.bytes.clone())
        .await?;

    let video = video_repo::create_video(
        &state.db,
        user.0.id,
        &title,
        &description,
        &video_asset.url,
        &thumbnail_asset.url,
        duration_seconds,
    )
    .await?;

    tracing::info!(video_id = %video.id, owner_id = %user.0.id, "video published");

    Ok(ApiResponse::created(video, "video published successfully"))
}

/// GET /api/v1/videos/{id}
///
/// Public route; when the caller is authenticated the fetch also upserts
/// their watch-history row.
pub async fn get(
    state: web::Data<AppState>,
    user: Option<CurrentUser>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let video = video_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;

    // Unpublished videos are visible to their owner only.
    let viewer_id = user.as_ref().map(|u| u.0.id);
    if !video.is_published && viewer_id != Some(video.owner_id) {
        return Err(AppError::NotFound("video not found".to_string()));
    }

    if let Some(viewer_id) = viewer_id {
        watch_history_repo::record_watch(&state.db, viewer_id, video.id).await?;
    }

    Ok(ApiResponse::ok(video, "video fetched"))
}

/// PATCH /api/v1/videos/{id} (multipart: optional title, description, thumbnail)
pub async fn update(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let video = video_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;
    if video.owner_id != user.0.id {
        return Err(AppError::Forbidden(
            "only the owner can update a video".to_string(),
        ));
    }

    let form = super::collect_form(payload).await?;
    let title = form.optional_text("title").map(str::trim);
    let description = form.optional_text("description");

    if let Some(new_title) = title {
        if !new_title.eq_ignore_ascii_case(&video.title)
            && video_repo::title_exists(&state.db, new_title).await?
        {
            return Err(AppError::Conflict(format!(
                "a video titled \"{new_title}\" already exists"
            )));
        }
    }

    let new_thumbnail = match form.optional_file("thumbnail") {
        Some(file) => Some(
            state
                .media
                .upload(&file.filename, file.bytes.clone())
                .await?
                .url,
        ),
        None => None,
    };

    let updated =
        video_repo::update_details(&state.db, id, title, description, new_thumbnail.as_deref())
            .await?;

    // The row now points at the new thumbnail; losing the old asset is
    // tolerable, losing the reference is not.
    if new_thumbnail.is_some() {
        if let Err(err) = state.media.delete(&video.thumbnail_url).await {
            tracing::warn!(url = %video.thumbnail_url, error = %err, "failed to delete replaced thumbnail");
        }
    }

    Ok(ApiResponse::ok(updated, "video updated"))
}

/// DELETE /api/v1/videos/{id}
pub async fn delete(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let video = video_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;
    if video.owner_id != user.0.id {
        return Err(AppError::Forbidden(
            "only the owner can delete a video".to_string(),
        ));
    }

    video_repo::delete_video(&state.db, id).await?;

    for url in [&video.video_url, &video.thumbnail_url] {
        if let Err(err) = state.media.delete(url).await {
            tracing::warn!(url = %url, error = %err, "failed to delete media for removed video");
        }
    }

    Ok(ApiResponse::ok(serde_json::json!({}), "video deleted"))
}

/// PATCH /api/v1/videos/{id}/togglePublish
pub async fn toggle_publish(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let video = video_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".to_string()))?;
    if video.owner_id != user.0.id {
        return Err(AppError::Forbidden(
            "only the owner can change publish status".to_string(),
        ));
    }

    let toggled = video_repo::toggle_publish(&state.db, id).await?;
    Ok(ApiResponse::ok(toggled, "publish status toggled"))
}
