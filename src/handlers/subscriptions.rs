//! Channel subscriptions: toggle plus the two membership listings.
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db::{subscription_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::SubscriptionToggleResponse;
use crate::response::ApiResponse;
use crate::AppState;

/// POST /api/v1/subscriptions/c/{channelId}/toggle
pub async fn toggle(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();
    if channel_id == user.0.id {
        return Err(AppError::Validation(
            "you cannot subscribe to your own channel".to_string(),
        ));
    }

    user_repo::find_public_by_id(&state.db, channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("channel not found".to_string()))?;

    // Toggle: drop an existing row, otherwise insert one.
    let subscribed = if subscription_repo::unsubscribe(&state.db, user.0.id, channel_id).await? {
        false
    } else {
        subscription_repo::subscribe(&state.db, user.0.id, channel_id).await?;
        true
    };

    Ok(ApiResponse::ok(
        SubscriptionToggleResponse {
            channel_id,
            subscribed,
        },
        if subscribed {
            "subscribed"
        } else {
            "unsubscribed"
        },
    ))
}

/// GET /api/v1/subscriptions/c/{channelId}/subscribers
pub async fn subscribers(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();
    let cards = subscription_repo::subscribers_of(&state.db, channel_id).await?;
    Ok(ApiResponse::ok(cards, "subscribers fetched"))
}

/// GET /api/v1/subscriptions/u/{subscriberId}/channels
pub async fn subscribed_channels(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let subscriber_id = path.into_inner();
    let cards = subscription_repo::channels_of(&state.db, subscriber_id).await?;
    Ok(ApiResponse::ok(cards, "subscribed channels fetched"))
}
