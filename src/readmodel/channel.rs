//! Channel profile view: a user row joined twice against the subscription
//! edges, plus a membership test for the requesting identity.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::ChannelProfile;

use super::pipeline::{Condition, Lookup, LookupKind, Operand, Pipeline};
use super::sql;

pub(crate) fn build_pipeline(username: &str, viewer_id: Uuid) -> Pipeline {
    Pipeline::over("users")
        .filter(vec![Condition::EqCi {
            field: "username".into(),
            value: username.to_string(),
        }])
        .lookup(Lookup {
            from: "subscriptions".into(),
            local_field: "id".into(),
            foreign_field: "channel_id".into(),
            kind: LookupKind::Count {
                alias: "subscribers_count".into(),
            },
        })
        .lookup(Lookup {
            from: "subscriptions".into(),
            local_field: "id".into(),
            foreign_field: "subscriber_id".into(),
            kind: LookupKind::Count {
                alias: "subscribed_to_count".into(),
            },
        })
        .lookup(Lookup {
            from: "subscriptions".into(),
            local_field: "id".into(),
            foreign_field: "channel_id".into(),
            kind: LookupKind::Exists {
                alias: "is_subscribed".into(),
                extra: Condition::Eq {
                    field: "subscriber_id".into(),
                    value: Operand::Uuid(viewer_id),
                },
            },
        })
        .project([
            "id",
            "username",
            "email",
            "full_name",
            "avatar_url",
            "cover_image_url",
            "created_at",
        ])
}

/// Build the channel profile for `username` as seen by `viewer_id`.
/// Returns None when no user matches.
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer_id: Uuid,
) -> Result<Option<ChannelProfile>> {
    let compiled = sql::compile(&build_pipeline(username, viewer_id));
    let row = compiled.query().fetch_optional(pool).await?;

    Ok(row.map(|r| ChannelProfile {
        id: r.get("id"),
        username: r.get("username"),
        email: r.get("email"),
        full_name: r.get("full_name"),
        avatar_url: r.get("avatar_url"),
        cover_image_url: r.get("cover_image_url"),
        created_at: r.get("created_at"),
        subscribers_count: r.get("subscribers_count"),
        subscribed_to_count: r.get("subscribed_to_count"),
        is_subscribed: r.get("is_subscribed"),
    }))
}
