//! Watch history view: the viewer's ordered history joined against the video
//! collection, with each video's owner collapsed to a single public profile.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{VideoOwner, WatchHistoryEntry, WatchedVideo};

use super::pipeline::{Condition, Lookup, LookupKind, Operand, Pipeline, SortDirection};
use super::sql;

pub(crate) fn build_pipeline(user_id: Uuid) -> Pipeline {
    Pipeline::over("watch_history")
        .filter(vec![Condition::Eq {
            field: "user_id".into(),
            value: Operand::Uuid(user_id),
        }])
        .lookup(Lookup {
            from: "videos".into(),
            local_field: "video_id".into(),
            foreign_field: "id".into(),
            kind: LookupKind::First {
                alias: "video".into(),
                fields: vec![
                    "id".into(),
                    "owner_id".into(),
                    "title".into(),
                    "description".into(),
                    "thumbnail_url".into(),
                    "duration_seconds".into(),
                    "created_at".into(),
                ],
            },
        })
        .lookup(Lookup {
            from: "users".into(),
            local_field: "video.owner_id".into(),
            foreign_field: "id".into(),
            kind: LookupKind::First {
                alias: "owner".into(),
                fields: vec![
                    "username".into(),
                    "full_name".into(),
                    "avatar_url".into(),
                ],
            },
        })
        .sort("watched_at", SortDirection::Descending)
        .project([
            "watched_at",
            "video.id",
            "video.title",
            "video.description",
            "video.thumbnail_url",
            "video.duration_seconds",
            "video.created_at",
            "owner.username",
            "owner.full_name",
            "owner.avatar_url",
        ])
}

pub async fn watch_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<WatchHistoryEntry>> {
    let compiled = sql::compile(&build_pipeline(user_id));
    let rows = compiled.query().fetch_all(pool).await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        // The lateral join yields NULLs when the video was deleted since it
        // was watched; those entries are dropped from the view.
        let video_id: Option<Uuid> = row.get("video_id");
        let Some(id) = video_id else { continue };

        entries.push(WatchHistoryEntry {
            watched_at: row.get("watched_at"),
            video: WatchedVideo {
                id,
                title: row.get("video_title"),
                description: row.get("video_description"),
                thumbnail_url: row.get("video_thumbnail_url"),
                duration_seconds: row.get("video_duration_seconds"),
                created_at: row.get("video_created_at"),
                owner: VideoOwner {
                    username: row.get("owner_username"),
                    full_name: row.get("owner_full_name"),
                    avatar_url: row.get("owner_avatar_url"),
                },
            },
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_pipeline_shape() {
        let viewer = Uuid::new_v4();
        let compiled = sql::compile(&build_pipeline(viewer));

        assert!(compiled.sql.contains(
            "LEFT JOIN LATERAL (SELECT id, owner_id, title, description, thumbnail_url, duration_seconds, created_at FROM videos WHERE videos.id = watch_history.video_id LIMIT 1) AS video ON TRUE"
        ));
        assert!(compiled.sql.contains(
            "LEFT JOIN LATERAL (SELECT username, full_name, avatar_url FROM users WHERE users.id = video.owner_id LIMIT 1) AS owner ON TRUE"
        ));
        assert!(compiled
            .sql
            .contains("ORDER BY watch_history.watched_at DESC"));
        assert_eq!(compiled.binds, vec![Operand::Uuid(viewer)]);
    }
}
