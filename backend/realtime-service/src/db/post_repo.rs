use crate::models::{AuthorProfile, Post, PostImage, PostStatus};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const POST_PROJECTION: &str = r#"
    SELECT p.id, p.title, p.content, p.created_at,
           u.id AS author_id, u.name AS author_name,
           u.avatar_key AS author_avatar_key, u.description AS author_description,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

/// Find one active post with its author projection and ordered images.
///
/// Absent and non-active posts both come back as `None` on purpose: callers
/// must not be able to tell whether an unpublished post exists.
pub async fn find_active_post_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<Post>, sqlx::Error> {
    let row = sqlx::query(&format!("{POST_PROJECTION} WHERE p.id = $1 AND p.status = $2"))
        .bind(post_id)
        .bind(PostStatus::Active.as_str())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let images = find_post_images(pool, post_id).await?;
            Ok(Some(post_from_row(&row, images)))
        }
        None => Ok(None),
    }
}

/// Recent active posts, newest first. Serves the durable read path rather
/// than the broadcast pipeline.
pub async fn find_recent_active_posts(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{POST_PROJECTION} WHERE p.status = $1 ORDER BY p.created_at DESC LIMIT $2"
    ))
    .bind(PostStatus::Active.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let images = find_post_images(pool, row.get("id")).await?;
        posts.push(post_from_row(&row, images));
    }

    Ok(posts)
}

/// All images attached to a post, in display order
pub async fn find_post_images(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<PostImage>, sqlx::Error> {
    sqlx::query_as::<_, PostImage>(
        r#"
        SELECT id, storage_key, position
        FROM post_images
        WHERE post_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

fn post_from_row(row: &PgRow, images: Vec<PostImage>) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        comment_count: row.get("comment_count"),
        author: AuthorProfile {
            id: row.get("author_id"),
            name: row.get("author_name"),
            avatar_key: row.get("author_avatar_key"),
            description: row.get("author_description"),
        },
        images,
    }
}
