use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post lifecycle status. Only `Active` posts are externally visible; the
/// other two stay on the read path but never cross the projection boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Active,
    Removed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Active => "active",
            PostStatus::Removed => "removed",
        }
    }
}

/// Author half of a post projection. Read-only in this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: Uuid,
    pub name: String,
    /// Opaque storage key, resolved to a URL only at broadcast time
    pub avatar_key: String,
    pub description: Option<String>,
}

/// One image attached to a post. Immutable after creation; its lifetime is
/// bounded by the owning post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostImage {
    pub id: Uuid,
    pub storage_key: String,
    pub position: i32,
}

/// Shaped, point-in-time view of a post: internal fields (author FK, status)
/// are already stripped, author and images are eager-loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
    pub author: AuthorProfile,
    pub images: Vec<PostImage>,
}

/// Broadcast payload with every storage key dereferenced into a signed URL.
///
/// Transient: built per event, dropped after the fan-out. Never persisted or
/// cached, since the embedded URLs expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
    pub author: BroadcastAuthor,
    pub images: Vec<BroadcastImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastAuthor {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastImage {
    pub id: Uuid,
    pub url: String,
    pub order: i32,
}
