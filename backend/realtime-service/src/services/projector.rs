/// Post projection - shapes stored posts for the broadcast pipeline
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::models::Post;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// How many posts a collection projection returns at most
pub const RECENT_POSTS_LIMIT: i64 = 20;

/// Store boundary for the dispatcher: one point-in-time read of a post
/// aggregate. A post that exists but is not active fails with
/// `PostNotFound`, exactly like a post that does not exist.
#[async_trait]
pub trait PostProjector: Send + Sync {
    async fn project(&self, post_id: Uuid) -> Result<Post>;
}

/// Postgres-backed projector
pub struct SqlPostProjector {
    pool: PgPool,
}

impl SqlPostProjector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recent active posts, newest first, for the durable read path.
    pub async fn project_recent(&self) -> Result<Vec<Post>> {
        Ok(post_repo::find_recent_active_posts(&self.pool, RECENT_POSTS_LIMIT).await?)
    }
}

#[async_trait]
impl PostProjector for SqlPostProjector {
    async fn project(&self, post_id: Uuid) -> Result<Post> {
        post_repo::find_active_post_by_id(&self.pool, post_id)
            .await?
            .ok_or(AppError::PostNotFound(post_id))
    }
}
