// Store projection tests
//
// These run against a live Postgres with the blog schema loaded:
//
//   DATABASE_URL=postgres://... cargo test -p realtime-service -- --ignored

use realtime_service::db::post_repo;
use realtime_service::error::AppError;
use realtime_service::services::projector::{PostProjector, SqlPostProjector};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored DB tests");
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect test database")
}

#[tokio::test]
#[ignore] // needs a live Postgres
async fn test_absent_post_projects_to_none() {
    let pool = connect().await;

    let missing = post_repo::find_active_post_by_id(&pool, Uuid::new_v4())
        .await
        .expect("query should run");

    assert!(missing.is_none());
}

#[tokio::test]
#[ignore] // needs a live Postgres
async fn test_unknown_post_maps_to_post_not_found() {
    let pool = connect().await;
    let projector = SqlPostProjector::new(pool);

    let err = projector.project(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, AppError::PostNotFound(_)));
}

#[tokio::test]
#[ignore] // needs a live Postgres
async fn test_recent_posts_are_ordered_newest_first() {
    let pool = connect().await;
    let projector = SqlPostProjector::new(pool);

    let posts = projector.project_recent().await.expect("query should run");

    assert!(posts.len() <= 20);
    assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}
