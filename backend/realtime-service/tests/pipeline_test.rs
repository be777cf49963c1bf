// Broadcast pipeline tests
//
// Exercises the dispatcher end to end with in-memory store and resolver
// doubles: projection filtering, enrichment fan-out, and originator
// exclusion, without a live Postgres or object store.

use asset_store::{AssetError, AssetResolver};
use async_trait::async_trait;
use chrono::Utc;
use realtime_service::error::{AppError, Result};
use realtime_service::models::{AuthorProfile, Post, PostImage, PostStatus};
use realtime_service::services::projector::PostProjector;
use realtime_service::websocket::dispatcher::Dispatcher;
use realtime_service::websocket::PeerRegistry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Store double: posts keyed by id, with their lifecycle status
struct FakeProjector {
    posts: HashMap<Uuid, (PostStatus, Post)>,
}

#[async_trait]
impl PostProjector for FakeProjector {
    async fn project(&self, post_id: Uuid) -> Result<Post> {
        match self.posts.get(&post_id) {
            Some((PostStatus::Active, post)) => Ok(post.clone()),
            // Inactive posts are indistinguishable from missing ones.
            _ => Err(AppError::PostNotFound(post_id)),
        }
    }
}

/// Resolver double with a configurable set of broken keys
struct FakeResolver {
    failing: HashSet<String>,
}

impl FakeResolver {
    fn ok() -> Self {
        Self {
            failing: HashSet::new(),
        }
    }

    fn failing(key: &str) -> Self {
        let mut failing = HashSet::new();
        failing.insert(key.to_string());
        Self { failing }
    }
}

#[async_trait]
impl AssetResolver for FakeResolver {
    async fn resolve(&self, storage_key: &str) -> std::result::Result<String, AssetError> {
        if self.failing.contains(storage_key) {
            return Err(AssetError::NotFound(storage_key.to_string()));
        }
        Ok(format!("https://cdn.test/{storage_key}?sig=deadbeef"))
    }
}

fn sample_post(image_keys: &[&str]) -> Post {
    Post {
        id: Uuid::new_v4(),
        title: "la tecnologia avanza".to_string(),
        content: "contenido del post".to_string(),
        created_at: Utc::now(),
        comment_count: 2,
        author: AuthorProfile {
            id: Uuid::new_v4(),
            name: "ana".to_string(),
            avatar_key: "avatars/ana.png".to_string(),
            description: Some("escritora".to_string()),
        },
        images: image_keys
            .iter()
            .enumerate()
            .map(|(i, key)| PostImage {
                id: Uuid::new_v4(),
                storage_key: (*key).to_string(),
                position: i as i32,
            })
            .collect(),
    }
}

fn dispatcher_with(
    posts: Vec<(PostStatus, Post)>,
    resolver: FakeResolver,
    registry: &PeerRegistry,
) -> Dispatcher {
    let posts = posts
        .into_iter()
        .map(|(status, post)| (post.id, (status, post)))
        .collect();

    Dispatcher::new(
        Arc::new(FakeProjector { posts }),
        Arc::new(resolver),
        registry.clone(),
        Duration::from_secs(10),
    )
}

#[tokio::test]
async fn test_active_post_reaches_every_peer_but_the_originator() {
    let registry = PeerRegistry::new();
    let (s1, mut rx1) = registry.register().await;
    let (_s2, mut rx2) = registry.register().await;
    let (_s3, mut rx3) = registry.register().await;

    let post = sample_post(&["posts/i1.jpg", "posts/i2.jpg"]);
    let post_id = post.id;
    let dispatcher = dispatcher_with(vec![(PostStatus::Active, post)], FakeResolver::ok(), &registry);

    dispatcher.handle_new_post(s1, &post_id.to_string()).await;

    assert!(rx1.try_recv().is_err(), "originator must not receive its own broadcast");

    let payload = rx2.try_recv().expect("second peer should receive the broadcast");
    assert_eq!(payload, rx3.try_recv().expect("third peer should receive the broadcast"));

    let event: serde_json::Value = serde_json::from_str(&payload).expect("payload is JSON");
    assert_eq!(event["type"], "render-new-post");

    let enriched = &event["post"];
    assert_eq!(enriched["id"], post_id.to_string());
    assert_eq!(enriched["commentCount"], 2);
    assert_eq!(
        enriched["author"]["avatarUrl"],
        "https://cdn.test/avatars/ana.png?sig=deadbeef"
    );

    let images = enriched["images"].as_array().expect("images is an array");
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["url"], "https://cdn.test/posts/i1.jpg?sig=deadbeef");
    assert_eq!(images[0]["order"], 0);
    assert_eq!(images[1]["url"], "https://cdn.test/posts/i2.jpg?sig=deadbeef");
    assert_eq!(images[1]["order"], 1);
}

#[tokio::test]
async fn test_draft_post_is_never_broadcast() {
    let registry = PeerRegistry::new();
    let (s1, mut rx1) = registry.register().await;
    let (_s2, mut rx2) = registry.register().await;

    let post = sample_post(&["posts/i1.jpg"]);
    let post_id = post.id;
    let dispatcher = dispatcher_with(vec![(PostStatus::Draft, post)], FakeResolver::ok(), &registry);

    dispatcher.handle_new_post(s1, &post_id.to_string()).await;

    assert!(rx1.try_recv().is_err());
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn test_unparseable_post_id_is_dropped() {
    let registry = PeerRegistry::new();
    let (s1, _rx1) = registry.register().await;
    let (_s2, mut rx2) = registry.register().await;

    let dispatcher = dispatcher_with(vec![], FakeResolver::ok(), &registry);

    dispatcher.handle_new_post(s1, "definitely-not-a-uuid").await;

    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_enrichment_produces_no_partial_broadcast() {
    let registry = PeerRegistry::new();
    let (s1, _rx1) = registry.register().await;
    let (_s2, mut rx2) = registry.register().await;

    let post = sample_post(&["posts/ok.jpg", "posts/broken.jpg"]);
    let post_id = post.id;
    let dispatcher = dispatcher_with(
        vec![(PostStatus::Active, post)],
        FakeResolver::failing("posts/broken.jpg"),
        &registry,
    );

    dispatcher.handle_new_post(s1, &post_id.to_string()).await;

    assert!(rx2.try_recv().is_err(), "no degraded payload may be emitted");
}

#[tokio::test]
async fn test_one_failing_event_does_not_block_a_concurrent_one() {
    let registry = PeerRegistry::new();
    let (s1, _rx1) = registry.register().await;
    let (_s2, mut rx2) = registry.register().await;

    let broken = sample_post(&["posts/broken.jpg"]);
    let good = sample_post(&["posts/good.jpg"]);
    let broken_id = broken.id;
    let good_id = good.id;

    let dispatcher = dispatcher_with(
        vec![(PostStatus::Active, broken), (PostStatus::Active, good)],
        FakeResolver::failing("posts/broken.jpg"),
        &registry,
    );

    let broken_id_str = broken_id.to_string();
    let good_id_str = good_id.to_string();
    tokio::join!(
        dispatcher.handle_new_post(s1, &broken_id_str),
        dispatcher.handle_new_post(s1, &good_id_str),
    );

    let payload = rx2.try_recv().expect("the healthy event should still broadcast");
    let event: serde_json::Value = serde_json::from_str(&payload).expect("payload is JSON");
    assert_eq!(event["post"]["id"], good_id.to_string());

    assert!(rx2.try_recv().is_err(), "the failing event must not broadcast");
}

#[tokio::test]
async fn test_single_connected_peer_receives_nothing() {
    let registry = PeerRegistry::new();
    let (s1, mut rx1) = registry.register().await;

    let post = sample_post(&[]);
    let post_id = post.id;
    let dispatcher = dispatcher_with(vec![(PostStatus::Active, post)], FakeResolver::ok(), &registry);

    dispatcher.handle_new_post(s1, &post_id.to_string()).await;

    assert!(rx1.try_recv().is_err());
    assert_eq!(registry.peer_count().await, 1);
}
