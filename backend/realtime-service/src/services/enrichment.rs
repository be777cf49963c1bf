/// Payload enrichment - dereferences storage keys into signed URLs
use crate::error::Result;
use crate::models::{BroadcastAuthor, BroadcastImage, BroadcastPost, Post};
use asset_store::{AssetError, AssetResolver};
use futures::future::join_all;
use std::time::Duration;

/// Replace every storage key in `post` with a resolved, time-bounded URL.
///
/// All N+1 resolutions (author avatar plus one per image) are launched at
/// once; the stage joins on every one of them before deciding the outcome,
/// so a failure never leaves a resolution unaccounted for. Any single
/// failure fails the whole stage: no partial payload is ever produced.
pub async fn enrich(
    resolver: &dyn AssetResolver,
    post: Post,
    resolution_timeout: Duration,
) -> Result<BroadcastPost> {
    let (avatar, image_urls) = tokio::join!(
        resolve_bounded(resolver, &post.author.avatar_key, resolution_timeout),
        join_all(
            post.images
                .iter()
                .map(|image| resolve_bounded(resolver, &image.storage_key, resolution_timeout)),
        ),
    );

    let avatar_url = avatar?;

    // join_all yields results in input order, so image order survives
    // whatever order the underlying resolutions completed in.
    let mut images = Vec::with_capacity(post.images.len());
    for (image, url) in post.images.iter().zip(image_urls) {
        images.push(BroadcastImage {
            id: image.id,
            url: url?,
            order: image.position,
        });
    }

    Ok(BroadcastPost {
        id: post.id,
        title: post.title,
        content: post.content,
        created_at: post.created_at,
        comment_count: post.comment_count,
        author: BroadcastAuthor {
            id: post.author.id,
            name: post.author.name,
            avatar_url,
            description: post.author.description,
        },
        images,
    })
}

async fn resolve_bounded(
    resolver: &dyn AssetResolver,
    storage_key: &str,
    limit: Duration,
) -> std::result::Result<String, AssetError> {
    match tokio::time::timeout(limit, resolver.resolve(storage_key)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(AssetError::Unavailable(format!(
            "resolution of {storage_key} timed out after {}s",
            limit.as_secs()
        ))),
    }
}
