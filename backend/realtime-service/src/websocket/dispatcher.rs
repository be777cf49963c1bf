use crate::error::AppError;
use crate::services::{enrichment, projector::PostProjector};
use crate::websocket::message_types::WsOutboundEvent;
use crate::websocket::{PeerId, PeerRegistry};
use asset_store::AssetResolver;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Drives the project, enrich, and broadcast stages for inbound events.
///
/// Constructed once at startup and shared by every websocket session. Each
/// inbound event runs its own pipeline; failures are logged and swallowed so
/// one bad event never disturbs the channel or any other in-flight event.
pub struct Dispatcher {
    projector: Arc<dyn PostProjector>,
    resolver: Arc<dyn AssetResolver>,
    registry: PeerRegistry,
    resolution_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        projector: Arc<dyn PostProjector>,
        resolver: Arc<dyn AssetResolver>,
        registry: PeerRegistry,
        resolution_timeout: Duration,
    ) -> Self {
        Self {
            projector,
            resolver,
            registry,
            resolution_timeout,
        }
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    /// Handle one `new-post` event raised by `origin`.
    ///
    /// Best-effort: a dropped broadcast is not data loss, the post stays
    /// retrievable through the durable read path. Nothing is surfaced back
    /// to any peer.
    pub async fn handle_new_post(&self, origin: PeerId, raw_id: &str) {
        // A malformed id gets the same treatment as an unknown one.
        let post_id = match Uuid::parse_str(raw_id.trim()) {
            Ok(id) => id,
            Err(_) => {
                tracing::info!(raw_id, "new-post carried an unparseable post id, dropping event");
                return;
            }
        };

        let post = match self.projector.project(post_id).await {
            Ok(post) => post,
            Err(AppError::PostNotFound(_)) => {
                tracing::info!(%post_id, "new-post for an absent or inactive post, dropping event");
                return;
            }
            Err(e) => {
                tracing::error!(%post_id, error = %e, "post projection failed, dropping event");
                return;
            }
        };

        let enriched =
            match enrichment::enrich(self.resolver.as_ref(), post, self.resolution_timeout).await {
                Ok(enriched) => enriched,
                Err(e) => {
                    tracing::warn!(%post_id, error = %e, "enrichment failed, dropping event");
                    return;
                }
            };

        let event = WsOutboundEvent::RenderNewPost { post: enriched };
        match serde_json::to_string(&event) {
            Ok(payload) => self.registry.broadcast_except(origin, payload).await,
            Err(e) => tracing::error!(%post_id, error = %e, "failed to serialize broadcast payload"),
        }
    }
}
