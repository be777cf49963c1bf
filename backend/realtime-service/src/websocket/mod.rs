use std::sync::Arc;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

pub mod dispatcher;
pub mod message_types;

/// Unique identifier for a connected peer
///
/// Each websocket connection gets one on registration. It allows precise
/// cleanup when the connection closes, and doubles as the exclusion marker
/// when that peer originates a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(Uuid);

impl PeerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Peer entry with ID and channel
struct Peer {
    id: PeerId,
    sender: UnboundedSender<String>,
}

/// Registry of connected websocket peers
///
/// One flat channel shared by every connection. Supports precise cleanup by
/// peer ID so closed connections do not leak senders.
#[derive(Default, Clone)]
pub struct PeerRegistry {
    inner: Arc<RwLock<Vec<Peer>>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new peer
    ///
    /// Returns a tuple of (peer_id, receiver) where:
    /// - peer_id: unique ID for this connection (used for cleanup and
    ///   originator exclusion)
    /// - receiver: channel the peer's session drains broadcasts from
    pub async fn register(&self) -> (PeerId, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let peer_id = PeerId::new();

        let mut guard = self.inner.write().await;
        guard.push(Peer { id: peer_id, sender: tx });

        tracing::debug!(?peer_id, total = guard.len(), "peer registered");

        (peer_id, rx)
    }

    /// Remove a peer. Must be called when its connection closes.
    pub async fn unregister(&self, peer_id: PeerId) {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|peer| peer.id != peer_id);

        if guard.len() != before {
            tracing::debug!(?peer_id, remaining = guard.len(), "peer unregistered");
        }
    }

    /// Send a message to every peer except the originator
    ///
    /// Fire-and-forget: nothing is awaited beyond the channel push, and dead
    /// senders are pruned as they are discovered.
    pub async fn broadcast_except(&self, origin: PeerId, msg: String) {
        let mut guard = self.inner.write().await;
        let before = guard.len();

        guard.retain(|peer| {
            if peer.id == origin {
                return true;
            }
            peer.sender.send(msg.clone()).is_ok()
        });

        let pruned = before - guard.len();
        if pruned > 0 {
            tracing::debug!(pruned, active = guard.len(), "dead peers cleaned up during broadcast");
        }
    }

    /// Connected peer count (for debugging/metrics)
    pub async fn peer_count(&self) -> usize {
        self.inner.read().await.len()
    }
}
