use crate::models::BroadcastPost;
use serde::{Deserialize, Serialize};

/// Inbound WebSocket events from client to server
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsInboundEvent {
    /// A client announces a freshly published post and asks for it to be
    /// fanned out to everyone else. The id is carried as an opaque string;
    /// anything unparseable downstream is treated like an unknown post.
    #[serde(rename = "new-post")]
    NewPost { id: String },
}

/// Outbound WebSocket events from server to client
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsOutboundEvent {
    #[serde(rename = "render-new-post")]
    RenderNewPost { post: BroadcastPost },
}
