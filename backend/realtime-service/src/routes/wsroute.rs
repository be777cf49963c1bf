use crate::state::AppState;
use crate::websocket::dispatcher::Dispatcher;
use crate::websocket::message_types::WsInboundEvent;
use crate::websocket::{PeerId, PeerRegistry};
use actix::{Actor, ActorContext, AsyncContext, Handler, Message as ActixMessage, StreamHandler};
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Broadcast frame forwarded from the registry onto this session's socket
#[derive(ActixMessage)]
#[rtype(result = "()")]
struct BroadcastFrame(String);

/// WebSocket session for one connected peer
struct WsSession {
    peer_id: PeerId,
    registry: PeerRegistry,
    dispatcher: Arc<Dispatcher>,
    /// Taken in `started` to bridge registry broadcasts onto the socket
    rx: Option<UnboundedReceiver<String>>,
    hb: Instant,
}

impl WsSession {
    fn new(
        peer_id: PeerId,
        registry: PeerRegistry,
        dispatcher: Arc<Dispatcher>,
        rx: UnboundedReceiver<String>,
    ) -> Self {
        Self {
            peer_id,
            registry,
            dispatcher,
            rx: Some(rx),
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!("websocket heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(peer_id = ?self.peer_id, "peer connected");

        self.hb(ctx);

        // Bridge the registry's receive half onto this socket.
        if let Some(mut rx) = self.rx.take() {
            let addr = ctx.address();
            actix::spawn(async move {
                while let Some(msg) = rx.recv().await {
                    addr.do_send(BroadcastFrame(msg));
                }
            });
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(peer_id = ?self.peer_id, "peer disconnected");

        // Cleanup: drop this peer from the registry
        let registry = self.registry.clone();
        let peer_id = self.peer_id;
        actix::spawn(async move {
            registry.unregister(peer_id).await;
        });
    }
}

impl Handler<BroadcastFrame> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: BroadcastFrame, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<WsInboundEvent>(&text) {
                Ok(WsInboundEvent::NewPost { id }) => {
                    // Each event rides its own task: a slow or failing
                    // pipeline must not hold up this socket or any other.
                    let dispatcher = self.dispatcher.clone();
                    let origin = self.peer_id;
                    actix::spawn(async move {
                        dispatcher.handle_new_post(origin, &id).await;
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse websocket message");
                }
            },
            Ok(ws::Message::Binary(_)) => {
                tracing::warn!("binary websocket messages not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::info!(?reason, "websocket close message received");
                ctx.stop();
            }
            _ => {}
        }
    }
}

#[get("/ws")]
pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (peer_id, rx) = state.dispatcher.registry().register().await;

    let session = WsSession::new(
        peer_id,
        state.dispatcher.registry().clone(),
        state.dispatcher.clone(),
        rx,
    );

    ws::start(session, &req, stream)
}
