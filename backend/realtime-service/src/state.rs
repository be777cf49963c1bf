use crate::{config::Config, websocket::dispatcher::Dispatcher};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Constructed once at startup and torn down with the process; every
    /// websocket session borrows it through here rather than a global.
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<Config>,
}
