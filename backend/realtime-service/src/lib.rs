/// Realtime Service Library
///
/// Drives the realtime post-broadcast pipeline for the Tinta blog platform:
/// a connected client announces a freshly published post, the service
/// projects the post out of the store, resolves every attached storage key
/// into a time-bounded URL, and fans the enriched payload out to every other
/// connected peer.
///
/// # Modules
///
/// - `websocket`: peer registry, event types, and the pipeline dispatcher
/// - `services`: post projection and payload enrichment
/// - `db`: database access layer
/// - `models`: projection and broadcast payload types
/// - `routes`: HTTP surface (websocket upgrade, health)
/// - `error`: error types and handling
/// - `config`: configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod websocket;

pub use config::Config;
pub use error::{AppError, Result};
