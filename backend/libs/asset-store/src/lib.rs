/// Object storage access shared across services
///
/// Wraps the external object store behind the `AssetResolver` trait: callers
/// hand in an opaque storage key and get back a time-bounded public URL.
/// Nothing is cached here, so a returned URL always reflects the current key
/// state and expiry policy.
pub mod config;
pub mod error;
pub mod resolver;

pub use config::StorageConfig;
pub use error::AssetError;
pub use resolver::{AssetResolver, S3AssetResolver};
