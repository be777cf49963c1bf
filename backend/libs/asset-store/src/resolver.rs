use crate::config::StorageConfig;
use crate::error::AssetError;
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use std::sync::Arc;

/// Resolves an opaque storage key into a time-bounded public URL.
///
/// Every call is a fresh round-trip to the object store; repeated calls with
/// the same key are safe but may return URLs with different expiry stamps.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    async fn resolve(&self, storage_key: &str) -> Result<String, AssetError>;
}

/// S3-backed resolver producing presigned GET URLs
#[derive(Clone)]
pub struct S3AssetResolver {
    client: Arc<Client>,
    config: StorageConfig,
}

impl S3AssetResolver {
    pub fn new(client: Arc<Client>, config: StorageConfig) -> Self {
        Self { client, config }
    }

    /// Build a resolver with an S3 client from the shared AWS environment.
    ///
    /// Credentials come from the default provider chain. A custom endpoint
    /// (MinIO, localstack) is honored when configured.
    pub async fn connect(config: StorageConfig) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %config.bucket, region = %config.region, "S3 asset resolver initialized");

        Self::new(Arc::new(Client::from_conf(builder.build())), config)
    }
}

#[async_trait]
impl AssetResolver for S3AssetResolver {
    async fn resolve(&self, storage_key: &str) -> Result<String, AssetError> {
        if storage_key.trim().is_empty() {
            return Err(AssetError::EmptyKey);
        }

        // An unknown key must fail outright, not sign a URL pointing at nothing.
        if let Err(e) = self
            .client
            .head_object()
            .bucket(&self.config.bucket)
            .key(storage_key)
            .send()
            .await
        {
            let error_msg = e.to_string();
            if error_msg.contains("404") || error_msg.contains("NotFound") {
                return Err(AssetError::NotFound(storage_key.to_string()));
            }
            return Err(AssetError::Unavailable(error_msg));
        }

        let presigning_config = PresigningConfig::builder()
            .expires_in(self.config.presign_expiry())
            .build()
            .map_err(|e| AssetError::Unavailable(format!("presigning config: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(storage_key)
            .presigned(presigning_config)
            .await
            .map_err(|e| AssetError::Unavailable(format!("presign failed: {e}")))?;

        Ok(presigned.uri().to_string())
    }
}
