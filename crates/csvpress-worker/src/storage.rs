//! Object store access
//!
//! The pipeline talks to S3 through the [`ObjectStore`] trait so that the
//! orchestrator can be exercised in tests with an in-memory double. The real
//! implementation is [`S3Store`], a thin wrapper over the AWS SDK client.
//!
//! Credentials and region come from the host environment via the standard
//! SDK provider chain. `S3_ENDPOINT` and `S3_PATH_STYLE` override the
//! endpoint for local MinIO testing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client};
use tracing::debug;

/// Binary object store with whole-object reads and writes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of an object.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Write an object, overwriting any existing one under the same key.
    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()>;
}

/// S3-backed [`ObjectStore`].
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a store from the host environment.
    pub async fn from_env() -> Self {
        let mut loader = aws_config::from_env();
        if let Ok(endpoint) = std::env::var("S3_ENDPOINT") {
            loader = loader.endpoint_url(endpoint);
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        let path_style = std::env::var("S3_PATH_STYLE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        if path_style {
            builder = builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("Failed to read s3://{}/{}", bucket, key))?;

        let data = response
            .body
            .collect()
            .await
            .context("Failed to read S3 response body")?
            .into_bytes()
            .to_vec();

        debug!("Fetched {} bytes from s3://{}/{}", data.len(), bucket, key);

        Ok(data)
    }

    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        let size = data.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .with_context(|| format!("Failed to write s3://{}/{}", bucket, key))?;

        debug!("Wrote {} bytes to s3://{}/{}", size, bucket, key);

        Ok(())
    }
}
