//! Worker configuration
//!
//! Configuration comes from the host environment, not user flags. AWS
//! credentials and region are handled separately by the SDK provider chain
//! (see [`crate::storage`]).

use serde::{Deserialize, Serialize};

/// Default prefix for generated destination keys.
pub const DEFAULT_KEY_PREFIX: &str = "normalized";

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Bucket the transformed objects are written to.
    pub target_bucket: String,
    /// Prefix for generated destination keys.
    pub key_prefix: String,
}

impl WorkerConfig {
    /// Load configuration from the environment.
    ///
    /// - `TARGET_BUCKET_NAME` (required): destination bucket
    /// - `OUTPUT_KEY_PREFIX` (optional): destination key prefix
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            target_bucket: std::env::var("TARGET_BUCKET_NAME")
                .map_err(|_| anyhow::anyhow!("TARGET_BUCKET_NAME must be set"))?,
            key_prefix: std::env::var("OUTPUT_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.target_bucket.is_empty() {
            anyhow::bail!("TARGET_BUCKET_NAME must not be empty");
        }
        if self.key_prefix.is_empty() {
            anyhow::bail!("OUTPUT_KEY_PREFIX must not be empty");
        }
        Ok(())
    }
}
