//! Sink writer
//!
//! Persists transformed bytes to the target bucket under a generated,
//! collision-resistant key. The write acknowledgment from the store is
//! authoritative; there is no read-after-write verification.

use crate::config::WorkerConfig;
use crate::error::PipelineError;
use crate::storage::ObjectStore;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// Generate a destination key: `<prefix>_<timestamp>_<tag>.csv.gz`.
///
/// The timestamp is UTC with nanosecond precision; the uuid tag keeps names
/// unique even when concurrent invocations write within the same instant.
pub fn object_name(prefix: &str) -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S%f");
    let tag = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.csv.gz", prefix, stamp, &tag[..8])
}

/// Write compressed bytes to the target bucket under a fresh key.
///
/// Returns the key the object was written under.
pub async fn store_output(
    store: &dyn ObjectStore,
    config: &WorkerConfig,
    data: Vec<u8>,
) -> Result<String, PipelineError> {
    let key = object_name(&config.key_prefix);
    let size = data.len();

    store
        .put(&config.target_bucket, &key, data)
        .await
        .map_err(|cause| PipelineError::Write {
            bucket: config.target_bucket.clone(),
            key: key.clone(),
            cause,
        })?;

    debug!(
        "Stored {} bytes to s3://{}/{}",
        size, config.target_bucket, key
    );

    Ok(key)
}
