//! Batch orchestrator
//!
//! Drives the pipeline for every item in an SQS batch and produces the
//! partial-batch response. The orchestrator never fails as a whole: every
//! per-item error is caught here, logged with enough context to diagnose
//! offline, and converted into membership of the owning message id in the
//! failure set. Redelivery of failed messages is the transport's job; no
//! retries happen inside one invocation.
//!
//! Items run sequentially, messages in batch order and records in record
//! order. Per-item I/O latency dominates, and sequential execution keeps the
//! failure attribution trivially race-free.

use crate::config::WorkerConfig;
use crate::decode;
use crate::error::PipelineError;
use crate::event::{BatchItemFailure, ObjectRecord, SqsBatchResponse, SqsEvent, SqsMessage};
use crate::sink;
use crate::storage::ObjectStore;
use crate::transform;
use tracing::{debug, info, warn};

/// Process one SQS event and report which messages must be redelivered.
///
/// An empty failure list acknowledges the full batch. A message id appears
/// at most once no matter how many of its records fail.
pub async fn handle_event(
    event: SqsEvent,
    store: &dyn ObjectStore,
    config: &WorkerConfig,
) -> SqsBatchResponse {
    info!(messages = event.records.len(), "Processing notification batch");

    let mut failures: Vec<BatchItemFailure> = Vec::new();
    for message in &event.records {
        let failed = process_message(message, store, config).await;
        let already_reported = failures
            .iter()
            .any(|f| f.item_identifier == message.message_id);
        if failed && !already_reported {
            failures.push(BatchItemFailure {
                item_identifier: message.message_id.clone(),
            });
        }
    }

    info!(
        messages = event.records.len(),
        failed = failures.len(),
        "Batch complete"
    );

    SqsBatchResponse {
        batch_item_failures: failures,
    }
}

/// Process one message; returns true if the message must be redelivered.
///
/// A decode failure fails the whole message. After a successful decode every
/// record is attempted, even once a sibling record has already failed.
async fn process_message(
    message: &SqsMessage,
    store: &dyn ObjectStore,
    config: &WorkerConfig,
) -> bool {
    let records = match decode::decode_notification(&message.body) {
        Ok(records) => records,
        Err(error) => {
            warn!(
                message_id = %message.message_id,
                error_kind = error.kind(),
                %error,
                "Failed to decode notification body"
            );
            return true;
        },
    };

    debug!(
        message_id = %message.message_id,
        records = records.len(),
        "Decoded notification"
    );

    let mut failed = false;
    for record in &records {
        match process_record(record, store, config).await {
            Ok(destination_key) => {
                info!(
                    message_id = %message.message_id,
                    source_bucket = %record.s3.bucket.name,
                    source_key = %record.s3.object.key,
                    destination_key = %destination_key,
                    "Stored normalized object"
                );
            },
            Err(error) => {
                warn!(
                    message_id = %message.message_id,
                    source_bucket = %record.s3.bucket.name,
                    source_key = %record.s3.object.key,
                    error_kind = error.kind(),
                    %error,
                    "Failed to process object record"
                );
                failed = true;
            },
        }
    }

    failed
}

/// Locate, transform, and store one object record.
///
/// Returns the destination key the output was written under.
async fn process_record(
    record: &ObjectRecord,
    store: &dyn ObjectStore,
    config: &WorkerConfig,
) -> Result<String, PipelineError> {
    let reference = decode::locate(record)?;
    let compressed = transform::transform(store, &reference).await?;
    sink::store_output(store, config, compressed).await
}
