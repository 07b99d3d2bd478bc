//! Notification decoding and object location
//!
//! Two pure stages with no I/O: [`decode_notification`] turns one message
//! body into object records, and [`locate`] turns one record into a usable
//! `(bucket, key)` reference. Each failure is scoped to the item it came
//! from, which is what lets the orchestrator keep the rest of the batch
//! moving.

use crate::error::PipelineError;
use crate::event::{ObjectRecord, ObjectReference, S3Notification};

/// Decode one SQS message body into its object-created records.
///
/// A well-formed notification with an empty `Records` list is not an error;
/// it decodes to an empty vector and the message is acknowledged as a
/// success.
pub fn decode_notification(body: &str) -> Result<Vec<ObjectRecord>, PipelineError> {
    let notification: S3Notification =
        serde_json::from_str(body).map_err(PipelineError::Decode)?;
    Ok(notification.records)
}

/// Extract the normalized source-object reference from one record.
///
/// Both the bucket name and the object key are required and must be
/// non-empty.
pub fn locate(record: &ObjectRecord) -> Result<ObjectReference, PipelineError> {
    let bucket = &record.s3.bucket.name;
    let key = &record.s3.object.key;

    if bucket.is_empty() {
        return Err(PipelineError::MalformedRecord(
            "missing source bucket name".to_string(),
        ));
    }
    if key.is_empty() {
        return Err(PipelineError::MalformedRecord(
            "missing object key".to_string(),
        ));
    }

    Ok(ObjectReference {
        bucket: bucket.clone(),
        key: key.clone(),
    })
}
