//! Transport wire types
//!
//! Serde models for the inbound SQS event, the S3 notification carried in
//! each message body, and the partial-batch failure response returned to the
//! queue. The field names on these types are the contract with SQS: renaming
//! `batchItemFailures` or `itemIdentifier` silently breaks partial-batch
//! redelivery, so they are pinned with explicit `serde(rename)` attributes.
//!
//! Notification records deserialize permissively (unknown fields ignored,
//! missing fields defaulted to empty strings) so that one odd record fails in
//! [`crate::decode::locate`] instead of taking down the whole message body.

use serde::{Deserialize, Serialize};

/// One SQS event: a batch of messages delivered to a single invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct SqsEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsMessage>,
}

/// One SQS message within a batch.
#[derive(Debug, Clone, Deserialize)]
pub struct SqsMessage {
    /// Transport-assigned identifier, used for failure reporting.
    #[serde(rename = "messageId")]
    pub message_id: String,
    /// Raw message body, expected to hold an S3 notification document.
    pub body: String,
}

/// S3 notification document: the deserialized form of a message body.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Notification {
    /// `Records` is required; a body without it is not a notification.
    #[serde(rename = "Records")]
    pub records: Vec<ObjectRecord>,
}

/// One object-created event within a notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectRecord {
    #[serde(default)]
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: BucketRef,
    #[serde(default)]
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BucketRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectRef {
    #[serde(default)]
    pub key: String,
}

/// Normalized source-object address derived from an [`ObjectRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Partial-batch response returned to SQS.
///
/// An empty failure list acknowledges the whole batch; a non-empty list
/// causes SQS to redeliver only the identified messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqsBatchResponse {
    #[serde(rename = "batchItemFailures")]
    pub batch_item_failures: Vec<BatchItemFailure>,
}

/// One failed message identifier within a batch response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemFailure {
    #[serde(rename = "itemIdentifier")]
    pub item_identifier: String,
}
