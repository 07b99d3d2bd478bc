//! Pipeline error types
//!
//! Every variant is item-local: it fails the SQS message that owns the item,
//! never the batch. All variants are caught at the orchestrator boundary in
//! [`crate::handler`] and folded into the batch response.

use crate::event::ObjectReference;
use thiserror::Error;

/// Per-item failure during batch processing
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The message body was not a valid S3 notification document.
    #[error("Invalid notification body: {0}")]
    Decode(#[source] serde_json::Error),

    /// An object record was missing its bucket name or object key.
    #[error("Malformed object record: {0}")]
    MalformedRecord(String),

    /// The object key does not carry the accepted `.csv` extension.
    #[error("Unsupported format for key '{0}': only .csv input is accepted")]
    UnsupportedFormat(String),

    /// The object bytes were not valid UTF-8.
    #[error("Object is not valid UTF-8 text")]
    Encoding(#[source] std::string::FromUtf8Error),

    /// The object text was not a well-formed semicolon-delimited table.
    #[error("Invalid ';'-delimited table: {0}")]
    Parse(String),

    /// The source object could not be read, including not-found.
    #[error("Failed to fetch {reference}: {cause}")]
    Fetch {
        reference: ObjectReference,
        cause: anyhow::Error,
    },

    /// Re-serializing or gzip-compressing the parsed table failed.
    #[error("Failed to compress output: {cause}")]
    Compress { cause: anyhow::Error },

    /// The target bucket rejected the write.
    #[error("Failed to write s3://{bucket}/{key}: {cause}")]
    Write {
        bucket: String,
        key: String,
        cause: anyhow::Error,
    },
}

impl PipelineError {
    /// Short stable name for the error kind, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) => "decode",
            PipelineError::MalformedRecord(_) => "malformed_record",
            PipelineError::UnsupportedFormat(_) => "unsupported_format",
            PipelineError::Encoding(_) => "encoding",
            PipelineError::Parse(_) => "parse",
            PipelineError::Fetch { .. } => "fetch",
            PipelineError::Compress { .. } => "compress",
            PipelineError::Write { .. } => "write",
        }
    }
}
