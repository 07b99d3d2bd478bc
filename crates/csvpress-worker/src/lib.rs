//! Csvpress Worker Library
//!
//! Batch-processing pipeline that consumes S3 object-created notifications
//! delivered through SQS, normalizes the referenced semicolon-delimited CSV
//! objects, and writes gzip-compressed copies to a target bucket.
//!
//! The pipeline stages, in order:
//!
//! 1. **Decode** ([`decode`]): one SQS message body into object records
//! 2. **Locate** ([`decode::locate`]): one record into a `(bucket, key)` reference
//! 3. **Transform** ([`transform`]): fetch, validate, reparse, gzip
//! 4. **Sink** ([`sink`]): write the compressed bytes under a fresh key
//! 5. **Orchestrate** ([`handler`]): drive all items, isolate failures, and
//!    report failed message ids back to SQS for partial-batch redelivery
//!
//! # Example
//!
//! ```no_run
//! use csvpress_worker::{handle_event, storage::S3Store, SqsEvent, WorkerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WorkerConfig::from_env()?;
//!     let store = S3Store::from_env().await;
//!     let event: SqsEvent = serde_json::from_str(r#"{"Records": []}"#)?;
//!     let response = handle_event(event, &store, &config).await;
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod event;
pub mod handler;
pub mod sink;
pub mod storage;
pub mod transform;

// Re-export commonly used types
pub use config::WorkerConfig;
pub use error::PipelineError;
pub use event::{BatchItemFailure, ObjectReference, SqsBatchResponse, SqsEvent, SqsMessage};
pub use handler::handle_event;
