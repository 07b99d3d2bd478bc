//! Csvpress Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities for the csvpress workspace:
//!
//! - **Logging**: tracing subscriber configuration for all binaries
//! - **Compression**: gzip helpers used by the normalization pipeline

pub mod compress;
pub mod logging;
