/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Resumable, integrity-checked multipart upload sessions for Amazon S3 and
//! S3-compatible object stores.
//!
//! A large object is uploaded as independently transmitted parts that are assembled
//! server-side. This crate exposes each step of that protocol as its own operation, so
//! parts can be sent from several tasks or processes and an interrupted upload can be
//! resumed from the [`UploadSession`](crate::types::UploadSession) value alone.
//!
//! Every part carries a checksum computed by the client; the store verifies it and
//! rejects corrupted parts.
//!
//! # Examples
//!
//! Load the default configuration:
//!
//! ```no_run
//! # async fn example() {
//! let config = aws_s3_multipart::from_env().load().await;
//! let client = aws_s3_multipart::Client::new(config);
//! # }
//! ```
//!
//! Drive an upload session by hand:
//!
//! ```no_run
//! # async fn example() -> Result<(), aws_s3_multipart::error::Error> {
//! use aws_s3_multipart::io::PartBody;
//! use aws_s3_multipart::manifest::CompletionManifest;
//!
//! let config = aws_s3_multipart::from_env().load().await;
//! let client = aws_s3_multipart::Client::new(config);
//!
//! let session = client
//!     .initiate_upload()
//!     .bucket("my-bucket")
//!     .key("big.bin")
//!     .send()
//!     .await?;
//!
//! let part = client
//!     .upload_part()
//!     .session(session.clone())
//!     .part_number(1)
//!     .body(PartBody::from_static(b"hello world"))
//!     .send()
//!     .await?;
//!
//! let object = client
//!     .complete_upload()
//!     .session(session)
//!     .manifest(CompletionManifest::build([part])?)
//!     .send()
//!     .await?;
//! println!("created {}", object.key());
//! # Ok(())
//! # }
//! ```
//!
//! See the documentation for each client operation for more information:
//!
//! * [`initiate_upload`](crate::Client::initiate_upload) - start an upload session
//! * [`upload_part`](crate::Client::upload_part) - upload one part of a session
//! * [`complete_upload`](crate::Client::complete_upload) - assemble the parts into an object
//! * [`abort_upload`](crate::Client::abort_upload) - discard a session and its parts
//! * [`list_uploads`](crate::Client::list_uploads) / [`list_parts`](crate::Client::list_parts) - page through in-progress uploads and their parts
//! * [`find_uploads`](crate::Client::find_uploads) / [`resume_upload`](crate::Client::resume_upload) - recover an interrupted session
//! * [`upload`](crate::Client::upload) - split a whole body into parts and upload them concurrently

pub(crate) const MEBIBYTE: u64 = 1024 * 1024;

/// Default number of parts uploaded concurrently by [`Client::upload`]
pub(crate) const DEFAULT_CONCURRENCY: usize = 8;

/// Default target part size used by [`Client::upload`]
pub(crate) const DEFAULT_PART_SIZE: u64 = 8 * MEBIBYTE;

/// Lowest valid part number
pub(crate) const MIN_PART_NUMBER: u32 = 1;

/// Highest part number a multipart upload supports
pub(crate) const MAX_PART_NUMBER: u32 = 10_000;

/// Maximum page size of a listing request
pub(crate) const MAX_LIST_RESULTS: u32 = 1000;

/// Error types emitted by `aws-s3-multipart`
pub mod error;

/// Common types used by `aws-s3-multipart`
pub mod types;

/// Part bodies and checksum computation
pub mod io;

/// Ordering and validation of the parts that make up an object
pub mod manifest;

/// The object store boundary
pub mod store;

/// Multipart upload client
pub mod client;

/// Multipart upload operations
pub mod operation;

/// Client configuration
pub mod config;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
