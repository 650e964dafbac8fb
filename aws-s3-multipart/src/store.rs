/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use async_trait::async_trait;

use crate::error::Error;
use crate::io::PartBody;
use crate::manifest::CompletionManifest;
use crate::types::{
    ChecksumAlgorithm, ListingPage, PartChecksum, PartSummary, PartsMarker, SseCustomerKey,
    UploadOptions, UploadSession, UploadSummary, UploadsMarker,
};

/// S3 implementation of [`ObjectStore`]
pub mod s3;

/// The network operations a multipart upload needs from an object store.
///
/// Implementations issue the request and classify failures into [`ErrorKind`]s:
/// transport problems as `Transport`, checksum mismatches as `Integrity`, an unknown or
/// finished upload as `SessionClosed`, and any other refusal as `StoreRejected` with the
/// store's error code attached. They do not validate arguments; the [`Client`] has already
/// done so. Retrying is up to the implementation.
///
/// [`ErrorKind`]: crate::error::ErrorKind
/// [`Client`]: crate::Client
#[async_trait]
pub trait ObjectStore: fmt::Debug + Send + Sync {
    /// Start an upload, returning the store-assigned upload ID.
    async fn create_multipart_upload(&self, request: CreateUploadRequest) -> Result<String, Error>;

    /// Store one part.
    async fn upload_part(&self, request: UploadPartRequest) -> Result<UploadPartResponse, Error>;

    /// Assemble the listed parts into the final object.
    async fn complete_multipart_upload(
        &self,
        request: CompleteUploadRequest,
    ) -> Result<CompleteUploadResponse, Error>;

    /// Discard the upload and all of its parts.
    async fn abort_multipart_upload(&self, session: &UploadSession) -> Result<(), Error>;

    /// One page of in-progress uploads.
    async fn list_multipart_uploads(
        &self,
        request: ListUploadsRequest,
    ) -> Result<ListingPage<UploadSummary, UploadsMarker>, Error>;

    /// One page of the parts uploaded to a session.
    async fn list_parts(
        &self,
        request: ListPartsRequest,
    ) -> Result<ListingPage<PartSummary, PartsMarker>, Error>;
}

/// Input to [`ObjectStore::create_multipart_upload`]
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CreateUploadRequest {
    /// Target bucket
    pub bucket: String,
    /// Target key
    pub key: String,
    /// Options applied to the assembled object
    pub options: UploadOptions,
    /// Checksum algorithm every part will carry
    pub checksum_algorithm: Option<ChecksumAlgorithm>,
}

/// Input to [`ObjectStore::upload_part`]
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct UploadPartRequest {
    /// The session the part belongs to
    pub session: UploadSession,
    /// Part number in `1..=10000`
    pub part_number: u32,
    /// Checksum the store must verify the body against
    pub checksum: PartChecksum,
    /// Exact number of bytes in `body`
    pub content_length: u64,
    /// The part contents
    pub body: PartBody,
    /// Customer provided encryption key, if the upload uses SSE-C
    pub sse_customer_key: Option<SseCustomerKey>,
}

/// Output of [`ObjectStore::upload_part`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPartResponse {
    /// Entity tag assigned to the part
    pub e_tag: String,
    /// The checksum the store recorded, if it echoes one back
    pub checksum: Option<PartChecksum>,
}

/// Input to [`ObjectStore::complete_multipart_upload`]
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CompleteUploadRequest {
    /// The session to complete
    pub session: UploadSession,
    /// Validated, ordered parts
    pub manifest: CompletionManifest,
    /// Customer provided encryption key, if the upload uses SSE-C
    pub sse_customer_key: Option<SseCustomerKey>,
}

/// Output of [`ObjectStore::complete_multipart_upload`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompleteUploadResponse {
    /// Entity tag of the assembled object
    pub e_tag: Option<String>,
    /// Version ID, for versioned buckets
    pub version_id: Option<String>,
    /// URI of the object
    pub location: Option<String>,
    /// Object level checksum
    pub checksum: Option<String>,
    /// Object size, if the store reports it
    pub size: Option<u64>,
}

/// Input to [`ObjectStore::list_multipart_uploads`]
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ListUploadsRequest {
    /// Bucket to list
    pub bucket: String,
    /// Only uploads whose key starts with this prefix
    pub prefix: Option<String>,
    /// Group keys sharing a prefix up to this delimiter into common prefixes
    pub delimiter: Option<String>,
    /// Continue after this marker; first page when absent
    pub marker: Option<UploadsMarker>,
    /// Upper bound on the page size, in `1..=1000`
    pub max_uploads: u32,
}

/// Input to [`ObjectStore::list_parts`]
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ListPartsRequest {
    /// The session whose parts to list
    pub session: UploadSession,
    /// Continue after this marker; first page when absent
    pub marker: Option<PartsMarker>,
    /// Upper bound on the page size, in `1..=1000`
    pub max_parts: u32,
}
