/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

mod options;
pub use options::{ServerSideEncryption, SseCustomerKey, UploadOptions};

/// The target part size for an orchestrated multipart upload.
#[derive(Debug, Clone, Default)]
pub enum PartSize {
    /// Use the default target part size of 8 MiB.
    #[default]
    Auto,

    /// Target part size explicitly given.
    ///
    /// NOTE: This is a suggestion and will be used if possible but may be adjusted for an individual request
    /// as required by the underlying API.
    Target(u64),
}

/// The concurrency settings to use for a single orchestrated upload.
#[derive(Debug, Clone, Default)]
pub enum ConcurrencySetting {
    /// Use the default of 8 concurrent part uploads.
    #[default]
    Auto,

    /// Explicitly configured concurrency setting.
    Explicit(usize),
}

/// Checksum algorithms supported for part integrity verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecksumAlgorithm {
    /// CRC32
    Crc32,
    /// CRC32C
    #[serde(rename = "CRC32C")]
    Crc32C,
    /// CRC64NVME
    #[default]
    #[serde(rename = "CRC64NVME")]
    Crc64Nvme,
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
}

impl ChecksumAlgorithm {
    /// The wire name of the algorithm, as S3 spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Crc32 => "CRC32",
            ChecksumAlgorithm::Crc32C => "CRC32C",
            ChecksumAlgorithm::Crc64Nvme => "CRC64NVME",
            ChecksumAlgorithm::Sha1 => "SHA1",
            ChecksumAlgorithm::Sha256 => "SHA256",
        }
    }

    pub(crate) fn to_smithy(self) -> aws_smithy_checksums::ChecksumAlgorithm {
        match self {
            ChecksumAlgorithm::Crc32 => aws_smithy_checksums::ChecksumAlgorithm::Crc32,
            ChecksumAlgorithm::Crc32C => aws_smithy_checksums::ChecksumAlgorithm::Crc32c,
            ChecksumAlgorithm::Crc64Nvme => aws_smithy_checksums::ChecksumAlgorithm::Crc64Nvme,
            ChecksumAlgorithm::Sha1 => aws_smithy_checksums::ChecksumAlgorithm::Sha1,
            ChecksumAlgorithm::Sha256 => aws_smithy_checksums::ChecksumAlgorithm::Sha256,
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRC32" => Ok(ChecksumAlgorithm::Crc32),
            "CRC32C" => Ok(ChecksumAlgorithm::Crc32C),
            "CRC64NVME" => Ok(ChecksumAlgorithm::Crc64Nvme),
            "SHA1" => Ok(ChecksumAlgorithm::Sha1),
            "SHA256" => Ok(ChecksumAlgorithm::Sha256),
            other => Err(crate::error::invalid_argument(format!(
                "unsupported checksum algorithm `{other}`"
            ))),
        }
    }
}

impl From<ChecksumAlgorithm> for aws_sdk_s3::types::ChecksumAlgorithm {
    fn from(value: ChecksumAlgorithm) -> Self {
        match value {
            ChecksumAlgorithm::Crc32 => aws_sdk_s3::types::ChecksumAlgorithm::Crc32,
            ChecksumAlgorithm::Crc32C => aws_sdk_s3::types::ChecksumAlgorithm::Crc32C,
            ChecksumAlgorithm::Crc64Nvme => aws_sdk_s3::types::ChecksumAlgorithm::Crc64Nvme,
            ChecksumAlgorithm::Sha1 => aws_sdk_s3::types::ChecksumAlgorithm::Sha1,
            ChecksumAlgorithm::Sha256 => aws_sdk_s3::types::ChecksumAlgorithm::Sha256,
        }
    }
}

impl TryFrom<&aws_sdk_s3::types::ChecksumAlgorithm> for ChecksumAlgorithm {
    type Error = crate::error::Error;

    fn try_from(value: &aws_sdk_s3::types::ChecksumAlgorithm) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}

/// A part checksum: the algorithm and the base64 encoded digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartChecksum {
    algorithm: ChecksumAlgorithm,
    value: String,
}

impl PartChecksum {
    /// Create a checksum from an algorithm and a base64 encoded digest.
    pub fn new(algorithm: ChecksumAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }

    /// The algorithm used
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// The base64 encoded digest
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An open multipart upload session.
///
/// The session is a plain value: clone it, persist it, hand it to another process. It is
/// the only handle granting authority over the server-side upload, and losing it leaves
/// an orphaned upload behind (see [`Client::find_uploads`](crate::Client::find_uploads)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadSession {
    bucket: String,
    key: String,
    upload_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum_algorithm: Option<ChecksumAlgorithm>,
}

impl UploadSession {
    /// Create a session handle for an upload that already exists at the store.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        upload_id: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            upload_id: upload_id.into(),
            checksum_algorithm: None,
        }
    }

    /// Record the checksum algorithm the upload was initiated with.
    pub fn with_checksum_algorithm(mut self, algorithm: Option<ChecksumAlgorithm>) -> Self {
        self.checksum_algorithm = algorithm;
        self
    }

    /// The bucket the upload targets
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The key of the object being uploaded
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The store-assigned upload ID
    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    /// The checksum algorithm declared when the upload was initiated, if known
    pub fn checksum_algorithm(&self) -> Option<ChecksumAlgorithm> {
        self.checksum_algorithm
    }

    /// Fails with `InvalidArgument` if this handle could never have come from an initiate call.
    pub(crate) fn validate(&self) -> Result<(), crate::error::Error> {
        let missing = [
            ("bucket", &self.bucket),
            ("key", &self.key),
            ("upload_id", &self.upload_id),
        ]
        .into_iter()
        .find(|(_, v)| v.is_empty());

        match missing {
            Some((field, _)) => Err(crate::error::invalid_argument(format!(
                "upload session has an empty {field}; it was never initiated"
            ))
            .with_context(crate::error::ErrorContext::session(self))),
            None => Ok(()),
        }
    }
}

/// A successfully uploaded part, as acknowledged by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub(crate) part_number: u32,
    pub(crate) e_tag: String,
    pub(crate) checksum: PartChecksum,
    pub(crate) size: u64,
}

impl Part {
    /// The caller assigned part number
    pub fn part_number(&self) -> u32 {
        self.part_number
    }

    /// The store-assigned entity tag
    pub fn e_tag(&self) -> &str {
        &self.e_tag
    }

    /// The checksum the store verified the part against
    pub fn checksum(&self) -> &PartChecksum {
        &self.checksum
    }

    /// Size of the part in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// An entry of a completion manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    pub(crate) part_number: u32,
    pub(crate) e_tag: String,
    pub(crate) checksum: Option<PartChecksum>,
    pub(crate) size: Option<u64>,
}

impl CompletedPart {
    /// Create a manifest entry from a part number and the eTag the store returned for it.
    pub fn new(part_number: u32, e_tag: impl Into<String>) -> Self {
        Self {
            part_number,
            e_tag: e_tag.into(),
            checksum: None,
            size: None,
        }
    }

    /// Attach the checksum the part was uploaded with
    pub fn with_checksum(mut self, checksum: Option<PartChecksum>) -> Self {
        self.checksum = checksum;
        self
    }

    /// Attach the part size
    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    /// The part number
    pub fn part_number(&self) -> u32 {
        self.part_number
    }

    /// The entity tag
    pub fn e_tag(&self) -> &str {
        &self.e_tag
    }

    /// The part checksum, if known
    pub fn checksum(&self) -> Option<&PartChecksum> {
        self.checksum.as_ref()
    }

    /// The part size, if known
    pub fn size(&self) -> Option<u64> {
        self.size
    }
}

impl From<&Part> for CompletedPart {
    fn from(value: &Part) -> Self {
        CompletedPart::new(value.part_number, value.e_tag.clone())
            .with_checksum(Some(value.checksum.clone()))
            .with_size(Some(value.size))
    }
}

impl From<Part> for CompletedPart {
    fn from(value: Part) -> Self {
        CompletedPart {
            part_number: value.part_number,
            e_tag: value.e_tag,
            checksum: Some(value.checksum),
            size: Some(value.size),
        }
    }
}

impl From<PartSummary> for CompletedPart {
    fn from(value: PartSummary) -> Self {
        CompletedPart {
            part_number: value.part_number,
            e_tag: value.e_tag,
            checksum: value.checksum,
            size: Some(value.size),
        }
    }
}

/// An in-progress upload as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    bucket: String,
    key: String,
    upload_id: String,
    initiated: Option<SystemTime>,
    checksum_algorithm: Option<ChecksumAlgorithm>,
}

impl UploadSummary {
    /// Create a summary. Used by [`ObjectStore`](crate::store::ObjectStore) implementations.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        upload_id: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            upload_id: upload_id.into(),
            initiated: None,
            checksum_algorithm: None,
        }
    }

    /// Set when the upload was initiated
    pub fn with_initiated(mut self, initiated: Option<SystemTime>) -> Self {
        self.initiated = initiated;
        self
    }

    /// Set the checksum algorithm the upload was initiated with
    pub fn with_checksum_algorithm(mut self, algorithm: Option<ChecksumAlgorithm>) -> Self {
        self.checksum_algorithm = algorithm;
        self
    }

    /// The bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The object key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The upload ID
    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    /// When the upload was initiated, if the store reports it
    pub fn initiated(&self) -> Option<SystemTime> {
        self.initiated
    }

    /// The declared checksum algorithm, if the store reports it
    pub fn checksum_algorithm(&self) -> Option<ChecksumAlgorithm> {
        self.checksum_algorithm
    }

    /// Recover a session handle for this upload.
    pub fn session(&self) -> UploadSession {
        UploadSession::new(&self.bucket, &self.key, &self.upload_id)
            .with_checksum_algorithm(self.checksum_algorithm)
    }
}

/// An uploaded part as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSummary {
    part_number: u32,
    e_tag: String,
    size: u64,
    checksum: Option<PartChecksum>,
    last_modified: Option<SystemTime>,
}

impl PartSummary {
    /// Create a summary. Used by [`ObjectStore`](crate::store::ObjectStore) implementations.
    pub fn new(part_number: u32, e_tag: impl Into<String>, size: u64) -> Self {
        Self {
            part_number,
            e_tag: e_tag.into(),
            size,
            checksum: None,
            last_modified: None,
        }
    }

    /// Set the checksum the store recorded for the part
    pub fn with_checksum(mut self, checksum: Option<PartChecksum>) -> Self {
        self.checksum = checksum;
        self
    }

    /// Set when the part was last uploaded
    pub fn with_last_modified(mut self, last_modified: Option<SystemTime>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// The part number
    pub fn part_number(&self) -> u32 {
        self.part_number
    }

    /// The current eTag of the part
    pub fn e_tag(&self) -> &str {
        &self.e_tag
    }

    /// Part size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The part checksum, if the store reports it
    pub fn checksum(&self) -> Option<&PartChecksum> {
        self.checksum.as_ref()
    }

    /// When the part was last uploaded
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }
}

/// Continuation marker for listing in-progress uploads.
///
/// Treat this as opaque and pass it back verbatim to get the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadsMarker {
    key_marker: String,
    upload_id_marker: Option<String>,
}

impl UploadsMarker {
    /// Create a marker. Used by [`ObjectStore`](crate::store::ObjectStore) implementations.
    pub fn new(key_marker: impl Into<String>, upload_id_marker: Option<String>) -> Self {
        Self {
            key_marker: key_marker.into(),
            upload_id_marker,
        }
    }

    /// The key to continue after
    pub fn key_marker(&self) -> &str {
        &self.key_marker
    }

    /// The upload ID to continue after, within `key_marker`
    pub fn upload_id_marker(&self) -> Option<&str> {
        self.upload_id_marker.as_deref()
    }
}

/// Continuation marker for listing the parts of one session.
///
/// Treat this as opaque and pass it back verbatim to get the next page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartsMarker(String);

impl PartsMarker {
    /// Create a marker. Used by [`ObjectStore`](crate::store::ObjectStore) implementations.
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    /// The raw marker value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a server-side listing.
///
/// `is_truncated` is the only authoritative end-of-listing signal; a page can be empty
/// and still be followed by more results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage<T, M> {
    items: Vec<T>,
    common_prefixes: Vec<String>,
    is_truncated: bool,
    next_marker: Option<M>,
}

impl<T, M> ListingPage<T, M> {
    /// Create a page. Used by [`ObjectStore`](crate::store::ObjectStore) implementations.
    pub fn new(items: Vec<T>, is_truncated: bool, next_marker: Option<M>) -> Self {
        Self {
            items,
            common_prefixes: Vec::new(),
            is_truncated,
            next_marker,
        }
    }

    /// Attach the prefixes grouped by the listing delimiter
    pub fn with_common_prefixes(mut self, common_prefixes: Vec<String>) -> Self {
        self.common_prefixes = common_prefixes;
        self
    }

    /// The items on this page
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Key prefixes rolled up by the delimiter, if one was given
    pub fn common_prefixes(&self) -> &[String] {
        &self.common_prefixes
    }

    /// True if more results follow this page
    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    /// The marker to pass back for the next page
    pub fn next_marker(&self) -> Option<&M> {
        self.next_marker.as_ref()
    }
}

/// Identity of an object produced by completing an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentity {
    pub(crate) bucket: String,
    pub(crate) key: String,
    pub(crate) e_tag: Option<String>,
    pub(crate) version_id: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) checksum: Option<String>,
    pub(crate) size: Option<u64>,
}

impl ObjectIdentity {
    /// The bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The object key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The eTag of the assembled object
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// The version ID, if the bucket is versioned
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// The URI of the object, if the store reports one
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The object level checksum reported by the store
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// Total size of the object in bytes, if known
    pub fn size(&self) -> Option<u64> {
        self.size
    }
}

/// Policy for how to handle a failed multipart upload
///
/// Default is to abort the upload.
#[derive(Debug, Clone, Default)]
pub enum FailedMultipartUploadPolicy {
    /// Abort the upload on any individual part failure
    #[default]
    AbortUpload,
    /// Retain any uploaded parts. The session stays open and can be resumed later.
    Retain,
}

/// Describes the result of aborting an in-progress upload.
#[derive(Debug, Default)]
pub struct AbortedUpload {
    pub(crate) upload_id: Option<String>,
}

impl AbortedUpload {
    /// Get the multipart upload ID that was aborted
    ///
    /// Not present when there was nothing to abort, or the upload was retained
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChecksumAlgorithm, UploadSession, UploadsMarker};
    use crate::error::ErrorKind;

    #[test]
    fn test_checksum_algorithm_round_trips_through_sdk_names() {
        for algorithm in [
            ChecksumAlgorithm::Crc32,
            ChecksumAlgorithm::Crc32C,
            ChecksumAlgorithm::Crc64Nvme,
            ChecksumAlgorithm::Sha1,
            ChecksumAlgorithm::Sha256,
        ] {
            let sdk: aws_sdk_s3::types::ChecksumAlgorithm = algorithm.into();
            assert_eq!(algorithm, ChecksumAlgorithm::try_from(&sdk).unwrap());
        }
        assert_eq!(ChecksumAlgorithm::Crc32C, "crc32c".parse().unwrap());
        let err = "md5".parse::<ChecksumAlgorithm>().unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
    }

    #[test]
    fn test_session_validation() {
        assert!(UploadSession::new("b", "k", "U1").validate().is_ok());
        let err = UploadSession::new("b", "k", "").validate().unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
        assert_eq!(Some("b"), err.context().bucket_name());
    }

    #[test]
    fn test_session_survives_persisting() {
        let session = UploadSession::new("b", "videos/big.bin", "U1")
            .with_checksum_algorithm(Some(ChecksumAlgorithm::Crc32C));
        let json = serde_json::to_string(&session).unwrap();
        let restored: UploadSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, restored);

        let marker = UploadsMarker::new("videos/", Some("U7".to_owned()));
        let json = serde_json::to_string(&marker).unwrap();
        assert_eq!(
            marker,
            serde_json::from_str::<UploadsMarker>(&json).unwrap()
        );
    }
}
