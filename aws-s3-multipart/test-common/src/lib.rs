/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Test utilities shared by the `aws-s3-multipart` integration tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use aws_s3_multipart::error::{Error, ErrorKind, TransportFailure};
use aws_s3_multipart::store::{
    CompleteUploadRequest, CompleteUploadResponse, CreateUploadRequest, ListPartsRequest,
    ListUploadsRequest, ObjectStore, UploadPartRequest, UploadPartResponse,
};
use aws_s3_multipart::types::{
    ChecksumAlgorithm, ListingPage, PartChecksum, PartSummary, PartsMarker, SseCustomerKey,
    UploadSession, UploadSummary, UploadsMarker,
};
use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

/// An [`ObjectStore`] that keeps everything in memory.
///
/// It enforces the same rules S3 does for the calls it models: part checksums are
/// verified, completion requires ascending parts whose eTags match what was stored, and
/// a completed or aborted upload is gone. Upload IDs are `U1`, `U2`, ... in initiation order.
///
/// Clones share the same state, so a test can hand one clone to a
/// [`Config`](aws_s3_multipart::Config) and inspect the store through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    max_page_size: Option<u32>,
    min_part_size: u64,
}

#[derive(Debug, Default)]
struct State {
    next_upload: u64,
    // ordered the way listings are: bucket, key, upload ID
    uploads: BTreeMap<(String, String, String), StoredUpload>,
    objects: HashMap<(String, String), Bytes>,
    failing_parts: HashSet<u32>,
}

#[derive(Debug)]
struct StoredUpload {
    checksum_algorithm: Option<ChecksumAlgorithm>,
    sse_customer_key: Option<SseCustomerKey>,
    initiated: SystemTime,
    parts: BTreeMap<u32, StoredPart>,
}

#[derive(Debug)]
struct StoredPart {
    e_tag: String,
    checksum: PartChecksum,
    data: Bytes,
    last_modified: SystemTime,
}

enum Entry {
    Upload { key: String, upload_id: String },
    Prefix(String),
}

impl Entry {
    fn marker(&self) -> UploadsMarker {
        match self {
            Entry::Upload { key, upload_id } => UploadsMarker::new(key, Some(upload_id.clone())),
            Entry::Prefix(prefix) => UploadsMarker::new(prefix, None),
        }
    }

    fn is_after(&self, marker: Option<&UploadsMarker>) -> bool {
        let Some(marker) = marker else {
            return true;
        };
        match (self, marker.upload_id_marker()) {
            (Entry::Upload { key, upload_id }, Some(id)) => {
                (key.as_str(), upload_id.as_str()) > (marker.key_marker(), id)
            }
            (Entry::Upload { key, .. }, None) => key.as_str() > marker.key_marker(),
            (Entry::Prefix(prefix), _) => prefix.as_str() > marker.key_marker(),
        }
    }
}

impl InMemoryStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Return at most `max_page_size` entries per listing page, whatever the request asks for
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = Some(max_page_size);
        self
    }

    /// Reject completion if any part but the last is smaller than `min_part_size`
    pub fn with_min_part_size(mut self, min_part_size: u64) -> Self {
        self.min_part_size = min_part_size;
        self
    }

    /// Fail every upload of `part_number` with a transport error
    pub async fn fail_part(&self, part_number: u32) {
        self.state.write().await.failing_parts.insert(part_number);
    }

    /// Stop failing injected parts
    pub async fn clear_failures(&self) {
        self.state.write().await.failing_parts.clear();
    }

    /// Contents of a completed object
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        let state = self.state.read().await;
        state
            .objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Number of uploads still in progress
    pub async fn upload_count(&self) -> usize {
        self.state.read().await.uploads.len()
    }

    fn page_size(&self, requested: u32) -> usize {
        let size = match self.max_page_size {
            Some(max) => requested.min(max),
            None => requested,
        };
        size.max(1) as usize
    }
}

fn upload_key(session: &UploadSession) -> (String, String, String) {
    (
        session.bucket().to_owned(),
        session.key().to_owned(),
        session.upload_id().to_owned(),
    )
}

fn no_such_upload(session: &UploadSession) -> Error {
    Error::new(
        ErrorKind::SessionClosed,
        format!("upload {} does not exist", session.upload_id()),
    )
    .with_code("NoSuchUpload")
}

fn rejected(code: &str, message: impl Into<String>) -> Error {
    Error::new(ErrorKind::StoreRejected, message.into()).with_code(code)
}

fn digest(algorithm: ChecksumAlgorithm, data: &[u8]) -> Result<String, Error> {
    let algorithm: aws_smithy_checksums::ChecksumAlgorithm = algorithm
        .as_str()
        .parse()
        .map_err(|e| Error::new(ErrorKind::InvalidArgument, e))?;
    let mut checksum = algorithm.into_impl();
    checksum.update(data);
    Ok(aws_smithy_types::base64::encode(checksum.finalize()))
}

fn check_sse(
    expected: Option<&SseCustomerKey>,
    provided: Option<&SseCustomerKey>,
) -> Result<(), Error> {
    if expected != provided {
        return Err(rejected(
            "InvalidRequest",
            "the customer provided key does not match the key the upload was initiated with",
        ));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn create_multipart_upload(&self, request: CreateUploadRequest) -> Result<String, Error> {
        let mut state = self.state.write().await;
        state.next_upload += 1;
        let upload_id = format!("U{}", state.next_upload);
        state.uploads.insert(
            (request.bucket, request.key, upload_id.clone()),
            StoredUpload {
                checksum_algorithm: request.checksum_algorithm,
                sse_customer_key: request.options.sse_customer_key().cloned(),
                initiated: SystemTime::now(),
                parts: BTreeMap::new(),
            },
        );
        Ok(upload_id)
    }

    async fn upload_part(&self, request: UploadPartRequest) -> Result<UploadPartResponse, Error> {
        // read before taking the lock
        let mut data = Vec::new();
        request
            .body
            .reader()
            .await?
            .read_to_end(&mut data)
            .await
            .map_err(|e| Error::new(ErrorKind::IOError, e))?;
        let data = Bytes::from(data);

        let mut state = self.state.write().await;
        if state.failing_parts.contains(&request.part_number) {
            return Err(Error::new(
                ErrorKind::Transport(TransportFailure::Dispatch),
                format!("injected failure for part {}", request.part_number),
            ));
        }
        let upload = state
            .uploads
            .get_mut(&upload_key(&request.session))
            .ok_or_else(|| no_such_upload(&request.session))?;

        check_sse(
            upload.sse_customer_key.as_ref(),
            request.sse_customer_key.as_ref(),
        )?;
        if data.len() as u64 != request.content_length {
            return Err(rejected(
                "IncompleteBody",
                format!(
                    "declared {} bytes but received {}",
                    request.content_length,
                    data.len()
                ),
            ));
        }
        if let Some(declared) = upload.checksum_algorithm {
            if declared != request.checksum.algorithm() {
                return Err(rejected(
                    "InvalidRequest",
                    format!(
                        "upload was initiated with {declared} but part carries {}",
                        request.checksum.algorithm()
                    ),
                ));
            }
        }
        let actual = digest(request.checksum.algorithm(), &data)?;
        if actual != request.checksum.value() {
            return Err(Error::new(
                ErrorKind::Integrity,
                format!(
                    "computed {actual} but the request declared {}",
                    request.checksum.value()
                ),
            )
            .with_code("BadDigest"));
        }

        let e_tag = format!("\"{:x}\"", md5::compute(&data));
        upload.parts.insert(
            request.part_number,
            StoredPart {
                e_tag: e_tag.clone(),
                checksum: request.checksum.clone(),
                data,
                last_modified: SystemTime::now(),
            },
        );
        Ok(UploadPartResponse {
            e_tag,
            checksum: Some(request.checksum),
        })
    }

    async fn complete_multipart_upload(
        &self,
        request: CompleteUploadRequest,
    ) -> Result<CompleteUploadResponse, Error> {
        let mut state = self.state.write().await;
        let key = upload_key(&request.session);
        let upload = state
            .uploads
            .get(&key)
            .ok_or_else(|| no_such_upload(&request.session))?;
        check_sse(
            upload.sse_customer_key.as_ref(),
            request.sse_customer_key.as_ref(),
        )?;

        let parts = request.manifest.parts();
        if parts.is_empty() {
            return Err(rejected("MalformedXML", "no parts were listed"));
        }
        if parts
            .windows(2)
            .any(|w| w[0].part_number() >= w[1].part_number())
        {
            return Err(rejected(
                "InvalidPartOrder",
                "parts must be listed in ascending order",
            ));
        }

        let mut body = Vec::new();
        let mut part_md5s = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            let stored = upload
                .parts
                .get(&part.part_number())
                .filter(|stored| stored.e_tag == part.e_tag())
                .ok_or_else(|| {
                    rejected(
                        "InvalidPart",
                        format!(
                            "part {} was not found or its eTag does not match",
                            part.part_number()
                        ),
                    )
                })?;
            if let Some(checksum) = part.checksum() {
                if checksum != &stored.checksum {
                    return Err(rejected(
                        "InvalidPart",
                        format!("part {} checksum does not match", part.part_number()),
                    ));
                }
            }
            let is_last = i + 1 == parts.len();
            if !is_last && (stored.data.len() as u64) < self.min_part_size {
                return Err(rejected(
                    "EntityTooSmall",
                    format!("part {} is smaller than the minimum", part.part_number()),
                ));
            }
            body.extend_from_slice(&stored.data);
            part_md5s.extend_from_slice(&md5::compute(&stored.data).0);
        }

        let e_tag = format!("\"{:x}-{}\"", md5::compute(&part_md5s), parts.len());
        let size = body.len() as u64;
        let (bucket, object_key, _) = key.clone();
        state.uploads.remove(&key);
        state.objects.insert((bucket, object_key), Bytes::from(body));

        Ok(CompleteUploadResponse {
            e_tag: Some(e_tag),
            size: Some(size),
            ..Default::default()
        })
    }

    async fn abort_multipart_upload(&self, session: &UploadSession) -> Result<(), Error> {
        let mut state = self.state.write().await;
        state
            .uploads
            .remove(&upload_key(session))
            .map(|_| ())
            .ok_or_else(|| no_such_upload(session))
    }

    async fn list_multipart_uploads(
        &self,
        request: ListUploadsRequest,
    ) -> Result<ListingPage<UploadSummary, UploadsMarker>, Error> {
        let state = self.state.read().await;
        let prefix = request.prefix.unwrap_or_default();
        let page_size = self.page_size(request.max_uploads);

        let mut uploads = Vec::new();
        let mut common_prefixes: Vec<String> = Vec::new();
        let mut last: Option<Entry> = None;
        let mut is_truncated = false;

        let start = (request.bucket.clone(), String::new(), String::new());
        for ((bucket, key, upload_id), upload) in
            state.uploads.range((Bound::Included(start), Bound::Unbounded))
        {
            if bucket != &request.bucket {
                break;
            }
            if !key.starts_with(&prefix) {
                continue;
            }
            let entry = match &request.delimiter {
                Some(delimiter) if !delimiter.is_empty() => {
                    match key[prefix.len()..].find(delimiter.as_str()) {
                        Some(pos) => {
                            Entry::Prefix(key[..prefix.len() + pos + delimiter.len()].to_owned())
                        }
                        None => Entry::Upload {
                            key: key.clone(),
                            upload_id: upload_id.clone(),
                        },
                    }
                }
                _ => Entry::Upload {
                    key: key.clone(),
                    upload_id: upload_id.clone(),
                },
            };
            if !entry.is_after(request.marker.as_ref()) {
                continue;
            }
            if let Entry::Prefix(p) = &entry {
                if common_prefixes.last() == Some(p) {
                    continue;
                }
            }
            if uploads.len() + common_prefixes.len() == page_size {
                is_truncated = true;
                break;
            }
            match &entry {
                Entry::Upload { .. } => uploads.push(
                    UploadSummary::new(bucket, key, upload_id)
                        .with_initiated(Some(upload.initiated))
                        .with_checksum_algorithm(upload.checksum_algorithm),
                ),
                Entry::Prefix(p) => common_prefixes.push(p.clone()),
            }
            last = Some(entry);
        }

        let next_marker = if is_truncated {
            last.map(|entry| entry.marker())
        } else {
            None
        };
        Ok(ListingPage::new(uploads, is_truncated, next_marker)
            .with_common_prefixes(common_prefixes))
    }

    async fn list_parts(
        &self,
        request: ListPartsRequest,
    ) -> Result<ListingPage<PartSummary, PartsMarker>, Error> {
        let state = self.state.read().await;
        let upload = state
            .uploads
            .get(&upload_key(&request.session))
            .ok_or_else(|| no_such_upload(&request.session))?;

        let after = match &request.marker {
            Some(marker) => marker.as_str().parse::<u32>().map_err(|_| {
                rejected(
                    "InvalidArgument",
                    format!("invalid part number marker {}", marker.as_str()),
                )
            })?,
            None => 0,
        };
        let page_size = self.page_size(request.max_parts);

        let mut remaining = upload
            .parts
            .range((Bound::Excluded(after), Bound::Unbounded))
            .peekable();
        let mut parts = Vec::new();
        while parts.len() < page_size {
            let Some((number, part)) = remaining.next() else {
                break;
            };
            parts.push(
                PartSummary::new(*number, &part.e_tag, part.data.len() as u64)
                    .with_checksum(Some(part.checksum.clone()))
                    .with_last_modified(Some(part.last_modified)),
            );
        }
        let is_truncated = remaining.peek().is_some();
        let next_marker = if is_truncated {
            parts
                .last()
                .map(|p| PartsMarker::new(p.part_number().to_string()))
        } else {
            None
        };
        Ok(ListingPage::new(parts, is_truncated, next_marker))
    }
}
