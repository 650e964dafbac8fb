/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use futures_util::{StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;

pub use input::{
    AbortIncompleteUploadsInput, AbortIncompleteUploadsInputBuilder, FindUploadsInput,
    FindUploadsInputBuilder, ResumeUploadInput, ResumeUploadInputBuilder,
};

use crate::error::{self, Error, ErrorContext};
use crate::manifest::CompletionManifest;
use crate::operation::abort::abort_upload;
use crate::operation::cancellable;
use crate::operation::list_parts::{ListParts, ListPartsInput};
use crate::operation::list_uploads::{ListUploads, ListUploadsInput};
use crate::types::{PartSummary, UploadSession, UploadSummary};

/// Operation struct for finding the in-progress uploads of one key
#[derive(Clone, Default, Debug)]
pub(crate) struct FindUploads;

impl FindUploads {
    #[tracing::instrument(skip_all, level = "debug", name = "find-uploads")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: FindUploadsInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<Vec<UploadSummary>, Error> {
        let FindUploadsInput { bucket, key } = input;
        if key.is_empty() {
            return Err(error::invalid_argument("key must not be empty")
                .with_context(ErrorContext::object(&bucket, &key)));
        }

        let listing = ListUploadsInput {
            bucket: Some(bucket),
            prefix: Some(key.clone()),
            delimiter: None,
            marker: None,
            max_uploads: None,
        };
        let uploads = ListUploads::paginator(handle, listing, cancellation_token)?
            .try_collect_items()
            .await?;

        // the prefix also matches longer keys
        let found: Vec<_> = uploads.into_iter().filter(|u| u.key() == key).collect();
        tracing::debug!(found = found.len(), "found in-progress uploads");
        Ok(found)
    }
}

/// An upload session together with the parts the store already holds for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumedUpload {
    session: UploadSession,
    parts: Vec<PartSummary>,
}

impl ResumedUpload {
    /// The resumed session.
    ///
    /// If the session did not record a checksum algorithm, it is taken from the stored parts.
    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// Parts the store acknowledged, in the order it listed them
    pub fn parts(&self) -> &[PartSummary] {
        &self.parts
    }

    /// Build a completion manifest from the stored parts.
    ///
    /// Fails with `InvalidArgument` if no parts are stored yet.
    pub fn manifest(&self) -> Result<CompletionManifest, Error> {
        CompletionManifest::build(self.parts.iter().cloned())
            .map_err(error::with_context(ErrorContext::session(&self.session)))
    }

    /// Part numbers in `expected` that the store does not hold
    pub fn missing_parts(&self, expected: RangeInclusive<u32>) -> Vec<u32> {
        let stored: HashSet<u32> = self.parts.iter().map(PartSummary::part_number).collect();
        expected.filter(|n| !stored.contains(n)).collect()
    }

    /// Consume this, returning the session and its stored parts
    pub fn into_parts(self) -> (UploadSession, Vec<PartSummary>) {
        (self.session, self.parts)
    }
}

/// Operation struct for resuming an upload session
#[derive(Clone, Default, Debug)]
pub(crate) struct ResumeUpload;

impl ResumeUpload {
    #[tracing::instrument(skip_all, level = "debug", name = "resume-upload")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: ResumeUploadInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<ResumedUpload, Error> {
        let session = input.session;
        let listing = ListPartsInput {
            session: session.clone(),
            marker: None,
            max_parts: None,
        };
        let parts = ListParts::paginator(handle, listing, cancellation_token)?
            .try_collect_items()
            .await?;

        let algorithm = session.checksum_algorithm().or_else(|| {
            parts
                .iter()
                .find_map(|p| p.checksum())
                .map(|c| c.algorithm())
        });
        tracing::debug!(
            upload_id = session.upload_id(),
            parts = parts.len(),
            "resumed multipart upload"
        );
        Ok(ResumedUpload {
            session: session.with_checksum_algorithm(algorithm),
            parts,
        })
    }
}

/// Operation struct for aborting stale in-progress uploads
#[derive(Clone, Default, Debug)]
pub(crate) struct AbortIncompleteUploads;

impl AbortIncompleteUploads {
    #[tracing::instrument(skip_all, level = "debug", name = "abort-incomplete-uploads")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: AbortIncompleteUploadsInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<Vec<UploadSession>, Error> {
        let listing = ListUploadsInput {
            bucket: Some(input.bucket),
            prefix: input.prefix,
            delimiter: None,
            marker: None,
            max_uploads: None,
        };
        let uploads = ListUploads::paginator(handle.clone(), listing, cancellation_token.clone())?
            .try_collect_items()
            .await?;

        let initiated_before = input.initiated_before;
        let stale = uploads.into_iter().filter(|upload| match initiated_before {
            None => true,
            Some(cutoff) => upload.initiated().is_some_and(|t| t < cutoff),
        });

        let handle = &handle;
        let token = cancellation_token.as_ref();
        let aborted: Vec<UploadSession> = futures_util::stream::iter(stale)
            .map(|upload| async move {
                let session = upload.session();
                cancellable(token, abort_upload(handle, &session))
                    .await
                    .map_err(error::with_context(ErrorContext::session(&session)))?;
                Ok::<_, Error>(session)
            })
            .buffer_unordered(handle.num_workers())
            .try_collect()
            .await?;

        tracing::debug!(aborted = aborted.len(), "aborted incomplete uploads");
        Ok(aborted)
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use aws_sdk_s3::operation::abort_multipart_upload::AbortMultipartUploadOutput;
    use aws_sdk_s3::operation::list_multipart_uploads::ListMultipartUploadsOutput;
    use aws_sdk_s3::operation::list_parts::ListPartsOutput;
    use aws_sdk_s3::types::{MultipartUpload, Part};
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use aws_smithy_types::DateTime;

    use crate::error::ErrorKind;
    use crate::types::{ChecksumAlgorithm, PartSummary, UploadSession};

    use super::ResumedUpload;

    fn test_client(client: aws_sdk_s3::Client) -> crate::Client {
        let config = crate::Config::builder().client(client).build().unwrap();
        crate::Client::new(config)
    }

    fn upload(key: &str, id: &str, initiated_secs: i64) -> MultipartUpload {
        MultipartUpload::builder()
            .key(key)
            .upload_id(id)
            .initiated(DateTime::from_secs(initiated_secs))
            .build()
    }

    #[tokio::test]
    async fn test_find_uploads_exact_key_only() {
        let list = mock!(aws_sdk_s3::Client::list_multipart_uploads)
            .match_requests(|r| r.prefix() == Some("data.bin") && r.delimiter().is_none())
            .then_output(|| {
                ListMultipartUploadsOutput::builder()
                    .uploads(upload("data.bin", "U1", 10))
                    .uploads(upload("data.bin.bak", "U2", 10))
                    .uploads(upload("data.bin", "U3", 20))
                    .is_truncated(false)
                    .build()
            });
        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&list]));

        let found = client
            .find_uploads()
            .bucket("b")
            .key("data.bin")
            .send()
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|u| u.upload_id()).collect();
        assert_eq!(vec!["U1", "U3"], ids);
        assert_eq!(
            UploadSession::new("b", "data.bin", "U1"),
            found[0].session()
        );
    }

    #[tokio::test]
    async fn test_find_uploads_empty_key() {
        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[]));
        let err = client
            .find_uploads()
            .bucket("b")
            .key("")
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
    }

    #[tokio::test]
    async fn test_resume_upload() {
        let list = mock!(aws_sdk_s3::Client::list_parts)
            .match_requests(|r| r.upload_id() == Some("U1"))
            .then_output(|| {
                ListPartsOutput::builder()
                    .parts(
                        Part::builder()
                            .part_number(1)
                            .e_tag("e1")
                            .size(10)
                            .checksum_crc32("AAAAAA==")
                            .build(),
                    )
                    .parts(
                        Part::builder()
                            .part_number(3)
                            .e_tag("e3")
                            .size(4)
                            .checksum_crc32("AAAAAB==")
                            .build(),
                    )
                    .is_truncated(false)
                    .build()
            });
        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&list]));

        let resumed = client
            .resume_upload()
            .session(UploadSession::new("b", "k", "U1"))
            .send()
            .await
            .unwrap();

        assert_eq!(
            Some(ChecksumAlgorithm::Crc32),
            resumed.session().checksum_algorithm()
        );
        assert_eq!(vec![2, 4], resumed.missing_parts(1..=4));
        let manifest = resumed.manifest().unwrap();
        assert_eq!(2, manifest.len());
        assert_eq!(Some(14), manifest.total_size());
    }

    #[test]
    fn test_resumed_upload_without_parts() {
        let resumed = ResumedUpload {
            session: UploadSession::new("b", "k", "U1"),
            parts: Vec::new(),
        };
        assert_eq!(vec![1, 2], resumed.missing_parts(1..=2));
        let err = resumed.manifest().unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
        assert_eq!(Some("U1"), err.context().upload_id());

        let resumed = ResumedUpload {
            session: UploadSession::new("b", "k", "U1"),
            parts: vec![PartSummary::new(1, "e1", 3)],
        };
        assert!(resumed.missing_parts(1..=1).is_empty());
    }

    #[tokio::test]
    async fn test_abort_incomplete_uploads_before_cutoff() {
        let list = mock!(aws_sdk_s3::Client::list_multipart_uploads)
            .match_requests(|r| r.prefix() == Some("tmp/"))
            .then_output(|| {
                ListMultipartUploadsOutput::builder()
                    .uploads(upload("tmp/a", "U1", 100))
                    .uploads(upload("tmp/b", "U2", 300))
                    .uploads(upload("tmp/c", "U3", 150))
                    .is_truncated(false)
                    .build()
            });
        let abort = mock!(aws_sdk_s3::Client::abort_multipart_upload)
            .match_requests(|r| r.upload_id() != Some("U2"))
            .then_output(|| AbortMultipartUploadOutput::builder().build());
        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::MatchAny,
            &[&list, &abort]
        ));

        let cutoff = SystemTime::UNIX_EPOCH + Duration::from_secs(200);
        let mut aborted = client
            .abort_incomplete_uploads()
            .bucket("b")
            .prefix("tmp/")
            .initiated_before(cutoff)
            .send()
            .await
            .unwrap();
        aborted.sort_by(|a, b| a.upload_id().cmp(b.upload_id()));

        let ids: Vec<_> = aborted.iter().map(|s| s.upload_id()).collect();
        assert_eq!(vec!["U1", "U3"], ids);
    }

    #[tokio::test]
    async fn test_abort_incomplete_uploads_cancelled() {
        let list = mock!(aws_sdk_s3::Client::list_multipart_uploads).then_output(|| {
            ListMultipartUploadsOutput::builder()
                .is_truncated(false)
                .build()
        });
        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&list]));

        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let err = client
            .abort_incomplete_uploads()
            .bucket("b")
            .cancellation_token(token)
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::OperationCancelled, err.kind());
    }
}
