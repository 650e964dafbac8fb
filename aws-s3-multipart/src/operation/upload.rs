/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;
mod output;

mod context;
mod handle;
mod service;

use std::cmp;
use std::sync::Arc;

use context::UploadContext;
pub use handle::UploadHandle;
/// Request type for uploading a whole body
pub use input::{UploadInput, UploadInputBuilder};
/// Response type for a completed upload
pub use output::UploadOutput;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::{self, Error, ErrorContext};
use crate::manifest::CompletionManifest;
use crate::operation::cancellable;
use crate::operation::complete::complete_upload;
use crate::operation::initiate::{InitiateUpload, InitiateUploadInput};

/// Operation struct for uploading a whole body
#[derive(Clone, Default, Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Validate the input and start the upload in the background
    pub(crate) fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: UploadInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<UploadHandle, Error> {
        let bucket = input.bucket.clone().unwrap_or_default();
        let key = input.key.clone().unwrap_or_default();
        if bucket.is_empty() || key.is_empty() {
            return Err(
                error::invalid_argument("bucket and key must both be non-empty")
                    .with_context(ErrorContext::object(&bucket, &key)),
            );
        }

        let content_length = input.body.content_length();
        let part_size = part_size(
            handle.upload_part_size_bytes(),
            content_length,
            handle.config.part_number_limit(),
        );
        tracing::debug!(content_length, part_size, "starting multipart upload");

        let ctx = UploadContext::new(
            handle,
            &bucket,
            &key,
            input.options.sse_customer_key().cloned(),
            input
                .failed_multipart_upload_policy
                .clone()
                .unwrap_or_default(),
        );
        // a child token, so aborting this upload leaves the caller's token alone
        let token = cancellation_token
            .map(|t| t.child_token())
            .unwrap_or_default();

        let task =
            tokio::spawn(
                drive(ctx.clone(), input, part_size, token.clone()).instrument(
                    tracing::debug_span!("upload", bucket = bucket.as_str(), key = key.as_str()),
                ),
            );
        Ok(UploadHandle::new(ctx, task, token))
    }
}

/// Smallest part size that is at least `target` and fits the body in `part_number_limit` parts
fn part_size(target: u64, content_length: u64, part_number_limit: u32) -> u64 {
    cmp::max(
        target,
        content_length.div_ceil(u64::from(part_number_limit.max(1))),
    )
}

/// Initiate, upload every part, then complete
async fn drive(
    ctx: UploadContext,
    input: UploadInput,
    part_size: u64,
    token: CancellationToken,
) -> Result<UploadOutput, Error> {
    let UploadInput {
        bucket,
        key,
        body,
        options,
        checksum_algorithm,
        ..
    } = input;

    let initiate = InitiateUploadInput {
        bucket,
        key,
        options,
        checksum_algorithm,
    };
    let session =
        InitiateUpload::orchestrate(ctx.handle.clone(), initiate, Some(token.clone())).await?;
    ctx.set_session(session.clone())?;

    let parts = service::upload_parts(&ctx, &session, body, part_size, &token).await?;
    let manifest = CompletionManifest::build(parts)?;

    tracing::trace!("completing multipart upload");
    let object = cancellable(
        Some(&token),
        complete_upload(
            &ctx.handle,
            session.clone(),
            manifest,
            ctx.sse_customer_key.clone(),
        ),
    )
    .await?;

    tracing::trace!("upload completed successfully");
    Ok(UploadOutput { session, object })
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use aws_sdk_s3::operation::abort_multipart_upload::AbortMultipartUploadOutput;
    use aws_sdk_s3::operation::complete_multipart_upload::CompleteMultipartUploadOutput;
    use aws_sdk_s3::operation::create_multipart_upload::CreateMultipartUploadOutput;
    use aws_sdk_s3::operation::upload_part::UploadPartOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use bytes::Bytes;

    use crate::error::ErrorKind;
    use crate::io::PartBody;
    use crate::store::s3::{error_response, stub_http_client};
    use crate::types::{ConcurrencySetting, FailedMultipartUploadPolicy};
    use crate::MEBIBYTE;

    fn test_client(client: aws_sdk_s3::Client, concurrency: usize) -> crate::Client {
        let config = crate::Config::builder()
            .concurrency(ConcurrencySetting::Explicit(concurrency))
            .set_target_part_size(crate::types::PartSize::Target(30))
            .client(client)
            .build()
            .unwrap();
        crate::Client::new(config)
    }

    #[test]
    fn test_part_size() {
        assert_eq!(8 * MEBIBYTE, super::part_size(8 * MEBIBYTE, 0, 10_000));
        assert_eq!(
            8 * MEBIBYTE,
            super::part_size(8 * MEBIBYTE, 100 * MEBIBYTE, 10_000)
        );
        // 100 GiB does not fit 10000 parts of 8 MiB
        let len = 100 * 1024 * MEBIBYTE;
        let size = super::part_size(8 * MEBIBYTE, len, 10_000);
        assert_eq!(len.div_ceil(10_000), size);
        assert!(len.div_ceil(size) <= 10_000);
    }

    #[tokio::test]
    async fn test_basic_mpu() {
        let body = Bytes::from_static(b"every adolescent dog goes bonkers early");

        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
            CreateMultipartUploadOutput::builder()
                .upload_id("test-upload")
                .build()
        });
        let upload_1 = mock!(aws_sdk_s3::Client::upload_part)
            .match_requests(|r| {
                r.upload_id() == Some("test-upload")
                    && r.part_number() == Some(1)
                    && r.content_length() == Some(30)
            })
            .then_output(|| UploadPartOutput::builder().e_tag("e1").build());
        let upload_2 = mock!(aws_sdk_s3::Client::upload_part)
            .match_requests(|r| r.part_number() == Some(2) && r.content_length() == Some(9))
            .then_output(|| UploadPartOutput::builder().e_tag("e2").build());
        let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload)
            .match_requests(|r| {
                let parts: Vec<_> = r
                    .multipart_upload()
                    .map(|m| {
                        m.parts()
                            .iter()
                            .map(|p| (p.part_number(), p.e_tag().map(str::to_owned)))
                            .collect()
                    })
                    .unwrap_or_default();
                r.upload_id() == Some("test-upload")
                    && parts
                        == vec![
                            (Some(1), Some("e1".to_owned())),
                            (Some(2), Some("e2".to_owned())),
                        ]
            })
            .then_output(|| {
                CompleteMultipartUploadOutput::builder()
                    .e_tag("test-e-tag")
                    .build()
            });

        let client = test_client(
            mock_client!(
                aws_sdk_s3,
                RuleMode::Sequential,
                &[&create_mpu, &upload_1, &upload_2, &complete_mpu]
            ),
            1,
        );

        let handle = client
            .upload()
            .bucket("test-bucket")
            .key("test-key")
            .body(PartBody::from(body))
            .initiate()
            .unwrap();

        let resp = handle.join().await.unwrap();
        assert_eq!("test-upload", resp.session().upload_id());
        assert_eq!(Some("test-e-tag"), resp.object().e_tag());
        assert_eq!(Some(39), resp.object().size());
    }

    #[tokio::test]
    async fn test_empty_body_uploads_one_part() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
            CreateMultipartUploadOutput::builder()
                .upload_id("U1")
                .build()
        });
        let upload = mock!(aws_sdk_s3::Client::upload_part)
            .match_requests(|r| r.part_number() == Some(1) && r.content_length() == Some(0))
            .then_output(|| UploadPartOutput::builder().e_tag("e1").build());
        let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload).then_output(|| {
            CompleteMultipartUploadOutput::builder()
                .e_tag("final")
                .build()
        });
        let client = test_client(
            mock_client!(
                aws_sdk_s3,
                RuleMode::Sequential,
                &[&create_mpu, &upload, &complete_mpu]
            ),
            4,
        );

        let output = client
            .upload()
            .bucket("b")
            .key("empty")
            .body(PartBody::from(Bytes::new()))
            .initiate()
            .unwrap()
            .join()
            .await
            .unwrap();
        assert_eq!(Some(0), output.object().size());
    }

    #[tokio::test]
    async fn test_failed_part_aborts_session() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
            CreateMultipartUploadOutput::builder()
                .upload_id("U1")
                .build()
        });
        let upload = mock!(aws_sdk_s3::Client::upload_part)
            .then_http_response(|| error_response("AccessDenied", 403));
        let aborted = Arc::new(Mutex::new(Vec::new()));
        let seen = aborted.clone();
        let abort = mock!(aws_sdk_s3::Client::abort_multipart_upload)
            .match_requests(move |r| {
                seen.lock().unwrap().push(r.upload_id().map(str::to_owned));
                true
            })
            .then_output(|| AbortMultipartUploadOutput::builder().build());
        let client = test_client(
            mock_client!(
                aws_sdk_s3,
                RuleMode::MatchAny,
                &[&create_mpu, &upload, &abort],
                |c| c.http_client(stub_http_client())
            ),
            1,
        );

        let err = client
            .upload()
            .bucket("b")
            .key("k")
            .body(PartBody::from_static(b"some bytes"))
            .initiate()
            .unwrap()
            .join()
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::StoreRejected, err.kind());
        assert_eq!(Some("U1"), err.context().upload_id());
        assert_eq!(Some(1), err.context().part_number());
        assert_eq!(vec![Some("U1".to_owned())], *aborted.lock().unwrap());
    }

    #[tokio::test]
    async fn test_failed_part_retains_session() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
            CreateMultipartUploadOutput::builder()
                .upload_id("U1")
                .build()
        });
        let upload = mock!(aws_sdk_s3::Client::upload_part)
            .then_http_response(|| error_response("AccessDenied", 403));
        // no abort rule: an abort call would fail to match
        let client = test_client(
            mock_client!(
                aws_sdk_s3,
                RuleMode::MatchAny,
                &[&create_mpu, &upload],
                |c| c.http_client(stub_http_client())
            ),
            2,
        );

        let err = client
            .upload()
            .bucket("b")
            .key("k")
            .body(PartBody::from_static(b"some bytes"))
            .failed_multipart_upload_policy(FailedMultipartUploadPolicy::Retain)
            .initiate()
            .unwrap()
            .join()
            .await
            .unwrap_err();
        assert_eq!(Some("U1"), err.context().upload_id());
        assert_eq!(Some("b"), err.context().bucket_name());
        assert_eq!(Some("k"), err.context().key());
    }

    #[tokio::test]
    async fn test_abort_before_initiate_completes() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
            CreateMultipartUploadOutput::builder()
                .upload_id("U1")
                .build()
        });
        let upload = mock!(aws_sdk_s3::Client::upload_part)
            .then_output(|| UploadPartOutput::builder().e_tag("e1").build());
        let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload)
            .then_output(|| CompleteMultipartUploadOutput::builder().build());
        let abort = mock!(aws_sdk_s3::Client::abort_multipart_upload)
            .then_output(|| AbortMultipartUploadOutput::builder().build());
        let client = test_client(
            mock_client!(
                aws_sdk_s3,
                RuleMode::MatchAny,
                &[&create_mpu, &upload, &complete_mpu, &abort]
            ),
            1,
        );

        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let mut handle = client
            .upload()
            .bucket("b")
            .key("k")
            .body(PartBody::from_static(b"some bytes"))
            .cancellation_token(token)
            .initiate()
            .unwrap();

        // cancelled before initiating, so there is no session to abort
        let aborted = handle.abort().await.unwrap();
        assert_eq!(None, aborted.upload_id());
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_spawning() {
        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[]), 1);
        let err = client
            .upload()
            .bucket("b")
            .key("")
            .body(PartBody::from_static(b"x"))
            .initiate()
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());

        let err = client.upload().bucket("b").key("k").initiate().unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
    }
}
