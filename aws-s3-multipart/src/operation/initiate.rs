/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Request type for starting an upload session
pub use input::{InitiateUploadInput, InitiateUploadInputBuilder};

use crate::error::{self, Error, ErrorContext, ErrorKind, TransportFailure};
use crate::operation::cancellable;
use crate::store::CreateUploadRequest;
use crate::types::UploadSession;

/// Operation struct for starting an upload session
#[derive(Clone, Default, Debug)]
pub(crate) struct InitiateUpload;

impl InitiateUpload {
    /// Execute a single `InitiateUpload` operation
    #[tracing::instrument(skip_all, level = "debug", name = "initiate-upload")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: InitiateUploadInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<UploadSession, Error> {
        let bucket = input.bucket.unwrap_or_default();
        let key = input.key.unwrap_or_default();
        let ctx = ErrorContext::object(&bucket, &key);
        if bucket.is_empty() || key.is_empty() {
            return Err(
                error::invalid_argument("bucket and key must both be non-empty").with_context(ctx),
            );
        }

        let algorithm = input
            .checksum_algorithm
            .unwrap_or_else(|| handle.config.checksum_algorithm());
        let request = CreateUploadRequest {
            bucket: bucket.clone(),
            key: key.clone(),
            options: input.options,
            checksum_algorithm: Some(algorithm),
        };

        let upload_id = cancellable(
            cancellation_token.as_ref(),
            handle.store().create_multipart_upload(request),
        )
        .await
        .map_err(error::with_context(ctx.clone()))?;

        if upload_id.is_empty() {
            return Err(Error::new(
                ErrorKind::Transport(TransportFailure::Response),
                "store returned an empty upload ID",
            )
            .with_context(ctx));
        }

        tracing::debug!(upload_id, "multipart upload initiated");
        Ok(UploadSession::new(bucket, key, upload_id).with_checksum_algorithm(Some(algorithm)))
    }
}

#[cfg(test)]
mod test {
    use aws_sdk_s3::operation::create_multipart_upload::CreateMultipartUploadOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};

    use crate::error::ErrorKind;
    use crate::store::s3::{error_response, stub_http_client};
    use crate::types::{ChecksumAlgorithm, UploadOptions};

    fn test_client(client: aws_sdk_s3::Client) -> crate::Client {
        let config = crate::Config::builder().client(client).build().unwrap();
        crate::Client::new(config)
    }

    #[tokio::test]
    async fn test_initiate_returns_session() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload)
            .match_requests(|r| {
                r.bucket() == Some("b")
                    && r.key() == Some("big.bin")
                    && r.checksum_algorithm()
                        == Some(&aws_sdk_s3::types::ChecksumAlgorithm::Crc64Nvme)
                    && r.cache_control() == Some("no-cache")
            })
            .then_output(|| {
                CreateMultipartUploadOutput::builder()
                    .upload_id("U1")
                    .build()
            });
        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&create_mpu]
        ));

        let session = client
            .initiate_upload()
            .bucket("b")
            .key("big.bin")
            .options(UploadOptions::from_headers([
                ("Cache-Control", "no-cache"),
                ("x-unknown", "ignored"),
            ]))
            .send()
            .await
            .unwrap();

        assert_eq!("b", session.bucket());
        assert_eq!("big.bin", session.key());
        assert_eq!("U1", session.upload_id());
        assert_eq!(
            Some(ChecksumAlgorithm::Crc64Nvme),
            session.checksum_algorithm()
        );
    }

    #[tokio::test]
    async fn test_initiate_checksum_override() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload)
            .match_requests(|r| {
                r.checksum_algorithm() == Some(&aws_sdk_s3::types::ChecksumAlgorithm::Sha256)
            })
            .then_output(|| {
                CreateMultipartUploadOutput::builder()
                    .upload_id("U2")
                    .build()
            });
        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&create_mpu]
        ));

        let session = client
            .initiate_upload()
            .bucket("b")
            .key("k")
            .checksum_algorithm(ChecksumAlgorithm::Sha256)
            .send()
            .await
            .unwrap();
        assert_eq!(
            Some(ChecksumAlgorithm::Sha256),
            session.checksum_algorithm()
        );
    }

    #[tokio::test]
    async fn test_initiate_rejects_empty_names_locally() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
            CreateMultipartUploadOutput::builder()
                .upload_id("U1")
                .build()
        });
        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&create_mpu]
        ));

        let err = client
            .initiate_upload()
            .bucket("")
            .key("k")
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());

        let err = client
            .initiate_upload()
            .bucket("b")
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
        assert_eq!(0, create_mpu.num_calls());
    }

    #[tokio::test]
    async fn test_initiate_store_failure_has_context() {
        let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload)
            .then_http_response(|| error_response("NoSuchBucket", 404));
        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&create_mpu],
            |c| c.http_client(stub_http_client())
        ));

        let err = client
            .initiate_upload()
            .bucket("missing")
            .key("k")
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::StoreRejected, err.kind());
        assert_eq!(Some("NoSuchBucket"), err.code());
        assert_eq!(Some("missing"), err.context().bucket_name());
        assert_eq!(Some("k"), err.context().key());
    }
}
