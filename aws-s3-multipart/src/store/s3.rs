/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::SystemTime;

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types::{
    CompletedMultipartUpload, CompletedPart as SdkCompletedPart,
    ServerSideEncryption as SdkServerSideEncryption, StorageClass,
};
use aws_smithy_runtime_api::http::Response;
use tracing::Instrument;

use super::{
    CompleteUploadRequest, CompleteUploadResponse, CreateUploadRequest, ListPartsRequest,
    ListUploadsRequest, ObjectStore, UploadPartRequest, UploadPartResponse,
};
use crate::error::{Error, ErrorKind, TransportFailure};
use crate::types::{
    ChecksumAlgorithm, ListingPage, PartChecksum, PartSummary, PartsMarker, ServerSideEncryption,
    UploadSession, UploadSummary, UploadsMarker,
};

/// [`ObjectStore`] backed by the AWS SDK S3 client.
///
/// Works against Amazon S3 and S3-compatible stores. Signing, retries, and timeouts are
/// those configured on the wrapped client.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Wrap an S3 client
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// The wrapped S3 client
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

fn missing_field(operation: &str, field: &str) -> Error {
    Error::new(
        ErrorKind::Transport(TransportFailure::Response),
        format!("{operation} response is missing `{field}`"),
    )
}

/// Pick the checksum matching one of the `checksum_*` response fields
macro_rules! checksum_from {
    ($source:expr) => {{
        let source = $source;
        [
            (ChecksumAlgorithm::Crc32, source.checksum_crc32()),
            (ChecksumAlgorithm::Crc32C, source.checksum_crc32_c()),
            (ChecksumAlgorithm::Crc64Nvme, source.checksum_crc64_nvme()),
            (ChecksumAlgorithm::Sha1, source.checksum_sha1()),
            (ChecksumAlgorithm::Sha256, source.checksum_sha256()),
        ]
        .into_iter()
        .find_map(|(algorithm, value)| value.map(|v| PartChecksum::new(algorithm, v)))
    }};
}

fn to_system_time(value: Option<&aws_sdk_s3::primitives::DateTime>) -> Option<SystemTime> {
    value.and_then(|t| SystemTime::try_from(*t).ok())
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn create_multipart_upload(&self, request: CreateUploadRequest) -> Result<String, Error> {
        let options = request.options;
        let metadata = (!options.metadata.is_empty()).then_some(options.metadata);
        let mut req = self
            .client
            .create_multipart_upload()
            .bucket(request.bucket)
            .key(request.key)
            .set_content_type(options.content_type)
            .set_cache_control(options.cache_control)
            .set_content_disposition(options.content_disposition)
            .set_content_encoding(options.content_encoding)
            .set_content_language(options.content_language)
            .set_metadata(metadata)
            .set_storage_class(options.storage_class.as_deref().map(StorageClass::from))
            .set_tagging(options.tagging)
            .set_checksum_algorithm(request.checksum_algorithm.map(Into::into));

        req = match options.server_side_encryption {
            Some(ServerSideEncryption::S3) => {
                req.server_side_encryption(SdkServerSideEncryption::Aes256)
            }
            Some(ServerSideEncryption::Kms { key_id, context }) => req
                .server_side_encryption(SdkServerSideEncryption::AwsKms)
                .set_ssekms_key_id(key_id)
                .set_ssekms_encryption_context(context),
            Some(ServerSideEncryption::Customer(key)) => req
                .sse_customer_algorithm(key.algorithm())
                .sse_customer_key(key.key())
                .sse_customer_key_md5(key.key_md5()),
            None => req,
        };

        let resp = req
            .send()
            .instrument(tracing::debug_span!("send-create-multipart-upload"))
            .await?;

        resp.upload_id
            .ok_or_else(|| missing_field("CreateMultipartUpload", "UploadId"))
    }

    async fn upload_part(&self, request: UploadPartRequest) -> Result<UploadPartResponse, Error> {
        let session = &request.session;
        let content_length: i64 = request.content_length.try_into().map_err(|_| {
            crate::error::invalid_argument(format!(
                "content_length:{} is invalid.",
                request.content_length
            ))
        })?;
        let body = request.body.into_byte_stream().await?;
        let checksum = request.checksum;

        let mut req = self
            .client
            .upload_part()
            .bucket(session.bucket())
            .key(session.key())
            .upload_id(session.upload_id())
            .part_number(request.part_number as i32)
            .content_length(content_length)
            .checksum_algorithm(checksum.algorithm().into())
            .body(body);

        let value = checksum.value().to_owned();
        req = match checksum.algorithm() {
            ChecksumAlgorithm::Crc32 => req.checksum_crc32(value),
            ChecksumAlgorithm::Crc32C => req.checksum_crc32_c(value),
            ChecksumAlgorithm::Crc64Nvme => req.checksum_crc64_nvme(value),
            ChecksumAlgorithm::Sha1 => req.checksum_sha1(value),
            ChecksumAlgorithm::Sha256 => req.checksum_sha256(value),
        };

        if let Some(key) = &request.sse_customer_key {
            req = req
                .sse_customer_algorithm(key.algorithm())
                .sse_customer_key(key.key())
                .sse_customer_key_md5(key.key_md5());
        }

        let resp = req
            .send()
            .instrument(tracing::debug_span!(
                "send-upload-part",
                part_number = request.part_number
            ))
            .await?;

        let e_tag = resp
            .e_tag()
            .ok_or_else(|| missing_field("UploadPart", "ETag"))?
            .to_owned();
        let checksum = checksum_from!(&resp);
        Ok(UploadPartResponse { e_tag, checksum })
    }

    async fn complete_multipart_upload(
        &self,
        request: CompleteUploadRequest,
    ) -> Result<CompleteUploadResponse, Error> {
        let session = &request.session;
        let parts = request
            .manifest
            .parts()
            .iter()
            .map(|part| {
                let builder = SdkCompletedPart::builder()
                    .part_number(part.part_number() as i32)
                    .e_tag(part.e_tag());
                let builder = match part.checksum() {
                    None => builder,
                    Some(checksum) => {
                        let value = checksum.value().to_owned();
                        match checksum.algorithm() {
                            ChecksumAlgorithm::Crc32 => builder.checksum_crc32(value),
                            ChecksumAlgorithm::Crc32C => builder.checksum_crc32_c(value),
                            ChecksumAlgorithm::Crc64Nvme => builder.checksum_crc64_nvme(value),
                            ChecksumAlgorithm::Sha1 => builder.checksum_sha1(value),
                            ChecksumAlgorithm::Sha256 => builder.checksum_sha256(value),
                        }
                    }
                };
                builder.build()
            })
            .collect::<Vec<_>>();

        let mut req = self
            .client
            .complete_multipart_upload()
            .bucket(session.bucket())
            .key(session.key())
            .upload_id(session.upload_id())
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            );

        if let Some(key) = &request.sse_customer_key {
            req = req
                .sse_customer_algorithm(key.algorithm())
                .sse_customer_key(key.key())
                .sse_customer_key_md5(key.key_md5());
        }

        let resp = req
            .send()
            .instrument(tracing::debug_span!("send-complete-multipart-upload"))
            .await?;

        let checksum = checksum_from!(&resp).map(|c| c.value().to_owned());
        Ok(CompleteUploadResponse {
            checksum,
            e_tag: resp.e_tag,
            version_id: resp.version_id,
            location: resp.location,
            size: None,
        })
    }

    async fn abort_multipart_upload(&self, session: &UploadSession) -> Result<(), Error> {
        self.client
            .abort_multipart_upload()
            .bucket(session.bucket())
            .key(session.key())
            .upload_id(session.upload_id())
            .send()
            .instrument(tracing::debug_span!("send-abort-multipart-upload"))
            .await?;
        Ok(())
    }

    async fn list_multipart_uploads(
        &self,
        request: ListUploadsRequest,
    ) -> Result<ListingPage<UploadSummary, UploadsMarker>, Error> {
        let (key_marker, upload_id_marker) = match request.marker {
            Some(marker) => (
                Some(marker.key_marker().to_owned()),
                marker.upload_id_marker().map(str::to_owned),
            ),
            None => (None, None),
        };

        let resp = self
            .client
            .list_multipart_uploads()
            .bucket(&request.bucket)
            .set_prefix(request.prefix)
            .set_delimiter(request.delimiter)
            .set_key_marker(key_marker)
            .set_upload_id_marker(upload_id_marker)
            .max_uploads(request.max_uploads as i32)
            .send()
            .instrument(tracing::debug_span!("send-list-multipart-uploads"))
            .await?;

        let items = resp
            .uploads()
            .iter()
            .filter_map(|upload| {
                let summary =
                    UploadSummary::new(&request.bucket, upload.key()?, upload.upload_id()?)
                        .with_initiated(to_system_time(upload.initiated()))
                        .with_checksum_algorithm(
                            upload
                                .checksum_algorithm()
                                .and_then(|a| ChecksumAlgorithm::try_from(a).ok()),
                        );
                Some(summary)
            })
            .collect();

        let common_prefixes = resp
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_owned))
            .collect();

        let is_truncated = resp.is_truncated().unwrap_or(false);
        let next_marker = match resp.next_key_marker() {
            Some(key) if is_truncated && !key.is_empty() => Some(UploadsMarker::new(
                key,
                resp.next_upload_id_marker()
                    .filter(|id| !id.is_empty())
                    .map(str::to_owned),
            )),
            _ => None,
        };

        Ok(
            ListingPage::new(items, is_truncated, next_marker)
                .with_common_prefixes(common_prefixes),
        )
    }

    async fn list_parts(
        &self,
        request: ListPartsRequest,
    ) -> Result<ListingPage<PartSummary, PartsMarker>, Error> {
        let session = &request.session;
        let resp = self
            .client
            .list_parts()
            .bucket(session.bucket())
            .key(session.key())
            .upload_id(session.upload_id())
            .set_part_number_marker(request.marker.map(|m| m.as_str().to_owned()))
            .max_parts(request.max_parts as i32)
            .send()
            .instrument(tracing::debug_span!("send-list-parts"))
            .await?;

        let items = resp
            .parts()
            .iter()
            .filter_map(|part| {
                let part_number = u32::try_from(part.part_number()?).ok()?;
                let size = part
                    .size()
                    .and_then(|s| u64::try_from(s).ok())
                    .unwrap_or_default();
                let summary = PartSummary::new(part_number, part.e_tag()?, size)
                    .with_checksum(checksum_from!(part))
                    .with_last_modified(to_system_time(part.last_modified()));
                Some(summary)
            })
            .collect();

        let is_truncated = resp.is_truncated().unwrap_or(false);
        let next_marker = resp
            .next_part_number_marker()
            .filter(|m| is_truncated && !m.is_empty())
            .map(PartsMarker::new);

        Ok(ListingPage::new(items, is_truncated, next_marker))
    }
}

impl<E> From<SdkError<E, Response>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
{
    fn from(value: SdkError<E, Response>) -> Self {
        let status = value.raw_response().map(|r| r.status().as_u16());
        let code = value.code().map(str::to_owned);
        let kind = classify(&value, code.as_deref(), status);
        let err = Error::new(kind, value);
        match code {
            Some(code) => err.with_code(code),
            None => err,
        }
    }
}

fn classify<E, R>(err: &SdkError<E, R>, code: Option<&str>, status: Option<u16>) -> ErrorKind {
    match err {
        SdkError::ConstructionFailure(_) => ErrorKind::InvalidArgument,
        SdkError::TimeoutError(_) => ErrorKind::Transport(TransportFailure::Timeout),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            ErrorKind::Transport(TransportFailure::Timeout)
        }
        SdkError::DispatchFailure(_) => ErrorKind::Transport(TransportFailure::Dispatch),
        SdkError::ResponseError(_) => ErrorKind::Transport(TransportFailure::Response),
        SdkError::ServiceError(_) => match code {
            Some("NoSuchUpload") => ErrorKind::SessionClosed,
            Some(
                "BadDigest"
                | "InvalidDigest"
                | "XAmzContentChecksumMismatch"
                | "XAmzContentSHA256Mismatch",
            ) => ErrorKind::Integrity,
            Some("RequestTimeout") => ErrorKind::Transport(TransportFailure::Timeout),
            Some("SlowDown" | "ServiceUnavailable" | "InternalError" | "Throttling") => {
                ErrorKind::Transport(TransportFailure::Response)
            }
            _ if status.is_some_and(|s| s >= 500) => {
                ErrorKind::Transport(TransportFailure::Response)
            }
            _ => ErrorKind::StoreRejected,
        },
        _ => ErrorKind::Transport(TransportFailure::Other),
    }
}

/// S3 XML error response carrying `code`, for mocked clients
#[cfg(test)]
pub(crate) fn error_response(code: &str, status: u16) -> Response {
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;

    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Error><Code>{code}</Code><Message>{code}</Message><RequestId>R1</RequestId></Error>"
    );
    Response::new(StatusCode::try_from(status).unwrap(), SdkBody::from(body))
}

/// HTTP client that never touches the network, for mocked clients whose rules
/// return raw HTTP responses (the mock interceptor replaces this client's response)
#[cfg(test)]
pub(crate) fn stub_http_client() -> aws_smithy_runtime_api::client::http::SharedHttpClient {
    use aws_smithy_runtime_api::client::http::{
        HttpClient, HttpConnector, HttpConnectorFuture, HttpConnectorSettings, SharedHttpConnector,
    };
    use aws_smithy_runtime_api::client::orchestrator::HttpRequest;
    use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;

    #[derive(Debug, Clone)]
    struct Stub;

    impl HttpConnector for Stub {
        fn call(&self, _request: HttpRequest) -> HttpConnectorFuture {
            HttpConnectorFuture::ready(Ok(Response::new(
                StatusCode::try_from(200).unwrap(),
                SdkBody::empty(),
            )))
        }
    }

    impl HttpClient for Stub {
        fn http_connector(
            &self,
            _settings: &HttpConnectorSettings,
            _components: &RuntimeComponents,
        ) -> SharedHttpConnector {
            SharedHttpConnector::new(self.clone())
        }
    }

    aws_smithy_runtime_api::client::http::SharedHttpClient::new(Stub)
}
