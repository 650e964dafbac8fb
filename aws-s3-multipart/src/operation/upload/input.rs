/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::io::PartBody;
use crate::types::{ChecksumAlgorithm, FailedMultipartUploadPolicy, UploadOptions};

/// Input type for uploading a whole body as one object
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct UploadInput {
    /// The bucket to upload to
    pub bucket: Option<String>,

    /// The key of the object to create
    pub key: Option<String>,

    /// The object contents
    pub body: PartBody,

    /// Options applied to the assembled object
    pub options: UploadOptions,

    /// Checksum algorithm for every part, overriding the client default
    pub checksum_algorithm: Option<ChecksumAlgorithm>,

    /// What happens to the upload session when a part fails
    pub failed_multipart_upload_policy: Option<FailedMultipartUploadPolicy>,
}

impl UploadInput {
    /// Creates a new builder-style object to manufacture [`UploadInput`](crate::operation::upload::UploadInput).
    pub fn builder() -> UploadInputBuilder {
        UploadInputBuilder::default()
    }

    /// The bucket to upload to
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The key of the object to create
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The object contents
    pub fn body(&self) -> &PartBody {
        &self.body
    }

    /// Options applied to the assembled object
    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Checksum algorithm override
    pub fn checksum_algorithm(&self) -> Option<ChecksumAlgorithm> {
        self.checksum_algorithm
    }

    /// What happens to the upload session when a part fails
    pub fn failed_multipart_upload_policy(&self) -> Option<&FailedMultipartUploadPolicy> {
        self.failed_multipart_upload_policy.as_ref()
    }
}

/// A builder for [`UploadInput`](crate::operation::upload::UploadInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct UploadInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) body: Option<PartBody>,
    pub(crate) options: Option<UploadOptions>,
    pub(crate) checksum_algorithm: Option<ChecksumAlgorithm>,
    pub(crate) failed_multipart_upload_policy: Option<FailedMultipartUploadPolicy>,
}

impl UploadInputBuilder {
    /// The bucket to upload to
    ///
    /// NOTE: A bucket name is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The bucket to upload to
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The bucket to upload to
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// The key of the object to create
    ///
    /// NOTE: A key is required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// The key of the object to create
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.key = input;
        self
    }

    /// The key of the object to create
    pub fn get_key(&self) -> &Option<String> {
        &self.key
    }

    /// The object contents
    ///
    /// NOTE: A body is required. An empty body uploads a single empty part.
    pub fn body(mut self, input: PartBody) -> Self {
        self.body = Some(input);
        self
    }

    /// The object contents
    pub fn set_body(mut self, input: Option<PartBody>) -> Self {
        self.body = input;
        self
    }

    /// The object contents
    pub fn get_body(&self) -> &Option<PartBody> {
        &self.body
    }

    /// Options applied to the assembled object
    pub fn options(mut self, input: UploadOptions) -> Self {
        self.options = Some(input);
        self
    }

    /// Options applied to the assembled object
    pub fn set_options(mut self, input: Option<UploadOptions>) -> Self {
        self.options = input;
        self
    }

    /// Options applied to the assembled object
    pub fn get_options(&self) -> &Option<UploadOptions> {
        &self.options
    }

    /// Checksum algorithm for every part, overriding the client default
    pub fn checksum_algorithm(mut self, input: ChecksumAlgorithm) -> Self {
        self.checksum_algorithm = Some(input);
        self
    }

    /// Checksum algorithm for every part, overriding the client default
    pub fn set_checksum_algorithm(mut self, input: Option<ChecksumAlgorithm>) -> Self {
        self.checksum_algorithm = input;
        self
    }

    /// Checksum algorithm override
    pub fn get_checksum_algorithm(&self) -> &Option<ChecksumAlgorithm> {
        &self.checksum_algorithm
    }

    /// What happens to the upload session when a part fails.
    ///
    /// Defaults to aborting the session.
    pub fn failed_multipart_upload_policy(mut self, input: FailedMultipartUploadPolicy) -> Self {
        self.failed_multipart_upload_policy = Some(input);
        self
    }

    /// What happens to the upload session when a part fails
    pub fn set_failed_multipart_upload_policy(
        mut self,
        input: Option<FailedMultipartUploadPolicy>,
    ) -> Self {
        self.failed_multipart_upload_policy = input;
        self
    }

    /// What happens to the upload session when a part fails
    pub fn get_failed_multipart_upload_policy(&self) -> &Option<FailedMultipartUploadPolicy> {
        &self.failed_multipart_upload_policy
    }

    /// Consumes the builder and constructs a [`UploadInput`](crate::operation::upload::UploadInput).
    pub fn build(self) -> Result<UploadInput, BuildError> {
        if self.bucket.is_none() {
            return Err(BuildError::missing_field("bucket", "A bucket is required"));
        }
        if self.key.is_none() {
            return Err(BuildError::missing_field("key", "A key is required"));
        }
        let body = self
            .body
            .ok_or_else(|| BuildError::missing_field("body", "A body is required"))?;

        Ok(UploadInput {
            bucket: self.bucket,
            key: self.key,
            body,
            options: self.options.unwrap_or_default(),
            checksum_algorithm: self.checksum_algorithm,
            failed_multipart_upload_policy: self.failed_multipart_upload_policy,
        })
    }
}
