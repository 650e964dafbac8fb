/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::io::PartBody;
use crate::types::{ChecksumAlgorithm, FailedMultipartUploadPolicy, UploadOptions};

use super::{UploadHandle, UploadInputBuilder};

/// Fluent builder for uploading a whole body as one object
#[derive(Debug)]
pub struct UploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl UploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Start the upload in the background.
    ///
    /// Returns as soon as the input is validated. Call [`UploadHandle::join`] to drive the
    /// upload to completion. Must be called from within a Tokio runtime.
    pub fn initiate(self) -> Result<UploadHandle, Error> {
        let input = self.inner.build()?;
        crate::operation::upload::Upload::orchestrate(self.handle, input, self.cancellation_token)
    }

    /// The bucket to upload to
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// The bucket to upload to
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_bucket(input);
        self
    }

    /// The bucket to upload to
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// The key of the object to create
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// The key of the object to create
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_key(input);
        self
    }

    /// The key of the object to create
    pub fn get_key(&self) -> &Option<String> {
        self.inner.get_key()
    }

    /// The object contents
    pub fn body(mut self, input: PartBody) -> Self {
        self.inner = self.inner.body(input);
        self
    }

    /// The object contents
    pub fn set_body(mut self, input: Option<PartBody>) -> Self {
        self.inner = self.inner.set_body(input);
        self
    }

    /// The object contents
    pub fn get_body(&self) -> &Option<PartBody> {
        self.inner.get_body()
    }

    /// Options applied to the assembled object.
    ///
    /// A customer provided key set here is repeated on every part and on completion.
    pub fn options(mut self, input: UploadOptions) -> Self {
        self.inner = self.inner.options(input);
        self
    }

    /// Options applied to the assembled object
    pub fn set_options(mut self, input: Option<UploadOptions>) -> Self {
        self.inner = self.inner.set_options(input);
        self
    }

    /// Options applied to the assembled object
    pub fn get_options(&self) -> &Option<UploadOptions> {
        self.inner.get_options()
    }

    /// Checksum algorithm for every part, overriding the client default
    pub fn checksum_algorithm(mut self, input: ChecksumAlgorithm) -> Self {
        self.inner = self.inner.checksum_algorithm(input);
        self
    }

    /// Checksum algorithm for every part, overriding the client default
    pub fn set_checksum_algorithm(mut self, input: Option<ChecksumAlgorithm>) -> Self {
        self.inner = self.inner.set_checksum_algorithm(input);
        self
    }

    /// Checksum algorithm override
    pub fn get_checksum_algorithm(&self) -> &Option<ChecksumAlgorithm> {
        self.inner.get_checksum_algorithm()
    }

    /// What happens to the upload session when a part fails
    pub fn failed_multipart_upload_policy(mut self, input: FailedMultipartUploadPolicy) -> Self {
        self.inner = self.inner.failed_multipart_upload_policy(input);
        self
    }

    /// What happens to the upload session when a part fails
    pub fn set_failed_multipart_upload_policy(
        mut self,
        input: Option<FailedMultipartUploadPolicy>,
    ) -> Self {
        self.inner = self.inner.set_failed_multipart_upload_policy(input);
        self
    }

    /// What happens to the upload session when a part fails
    pub fn get_failed_multipart_upload_policy(&self) -> &Option<FailedMultipartUploadPolicy> {
        self.inner.get_failed_multipart_upload_policy()
    }

    /// Stop the upload once this token is cancelled.
    ///
    /// The upload then fails with `OperationCancelled` from [`UploadHandle::join`]. Cancelling
    /// the upload through its handle does not cancel this token.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl UploadInputBuilder {
    /// Start an upload with this input using the given client.
    pub fn send_with(self, client: &crate::Client) -> Result<UploadHandle, Error> {
        let mut fluent_builder = client.upload();
        fluent_builder.inner = self;
        fluent_builder.initiate()
    }
}
