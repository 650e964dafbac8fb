/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::types::{ChecksumAlgorithm, UploadOptions, UploadSession};

use super::InitiateUploadInputBuilder;

/// Fluent builder for starting an upload session
#[derive(Debug)]
pub struct InitiateUploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: InitiateUploadInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl InitiateUploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Start the upload session
    pub async fn send(self) -> Result<UploadSession, Error> {
        let input = self.inner.build()?;
        crate::operation::initiate::InitiateUpload::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// The bucket the object will be written to
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// The bucket the object will be written to
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_bucket(input);
        self
    }

    /// The bucket the object will be written to
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// The key the object will be written to
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// The key the object will be written to
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_key(input);
        self
    }

    /// The key the object will be written to
    pub fn get_key(&self) -> &Option<String> {
        self.inner.get_key()
    }

    /// Content headers, metadata, storage class and encryption for the object
    pub fn options(mut self, input: UploadOptions) -> Self {
        self.inner = self.inner.options(input);
        self
    }

    /// Content headers, metadata, storage class and encryption for the object
    pub fn set_options(mut self, input: Option<UploadOptions>) -> Self {
        self.inner = self.inner.set_options(input);
        self
    }

    /// Content headers, metadata, storage class and encryption for the object
    pub fn get_options(&self) -> &Option<UploadOptions> {
        self.inner.get_options()
    }

    /// Override the client's checksum algorithm for this upload
    pub fn checksum_algorithm(mut self, input: ChecksumAlgorithm) -> Self {
        self.inner = self.inner.checksum_algorithm(input);
        self
    }

    /// Override the client's checksum algorithm for this upload
    pub fn set_checksum_algorithm(mut self, input: Option<ChecksumAlgorithm>) -> Self {
        self.inner = self.inner.set_checksum_algorithm(input);
        self
    }

    /// Checksum algorithm override
    pub fn get_checksum_algorithm(&self) -> &Option<ChecksumAlgorithm> {
        self.inner.get_checksum_algorithm()
    }

    /// Fail the call with `OperationCancelled` once this token is cancelled
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl InitiateUploadInputBuilder {
    /// Start an upload session with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<UploadSession, Error> {
        let mut fluent_builder = client.initiate_upload();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
