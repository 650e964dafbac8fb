/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::io::PartBody;
use crate::types::{Part, PartChecksum, SseCustomerKey, UploadSession};

use super::UploadPartInputBuilder;

/// Fluent builder for uploading a single part
#[derive(Debug)]
pub struct UploadPartFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadPartInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl UploadPartFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Hash (if needed) and upload the part
    pub async fn send(self) -> Result<Part, Error> {
        let input = self.inner.build()?;
        crate::operation::upload_part::UploadPart::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// The session the part belongs to
    pub fn session(mut self, input: UploadSession) -> Self {
        self.inner = self.inner.session(input);
        self
    }

    /// The session the part belongs to
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.inner = self.inner.set_session(input);
        self
    }

    /// The session the part belongs to
    pub fn get_session(&self) -> &Option<UploadSession> {
        self.inner.get_session()
    }

    /// The part number
    pub fn part_number(mut self, input: u32) -> Self {
        self.inner = self.inner.part_number(input);
        self
    }

    /// The part number
    pub fn set_part_number(mut self, input: Option<u32>) -> Self {
        self.inner = self.inner.set_part_number(input);
        self
    }

    /// The part number
    pub fn get_part_number(&self) -> &Option<u32> {
        self.inner.get_part_number()
    }

    /// The part contents
    pub fn body(mut self, input: PartBody) -> Self {
        self.inner = self.inner.body(input);
        self
    }

    /// The part contents
    pub fn set_body(mut self, input: Option<PartBody>) -> Self {
        self.inner = self.inner.set_body(input);
        self
    }

    /// The part contents
    pub fn get_body(&self) -> &Option<PartBody> {
        self.inner.get_body()
    }

    /// Checksum computed by the caller, skipping local hashing
    pub fn checksum(mut self, input: PartChecksum) -> Self {
        self.inner = self.inner.checksum(input);
        self
    }

    /// Checksum computed by the caller, skipping local hashing
    pub fn set_checksum(mut self, input: Option<PartChecksum>) -> Self {
        self.inner = self.inner.set_checksum(input);
        self
    }

    /// Checksum computed by the caller
    pub fn get_checksum(&self) -> &Option<PartChecksum> {
        self.inner.get_checksum()
    }

    /// Customer provided encryption key
    pub fn sse_customer_key(mut self, input: SseCustomerKey) -> Self {
        self.inner = self.inner.sse_customer_key(input);
        self
    }

    /// Customer provided encryption key
    pub fn set_sse_customer_key(mut self, input: Option<SseCustomerKey>) -> Self {
        self.inner = self.inner.set_sse_customer_key(input);
        self
    }

    /// Customer provided encryption key
    pub fn get_sse_customer_key(&self) -> &Option<SseCustomerKey> {
        self.inner.get_sse_customer_key()
    }

    /// Fail the call with `OperationCancelled` once this token is cancelled.
    ///
    /// A part cancelled mid-flight may or may not exist at the store; upload the same
    /// part number again or abort the session.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl UploadPartInputBuilder {
    /// Upload a part with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<Part, Error> {
        let mut fluent_builder = client.upload_part();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
