/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::manifest::CompletionManifest;
use crate::types::{CompletedPart, ObjectIdentity, SseCustomerKey, UploadSession};

use super::CompleteUploadInputBuilder;

/// Fluent builder for completing an upload session
#[derive(Debug)]
pub struct CompleteUploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: CompleteUploadInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl CompleteUploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Assemble the parts into the final object
    pub async fn send(self) -> Result<ObjectIdentity, Error> {
        let input = self.inner.build()?;
        crate::operation::complete::CompleteUpload::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// The session to complete
    pub fn session(mut self, input: UploadSession) -> Self {
        self.inner = self.inner.session(input);
        self
    }

    /// The session to complete
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.inner = self.inner.set_session(input);
        self
    }

    /// The session to complete
    pub fn get_session(&self) -> &Option<UploadSession> {
        self.inner.get_session()
    }

    /// Appends a part to the parts to complete with.
    ///
    /// Parts may be given in any order; they are sorted and checked for conflicting
    /// duplicates before anything is sent.
    pub fn parts(mut self, input: impl Into<CompletedPart>) -> Self {
        self.inner = self.inner.parts(input);
        self
    }

    /// Replace the parts to complete with
    pub fn set_parts(mut self, input: Vec<CompletedPart>) -> Self {
        self.inner = self.inner.set_parts(input);
        self
    }

    /// The parts to complete with
    pub fn get_parts(&self) -> &[CompletedPart] {
        self.inner.get_parts()
    }

    /// Complete with an already validated manifest
    pub fn manifest(mut self, input: CompletionManifest) -> Self {
        self.inner = self.inner.manifest(input);
        self
    }

    /// Complete with an already validated manifest
    pub fn set_manifest(mut self, input: Option<CompletionManifest>) -> Self {
        self.inner = self.inner.set_manifest(input);
        self
    }

    /// The manifest to complete with
    pub fn get_manifest(&self) -> &Option<CompletionManifest> {
        self.inner.get_manifest()
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

    /// Fail the call with `OperationCancelled` once this token is cancelled
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl CompleteUploadInputBuilder {
    /// Complete an upload with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<ObjectIdentity, Error> {
        let mut fluent_builder = client.complete_upload();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
