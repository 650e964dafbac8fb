/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::manifest::CompletionManifest;
use crate::types::{CompletedPart, SseCustomerKey, UploadSession};

/// Input type for completing an upload session
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct CompleteUploadInput {
    /// The session to complete
    pub session: UploadSession,

    /// Parts in any order; assembled into a manifest before sending
    pub parts: Vec<CompletedPart>,

    /// An already validated manifest, used instead of `parts`
    pub manifest: Option<CompletionManifest>,

    /// Customer provided key, required when the upload was initiated with SSE-C
    pub sse_customer_key: Option<SseCustomerKey>,
}

impl CompleteUploadInput {
    /// Creates a new builder-style object to manufacture [`CompleteUploadInput`](crate::operation::complete::CompleteUploadInput).
    pub fn builder() -> CompleteUploadInputBuilder {
        CompleteUploadInputBuilder::default()
    }

    /// The session to complete
    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// Parts in any order
    pub fn parts(&self) -> &[CompletedPart] {
        &self.parts
    }

    /// An already validated manifest
    pub fn manifest(&self) -> Option<&CompletionManifest> {
        self.manifest.as_ref()
    }

    /// Customer provided encryption key
    pub fn sse_customer_key(&self) -> Option<&SseCustomerKey> {
        self.sse_customer_key.as_ref()
    }
}

/// A builder for [`CompleteUploadInput`](crate::operation::complete::CompleteUploadInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct CompleteUploadInputBuilder {
    pub(crate) session: Option<UploadSession>,
    pub(crate) parts: Vec<CompletedPart>,
    pub(crate) manifest: Option<CompletionManifest>,
    pub(crate) sse_customer_key: Option<SseCustomerKey>,
}

impl CompleteUploadInputBuilder {
    /// The session to complete
    ///
    /// NOTE: A session is required.
    pub fn session(mut self, input: UploadSession) -> Self {
        self.session = Some(input);
        self
    }

    /// The session to complete
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.session = input;
        self
    }

    /// The session to complete
    pub fn get_session(&self) -> &Option<UploadSession> {
        &self.session
    }

    /// Appends a part to the parts to complete with.
    ///
    /// To override the contents of this collection use [`set_parts`](Self::set_parts).
    pub fn parts(mut self, input: impl Into<CompletedPart>) -> Self {
        self.parts.push(input.into());
        self
    }

    /// Replace the parts to complete with
    pub fn set_parts(mut self, input: Vec<CompletedPart>) -> Self {
        self.parts = input;
        self
    }

    /// The parts to complete with
    pub fn get_parts(&self) -> &[CompletedPart] {
        &self.parts
    }

    /// Complete with an already validated manifest
    pub fn manifest(mut self, input: CompletionManifest) -> Self {
        self.manifest = Some(input);
        self
    }

    /// Complete with an already validated manifest
    pub fn set_manifest(mut self, input: Option<CompletionManifest>) -> Self {
        self.manifest = input;
        self
    }

    /// The manifest to complete with
    pub fn get_manifest(&self) -> &Option<CompletionManifest> {
        &self.manifest
    }

    /// Customer provided encryption key
    pub fn sse_customer_key(mut self, input: SseCustomerKey) -> Self {
        self.sse_customer_key = Some(input);
        self
    }

    /// Customer provided encryption key
    pub fn set_sse_customer_key(mut self, input: Option<SseCustomerKey>) -> Self {
        self.sse_customer_key = input;
        self
    }

    /// Customer provided encryption key
    pub fn get_sse_customer_key(&self) -> &Option<SseCustomerKey> {
        &self.sse_customer_key
    }

    /// Consumes the builder and constructs a [`CompleteUploadInput`](crate::operation::complete::CompleteUploadInput).
    pub fn build(self) -> Result<CompleteUploadInput, BuildError> {
        let session = self
            .session
            .ok_or_else(|| BuildError::missing_field("session", "An upload session is required"))?;
        if self.manifest.is_some() && !self.parts.is_empty() {
            return Err(BuildError::invalid_field(
                "parts",
                "parts and manifest are mutually exclusive",
            ));
        }

        Ok(CompleteUploadInput {
            session,
            parts: self.parts,
            manifest: self.manifest,
            sse_customer_key: self.sse_customer_key,
        })
    }
}
