/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::io::PartBody;
use crate::types::{PartChecksum, SseCustomerKey, UploadSession};

/// Input type for uploading a single part
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct UploadPartInput {
    /// The session the part belongs to
    pub session: UploadSession,

    /// Part number, `1..=10000` unless the client limits it further
    pub part_number: u32,

    /// The part contents
    pub body: PartBody,

    /// Checksum computed by the caller. Computed from the body when absent.
    pub checksum: Option<PartChecksum>,

    /// Customer provided key, required when the upload was initiated with SSE-C
    pub sse_customer_key: Option<SseCustomerKey>,
}

impl UploadPartInput {
    /// Creates a new builder-style object to manufacture [`UploadPartInput`](crate::operation::upload_part::UploadPartInput).
    pub fn builder() -> UploadPartInputBuilder {
        UploadPartInputBuilder::default()
    }

    /// The session the part belongs to
    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// The part number
    pub fn part_number(&self) -> u32 {
        self.part_number
    }

    /// The part contents
    pub fn body(&self) -> &PartBody {
        &self.body
    }

    /// Checksum computed by the caller
    pub fn checksum(&self) -> Option<&PartChecksum> {
        self.checksum.as_ref()
    }

    /// Customer provided encryption key
    pub fn sse_customer_key(&self) -> Option<&SseCustomerKey> {
        self.sse_customer_key.as_ref()
    }
}

/// A builder for [`UploadPartInput`](crate::operation::upload_part::UploadPartInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct UploadPartInputBuilder {
    pub(crate) session: Option<UploadSession>,
    pub(crate) part_number: Option<u32>,
    pub(crate) body: Option<PartBody>,
    pub(crate) checksum: Option<PartChecksum>,
    pub(crate) sse_customer_key: Option<SseCustomerKey>,
}

impl UploadPartInputBuilder {
    /// The session the part belongs to
    ///
    /// NOTE: A session is required.
    pub fn session(mut self, input: UploadSession) -> Self {
        self.session = Some(input);
        self
    }

    /// The session the part belongs to
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.session = input;
        self
    }

    /// The session the part belongs to
    pub fn get_session(&self) -> &Option<UploadSession> {
        &self.session
    }

    /// The part number
    ///
    /// NOTE: A part number is required.
    pub fn part_number(mut self, input: u32) -> Self {
        self.part_number = Some(input);
        self
    }

    /// The part number
    pub fn set_part_number(mut self, input: Option<u32>) -> Self {
        self.part_number = input;
        self
    }

    /// The part number
    pub fn get_part_number(&self) -> &Option<u32> {
        &self.part_number
    }

    /// The part contents
    ///
    /// NOTE: A body is required.
    pub fn body(mut self, input: PartBody) -> Self {
        self.body = Some(input);
        self
    }

    /// The part contents
    pub fn set_body(mut self, input: Option<PartBody>) -> Self {
        self.body = input;
        self
    }

    /// The part contents
    pub fn get_body(&self) -> &Option<PartBody> {
        &self.body
    }

    /// Checksum computed by the caller. Its algorithm must match the session's.
    pub fn checksum(mut self, input: PartChecksum) -> Self {
        self.checksum = Some(input);
        self
    }

    /// Checksum computed by the caller. Its algorithm must match the session's.
    pub fn set_checksum(mut self, input: Option<PartChecksum>) -> Self {
        self.checksum = input;
        self
    }

    /// Checksum computed by the caller
    pub fn get_checksum(&self) -> &Option<PartChecksum> {
        &self.checksum
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

    /// Consumes the builder and constructs a [`UploadPartInput`](crate::operation::upload_part::UploadPartInput).
    pub fn build(self) -> Result<UploadPartInput, BuildError> {
        let session = self
            .session
            .ok_or_else(|| BuildError::missing_field("session", "An upload session is required"))?;
        let part_number = self
            .part_number
            .ok_or_else(|| BuildError::missing_field("part_number", "A part number is required"))?;
        let body = self
            .body
            .ok_or_else(|| BuildError::missing_field("body", "A part body is required"))?;

        Ok(UploadPartInput {
            session,
            part_number,
            body,
            checksum: self.checksum,
            sse_customer_key: self.sse_customer_key,
        })
    }
}
