/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::types::{PartsMarker, UploadSession};

/// Input type for listing the parts of an upload session
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListPartsInput {
    /// The session whose parts to list
    pub session: UploadSession,

    /// Resume the listing after this marker
    pub marker: Option<PartsMarker>,

    /// Maximum number of parts per page
    pub max_parts: Option<u32>,
}

impl ListPartsInput {
    /// Creates a new builder-style object to manufacture [`ListPartsInput`](crate::operation::list_parts::ListPartsInput).
    pub fn builder() -> ListPartsInputBuilder {
        ListPartsInputBuilder::default()
    }

    /// The session whose parts to list
    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// Resume the listing after this marker
    pub fn marker(&self) -> Option<&PartsMarker> {
        self.marker.as_ref()
    }

    /// Maximum number of parts per page
    pub fn max_parts(&self) -> Option<u32> {
        self.max_parts
    }
}

/// A builder for [`ListPartsInput`](crate::operation::list_parts::ListPartsInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct ListPartsInputBuilder {
    pub(crate) session: Option<UploadSession>,
    pub(crate) marker: Option<PartsMarker>,
    pub(crate) max_parts: Option<u32>,
}

impl ListPartsInputBuilder {
    /// The session whose parts to list
    ///
    /// NOTE: A session is required.
    pub fn session(mut self, input: UploadSession) -> Self {
        self.session = Some(input);
        self
    }

    /// The session whose parts to list
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.session = input;
        self
    }

    /// The session whose parts to list
    pub fn get_session(&self) -> &Option<UploadSession> {
        &self.session
    }

    /// Resume the listing after this marker
    pub fn marker(mut self, input: PartsMarker) -> Self {
        self.marker = Some(input);
        self
    }

    /// Resume the listing after this marker
    pub fn set_marker(mut self, input: Option<PartsMarker>) -> Self {
        self.marker = input;
        self
    }

    /// Resume the listing after this marker
    pub fn get_marker(&self) -> &Option<PartsMarker> {
        &self.marker
    }

    /// Maximum number of parts per page, at least 1. Values above 1000 are clamped.
    pub fn max_parts(mut self, input: u32) -> Self {
        self.max_parts = Some(input);
        self
    }

    /// Maximum number of parts per page
    pub fn set_max_parts(mut self, input: Option<u32>) -> Self {
        self.max_parts = input;
        self
    }

    /// Maximum number of parts per page
    pub fn get_max_parts(&self) -> &Option<u32> {
        &self.max_parts
    }

    /// Consumes the builder and constructs a [`ListPartsInput`](crate::operation::list_parts::ListPartsInput).
    pub fn build(self) -> Result<ListPartsInput, BuildError> {
        let session = self
            .session
            .ok_or_else(|| BuildError::missing_field("session", "An upload session is required"))?;
        Ok(ListPartsInput {
            session,
            marker: self.marker,
            max_parts: self.max_parts,
        })
    }
}
