/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::types::UploadSession;

/// Input type for aborting an upload session
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbortUploadInput {
    /// The session to abort
    pub session: UploadSession,
}

impl AbortUploadInput {
    /// Creates a new builder-style object to manufacture [`AbortUploadInput`](crate::operation::abort::AbortUploadInput).
    pub fn builder() -> AbortUploadInputBuilder {
        AbortUploadInputBuilder::default()
    }

    /// The session to abort
    pub fn session(&self) -> &UploadSession {
        &self.session
    }
}

/// A builder for [`AbortUploadInput`](crate::operation::abort::AbortUploadInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct AbortUploadInputBuilder {
    pub(crate) session: Option<UploadSession>,
}

impl AbortUploadInputBuilder {
    /// The session to abort
    ///
    /// NOTE: A session is required.
    pub fn session(mut self, input: UploadSession) -> Self {
        self.session = Some(input);
        self
    }

    /// The session to abort
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.session = input;
        self
    }

    /// The session to abort
    pub fn get_session(&self) -> &Option<UploadSession> {
        &self.session
    }

    /// Consumes the builder and constructs a [`AbortUploadInput`](crate::operation::abort::AbortUploadInput).
    pub fn build(self) -> Result<AbortUploadInput, BuildError> {
        let session = self
            .session
            .ok_or_else(|| BuildError::missing_field("session", "An upload session is required"))?;
        Ok(AbortUploadInput { session })
    }
}
