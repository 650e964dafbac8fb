/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::SystemTime;

use aws_smithy_types::error::operation::BuildError;

use crate::types::UploadSession;

/// Input type for finding the in-progress uploads of one key
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FindUploadsInput {
    /// The bucket to search
    pub bucket: String,
    /// The exact key whose uploads to find
    pub key: String,
}

impl FindUploadsInput {
    /// Creates a new builder-style object to manufacture [`FindUploadsInput`](crate::operation::recover::FindUploadsInput).
    pub fn builder() -> FindUploadsInputBuilder {
        FindUploadsInputBuilder::default()
    }
}

/// A builder for [`FindUploadsInput`](crate::operation::recover::FindUploadsInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct FindUploadsInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
}

impl FindUploadsInputBuilder {
    /// The bucket to search
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The bucket to search
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// The exact key whose uploads to find
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// The exact key whose uploads to find
    pub fn get_key(&self) -> &Option<String> {
        &self.key
    }

    /// Consumes the builder and constructs a [`FindUploadsInput`](crate::operation::recover::FindUploadsInput).
    pub fn build(self) -> Result<FindUploadsInput, BuildError> {
        let bucket = self
            .bucket
            .ok_or_else(|| BuildError::missing_field("bucket", "A bucket is required"))?;
        let key = self
            .key
            .ok_or_else(|| BuildError::missing_field("key", "A key is required"))?;
        Ok(FindUploadsInput { bucket, key })
    }
}

/// Input type for resuming an upload session
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResumeUploadInput {
    /// The session to resume
    pub session: UploadSession,
}

impl ResumeUploadInput {
    /// Creates a new builder-style object to manufacture [`ResumeUploadInput`](crate::operation::recover::ResumeUploadInput).
    pub fn builder() -> ResumeUploadInputBuilder {
        ResumeUploadInputBuilder::default()
    }
}

/// A builder for [`ResumeUploadInput`](crate::operation::recover::ResumeUploadInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct ResumeUploadInputBuilder {
    pub(crate) session: Option<UploadSession>,
}

impl ResumeUploadInputBuilder {
    /// The session to resume
    pub fn session(mut self, input: UploadSession) -> Self {
        self.session = Some(input);
        self
    }

    /// The session to resume
    pub fn get_session(&self) -> &Option<UploadSession> {
        &self.session
    }

    /// Consumes the builder and constructs a [`ResumeUploadInput`](crate::operation::recover::ResumeUploadInput).
    pub fn build(self) -> Result<ResumeUploadInput, BuildError> {
        let session = self
            .session
            .ok_or_else(|| BuildError::missing_field("session", "An upload session is required"))?;
        Ok(ResumeUploadInput { session })
    }
}

/// Input type for aborting stale in-progress uploads
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbortIncompleteUploadsInput {
    /// The bucket to clean up
    pub bucket: String,
    /// Only uploads whose key begins with this prefix
    pub prefix: Option<String>,
    /// Only uploads initiated strictly before this time
    pub initiated_before: Option<SystemTime>,
}

impl AbortIncompleteUploadsInput {
    /// Creates a new builder-style object to manufacture [`AbortIncompleteUploadsInput`](crate::operation::recover::AbortIncompleteUploadsInput).
    pub fn builder() -> AbortIncompleteUploadsInputBuilder {
        AbortIncompleteUploadsInputBuilder::default()
    }
}

/// A builder for [`AbortIncompleteUploadsInput`](crate::operation::recover::AbortIncompleteUploadsInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct AbortIncompleteUploadsInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) initiated_before: Option<SystemTime>,
}

impl AbortIncompleteUploadsInputBuilder {
    /// The bucket to clean up
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The bucket to clean up
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// Only uploads whose key begins with this prefix
    pub fn prefix(mut self, input: impl Into<String>) -> Self {
        self.prefix = Some(input.into());
        self
    }

    /// Only uploads whose key begins with this prefix
    pub fn get_prefix(&self) -> &Option<String> {
        &self.prefix
    }

    /// Only uploads initiated strictly before this time.
    ///
    /// Uploads whose initiation time the store does not report are skipped when this is set.
    pub fn initiated_before(mut self, input: SystemTime) -> Self {
        self.initiated_before = Some(input);
        self
    }

    /// Only uploads initiated strictly before this time
    pub fn get_initiated_before(&self) -> &Option<SystemTime> {
        &self.initiated_before
    }

    /// Consumes the builder and constructs a [`AbortIncompleteUploadsInput`](crate::operation::recover::AbortIncompleteUploadsInput).
    pub fn build(self) -> Result<AbortIncompleteUploadsInput, BuildError> {
        let bucket = self
            .bucket
            .ok_or_else(|| BuildError::missing_field("bucket", "A bucket is required"))?;
        Ok(AbortIncompleteUploadsInput {
            bucket,
            prefix: self.prefix,
            initiated_before: self.initiated_before,
        })
    }
}
