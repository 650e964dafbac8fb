/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;
use std::time::SystemTime;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::types::{UploadSession, UploadSummary};

use super::{
    AbortIncompleteUploadsInputBuilder, FindUploadsInputBuilder, ResumeUploadInputBuilder,
    ResumedUpload,
};

/// Fluent builder for finding the in-progress uploads of one key
#[derive(Debug)]
pub struct FindUploadsFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: FindUploadsInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl FindUploadsFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// List every in-progress upload for exactly this key
    pub async fn send(self) -> Result<Vec<UploadSummary>, Error> {
        let input = self.inner.build()?;
        crate::operation::recover::FindUploads::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// The bucket to search
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// The bucket to search
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// The exact key whose uploads to find
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// The exact key whose uploads to find
    pub fn get_key(&self) -> &Option<String> {
        self.inner.get_key()
    }

    /// Fail with `OperationCancelled` once this token is cancelled
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

/// Fluent builder for resuming an upload session
#[derive(Debug)]
pub struct ResumeUploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: ResumeUploadInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl ResumeUploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Fetch every part the store holds for the session
    pub async fn send(self) -> Result<ResumedUpload, Error> {
        let input = self.inner.build()?;
        crate::operation::recover::ResumeUpload::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// The session to resume
    pub fn session(mut self, input: UploadSession) -> Self {
        self.inner = self.inner.session(input);
        self
    }

    /// The session to resume
    pub fn get_session(&self) -> &Option<UploadSession> {
        self.inner.get_session()
    }

    /// Fail with `OperationCancelled` once this token is cancelled
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

/// Fluent builder for aborting stale in-progress uploads
#[derive(Debug)]
pub struct AbortIncompleteUploadsFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: AbortIncompleteUploadsInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl AbortIncompleteUploadsFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Abort every matching upload, returning the sessions that were aborted
    pub async fn send(self) -> Result<Vec<UploadSession>, Error> {
        let input = self.inner.build()?;
        crate::operation::recover::AbortIncompleteUploads::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// The bucket to clean up
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// The bucket to clean up
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// Only uploads whose key begins with this prefix
    pub fn prefix(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.prefix(input);
        self
    }

    /// Only uploads whose key begins with this prefix
    pub fn get_prefix(&self) -> &Option<String> {
        self.inner.get_prefix()
    }

    /// Only uploads initiated strictly before this time
    pub fn initiated_before(mut self, input: SystemTime) -> Self {
        self.inner = self.inner.initiated_before(input);
        self
    }

    /// Only uploads initiated strictly before this time
    pub fn get_initiated_before(&self) -> &Option<SystemTime> {
        self.inner.get_initiated_before()
    }

    /// Stop aborting with `OperationCancelled` once this token is cancelled.
    ///
    /// Uploads aborted before cancellation stay aborted.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}
