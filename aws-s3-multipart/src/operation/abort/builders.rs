/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::types::{AbortedUpload, UploadSession};

use super::AbortUploadInputBuilder;

/// Fluent builder for aborting an upload session
#[derive(Debug)]
pub struct AbortUploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: AbortUploadInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl AbortUploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Abort the session. Aborting a session that is already closed succeeds.
    pub async fn send(self) -> Result<AbortedUpload, Error> {
        let input = self.inner.build()?;
        crate::operation::abort::AbortUpload::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// The session to abort
    pub fn session(mut self, input: UploadSession) -> Self {
        self.inner = self.inner.session(input);
        self
    }

    /// The session to abort
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.inner = self.inner.set_session(input);
        self
    }

    /// The session to abort
    pub fn get_session(&self) -> &Option<UploadSession> {
        self.inner.get_session()
    }

    /// Fail the call with `OperationCancelled` once this token is cancelled
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl AbortUploadInputBuilder {
    /// Abort an upload with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<AbortedUpload, Error> {
        let mut fluent_builder = client.abort_upload();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
