/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Request type for aborting an upload session
pub use input::{AbortUploadInput, AbortUploadInputBuilder};

use crate::error::{self, Error, ErrorContext};
use crate::operation::cancellable;
use crate::types::{AbortedUpload, UploadSession};

/// Operation struct for aborting an upload session
#[derive(Clone, Default, Debug)]
pub(crate) struct AbortUpload;

impl AbortUpload {
    /// Execute a single `AbortUpload` operation
    #[tracing::instrument(skip_all, level = "debug", name = "abort-upload")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: AbortUploadInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<AbortedUpload, Error> {
        let session = input.session;
        session.validate()?;
        cancellable(cancellation_token.as_ref(), abort_upload(&handle, &session))
            .await
            .map_err(error::with_context(ErrorContext::session(&session)))
    }
}

/// Abort `session` at the store, treating an already closed session as aborted.
pub(crate) async fn abort_upload(
    handle: &crate::client::Handle,
    session: &UploadSession,
) -> Result<AbortedUpload, Error> {
    match handle.store().abort_multipart_upload(session).await {
        Ok(()) => {
            tracing::debug!(upload_id = session.upload_id(), "multipart upload aborted");
        }
        Err(err) if err.is_session_gone() => {
            tracing::debug!(
                upload_id = session.upload_id(),
                "multipart upload already closed, nothing to abort"
            );
        }
        Err(err) => return Err(err),
    }
    Ok(AbortedUpload {
        upload_id: Some(session.upload_id().to_owned()),
    })
}
