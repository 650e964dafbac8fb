/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{self, Error, ErrorKind};
use crate::operation::abort::abort_upload;
use crate::operation::upload::context::UploadContext;
use crate::operation::upload::UploadOutput;
use crate::types::{AbortedUpload, FailedMultipartUploadPolicy};

/// Handle to an upload running in the background.
///
/// # Cancellation
///
/// The upload can be cancelled either by dropping this handle or by calling
/// [`Self::abort`]. In both cases in-flight part uploads stop at their next await point and
/// no new parts are started.
///
/// Dropping the handle leaves the upload session open at the store, where it can be found
/// again with [`Client::find_uploads`](crate::Client::find_uploads). Calling
/// [`Self::abort`] also aborts the session, unless
/// [`FailedMultipartUploadPolicy::Retain`] is set.
#[derive(Debug)]
#[non_exhaustive]
pub struct UploadHandle {
    task: Option<JoinHandle<Result<UploadOutput, Error>>>,
    /// The context used to drive an upload to completion
    pub(crate) ctx: UploadContext,
    cancellation_token: CancellationToken,
}

impl UploadHandle {
    pub(crate) fn new(
        ctx: UploadContext,
        task: JoinHandle<Result<UploadOutput, Error>>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            task: Some(task),
            ctx,
            cancellation_token,
        }
    }

    /// Consume the handle and wait for the upload to complete.
    ///
    /// If any part fails, the session is aborted (or retained, per the upload's
    /// [`FailedMultipartUploadPolicy`]) before the error is returned. The error context
    /// carries the upload ID so a retained session can be resumed.
    #[tracing::instrument(skip_all, level = "debug", name = "join-upload")]
    pub async fn join(mut self) -> Result<UploadOutput, Error> {
        match self.wait().await {
            Ok(output) => Ok(output),
            Err(err) => {
                tracing::error!("multipart upload failed");
                if let Err(abort_err) = self.release_session().await {
                    tracing::error!("failed to abort upload: {abort_err}");
                }
                Err(err.with_context(self.ctx.error_context()))
            }
        }
    }

    /// Cancel in-flight part uploads and abort the session.
    ///
    /// With [`FailedMultipartUploadPolicy::Retain`] the session is left open and the
    /// returned [`AbortedUpload`] carries no upload ID. If the upload completed before it
    /// could be cancelled, nothing is aborted.
    #[tracing::instrument(skip_all, level = "debug", name = "abort-upload")]
    pub async fn abort(&mut self) -> Result<AbortedUpload, Error> {
        self.cancellation_token.cancel();
        match self.wait().await {
            Ok(output) => {
                tracing::debug!(
                    upload_id = output.session().upload_id(),
                    "upload completed before it was cancelled, nothing to abort"
                );
                Ok(AbortedUpload::default())
            }
            Err(err) => {
                if err.kind() != &ErrorKind::OperationCancelled {
                    tracing::debug!("upload had already failed: {err}");
                }
                self.release_session().await
            }
        }
    }

    async fn wait(&mut self) -> Result<UploadOutput, Error> {
        match self.task.take() {
            Some(task) => task.await?,
            None => Err(Error::new(
                ErrorKind::RuntimeError,
                "upload task was already awaited",
            )),
        }
    }

    /// Abort or retain the session according to the policy
    async fn release_session(&self) -> Result<AbortedUpload, Error> {
        let Some(session) = self.ctx.session() else {
            tracing::debug!("upload was never initiated, nothing to abort");
            return Ok(AbortedUpload::default());
        };

        match self.ctx.failure_policy {
            FailedMultipartUploadPolicy::AbortUpload => abort_upload(&self.ctx.handle, session)
                .await
                .map_err(error::with_context(self.ctx.error_context())),
            FailedMultipartUploadPolicy::Retain => {
                tracing::debug!(
                    upload_id = session.upload_id(),
                    "retaining uploaded parts of failed upload"
                );
                Ok(AbortedUpload::default())
            }
        }
    }
}

impl Drop for UploadHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancellation_token.cancel();
        }
    }
}
