/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Request type for completing an upload session
pub use input::{CompleteUploadInput, CompleteUploadInputBuilder};

use crate::error::{self, Error, ErrorContext};
use crate::manifest::CompletionManifest;
use crate::operation::cancellable;
use crate::store::CompleteUploadRequest;
use crate::types::{ObjectIdentity, SseCustomerKey, UploadSession};

/// Operation struct for completing an upload session
#[derive(Clone, Default, Debug)]
pub(crate) struct CompleteUpload;

impl CompleteUpload {
    /// Execute a single `CompleteUpload` operation
    #[tracing::instrument(skip_all, level = "debug", name = "complete-upload")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: CompleteUploadInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<ObjectIdentity, Error> {
        let session = input.session;
        let ctx = ErrorContext::session(&session);
        session.validate()?;

        let manifest = match input.manifest {
            Some(manifest) => manifest,
            None => {
                CompletionManifest::build(input.parts).map_err(error::with_context(ctx.clone()))?
            }
        };

        cancellable(
            cancellation_token.as_ref(),
            complete_upload(&handle, session, manifest, input.sse_customer_key),
        )
        .await
        .map_err(error::with_context(ctx))
    }
}

/// Send a validated manifest to the store.
pub(crate) async fn complete_upload(
    handle: &crate::client::Handle,
    session: UploadSession,
    manifest: CompletionManifest,
    sse_customer_key: Option<SseCustomerKey>,
) -> Result<ObjectIdentity, Error> {
    let manifest_size = manifest.total_size();
    tracing::trace!(parts = manifest.len(), "completing multipart upload");

    let resp = handle
        .store()
        .complete_multipart_upload(CompleteUploadRequest {
            session: session.clone(),
            manifest,
            sse_customer_key,
        })
        .await?;

    tracing::debug!(
        upload_id = session.upload_id(),
        "multipart upload completed"
    );
    Ok(ObjectIdentity {
        bucket: session.bucket().to_owned(),
        key: session.key().to_owned(),
        e_tag: resp.e_tag,
        version_id: resp.version_id,
        location: resp.location,
        checksum: resp.checksum,
        size: resp.size.or(manifest_size),
    })
}
