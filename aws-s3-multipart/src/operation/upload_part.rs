/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Request type for uploading a single part
pub use input::{UploadPartInput, UploadPartInputBuilder};

use crate::error::{self, Error, ErrorContext};
use crate::io::PartHasher;
use crate::operation::cancellable;
use crate::store::UploadPartRequest;
use crate::types::{Part, PartChecksum};

/// Operation struct for uploading a single part
#[derive(Clone, Default, Debug)]
pub(crate) struct UploadPart;

impl UploadPart {
    /// Execute a single `UploadPart` operation
    #[tracing::instrument(skip_all, level = "debug", name = "upload-part")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: UploadPartInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<Part, Error> {
        let ctx = ErrorContext::session(&input.session).with_part_number(input.part_number);
        cancellable(cancellation_token.as_ref(), upload_part(&handle, input))
            .await
            .map_err(error::with_context(ctx))
    }
}

/// Validate, hash, and send one part.
pub(crate) async fn upload_part(
    handle: &crate::client::Handle,
    input: UploadPartInput,
) -> Result<Part, Error> {
    let session = input.session;
    let part_number = input.part_number;
    let ctx = ErrorContext::session(&session).with_part_number(part_number);
    session.validate()?;

    let limit = handle.config.part_number_limit();
    if !(crate::MIN_PART_NUMBER..=limit).contains(&part_number) {
        return Err(error::invalid_argument(format!(
            "part number {part_number} is outside 1..={limit}"
        ))
        .with_context(ctx));
    }

    let body = input.body;
    let content_length = body.content_length();
    let checksum = match input.checksum {
        Some(checksum) => {
            match session.checksum_algorithm() {
                Some(declared) if declared != checksum.algorithm() => {
                    return Err(error::invalid_argument(format!(
                        "precomputed {} checksum does not match the session's {declared} algorithm",
                        checksum.algorithm()
                    ))
                    .with_context(ctx));
                }
                _ => {}
            }
            checksum
        }
        None => hash_body(handle, &session, &body).await?,
    };

    tracing::trace!(part_number, content_length, "uploading part");
    let resp = handle
        .store()
        .upload_part(UploadPartRequest {
            session: session.clone(),
            part_number,
            checksum: checksum.clone(),
            content_length,
            body,
            sse_customer_key: input.sse_customer_key,
        })
        .await?;

    if let Some(echoed) = &resp.checksum {
        if echoed.algorithm() == checksum.algorithm() && echoed.value() != checksum.value() {
            return Err(error::integrity(format!(
                "store recorded checksum {} but {} was sent",
                echoed.value(),
                checksum.value()
            ))
            .with_context(ctx));
        }
    }

    tracing::trace!(part_number, e_tag = resp.e_tag, "completed upload of part");
    Ok(Part {
        part_number,
        e_tag: resp.e_tag,
        checksum,
        size: content_length,
    })
}

async fn hash_body(
    handle: &crate::client::Handle,
    session: &crate::types::UploadSession,
    body: &crate::io::PartBody,
) -> Result<PartChecksum, Error> {
    let algorithm = session
        .checksum_algorithm()
        .unwrap_or_else(|| handle.config.checksum_algorithm());
    let digest = PartHasher::new(algorithm)
        .buffer_size(handle.config.hash_buffer_size())
        .hash(body.reader().await?)
        .await?;

    if digest.content_length() != body.content_length() {
        return Err(error::Error::new(
            error::ErrorKind::IOError,
            format!(
                "part body changed while hashing: expected {} bytes, read {}",
                body.content_length(),
                digest.content_length()
            ),
        ));
    }
    Ok(digest.into_checksum())
}
