/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio::task;
use tokio_util::sync::CancellationToken;
use tower::{service_fn, Service, ServiceBuilder, ServiceExt};
use tracing::Instrument;

use crate::error::{self, Error, ErrorContext};
use crate::io::part_reader::{Builder as PartReaderBuilder, PartReader};
use crate::io::PartBody;
use crate::operation::cancellable;
use crate::operation::upload::context::UploadContext;
use crate::operation::upload_part::{self, UploadPartInput};
use crate::types::{Part, UploadSession};

/// Request/input type for our "upload_part" service.
#[derive(Debug, Clone)]
pub(super) struct UploadPartRequest {
    pub(super) ctx: UploadContext,
    pub(super) session: UploadSession,
    pub(super) part_number: u32,
    pub(super) body: PartBody,
}

/// handler (service fn) for a single part
async fn upload_part_handler(request: UploadPartRequest) -> Result<Part, Error> {
    let UploadPartRequest {
        ctx,
        session,
        part_number,
        body,
    } = request;
    let error_ctx = ErrorContext::session(&session).with_part_number(part_number);

    let input = UploadPartInput {
        session,
        part_number,
        body,
        checksum: None,
        sse_customer_key: ctx.sse_customer_key.clone(),
    };
    upload_part::upload_part(&ctx.handle, input)
        .await
        .map_err(error::with_context(error_ctx))
}

/// Create a new tower::Service for uploading individual parts
pub(super) fn upload_part_service(
    ctx: &UploadContext,
) -> impl Service<UploadPartRequest, Response = Part, Error = Error, Future: Send> + Clone + Send {
    let svc = service_fn(upload_part_handler);
    ServiceBuilder::new()
        .concurrency_limit(ctx.handle.num_workers())
        .service(svc)
}

/// Split `body` into parts and upload them on `num_workers` tasks.
///
/// Returns every acknowledged part, in no particular order. The first failure cancels
/// `token`, which stops the remaining workers.
pub(super) async fn upload_parts(
    ctx: &UploadContext,
    session: &UploadSession,
    body: PartBody,
    part_size: u64,
    token: &CancellationToken,
) -> Result<Vec<Part>, Error> {
    let part_reader = Arc::new(
        PartReaderBuilder::new()
            .body(body)
            .part_size(part_size)
            .build(),
    );
    let part_count = part_reader.part_count();
    let svc = upload_part_service(ctx);
    let n_workers = ctx.handle.num_workers();
    tracing::trace!(part_count, n_workers, "distributing part uploads");

    let mut tasks = task::JoinSet::new();
    for i in 0..n_workers {
        let worker = read_body(
            part_reader.clone(),
            ctx.clone(),
            session.clone(),
            svc.clone(),
            token.clone(),
        )
        .instrument(tracing::debug_span!("upload-part-worker", worker = i));
        tasks.spawn(worker);
    }

    let mut parts = Vec::with_capacity(usize::try_from(part_count).unwrap_or_default());
    while let Some(join_result) = tasks.join_next().await {
        let result = join_result.map_err(Error::from).and_then(|r| r);
        match result {
            Ok(worker_parts) => parts.extend(worker_parts),
            Err(err) => {
                tracing::error!("part upload failed, stopping remaining workers");
                token.cancel();
                tasks.abort_all();
                while tasks.join_next().await.is_some() {}
                return Err(err);
            }
        }
    }
    Ok(parts)
}

async fn read_body(
    part_reader: Arc<PartReader>,
    ctx: UploadContext,
    session: UploadSession,
    svc: impl Service<UploadPartRequest, Response = Part, Error = Error, Future: Send>
        + Clone
        + Send
        + 'static,
    token: CancellationToken,
) -> Result<Vec<Part>, Error> {
    let mut parts = Vec::new();
    while let Some((part_number, body)) = part_reader.next_part()? {
        let req = UploadPartRequest {
            ctx: ctx.clone(),
            session: session.clone(),
            part_number,
            body,
        };
        let part = cancellable(Some(&token), svc.clone().oneshot(req))
            .await
            .map_err(error::with_context(
                ErrorContext::session(&session).with_part_number(part_number),
            ))?;
        parts.push(part);
    }
    Ok(parts)
}
