/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;

use std::sync::Arc;

use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;

/// Request type for listing in-progress uploads
pub use input::{ListUploadsInput, ListUploadsInputBuilder};

use crate::error::{self, Error, ErrorContext};
use crate::operation::cancellable;
use crate::operation::paginator::{Paginator, UploadsPaginator};
use crate::store::ListUploadsRequest;
use crate::types::{ListingPage, UploadSummary, UploadsMarker};

/// Operation struct for listing in-progress uploads
#[derive(Clone, Default, Debug)]
pub(crate) struct ListUploads;

impl ListUploads {
    /// Execute a single `ListUploads` page request
    #[tracing::instrument(skip_all, level = "debug", name = "list-uploads")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: ListUploadsInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<ListingPage<UploadSummary, UploadsMarker>, Error> {
        let mut request = request_from(&input)?;
        request.marker = input.marker;
        let ctx = ErrorContext::bucket(&request.bucket);
        cancellable(
            cancellation_token.as_ref(),
            handle.store().list_multipart_uploads(request),
        )
        .await
        .map_err(error::with_context(ctx))
    }

    /// Validate the input and build a paginator over every page
    pub(crate) fn paginator(
        handle: Arc<crate::client::Handle>,
        input: ListUploadsInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<UploadsPaginator, Error> {
        let request = request_from(&input)?;
        let fetch = Box::new(move |marker: Option<UploadsMarker>| {
            let handle = handle.clone();
            let mut request = request.clone();
            request.marker = marker;
            async move {
                let ctx = ErrorContext::bucket(&request.bucket);
                handle
                    .store()
                    .list_multipart_uploads(request)
                    .await
                    .map_err(error::with_context(ctx))
            }
            .boxed()
        });
        Ok(Paginator::new(fetch, input.marker, cancellation_token))
    }
}

/// Page size to request: at least 1, at most what the store will return
pub(crate) fn page_size(requested: Option<u32>, field: &'static str) -> Result<u32, Error> {
    match requested {
        None => Ok(crate::MAX_LIST_RESULTS),
        Some(0) => Err(error::invalid_argument(format!(
            "{field} must be at least 1"
        ))),
        Some(n) => Ok(n.min(crate::MAX_LIST_RESULTS)),
    }
}

/// Everything but the marker
fn request_from(input: &ListUploadsInput) -> Result<ListUploadsRequest, Error> {
    let bucket = input.bucket.clone().unwrap_or_default();
    if bucket.is_empty() {
        return Err(error::invalid_argument("bucket must not be empty"));
    }
    let max_uploads = page_size(input.max_uploads, "max_uploads")
        .map_err(error::with_context(ErrorContext::bucket(&bucket)))?;
    Ok(ListUploadsRequest {
        bucket,
        prefix: input.prefix.clone(),
        delimiter: input.delimiter.clone(),
        marker: None,
        max_uploads,
    })
}
