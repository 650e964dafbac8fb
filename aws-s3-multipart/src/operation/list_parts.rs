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

/// Request type for listing the parts of an upload session
pub use input::{ListPartsInput, ListPartsInputBuilder};

use crate::error::{self, Error, ErrorContext};
use crate::operation::cancellable;
use crate::operation::list_uploads::page_size;
use crate::operation::paginator::{Paginator, PartsPaginator};
use crate::store::ListPartsRequest;
use crate::types::{ListingPage, PartSummary, PartsMarker};

/// Operation struct for listing the parts of an upload session
#[derive(Clone, Default, Debug)]
pub(crate) struct ListParts;

impl ListParts {
    /// Execute a single `ListParts` page request
    #[tracing::instrument(skip_all, level = "debug", name = "list-parts")]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: ListPartsInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<ListingPage<PartSummary, PartsMarker>, Error> {
        let mut request = request_from(&input)?;
        request.marker = input.marker;
        let ctx = ErrorContext::session(&request.session);
        cancellable(
            cancellation_token.as_ref(),
            handle.store().list_parts(request),
        )
        .await
        .map_err(error::with_context(ctx))
    }

    /// Validate the input and build a paginator over every page
    pub(crate) fn paginator(
        handle: Arc<crate::client::Handle>,
        input: ListPartsInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<PartsPaginator, Error> {
        let request = request_from(&input)?;
        let fetch = Box::new(move |marker: Option<PartsMarker>| {
            let handle = handle.clone();
            let mut request = request.clone();
            request.marker = marker;
            async move {
                let ctx = ErrorContext::session(&request.session);
                handle
                    .store()
                    .list_parts(request)
                    .await
                    .map_err(error::with_context(ctx))
            }
            .boxed()
        });
        Ok(Paginator::new(fetch, input.marker, cancellation_token))
    }
}

fn request_from(input: &ListPartsInput) -> Result<ListPartsRequest, Error> {
    input.session.validate()?;
    let max_parts = page_size(input.max_parts, "max_parts")
        .map_err(error::with_context(ErrorContext::session(&input.session)))?;
    Ok(ListPartsRequest {
        session: input.session.clone(),
        marker: None,
        max_parts,
    })
}

#[cfg(test)]
mod test {
    use aws_sdk_s3::operation::list_parts::ListPartsOutput;
    use aws_sdk_s3::types::Part;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};

    use crate::error::ErrorKind;
    use crate::store::s3::{error_response, stub_http_client};
    use crate::types::{PartsMarker, UploadSession};

    fn test_client(client: aws_sdk_s3::Client) -> crate::Client {
        let config = crate::Config::builder().client(client).build().unwrap();
        crate::Client::new(config)
    }

    fn part(n: i32) -> Part {
        Part::builder()
            .part_number(n)
            .e_tag(format!("e{n}"))
            .size(5)
            .build()
    }

    #[tokio::test]
    async fn test_list_parts_single_page() {
        let list = mock!(aws_sdk_s3::Client::list_parts)
            .match_requests(|r| {
                r.upload_id() == Some("U1")
                    && r.key() == Some("k")
                    && r.part_number_marker() == Some("4")
                    && r.max_parts() == Some(10)
            })
            .then_output(|| {
                ListPartsOutput::builder()
                    .parts(part(5))
                    .is_truncated(false)
                    .build()
            });
        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&list]));

        let page = client
            .list_parts()
            .session(UploadSession::new("b", "k", "U1"))
            .marker(PartsMarker::new("4"))
            .max_parts(10)
            .send()
            .await
            .unwrap();
        assert_eq!(5, page.items()[0].part_number());
        assert_eq!("e5", page.items()[0].e_tag());
    }

    #[tokio::test]
    async fn test_list_parts_paginates_in_order() {
        let page1 = mock!(aws_sdk_s3::Client::list_parts)
            .match_requests(|r| r.part_number_marker().is_none())
            .then_output(|| {
                ListPartsOutput::builder()
                    .parts(part(1))
                    .parts(part(2))
                    .is_truncated(true)
                    .next_part_number_marker("2")
                    .build()
            });
        let page2 = mock!(aws_sdk_s3::Client::list_parts)
            .match_requests(|r| r.part_number_marker() == Some("2"))
            .then_output(|| {
                ListPartsOutput::builder()
                    .parts(part(3))
                    .is_truncated(false)
                    .build()
            });
        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&page1, &page2]
        ));

        let parts = client
            .list_parts()
            .session(UploadSession::new("b", "k", "U1"))
            .max_parts(2)
            .into_paginator()
            .unwrap()
            .try_collect_items()
            .await
            .unwrap();
        let numbers: Vec<_> = parts.iter().map(|p| p.part_number()).collect();
        assert_eq!(vec![1, 2, 3], numbers);
    }

    #[tokio::test]
    async fn test_list_parts_closed_session() {
        let list = mock!(aws_sdk_s3::Client::list_parts)
            .then_http_response(|| error_response("NoSuchUpload", 404));
        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&list],
            |c| c.http_client(stub_http_client())
        ));

        let err = client
            .list_parts()
            .session(UploadSession::new("b", "k", "U1"))
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::SessionClosed, err.kind());
        assert_eq!(Some("U1"), err.context().upload_id());
    }

    #[tokio::test]
    async fn test_list_parts_invalid_session() {
        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[]));
        let err = client
            .list_parts()
            .session(UploadSession::new("b", "k", ""))
            .into_paginator()
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());

        let err = client
            .list_parts()
            .session(UploadSession::new("b", "k", "U1"))
            .max_parts(0)
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::InvalidArgument, err.kind());
    }
}
