/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::operation::paginator::UploadsPaginator;
use crate::types::{ListingPage, UploadSummary, UploadsMarker};

use super::ListUploadsInputBuilder;

/// Fluent builder for listing in-progress uploads
#[derive(Debug)]
pub struct ListUploadsFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: ListUploadsInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl ListUploadsFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Request a single page, starting after [`marker`](Self::marker) if one is set
    pub async fn send(self) -> Result<ListingPage<UploadSummary, UploadsMarker>, Error> {
        let input = self.inner.build()?;
        crate::operation::list_uploads::ListUploads::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// Page through the listing until the store reports it is complete
    pub fn into_paginator(self) -> Result<UploadsPaginator, Error> {
        let input = self.inner.build()?;
        crate::operation::list_uploads::ListUploads::paginator(
            self.handle,
            input,
            self.cancellation_token,
        )
    }

    /// The bucket to list
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// The bucket to list
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_bucket(input);
        self
    }

    /// The bucket to list
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// Only uploads whose key begins with this prefix
    pub fn prefix(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.prefix(input);
        self
    }

    /// Only uploads whose key begins with this prefix
    pub fn set_prefix(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_prefix(input);
        self
    }

    /// Only uploads whose key begins with this prefix
    pub fn get_prefix(&self) -> &Option<String> {
        self.inner.get_prefix()
    }

    /// Group keys that share a prefix up to the first occurrence of this string
    pub fn delimiter(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.delimiter(input);
        self
    }

    /// Grouping delimiter
    pub fn set_delimiter(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_delimiter(input);
        self
    }

    /// Grouping delimiter
    pub fn get_delimiter(&self) -> &Option<String> {
        self.inner.get_delimiter()
    }

    /// Resume the listing after this marker.
    ///
    /// The marker must come from a listing with the same bucket, prefix, and delimiter.
    /// This is not checked.
    pub fn marker(mut self, input: UploadsMarker) -> Self {
        self.inner = self.inner.marker(input);
        self
    }

    /// Resume the listing after this marker
    pub fn set_marker(mut self, input: Option<UploadsMarker>) -> Self {
        self.inner = self.inner.set_marker(input);
        self
    }

    /// Resume the listing after this marker
    pub fn get_marker(&self) -> &Option<UploadsMarker> {
        self.inner.get_marker()
    }

    /// Maximum number of uploads per page, at least 1. Values above 1000 are clamped.
    ///
    /// The store may return fewer.
    pub fn max_uploads(mut self, input: u32) -> Self {
        self.inner = self.inner.max_uploads(input);
        self
    }

    /// Maximum number of uploads per page
    pub fn set_max_uploads(mut self, input: Option<u32>) -> Self {
        self.inner = self.inner.set_max_uploads(input);
        self
    }

    /// Maximum number of uploads per page
    pub fn get_max_uploads(&self) -> &Option<u32> {
        self.inner.get_max_uploads()
    }

    /// Fail with `OperationCancelled` once this token is cancelled
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl ListUploadsInputBuilder {
    /// Request a single page with this input using the given client.
    pub async fn send_with(
        self,
        client: &crate::Client,
    ) -> Result<ListingPage<UploadSummary, UploadsMarker>, Error> {
        let mut fluent_builder = client.list_uploads();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
