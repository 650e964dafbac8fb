/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::operation::paginator::PartsPaginator;
use crate::types::{ListingPage, PartSummary, PartsMarker, UploadSession};

use super::ListPartsInputBuilder;

/// Fluent builder for listing the parts of an upload session
#[derive(Debug)]
pub struct ListPartsFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: ListPartsInputBuilder,
    cancellation_token: Option<CancellationToken>,
}

impl ListPartsFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
            cancellation_token: None,
        }
    }

    /// Request a single page of parts
    pub async fn send(self) -> Result<ListingPage<PartSummary, PartsMarker>, Error> {
        let input = self.inner.build()?;
        crate::operation::list_parts::ListParts::orchestrate(
            self.handle,
            input,
            self.cancellation_token,
        )
        .await
    }

    /// Page through every part of the session
    pub fn into_paginator(self) -> Result<PartsPaginator, Error> {
        let input = self.inner.build()?;
        crate::operation::list_parts::ListParts::paginator(
            self.handle,
            input,
            self.cancellation_token,
        )
    }

    /// The session whose parts to list
    pub fn session(mut self, input: UploadSession) -> Self {
        self.inner = self.inner.session(input);
        self
    }

    /// The session whose parts to list
    pub fn set_session(mut self, input: Option<UploadSession>) -> Self {
        self.inner = self.inner.set_session(input);
        self
    }

    /// The session whose parts to list
    pub fn get_session(&self) -> &Option<UploadSession> {
        self.inner.get_session()
    }

    /// Resume the listing after this marker
    pub fn marker(mut self, input: PartsMarker) -> Self {
        self.inner = self.inner.marker(input);
        self
    }

    /// Resume the listing after this marker
    pub fn set_marker(mut self, input: Option<PartsMarker>) -> Self {
        self.inner = self.inner.set_marker(input);
        self
    }

    /// Resume the listing after this marker
    pub fn get_marker(&self) -> &Option<PartsMarker> {
        self.inner.get_marker()
    }

    /// Maximum number of parts per page, at least 1. Values above 1000 are clamped.
    pub fn max_parts(mut self, input: u32) -> Self {
        self.inner = self.inner.max_parts(input);
        self
    }

    /// Maximum number of parts per page
    pub fn set_max_parts(mut self, input: Option<u32>) -> Self {
        self.inner = self.inner.set_max_parts(input);
        self
    }

    /// Maximum number of parts per page
    pub fn get_max_parts(&self) -> &Option<u32> {
        self.inner.get_max_parts()
    }

    /// Fail with `OperationCancelled` once this token is cancelled
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl ListPartsInputBuilder {
    /// Request a single page with this input using the given client.
    pub async fn send_with(
        self,
        client: &crate::Client,
    ) -> Result<ListingPage<PartSummary, PartsMarker>, Error> {
        let mut fluent_builder = client.list_parts();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
