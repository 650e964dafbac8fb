/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::types::UploadsMarker;

/// Input type for listing in-progress uploads
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListUploadsInput {
    /// The bucket to list
    pub bucket: Option<String>,

    /// Only uploads whose key begins with this prefix
    pub prefix: Option<String>,

    /// Group keys that share a prefix up to the first occurrence of this string
    pub delimiter: Option<String>,

    /// Resume the listing after this marker
    pub marker: Option<UploadsMarker>,

    /// Maximum number of uploads per page
    pub max_uploads: Option<u32>,
}

impl ListUploadsInput {
    /// Creates a new builder-style object to manufacture [`ListUploadsInput`](crate::operation::list_uploads::ListUploadsInput).
    pub fn builder() -> ListUploadsInputBuilder {
        ListUploadsInputBuilder::default()
    }

    /// The bucket to list
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Only uploads whose key begins with this prefix
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Grouping delimiter
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    /// Resume the listing after this marker
    pub fn marker(&self) -> Option<&UploadsMarker> {
        self.marker.as_ref()
    }

    /// Maximum number of uploads per page
    pub fn max_uploads(&self) -> Option<u32> {
        self.max_uploads
    }
}

/// A builder for [`ListUploadsInput`](crate::operation::list_uploads::ListUploadsInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct ListUploadsInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) delimiter: Option<String>,
    pub(crate) marker: Option<UploadsMarker>,
    pub(crate) max_uploads: Option<u32>,
}

impl ListUploadsInputBuilder {
    /// The bucket to list
    ///
    /// NOTE: A bucket name is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The bucket to list
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The bucket to list
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// Only uploads whose key begins with this prefix
    pub fn prefix(mut self, input: impl Into<String>) -> Self {
        self.prefix = Some(input.into());
        self
    }

    /// Only uploads whose key begins with this prefix
    pub fn set_prefix(mut self, input: Option<String>) -> Self {
        self.prefix = input;
        self
    }

    /// Only uploads whose key begins with this prefix
    pub fn get_prefix(&self) -> &Option<String> {
        &self.prefix
    }

    /// Group keys that share a prefix up to the first occurrence of this string.
    ///
    /// Grouped keys are reported once, as common prefixes, instead of as uploads.
    pub fn delimiter(mut self, input: impl Into<String>) -> Self {
        self.delimiter = Some(input.into());
        self
    }

    /// Grouping delimiter
    pub fn set_delimiter(mut self, input: Option<String>) -> Self {
        self.delimiter = input;
        self
    }

    /// Grouping delimiter
    pub fn get_delimiter(&self) -> &Option<String> {
        &self.delimiter
    }

    /// Resume the listing after this marker.
    ///
    /// The marker must come from a listing with the same bucket, prefix, and delimiter.
    pub fn marker(mut self, input: UploadsMarker) -> Self {
        self.marker = Some(input);
        self
    }

    /// Resume the listing after this marker
    pub fn set_marker(mut self, input: Option<UploadsMarker>) -> Self {
        self.marker = input;
        self
    }

    /// Resume the listing after this marker
    pub fn get_marker(&self) -> &Option<UploadsMarker> {
        &self.marker
    }

    /// Maximum number of uploads per page, at least 1. Values above 1000 are clamped.
    pub fn max_uploads(mut self, input: u32) -> Self {
        self.max_uploads = Some(input);
        self
    }

    /// Maximum number of uploads per page
    pub fn set_max_uploads(mut self, input: Option<u32>) -> Self {
        self.max_uploads = input;
        self
    }

    /// Maximum number of uploads per page
    pub fn get_max_uploads(&self) -> &Option<u32> {
        &self.max_uploads
    }

    /// Consumes the builder and constructs a [`ListUploadsInput`](crate::operation::list_uploads::ListUploadsInput).
    pub fn build(self) -> Result<ListUploadsInput, BuildError> {
        if self.bucket.is_none() {
            return Err(BuildError::missing_field("bucket", "A bucket is required"));
        }

        Ok(ListUploadsInput {
            bucket: self.bucket,
            prefix: self.prefix,
            delimiter: self.delimiter,
            marker: self.marker,
            max_uploads: self.max_uploads,
        })
    }
}
