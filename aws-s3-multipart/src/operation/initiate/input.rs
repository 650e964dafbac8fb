/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::types::{ChecksumAlgorithm, UploadOptions};

/// Input type for starting an upload session
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct InitiateUploadInput {
    /// The bucket the object will be written to
    pub bucket: Option<String>,

    /// The key the object will be written to
    pub key: Option<String>,

    /// Content headers, metadata, storage class and encryption for the object
    pub options: UploadOptions,

    /// Checksum algorithm the parts will carry. Defaults to the client's configured algorithm.
    pub checksum_algorithm: Option<ChecksumAlgorithm>,
}

impl InitiateUploadInput {
    /// Creates a new builder-style object to manufacture [`InitiateUploadInput`](crate::operation::initiate::InitiateUploadInput).
    pub fn builder() -> InitiateUploadInputBuilder {
        InitiateUploadInputBuilder::default()
    }

    /// The bucket the object will be written to
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The key the object will be written to
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Content headers, metadata, storage class and encryption for the object
    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Checksum algorithm the parts will carry
    pub fn checksum_algorithm(&self) -> Option<ChecksumAlgorithm> {
        self.checksum_algorithm
    }
}

/// A builder for [`InitiateUploadInput`](crate::operation::initiate::InitiateUploadInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct InitiateUploadInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) options: Option<UploadOptions>,
    pub(crate) checksum_algorithm: Option<ChecksumAlgorithm>,
}

impl InitiateUploadInputBuilder {
    /// The bucket the object will be written to
    ///
    /// NOTE: A bucket name is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The bucket the object will be written to
    ///
    /// NOTE: A bucket name is required.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The bucket the object will be written to
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// The key the object will be written to
    ///
    /// NOTE: A key is required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// The key the object will be written to
    ///
    /// NOTE: A key is required.
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.key = input;
        self
    }

    /// The key the object will be written to
    pub fn get_key(&self) -> &Option<String> {
        &self.key
    }

    /// Content headers, metadata, storage class and encryption for the object
    pub fn options(mut self, input: UploadOptions) -> Self {
        self.options = Some(input);
        self
    }

    /// Content headers, metadata, storage class and encryption for the object
    pub fn set_options(mut self, input: Option<UploadOptions>) -> Self {
        self.options = input;
        self
    }

    /// Content headers, metadata, storage class and encryption for the object
    pub fn get_options(&self) -> &Option<UploadOptions> {
        &self.options
    }

    /// Checksum algorithm the parts will carry
    pub fn checksum_algorithm(mut self, input: ChecksumAlgorithm) -> Self {
        self.checksum_algorithm = Some(input);
        self
    }

    /// Checksum algorithm the parts will carry
    pub fn set_checksum_algorithm(mut self, input: Option<ChecksumAlgorithm>) -> Self {
        self.checksum_algorithm = input;
        self
    }

    /// Checksum algorithm the parts will carry
    pub fn get_checksum_algorithm(&self) -> &Option<ChecksumAlgorithm> {
        &self.checksum_algorithm
    }

    /// Consumes the builder and constructs a [`InitiateUploadInput`](crate::operation::initiate::InitiateUploadInput).
    pub fn build(self) -> Result<InitiateUploadInput, BuildError> {
        if self.bucket.is_none() {
            return Err(BuildError::missing_field("bucket", "A bucket is required"));
        }
        if self.key.is_none() {
            return Err(BuildError::missing_field("key", "A key is required"));
        }

        Ok(InitiateUploadInput {
            bucket: self.bucket,
            key: self.key,
            options: self.options.unwrap_or_default(),
            checksum_algorithm: self.checksum_algorithm,
        })
    }
}
