/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error};
use crate::io::hasher::DEFAULT_BUFFER_SIZE;
use crate::store::s3::S3Store;
use crate::store::ObjectStore;
use crate::types::{ChecksumAlgorithm, ConcurrencySetting, PartSize};
use crate::{MAX_PART_NUMBER, MEBIBYTE, MIN_PART_NUMBER};
use std::cmp;
use std::sync::Arc;

/// Config loader
pub mod loader;

/// Minimum upload part size in bytes
const MIN_MULTIPART_PART_SIZE_BYTES: u64 = 5 * MEBIBYTE;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    store: Arc<dyn ObjectStore>,
    checksum_algorithm: ChecksumAlgorithm,
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    hash_buffer_size: usize,
    part_number_limit: u32,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The object store requests are sent to
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Checksum algorithm declared for new uploads
    pub fn checksum_algorithm(&self) -> ChecksumAlgorithm {
        self.checksum_algorithm
    }

    /// Returns a reference to the target part size used by [`upload`](crate::Client::upload)
    pub fn part_size(&self) -> &PartSize {
        &self.target_part_size
    }

    /// Returns the concurrency setting used by [`upload`](crate::Client::upload)
    pub fn concurrency(&self) -> &ConcurrencySetting {
        &self.concurrency
    }

    /// Size of the buffer used to stream part bodies through the hasher
    pub fn hash_buffer_size(&self) -> usize {
        self.hash_buffer_size
    }

    /// Highest part number accepted by [`upload_part`](crate::Client::upload_part)
    pub fn part_number_limit(&self) -> u32 {
        self.part_number_limit
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    store: Option<Arc<dyn ObjectStore>>,
    checksum_algorithm: ChecksumAlgorithm,
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    hash_buffer_size: Option<usize>,
    part_number_limit: Option<u32>,
}

impl Builder {
    /// Checksum algorithm declared when an upload is initiated and used to hash parts.
    ///
    /// Default is [ChecksumAlgorithm::Crc64Nvme]
    pub fn checksum_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.checksum_algorithm = algorithm;
        self
    }

    /// The target size of each part when [`upload`](crate::Client::upload) splits a body.
    ///
    /// The minimum part size is 5 MiB, any part size less than that will be rounded up.
    ///
    /// NOTE: The actual part size used may be larger than the configured part size if
    /// the current value would result in more than 10,000 parts for an upload request.
    ///
    /// Default is [PartSize::Auto]
    pub fn part_size(self, part_size: PartSize) -> Self {
        let part_size = match part_size {
            PartSize::Target(part_size) => {
                PartSize::Target(cmp::max(part_size, MIN_MULTIPART_PART_SIZE_BYTES))
            }
            tps => tps,
        };

        self.set_target_part_size(part_size)
    }

    /// Target part size for a multipart upload.
    ///
    /// NOTE: This does not validate the setting and is meant for internal use only.
    pub(crate) fn set_target_part_size(mut self, part_size: PartSize) -> Self {
        self.target_part_size = part_size;
        self
    }

    /// Set the concurrency level this component is allowed to use.
    ///
    /// This sets the maximum number of concurrent in-flight part uploads for a single
    /// [`upload`](crate::Client::upload). Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Size of the read buffer used when hashing part bodies. Default is 64 KiB.
    pub fn hash_buffer_size(mut self, buffer_size: usize) -> Self {
        self.hash_buffer_size = Some(buffer_size.max(1));
        self
    }

    /// Highest accepted part number, clamped to `1..=10000`. Default is 10,000.
    ///
    /// Some S3-compatible stores accept fewer parts than Amazon S3.
    pub fn part_number_limit(mut self, limit: u32) -> Self {
        self.part_number_limit = Some(limit.clamp(MIN_PART_NUMBER, MAX_PART_NUMBER));
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(self, client: aws_sdk_s3::Client) -> Self {
        self.store(S3Store::new(client))
    }

    /// Set the object store to use, e.g. an S3-compatible store with its own transport.
    pub fn store(mut self, store: impl ObjectStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    ///
    /// Fails with `InvalidArgument` if neither a client nor a store was set.
    pub fn build(self) -> Result<Config, Error> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| error::invalid_argument("an S3 client or object store is required"))?;
        Ok(self.build_with_store(store))
    }

    pub(crate) fn build_with_store(self, store: Arc<dyn ObjectStore>) -> Config {
        Config {
            store,
            checksum_algorithm: self.checksum_algorithm,
            target_part_size: self.target_part_size,
            concurrency: self.concurrency,
            hash_buffer_size: self.hash_buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE),
            part_number_limit: self.part_number_limit.unwrap_or(MAX_PART_NUMBER),
        }
    }
}
