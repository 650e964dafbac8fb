/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;
use std::time::Duration;

use aws_config::timeout::TimeoutConfig;

use crate::config::Builder;
use crate::store::s3::S3Store;
use crate::types::{ChecksumAlgorithm, ConcurrencySetting, PartSize};
use crate::Config;

/// Load multipart upload [`Config`] from the environment.
///
/// Region and credentials are resolved by `aws-config`. The endpoint and addressing style
/// can be overridden to reach S3-compatible stores such as MinIO.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    builder: Builder,
    endpoint_url: Option<String>,
    force_path_style: bool,
    operation_timeout: Option<Duration>,
    operation_attempt_timeout: Option<Duration>,
}

impl ConfigLoader {
    /// Checksum algorithm declared for new uploads.
    ///
    /// Default is [ChecksumAlgorithm::Crc64Nvme]
    pub fn checksum_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.builder = self.builder.checksum_algorithm(algorithm);
        self
    }

    /// The target size of each part when [`upload`](crate::Client::upload) splits a body.
    ///
    /// The minimum part size is 5 MiB, any part size less than that will be rounded up.
    /// Default is [PartSize::Auto]
    pub fn part_size(mut self, part_size: PartSize) -> Self {
        self.builder = self.builder.part_size(part_size);
        self
    }

    /// Set the concurrency level this component is allowed to use.
    ///
    /// This sets the maximum number of concurrent in-flight part uploads.
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.builder = self.builder.concurrency(concurrency);
        self
    }

    /// Highest accepted part number. Default is 10,000.
    pub fn part_number_limit(mut self, limit: u32) -> Self {
        self.builder = self.builder.part_number_limit(limit);
        self
    }

    /// Send requests to this endpoint instead of the regional Amazon S3 endpoint
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Use path-style addressing (`https://host/bucket/key`)
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Upper bound on a whole operation, retries included.
    ///
    /// Exceeding it fails the call with a transport timeout.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Upper bound on each individual attempt of an operation
    pub fn operation_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.operation_attempt_timeout = Some(timeout);
        self
    }

    fn timeout_config(&self) -> Option<TimeoutConfig> {
        if self.operation_timeout.is_none() && self.operation_attempt_timeout.is_none() {
            return None;
        }
        let mut timeouts = TimeoutConfig::builder();
        timeouts.set_operation_timeout(self.operation_timeout);
        timeouts.set_operation_attempt_timeout(self.operation_attempt_timeout);
        Some(timeouts.build())
    }

    /// Load the default configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> Config {
        let mut loader = aws_config::from_env();
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let Some(timeouts) = self.timeout_config() {
            loader = loader.timeout_config(timeouts);
        }
        let shared_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(self.force_path_style)
            .build();
        let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
        tracing::debug!(
            endpoint_url = ?self.endpoint_url,
            force_path_style = self.force_path_style,
            "loaded S3 client configuration"
        );
        self.builder
            .build_with_store(Arc::new(S3Store::new(s3_client)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ConfigLoader;

    #[test]
    fn test_no_timeouts_by_default() {
        assert!(ConfigLoader::default().timeout_config().is_none());
    }

    #[test]
    fn test_timeouts_carried_to_sdk() {
        let timeouts = ConfigLoader::default()
            .operation_attempt_timeout(Duration::from_secs(5))
            .timeout_config()
            .unwrap();
        assert_eq!(None, timeouts.operation_timeout());
        assert_eq!(
            Some(Duration::from_secs(5)),
            timeouts.operation_attempt_timeout()
        );

        let timeouts = ConfigLoader::default()
            .operation_timeout(Duration::from_secs(30))
            .operation_attempt_timeout(Duration::from_secs(5))
            .timeout_config()
            .unwrap();
        assert_eq!(Some(Duration::from_secs(30)), timeouts.operation_timeout());
    }
}
