/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::operation;
use crate::store::ObjectStore;
use crate::types::{ConcurrencySetting, PartSize};
use crate::Config;
use crate::{DEFAULT_CONCURRENCY, DEFAULT_PART_SIZE};
use std::sync::Arc;

/// Multipart upload client for Amazon S3 and S3-compatible stores.
///
/// The client is cheap to clone and keeps no per-session state: every operation takes the
/// [`UploadSession`](crate::types::UploadSession) it acts on, so parts of one upload may be
/// sent from different clients, tasks, or processes.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, store, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete number of workers to use based on the concurrency setting.
    pub(crate) fn num_workers(&self) -> usize {
        match self.config.concurrency() {
            ConcurrencySetting::Explicit(concurrency) => (*concurrency).max(1),
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
        }
    }

    /// Get the concrete target part size to use for uploads
    pub(crate) fn upload_part_size_bytes(&self) -> u64 {
        match self.config.part_size() {
            PartSize::Auto => DEFAULT_PART_SIZE,
            PartSize::Target(explicit) => *explicit,
        }
    }

    /// The store requests are sent to
    pub(crate) fn store(&self) -> &dyn ObjectStore {
        self.config.store().as_ref()
    }
}

impl Client {
    /// Creates a new client from a config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Start a multipart upload session.
    ///
    /// Constructs a fluent builder for the
    /// [`InitiateUpload`](operation::initiate::builders::InitiateUploadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aws_s3_multipart::types::UploadOptions;
    ///
    /// async fn start(
    ///     client: &aws_s3_multipart::Client,
    /// ) -> Result<(), aws_s3_multipart::error::Error> {
    ///     let session = client
    ///         .initiate_upload()
    ///         .bucket("my-bucket")
    ///         .key("big.bin")
    ///         .options(UploadOptions::default().content_type("application/octet-stream"))
    ///         .send()
    ///         .await?;
    ///
    ///     // persist `session` somewhere durable; it is the only handle to the upload
    ///     println!("{}", session.upload_id());
    ///     Ok(())
    /// }
    /// ```
    pub fn initiate_upload(&self) -> operation::initiate::builders::InitiateUploadFluentBuilder {
        operation::initiate::builders::InitiateUploadFluentBuilder::new(self.handle.clone())
    }

    /// Upload one part of a session.
    ///
    /// Constructs a fluent builder for the
    /// [`UploadPart`](operation::upload_part::builders::UploadPartFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aws_s3_multipart::io::PartBody;
    /// use aws_s3_multipart::types::UploadSession;
    ///
    /// async fn send_part(
    ///     client: &aws_s3_multipart::Client,
    ///     session: &UploadSession,
    /// ) -> Result<(), aws_s3_multipart::error::Error> {
    ///     let body = PartBody::read_from()
    ///         .path("/tmp/big.bin")
    ///         .offset(0)
    ///         .length(8 * 1024 * 1024)
    ///         .build()?;
    ///
    ///     let part = client
    ///         .upload_part()
    ///         .session(session.clone())
    ///         .part_number(1)
    ///         .body(body)
    ///         .send()
    ///         .await?;
    ///     println!("{} {}", part.part_number(), part.e_tag());
    ///     Ok(())
    /// }
    /// ```
    pub fn upload_part(&self) -> operation::upload_part::builders::UploadPartFluentBuilder {
        operation::upload_part::builders::UploadPartFluentBuilder::new(self.handle.clone())
    }

    /// Assemble uploaded parts into the final object.
    ///
    /// Constructs a fluent builder for the
    /// [`CompleteUpload`](operation::complete::builders::CompleteUploadFluentBuilder) operation.
    pub fn complete_upload(&self) -> operation::complete::builders::CompleteUploadFluentBuilder {
        operation::complete::builders::CompleteUploadFluentBuilder::new(self.handle.clone())
    }

    /// Discard an upload session and its parts.
    ///
    /// Constructs a fluent builder for the
    /// [`AbortUpload`](operation::abort::builders::AbortUploadFluentBuilder) operation.
    pub fn abort_upload(&self) -> operation::abort::builders::AbortUploadFluentBuilder {
        operation::abort::builders::AbortUploadFluentBuilder::new(self.handle.clone())
    }

    /// List in-progress uploads of a bucket, one page at a time.
    ///
    /// Constructs a fluent builder for the
    /// [`ListUploads`](operation::list_uploads::builders::ListUploadsFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn list_all(
    ///     client: &aws_s3_multipart::Client,
    /// ) -> Result<(), aws_s3_multipart::error::Error> {
    ///     let mut paginator = client
    ///         .list_uploads()
    ///         .bucket("my-bucket")
    ///         .prefix("logs/")
    ///         .into_paginator()?;
    ///
    ///     while let Some(page) = paginator.next_page().await {
    ///         for upload in page?.items() {
    ///             println!("{} {}", upload.key(), upload.upload_id());
    ///         }
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn list_uploads(&self) -> operation::list_uploads::builders::ListUploadsFluentBuilder {
        operation::list_uploads::builders::ListUploadsFluentBuilder::new(self.handle.clone())
    }

    /// List the parts uploaded to a session, one page at a time.
    ///
    /// Constructs a fluent builder for the
    /// [`ListParts`](operation::list_parts::builders::ListPartsFluentBuilder) operation.
    pub fn list_parts(&self) -> operation::list_parts::builders::ListPartsFluentBuilder {
        operation::list_parts::builders::ListPartsFluentBuilder::new(self.handle.clone())
    }

    /// Find in-progress uploads of exactly one key.
    ///
    /// Use this to recover the session of an upload whose
    /// [`UploadSession`](crate::types::UploadSession) was lost.
    pub fn find_uploads(&self) -> operation::recover::builders::FindUploadsFluentBuilder {
        operation::recover::builders::FindUploadsFluentBuilder::new(self.handle.clone())
    }

    /// Load the parts already uploaded to a session so the upload can be finished.
    pub fn resume_upload(&self) -> operation::recover::builders::ResumeUploadFluentBuilder {
        operation::recover::builders::ResumeUploadFluentBuilder::new(self.handle.clone())
    }

    /// Abort every in-progress upload under a prefix, optionally only those initiated
    /// before a point in time.
    pub fn abort_incomplete_uploads(
        &self,
    ) -> operation::recover::builders::AbortIncompleteUploadsFluentBuilder {
        operation::recover::builders::AbortIncompleteUploadsFluentBuilder::new(self.handle.clone())
    }

    /// Upload a whole body as a multipart upload.
    ///
    /// The body is split into parts which are hashed and uploaded concurrently, then the
    /// upload is completed. On failure the upload is aborted unless
    /// [`FailedMultipartUploadPolicy::Retain`](crate::types::FailedMultipartUploadPolicy::Retain)
    /// is set.
    ///
    /// Constructs a fluent builder for the
    /// [`Upload`](operation::upload::builders::UploadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::error::Error;
    /// use std::path::Path;
    /// use aws_s3_multipart::io::PartBody;
    ///
    /// async fn upload_file(
    ///     client: &aws_s3_multipart::Client,
    ///     path: impl AsRef<Path>
    /// ) -> Result<(), Box<dyn Error>> {
    ///     let body = PartBody::from_path(path)?;
    ///     let handle = client.upload()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .body(body)
    ///         .initiate()?;
    ///
    ///     // initiate() will return before the transfer is complete.
    ///     // Call the `join()` method on the returned handle to drive the transfer to completion.
    ///     let response = handle.join().await?;
    ///     println!("{:?}", response.object().e_tag());
    ///     Ok(())
    /// }
    /// ```
    pub fn upload(&self) -> operation::upload::builders::UploadFluentBuilder {
        operation::upload::builders::UploadFluentBuilder::new(self.handle.clone())
    }
}
