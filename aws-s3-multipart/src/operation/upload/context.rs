/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::{Arc, OnceLock};

use crate::error::{Error, ErrorContext, ErrorKind};
use crate::types::{FailedMultipartUploadPolicy, SseCustomerKey, UploadSession};

/// Internal context used to drive a single Upload operation
#[derive(Debug, Clone)]
pub(crate) struct UploadContext {
    /// reference to client handle used to do actual work
    pub(crate) handle: Arc<crate::client::Handle>,
    /// the session, once the store has assigned one
    pub(crate) session: Arc<OnceLock<UploadSession>>,
    /// customer provided key that every part and the completion must repeat
    pub(crate) sse_customer_key: Option<SseCustomerKey>,
    pub(crate) failure_policy: FailedMultipartUploadPolicy,
    bucket: Arc<str>,
    key: Arc<str>,
}

impl UploadContext {
    pub(crate) fn new(
        handle: Arc<crate::client::Handle>,
        bucket: &str,
        key: &str,
        sse_customer_key: Option<SseCustomerKey>,
        failure_policy: FailedMultipartUploadPolicy,
    ) -> Self {
        Self {
            handle,
            session: Arc::new(OnceLock::new()),
            sse_customer_key,
            failure_policy,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// The session, if the upload got far enough to be initiated
    pub(crate) fn session(&self) -> Option<&UploadSession> {
        self.session.get()
    }

    /// Record the session the store assigned; an upload is initiated once
    pub(crate) fn set_session(&self, session: UploadSession) -> Result<(), Error> {
        self.session.set(session).map_err(|rejected| {
            Error::new(
                ErrorKind::RuntimeError,
                format!(
                    "upload of {}/{} already has a session, refusing {}",
                    self.bucket,
                    self.key,
                    rejected.upload_id()
                ),
            )
        })
    }

    /// Error context for this upload, including the upload ID once one exists
    pub(crate) fn error_context(&self) -> ErrorContext {
        match self.session() {
            Some(session) => ErrorContext::session(session),
            None => ErrorContext::object(self.bucket.as_ref(), self.key.as_ref()),
        }
    }
}
