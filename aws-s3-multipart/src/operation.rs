/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{self, Error};

/// Types for starting an upload session
pub mod initiate;

/// Types for uploading a single part
pub mod upload_part;

/// Types for completing an upload session
pub mod complete;

/// Types for aborting an upload session
pub mod abort;

/// Types for listing in-progress uploads
pub mod list_uploads;

/// Types for listing the parts of an upload session
pub mod list_parts;

/// Page-by-page iteration over store listings
pub mod paginator;

/// Types for finding, resuming, and cleaning up orphaned uploads
pub mod recover;

/// Types for uploading a whole body as a multipart upload
pub mod upload;

/// Run `fut` to completion unless `token` fires first.
///
/// A dropped store request leaves its effect at the store unknown.
pub(crate) async fn cancellable<F, T>(token: Option<&CancellationToken>, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match token {
        None => fut.await,
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(error::operation_cancelled()),
                result = fut => result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::cancellable;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let err = cancellable(Some(&token), async { Ok::<_, crate::error::Error>(1) })
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::OperationCancelled, err.kind());
    }

    #[tokio::test]
    async fn test_cancelled_while_pending() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move { child.cancel() });
        let err = cancellable(
            Some(&token),
            std::future::pending::<Result<(), crate::error::Error>>(),
        )
        .await
        .unwrap_err();
        assert_eq!(&ErrorKind::OperationCancelled, err.kind());
    }

    #[tokio::test]
    async fn test_no_token_runs_to_completion() {
        let value = cancellable(None, async { Ok::<_, crate::error::Error>(7) })
            .await
            .unwrap();
        assert_eq!(7, value);
    }
}
