/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use futures_util::future::BoxFuture;
use futures_util::stream::{self, Stream};
use tokio_util::sync::CancellationToken;

use crate::error::{self, Error};
use crate::operation::cancellable;
use crate::types::{ListingPage, PartSummary, PartsMarker, UploadSummary, UploadsMarker};

/// Paginator over in-progress uploads
pub type UploadsPaginator = Paginator<UploadSummary, UploadsMarker>;

/// Paginator over the parts of an upload session
pub type PartsPaginator = Paginator<PartSummary, PartsMarker>;

pub(crate) type FetchPage<T, M> =
    Box<dyn Fn(Option<M>) -> BoxFuture<'static, Result<ListingPage<T, M>, Error>> + Send + Sync>;

/// Requests listing pages one at a time until the store reports the listing is complete.
///
/// `is_truncated == false` is the only end signal: empty pages that are still truncated
/// are passed through and paging continues. A truncated page without a continuation
/// marker fails with `StoreRejected`, as does a marker that does not advance, since
/// continuing would repeat the listing forever.
///
/// If a page request fails, calling [`next_page`](Self::next_page) again retries the same page.
pub struct Paginator<T, M> {
    fetch: FetchPage<T, M>,
    state: State<M>,
    cancellation_token: Option<CancellationToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State<M> {
    Paginating { marker: Option<M> },
    Done,
}

impl<M> State<M>
where
    M: Clone + PartialEq,
{
    fn next_state<T>(self, page: &ListingPage<T, M>) -> Result<State<M>, Error> {
        let prev_marker = match self {
            State::Done => return Ok(State::Done),
            State::Paginating { marker } => marker,
        };

        if !page.is_truncated() {
            return Ok(State::Done);
        }

        match page.next_marker() {
            None => Err(error::store_rejected(
                "listing page is truncated but carries no continuation marker",
            )),
            Some(next) if prev_marker.as_ref() == Some(next) => Err(error::store_rejected(
                "listing continuation marker did not advance",
            )),
            Some(next) => Ok(State::Paginating {
                marker: Some(next.clone()),
            }),
        }
    }
}

impl<T, M> Paginator<T, M>
where
    T: Send + 'static,
    M: Clone + PartialEq + Send + 'static,
{
    pub(crate) fn new(
        fetch: FetchPage<T, M>,
        start_marker: Option<M>,
        cancellation_token: Option<CancellationToken>,
    ) -> Self {
        Self {
            fetch,
            state: State::Paginating {
                marker: start_marker,
            },
            cancellation_token,
        }
    }

    /// The next page, or `None` once the last page has been returned.
    pub async fn next_page(&mut self) -> Option<Result<ListingPage<T, M>, Error>> {
        let marker = match &self.state {
            State::Done => return None,
            State::Paginating { marker } => marker.clone(),
        };

        let result = cancellable(self.cancellation_token.as_ref(), (self.fetch)(marker)).await;
        match result {
            Ok(page) => {
                let prev_state = std::mem::replace(&mut self.state, State::Done);
                match prev_state.next_state(&page) {
                    Ok(next_state) => {
                        self.state = next_state;
                        tracing::trace!(
                            items = page.items().len(),
                            is_truncated = page.is_truncated(),
                            "received listing page"
                        );
                        Some(Ok(page))
                    }
                    Err(err) => Some(Err(err)),
                }
            }
            Err(err) => Some(Err(err)),
        }
    }

    /// Convert into a stream of pages. The stream ends after the first error.
    pub fn into_page_stream(self) -> impl Stream<Item = Result<ListingPage<T, M>, Error>> + Send {
        stream::unfold(Some(self), |paginator| async move {
            let mut paginator = paginator?;
            match paginator.next_page().await? {
                Ok(page) => Some((Ok(page), Some(paginator))),
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    /// Request every remaining page and concatenate their items.
    pub async fn try_collect_items(mut self) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await {
            items.extend(page?.into_items());
        }
        Ok(items)
    }
}

impl<T, M: fmt::Debug> fmt::Debug for Paginator<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("state", &self.state)
            .field("cancellation_token", &self.cancellation_token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use futures_util::{FutureExt, StreamExt};
    use tokio_util::sync::CancellationToken;

    use super::{Paginator, State};
    use crate::error::ErrorKind;
    use crate::types::{ListingPage, PartsMarker};

    fn page(
        items: &[u32],
        is_truncated: bool,
        next: Option<&str>,
    ) -> ListingPage<u32, PartsMarker> {
        ListingPage::new(items.to_vec(), is_truncated, next.map(PartsMarker::new))
    }

    /// Serves pages from a list and records the markers it was called with
    fn scripted(
        pages: Vec<ListingPage<u32, PartsMarker>>,
    ) -> (Paginator<u32, PartsMarker>, Arc<Mutex<Vec<Option<String>>>>) {
        let pages = Arc::new(Mutex::new(pages.into_iter()));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();
        let paginator = Paginator::new(
            Box::new(move |marker: Option<PartsMarker>| {
                recorded
                    .lock()
                    .unwrap()
                    .push(marker.map(|m| m.as_str().to_owned()));
                let next = pages.lock().unwrap().next();
                async move {
                    next.ok_or_else(|| crate::error::invalid_argument("no more scripted pages"))
                }
                .boxed()
            }),
            None,
            None,
        );
        (paginator, calls)
    }

    #[test]
    fn test_next_state() {
        let start: State<PartsMarker> = State::Paginating { marker: None };

        let state2 = start.next_state(&page(&[1, 2], true, Some("2"))).unwrap();
        assert_eq!(
            state2,
            State::Paginating {
                marker: Some(PartsMarker::new("2"))
            }
        );

        // sparse page
        let state3 = state2.next_state(&page(&[], true, Some("3"))).unwrap();
        assert_eq!(
            state3,
            State::Paginating {
                marker: Some(PartsMarker::new("3"))
            }
        );

        let state4 = state3.next_state(&page(&[4], false, None)).unwrap();
        assert_eq!(state4, State::Done);

        // last page markers are ignored
        let done = State::Paginating { marker: None }
            .next_state(&page(&[1], false, Some("1")))
            .unwrap();
        assert_eq!(done, State::Done);
    }

    #[test]
    fn test_next_state_truncated_without_marker() {
        let err = State::<PartsMarker>::Paginating { marker: None }
            .next_state(&page(&[1], true, None))
            .unwrap_err();
        assert_eq!(&ErrorKind::StoreRejected, err.kind());
    }

    #[test]
    fn test_next_state_marker_must_advance() {
        let err = State::Paginating {
            marker: Some(PartsMarker::new("5")),
        }
        .next_state(&page(&[], true, Some("5")))
        .unwrap_err();
        assert_eq!(&ErrorKind::StoreRejected, err.kind());
    }

    #[tokio::test]
    async fn test_pages_until_not_truncated() {
        let (mut paginator, calls) = scripted(vec![
            page(&[1, 2], true, Some("2")),
            page(&[], true, Some("2b")),
            page(&[3], false, None),
        ]);

        let mut seen = Vec::new();
        while let Some(page) = paginator.next_page().await {
            seen.extend(page.unwrap().into_items());
        }
        assert_eq!(vec![1, 2, 3], seen);
        assert_eq!(
            vec![None, Some("2".to_owned()), Some("2b".to_owned())],
            *calls.lock().unwrap()
        );
        assert!(paginator.next_page().await.is_none());
    }

    #[tokio::test]
    async fn test_try_collect_items_no_duplicates() {
        let (paginator, _) = scripted(vec![
            page(&[1, 2, 3], true, Some("3")),
            page(&[4, 5, 6], true, Some("6")),
            page(&[7], false, None),
        ]);
        let items = paginator.try_collect_items().await.unwrap();
        let unique: HashSet<_> = items.iter().collect();
        assert_eq!(items.len(), unique.len());
        assert_eq!(7, items.len());
    }

    #[tokio::test]
    async fn test_page_stream_stops_after_error() {
        let (paginator, calls) = scripted(vec![page(&[1], true, None)]);
        let results: Vec<_> = paginator.into_page_stream().collect().await;
        assert_eq!(1, results.len());
        assert_eq!(
            &ErrorKind::StoreRejected,
            results[0].as_ref().unwrap_err().kind()
        );
        assert_eq!(1, calls.lock().unwrap().len());
    }

    #[tokio::test]
    async fn test_cancelled_paginator() {
        let token = CancellationToken::new();
        token.cancel();
        let (paginator, calls) = scripted(vec![page(&[1], false, None)]);
        let mut paginator = Paginator {
            cancellation_token: Some(token),
            ..paginator
        };
        let err = paginator.next_page().await.unwrap().unwrap_err();
        assert_eq!(&ErrorKind::OperationCancelled, err.kind());
        // the fetch future is created but never polled
        assert_eq!(1, calls.lock().unwrap().len());
    }
}
