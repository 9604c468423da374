//! Enumeration of every key under a bucket/prefix.
//!
//! The listing is exposed both as a lazy stream of pages and as a fully
//! materialized key sequence. Callers that fetch objects use [`ObjectLister::list_all`]
//! so no fetch starts before the last page has arrived.

use crate::model::error::{DumpError, DumpResult, S3Error};
use crate::model::object_key::{ListingPage, ObjectKey};
use crate::services::object_backend::{with_timeout, ObjectBackend};
use futures::{stream, Stream, TryStreamExt};
use std::collections::HashSet;
use std::time::Duration;

enum Cursor {
    Start,
    Next(String),
    Done,
}

struct PageState {
    cursor: Cursor,
    seen_tokens: HashSet<String>,
}

pub struct ObjectLister<'a, B: ?Sized> {
    backend: &'a B,
    timeout: Option<Duration>,
}

impl<'a, B: ObjectBackend + ?Sized> ObjectLister<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        ObjectLister {
            backend,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lazily walks the listing one page at a time, following continuation tokens.
    ///
    /// The stream ends after the first page that is not truncated. A truncated
    /// page without a token, or a token handed out twice, ends it with an error.
    pub fn pages<'s>(
        &self,
        bucket: &'s str,
        prefix: Option<&'s str>,
    ) -> impl Stream<Item = DumpResult<ListingPage>> + 's
    where
        'a: 's,
    {
        page_stream(self.backend, self.timeout, bucket, prefix)
    }

    /// Collect every key under `prefix`, in backend order, across all pages.
    pub async fn list_all(&self, bucket: &str, prefix: Option<&str>) -> DumpResult<Vec<ObjectKey>> {
        let pages = self.pages(bucket, prefix);
        futures::pin_mut!(pages);

        let mut all_keys = Vec::new();
        let mut page_count = 0usize;
        while let Some(page) = pages.try_next().await? {
            page_count += 1;
            all_keys.extend(page.keys);
            if page.is_truncated {
                tracing::debug!("Got {} bucket keys, continuing...", all_keys.len());
            }
        }
        tracing::debug!(
            "Completed collection with {} keys over {} pages.",
            all_keys.len(),
            page_count
        );
        Ok(all_keys)
    }
}

fn page_stream<'s, B: ObjectBackend + ?Sized>(
    backend: &'s B,
    timeout: Option<Duration>,
    bucket: &'s str,
    prefix: Option<&'s str>,
) -> impl Stream<Item = DumpResult<ListingPage>> + 's {
    let initial = PageState {
        cursor: Cursor::Start,
        seen_tokens: HashSet::new(),
    };

    stream::try_unfold(initial, move |mut state| async move {
        let token = match std::mem::replace(&mut state.cursor, Cursor::Done) {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
        };

        let page = with_timeout(
            timeout,
            backend.list_page(bucket, prefix.map(str::to_string), token),
        )
        .await
        .map_err(DumpError::Enumeration)?;

        if page.is_truncated {
            let next = page.next_continuation_token.clone().ok_or_else(|| {
                DumpError::Enumeration(S3Error::Protocol(
                    "truncated listing without a continuation token".to_string(),
                ))
            })?;
            if !state.seen_tokens.insert(next.clone()) {
                return Err(DumpError::Enumeration(S3Error::Protocol(format!(
                    "continuation token repeated: {}",
                    next
                ))));
            }
            state.cursor = Cursor::Next(next);
        }
        Ok(Some((page, state)))
    })
}
