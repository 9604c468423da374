//! In-memory stand-in for the storage service used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use s3logcat::model::object_key::{ListingPage, ObjectKey};
use s3logcat::{ObjectBackend, S3Error};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn gzip(text: &str) -> Bytes {
    let mut e = GzEncoder::new(Vec::new(), Compression::default());
    e.write_all(text.as_bytes()).expect("Failed to compress");
    Bytes::from(e.finish().expect("Failed to finish gzip stream"))
}

#[derive(Default)]
struct State {
    objects: BTreeMap<String, Bytes>,
    delays: HashMap<String, Duration>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    tokens_seen: Mutex<Vec<Option<String>>>,
    completed: Mutex<Vec<String>>,
}

/// Bucket served from memory, listed in key order like S3 does.
///
/// Continuation tokens are `offset:<n>` where `n` is the index of the next
/// matching key.
#[derive(Clone)]
pub struct InMemoryBackend {
    bucket: String,
    page_size: usize,
    state: Arc<State>,
}

impl InMemoryBackend {
    pub fn new(bucket: &str, page_size: usize) -> Self {
        InMemoryBackend {
            bucket: bucket.to_string(),
            page_size,
            state: Arc::new(State::default()),
        }
    }

    pub fn with_object(mut self, key: &str, body: Bytes) -> Self {
        self.state_mut().objects.insert(key.to_string(), body);
        self
    }

    /// Delay the response for `key` so fetches complete out of order
    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.state_mut().delays.insert(key.to_string(), delay);
        self
    }

    fn state_mut(&mut self) -> &mut State {
        Arc::get_mut(&mut self.state).expect("backend configured after being shared")
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.state.get_calls.load(Ordering::SeqCst)
    }

    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.state.tokens_seen.lock().unwrap().clone()
    }

    /// Keys in the order their fetches finished
    pub fn completion_order(&self) -> Vec<String> {
        self.state.completed.lock().unwrap().clone()
    }

    fn check_bucket(&self, bucket: &str) -> Result<(), S3Error> {
        if bucket == self.bucket {
            Ok(())
        } else {
            Err(S3Error::from_message(format!(
                "NoSuchBucket: The specified bucket does not exist: {}",
                bucket
            )))
        }
    }
}

#[async_trait]
impl ObjectBackend for InMemoryBackend {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<String>,
        continuation_token: Option<String>,
    ) -> Result<ListingPage, S3Error> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .tokens_seen
            .lock()
            .unwrap()
            .push(continuation_token.clone());
        self.check_bucket(bucket)?;

        let offset = match continuation_token {
            None => 0,
            Some(token) => token
                .strip_prefix("offset:")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| S3Error::Other(format!("InvalidArgument: bad token {}", token)))?,
        };
        let prefix = prefix.unwrap_or_default();
        let matching: Vec<&String> = self
            .state
            .objects
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .collect();
        let end = (offset + self.page_size).min(matching.len());
        let keys = matching[offset.min(end)..end]
            .iter()
            .map(|key| ObjectKey::from(key.as_str()))
            .collect();

        if end < matching.len() {
            Ok(ListingPage::truncated(keys, format!("offset:{}", end)))
        } else {
            Ok(ListingPage::last(keys))
        }
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, S3Error> {
        self.state.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_bucket(bucket)?;
        if let Some(delay) = self.state.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        let body = self.state.objects.get(key).cloned().ok_or_else(|| {
            S3Error::from_message(format!("NoSuchKey: The specified key does not exist: {}", key))
        })?;
        self.state.completed.lock().unwrap().push(key.to_string());
        Ok(body)
    }
}
