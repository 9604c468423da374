//! Orchestration of one dump run: list everything, then fetch, decode and emit
//! each object in listing order.

use crate::model::error::DumpResult;
use crate::services::emitter::Emitter;
use crate::services::object_backend::ObjectBackend;
use crate::services::object_fetcher::ObjectFetcher;
use crate::services::object_lister::ObjectLister;
use crate::settings::file_credentials::FileCredential;
use crate::settings::run_config::{BucketTarget, DumpOptions, RunConfig};
use futures::{stream, StreamExt, TryStreamExt};
use std::future::Future;
use std::io::Write;
use std::time::Duration;

/// Totals of a finished run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DumpSummary {
    pub objects: usize,
    pub decoded_bytes: usize,
}

pub struct Driver<B> {
    backend: B,
    concurrency: usize,
    timeout: Option<Duration>,
}

impl<B: ObjectBackend> Driver<B> {
    pub fn new(backend: B, config: &RunConfig) -> Self {
        Self::with_settings(backend, config.concurrency, config.timeout)
    }

    pub fn with_settings(backend: B, concurrency: usize, timeout: Option<Duration>) -> Self {
        Driver {
            backend,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Dump every object under `target` to `emitter`.
    ///
    /// Up to `concurrency` fetches run at once, but results are emitted strictly
    /// in listing order. The first error stops the run; fetches still in flight
    /// are dropped.
    pub async fn run<W: Write>(
        &self,
        target: &BucketTarget,
        emitter: &mut Emitter<W>,
    ) -> DumpResult<DumpSummary> {
        tracing::debug!(
            "Will use bucket: {}, with prefix: {:?}",
            target.bucket,
            target.prefix
        );
        let keys = ObjectLister::new(&self.backend)
            .with_timeout(self.timeout)
            .list_all(&target.bucket, target.prefix.as_deref())
            .await?;

        let fetcher = ObjectFetcher::new(&self.backend).with_timeout(self.timeout);
        let bucket = target.bucket.as_str();
        let mut decoded = stream::iter(keys.iter())
            .map(|key| fetcher.fetch_and_decode(bucket, key))
            .buffered(self.concurrency);

        let mut summary = DumpSummary::default();
        while let Some(text) = decoded.try_next().await? {
            emitter.emit(&text)?;
            summary.objects += 1;
            summary.decoded_bytes += text.len();
        }
        tracing::debug!(
            "Emitted {} objects ({} bytes)",
            summary.objects,
            summary.decoded_bytes
        );
        Ok(summary)
    }
}

/// Resolve `options`, connect a backend with the resolved credentials and run the dump.
///
/// Configuration problems are reported before `connect` is called, so a bad
/// invocation never touches the storage service.
pub async fn dump<B, F, Fut, W>(options: DumpOptions, connect: F, out: W) -> DumpResult<DumpSummary>
where
    B: ObjectBackend,
    F: FnOnce(FileCredential) -> Fut,
    Fut: Future<Output = B>,
    W: Write,
{
    let config = RunConfig::resolve(options)?;
    let backend = connect(config.credentials.clone()).await;
    let driver = Driver::new(backend, &config);
    let mut emitter = Emitter::new(out);
    driver.run(&config.target, &mut emitter).await
}
