//! Resolution of raw command line inputs into the configuration a dump run consumes

use crate::model::error::{DumpError, DumpResult};
use crate::settings::file_credentials::{load_credentials, FileCredential};
use std::path::PathBuf;
use std::time::Duration;

/// Bucket and optional key prefix to dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTarget {
    pub bucket: String,
    pub prefix: Option<String>,
}

impl BucketTarget {
    /// Parse a `bucket` or `bucket/prefix` descriptor.
    ///
    /// Only the first `/` separates bucket from prefix, so
    /// `logs/current/2020-10` lists `current/2020-10` in bucket `logs`.
    pub fn parse(descriptor: &str) -> DumpResult<Self> {
        let (bucket, prefix) = match descriptor.split_once('/') {
            Some((bucket, prefix)) => (bucket, Some(prefix)),
            None => (descriptor, None),
        };
        if bucket.is_empty() {
            return Err(DumpError::config(format!(
                "Not a good bucket descriptor: {}",
                descriptor
            )));
        }
        Ok(BucketTarget {
            bucket: bucket.to_string(),
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        })
    }
}

/// Unresolved inputs, as they come from the command line
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    pub credentials: Option<PathBuf>,
    pub bucket_descriptor: Option<String>,
    pub concurrency: usize,
    pub timeout: Option<Duration>,
}

/// Configuration of one dump run, constructed once at startup
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub credentials: FileCredential,
    pub target: BucketTarget,
    /// Maximum number of object fetches in flight; 1 means sequential
    pub concurrency: usize,
    /// Per backend call; `None` waits forever
    pub timeout: Option<Duration>,
}

impl RunConfig {
    pub fn resolve(options: DumpOptions) -> DumpResult<Self> {
        let credentials_path = options
            .credentials
            .ok_or_else(|| DumpError::config("Option (f|file) is required."))?;
        let descriptor = options
            .bucket_descriptor
            .ok_or_else(|| DumpError::config("Option (b|bucket) is required."))?;
        if options.concurrency == 0 {
            return Err(DumpError::config("concurrency must be at least 1"));
        }
        let target = BucketTarget::parse(&descriptor)?;
        let credentials = load_credentials(&credentials_path)?;
        tracing::debug!(
            bucket = %target.bucket,
            prefix = ?target.prefix,
            credentials = %credentials.name,
            "Resolved run configuration"
        );

        Ok(RunConfig {
            credentials,
            target,
            concurrency: options.concurrency,
            timeout: options.timeout,
        })
    }
}
