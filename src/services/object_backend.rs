//! Access to the object storage service.
//!
//! [`ObjectBackend`] is the seam between the dump pipeline and the storage
//! service: one listing page at a time, one whole object at a time.
//! [`S3Backend`] implements it on top of the AWS SDK.

use crate::model::error::{S3Error, S3Result};
use crate::model::object_key::{ListingPage, ObjectKey};
use crate::settings::file_credentials::FileCredential;
use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::future::Future;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Fetch one page of keys under `prefix`, resuming at `continuation_token`.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<String>,
        continuation_token: Option<String>,
    ) -> S3Result<ListingPage>;

    /// Fetch the full body of one object.
    async fn get_object(&self, bucket: &str, key: &str) -> S3Result<Bytes>;
}

/// Await a backend call, failing with a network error once `timeout` elapses.
pub async fn with_timeout<T, F>(timeout: Option<Duration>, call: F) -> S3Result<T>
where
    F: Future<Output = S3Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            S3Error::NetworkError(format!("request timed out after {}ms", limit.as_millis()))
        })?,
        None => call.await,
    }
}

/// Backend talking to S3 (or an S3-compatible store) through the AWS SDK
#[derive(Clone, Debug)]
pub struct S3Backend {
    client: Client,
    page_size: Option<i32>,
}

impl S3Backend {
    /// Build the single client used for the whole run
    pub async fn connect(creds: &FileCredential) -> Self {
        let credentials = Credentials::new(
            creds.access_key.clone(),
            creds.secret_key.clone(),
            creds.session_token.clone(),
            None,
            "s3logcat-file",
        );
        let shared_config = aws_config::from_env()
            .credentials_provider(credentials)
            .region(Region::new(creds.default_region.clone()))
            .load()
            .await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &creds.endpoint_url {
            tracing::debug!("Using custom endpoint: {}", endpoint);
            s3_config = s3_config.endpoint_url(endpoint);
        }
        if creds.force_path_style {
            s3_config = s3_config.force_path_style(true);
        }
        tracing::debug!(
            "Created S3 client for region: {}, access_key: {}...",
            creds.default_region,
            &creds.access_key[..8.min(creds.access_key.len())]
        );

        Self::from_client(Client::from_conf(s3_config.build()))
    }

    pub fn from_client(client: Client) -> Self {
        S3Backend {
            client,
            page_size: None,
        }
    }

    /// Cap the number of keys per listing page (the service default is 1000)
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

fn sdk_error<E, R>(err: SdkError<E, R>) -> S3Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let detail = match err.as_service_error() {
        Some(service_err) => format!(
            "{}: {}",
            service_err.code().unwrap_or("Unknown"),
            service_err.message().unwrap_or_default()
        ),
        None => DisplayErrorContext(&err).to_string(),
    };
    S3Error::from_message(detail)
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<String>,
        continuation_token: Option<String>,
    ) -> S3Result<ListingPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix)
            .set_continuation_token(continuation_token)
            .set_max_keys(self.page_size)
            .send()
            .await
            .map_err(sdk_error)?;

        let keys = output
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .map(ObjectKey::from)
            .collect();
        Ok(ListingPage {
            keys,
            is_truncated: output.is_truncated().unwrap_or(false),
            next_continuation_token: output.next_continuation_token().map(str::to_string),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> S3Result<Bytes> {
        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(sdk_error)?;
        let body = object
            .body
            .collect()
            .await
            .map_err(|e| S3Error::NetworkError(format!("reading body of {}: {}", key, e)))?;
        Ok(body.into_bytes())
    }
}
