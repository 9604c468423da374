use crate::model::error::{DumpError, DumpResult};
use crate::model::object_key::ObjectKey;
use crate::services::object_backend::{with_timeout, ObjectBackend};
use flate2::read::MultiGzDecoder;
use std::io::{self, Read};
use std::time::Duration;

/// Decompress a gzip payload. Concatenated gzip members are decoded one after another.
pub fn gunzip(payload: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(payload);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(decoded)
}

/// Turn decompressed bytes into text; invalid UTF-8 becomes U+FFFD.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Retrieves one object at a time and hands back its decoded text
pub struct ObjectFetcher<'a, B: ?Sized> {
    backend: &'a B,
    timeout: Option<Duration>,
}

impl<'a, B: ObjectBackend + ?Sized> ObjectFetcher<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        ObjectFetcher {
            backend,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn fetch_and_decode(&self, bucket: &str, key: &ObjectKey) -> DumpResult<String> {
        let raw = with_timeout(self.timeout, self.backend.get_object(bucket, key.as_str()))
            .await
            .map_err(|source| DumpError::Fetch {
                key: key.to_string(),
                source,
            })?;
        tracing::trace!("Fetched {} ({} compressed bytes)", key, raw.len());

        let decoded = gunzip(&raw).map_err(|e| DumpError::Decompression {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!("Decoded {} ({} bytes)", key, decoded.len());
        Ok(decode_text(decoded))
    }
}
