//! Structured error types for storage access and the dump pipeline

use std::fmt;

/// Errors reported by the storage backend
#[derive(Debug, Clone, PartialEq)]
pub enum S3Error {
    /// Access denied - insufficient permissions
    AccessDenied(String),
    /// Bucket not found
    BucketNotFound(String),
    /// Object/key not found
    ObjectNotFound(String),
    /// Network or connectivity error, including timeouts
    NetworkError(String),
    /// Invalid credentials
    InvalidCredentials(String),
    /// Backend answered with something we cannot use
    Protocol(String),
    /// Generic S3 error
    Other(String),
}

impl fmt::Display for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            S3Error::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            S3Error::BucketNotFound(msg) => write!(f, "Bucket not found: {}", msg),
            S3Error::ObjectNotFound(msg) => write!(f, "Object not found: {}", msg),
            S3Error::NetworkError(msg) => write!(f, "Network error: {}", msg),
            S3Error::InvalidCredentials(msg) => write!(f, "Invalid credentials: {}", msg),
            S3Error::Protocol(msg) => write!(f, "Unexpected backend response: {}", msg),
            S3Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for S3Error {}

impl S3Error {
    /// Create an S3Error from an error message, attempting to categorize it
    pub fn from_message(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("access denied") || msg_lower.contains("accessdenied") {
            S3Error::AccessDenied(msg)
        } else if msg_lower.contains("no such bucket") || msg_lower.contains("nosuchbucket") {
            S3Error::BucketNotFound(msg)
        } else if msg_lower.contains("no such key") || msg_lower.contains("nosuchkey") {
            S3Error::ObjectNotFound(msg)
        } else if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("timeout")
            || msg_lower.contains("dispatch failure")
        {
            S3Error::NetworkError(msg)
        } else if msg_lower.contains("credential")
            || msg_lower.contains("signature")
            || msg_lower.contains("unauthorized")
            || msg_lower.contains("invalidaccesskeyid")
        {
            S3Error::InvalidCredentials(msg)
        } else {
            S3Error::Other(msg)
        }
    }
}

/// Fatal errors of a dump run. Every variant terminates the process.
#[derive(Debug, Clone, PartialEq)]
pub enum DumpError {
    /// Missing or malformed required input (credentials, bucket descriptor, flags)
    Configuration(String),
    /// A listing page could not be fetched, or the listing was inconsistent
    Enumeration(S3Error),
    /// An object body could not be retrieved
    Fetch { key: String, source: S3Error },
    /// An object body was not a valid gzip stream
    Decompression { key: String, message: String },
    /// Writing to the output sink failed
    Output(String),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            DumpError::Enumeration(e) => write!(f, "Enumeration error: {}", e),
            DumpError::Fetch { key, source } => write!(f, "Fetch error [{}]: {}", key, source),
            DumpError::Decompression { key, message } => {
                write!(f, "Decompression error [{}]: {}", key, message)
            }
            DumpError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DumpError::Enumeration(e) => Some(e),
            DumpError::Fetch { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl DumpError {
    pub fn config(msg: impl Into<String>) -> Self {
        DumpError::Configuration(msg.into())
    }

    /// Short label for the error kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            DumpError::Configuration(_) => "configuration",
            DumpError::Enumeration(_) => "enumeration",
            DumpError::Fetch { .. } => "fetch",
            DumpError::Decompression { .. } => "decompression",
            DumpError::Output(_) => "output",
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        libc::EXIT_FAILURE
    }
}

/// Result type for backend operations
pub type S3Result<T = ()> = Result<T, S3Error>;

/// Result type for the dump pipeline
pub type DumpResult<T = ()> = Result<T, DumpError>;
