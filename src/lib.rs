//! # s3logcat Library
//!
//! Lists every object under an S3 bucket/prefix, gunzips each one and writes
//! the decoded text to an output sink in listing order.
//!
//! The library is primarily used by the s3logcat binary, but can also be used
//! for integration testing against in-memory backends or S3-compatible storage.

#![forbid(unsafe_code)]

pub mod model;
pub mod services;
pub mod settings;
pub mod utils;

pub use model::error::{DumpError, DumpResult, S3Error};
pub use services::driver::{dump, Driver, DumpSummary};
pub use services::object_backend::{ObjectBackend, S3Backend};
pub use settings::run_config::{BucketTarget, DumpOptions, RunConfig};
