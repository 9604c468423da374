use clap::Parser;
use s3logcat::utils::version;
use s3logcat::DumpOptions;
use std::path::PathBuf;
use std::time::Duration;

/// Dump the contents of the gzipped objects under an S3 bucket/prefix to stdout.
///
/// Objects are written in listing order, each followed by a newline.
#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Credentials file: JSON with accessKeyId, secretAccessKey and region,
    /// or access_key=/secret_key=/default_region= lines
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Bucket to dump, optionally followed by a key prefix: BUCKET[/PREFIX]
    #[arg(short, long, value_name = "BUCKET[/PREFIX]")]
    pub bucket: Option<String>,

    /// Print progress messages to stderr
    #[arg(short, long, visible_alias = "verbose")]
    pub debug: bool,

    /// Maximum number of objects fetched at once; output order is unaffected
    #[arg(short, long, default_value_t = 1)]
    pub concurrency: usize,

    /// Give up on a single storage request after this many seconds (default: wait forever)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn into_options(self) -> DumpOptions {
        DumpOptions {
            credentials: self.file,
            bucket_descriptor: self.bucket,
            concurrency: self.concurrency,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}
