#![forbid(unsafe_code)]
mod cli;

use clap::Parser;
use cli::Cli;
use color_eyre::eyre;
use s3logcat::settings::file_credentials::FileCredential;
use s3logcat::utils::{initialize_logging, initialize_panic_handler};
use s3logcat::{dump, S3Backend};
use std::io::{self, BufWriter};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    initialize_panic_handler()?;
    let args = Cli::parse();
    initialize_logging(args.debug)?;

    let out = BufWriter::new(io::stdout().lock());
    let connect = |creds: FileCredential| async move { S3Backend::connect(&creds).await };
    match dump(args.into_options(), connect, out).await {
        Ok(summary) => {
            tracing::info!(
                "Dumped {} objects ({} bytes)",
                summary.objects,
                summary.decoded_bytes
            );
            Ok(())
        }
        Err(err) => {
            tracing::debug!(kind = err.kind(), "Run aborted");
            eprintln!("ERROR: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}
