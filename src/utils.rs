use color_eyre::eyre;
use lazy_static::lazy_static;
use std::io::IsTerminal;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    self, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

const VERSION_MESSAGE: &str = env!("CARGO_PKG_VERSION");

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
}

/// Eyre hook to display a bit more user-friendly messages in case of panic
pub fn initialize_panic_handler() -> eyre::Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(format!(
            "This is a bug. Consider reporting it at {}",
            env!("CARGO_PKG_REPOSITORY")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;
    std::panic::set_hook(Box::new(move |panic_info| {
        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, print_msg, Metadata};
            let meta = Metadata {
                version: env!("CARGO_PKG_VERSION").into(),
                name: env!("CARGO_PKG_NAME").into(),
                authors: env!("CARGO_PKG_AUTHORS").replace(':', ", ").into(),
                homepage: env!("CARGO_PKG_HOMEPAGE").into(),
            };

            let file_path = handle_dump(&meta, panic_info);
            // prints human-panic message
            print_msg(file_path, &meta)
                .expect("human-panic: printing error message to console failed");
            eprintln!("{}", panic_hook.panic_report(panic_info)); // prints color-eyre stack trace to stderr
        }
        let msg = format!("{}", panic_hook.panic_report(panic_info));
        log::error!("Error: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            // Better Panic stacktrace that is only enabled when debugging.
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));
    Ok(())
}

/// Log filter directive for a run.
///
/// Without `verbose` nothing is logged. With it, crate events are logged at debug level
/// on top of whatever `env_directive` (from `RUST_LOG` or `S3LOGCAT_LOGLEVEL`) asks for.
pub fn log_directive(verbose: bool, env_directive: Option<&str>) -> String {
    let crate_directive = format!("{}=debug", env!("CARGO_CRATE_NAME"));
    match env_directive.map(str::trim).filter(|d| !d.is_empty()) {
        _ if !verbose => "off".to_string(),
        Some(extra) => format!("{},{}", extra, crate_directive),
        None => crate_directive,
    }
}

fn env_log_directive() -> Option<String> {
    std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.as_str()))
        .ok()
}

/// Sets up logging capabilities for the application.
/// Diagnostics go to stderr so they never mix with the dumped content on stdout.
pub fn initialize_logging(verbose: bool) -> eyre::Result<()> {
    let env_directive = env_log_directive();
    let filter = EnvFilter::try_new(log_directive(verbose, env_directive.as_deref()))?;
    let stderr_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_filter(filter);
    tracing_subscriber::registry()
        .with(stderr_subscriber)
        .with(ErrorLayer::default())
        .init();
    if verbose {
        tracing::debug!("Debugging is on.");
    }
    Ok(())
}

pub fn version() -> String {
    let author = clap::crate_authors!();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Log level variable: {}",
        LOG_ENV.as_str()
    )
}
