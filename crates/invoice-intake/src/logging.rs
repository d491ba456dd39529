//! Process-wide logging: human-readable lines to stderr and to an
//! append-only log file.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::field::MakeExt;
use tracing_subscriber::fmt::format;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::error::LoggingError;

const DEFAULT_LOG_FILTER: &str = "invoice_intake=info,invoice_intake_cli=info";
const VERBOSE_LOG_FILTER: &str = "invoice_intake=debug,invoice_intake_cli=debug";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Records from crates that use the `log` macros are forwarded as well.
pub fn init_logging(log_file: &Path, verbose: bool) -> Result<(), LoggingError> {
    let file = open_log_file(log_file)?;

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(log_filter(verbose)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .fmt_fields(plain_fields())
                .with_filter(log_filter(verbose)),
        );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::Install(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(())
}

/// Field formatter for the log file. Span fields are cached per formatter
/// type, so sharing the stderr layer's default formatter would leak its ANSI
/// styling into the file.
fn plain_fields() -> impl for<'writer> format::FormatFields<'writer> + Send + Sync + 'static {
    format::debug_fn(|writer, field, value| match field.name() {
        "message" => write!(writer, "{:?}", value),
        // Metadata of records bridged from `log`, already in the line prefix
        name if name.starts_with("log.") => Ok(()),
        name => write!(writer, "{}={:?}", name, value),
    })
    .delimited(" ")
}

fn log_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Opens the log file for appending, creating it and its parent as needed.
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let open_error = |source: std::io::Error| LoggingError::OpenFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(open_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_error)
}
