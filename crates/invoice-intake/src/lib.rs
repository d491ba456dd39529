pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod heuristics;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod sanitize;
pub mod sink;
pub mod storage;
pub mod worker;

pub use classifier::{classify, Classification};
pub use config::{ensure_roots, load_config, ConfigLoader, IntakeConfig};
pub use error::{
    ConfigError, ExtractError, IntakeError, LoggingError, RelocateError, Result, SinkError,
    WatchError,
};
pub use extractor::{ExtractedFields, FieldExtractor, LopdfBackend, TextBackend};
pub use logging::init_logging;
pub use pipeline::{Pipeline, PipelineContext, ProgressEvent, ProgressReporter, RunOutcome, Stage};
pub use record::{IntakeRecord, IntakeStatus};
pub use sink::{CsvSink, MemorySink, RecordSink};
pub use storage::{FileMover, FsMover, Relocator};
pub use worker::{DirectoryScanner, IntakeService, IntakeSummary, Job};

/// Installs logging and creates the intake roots. Call once at startup,
/// before watching or processing.
pub fn start_up(config: &IntakeConfig, verbose: bool) -> Result<()> {
    init_logging(&config.log_file, verbose)?;
    ensure_roots(config)?;
    Ok(())
}
