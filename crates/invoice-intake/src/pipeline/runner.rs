use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::classifier::{classify, Classification};
use crate::config::IntakeConfig;
use crate::error::ExtractError;
use crate::extractor::{ExtractedFields, FieldExtractor};
use crate::record::{format_timestamp, IntakeRecord};
use crate::sanitize;
use crate::sink::{CsvSink, RecordSink};
use crate::storage::{canonical_filename, destination_dir, Relocator};
use crate::worker::job::Job;

use super::context::PipelineContext;
use super::progress::{ProgressEvent, ProgressReporter};
use super::stage::Stage;

/// How a single pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Not a PDF; nothing was recorded and the file was left alone.
    Skipped { original_file: String },
    /// The record was appended to the sink.
    Logged(IntakeRecord),
    /// The record was built but the sink rejected it.
    SinkFailed { record: IntakeRecord, error: String },
}

impl RunOutcome {
    pub fn record(&self) -> Option<&IntakeRecord> {
        match self {
            RunOutcome::Skipped { .. } => None,
            RunOutcome::Logged(record) | RunOutcome::SinkFailed { record, .. } => Some(record),
        }
    }
}

/// Per-file orchestrator: detect, stabilize, extract, classify, relocate, record.
pub struct Pipeline {
    config: Arc<IntakeConfig>,
    extractor: FieldExtractor,
    relocator: Relocator,
    sink: Arc<dyn RecordSink>,
}

impl Pipeline {
    /// Production constructor: lopdf extraction, filesystem mover, CSV sink.
    pub fn from_config(config: Arc<IntakeConfig>) -> Self {
        let extractor = FieldExtractor::pdf();
        let relocator = Relocator::new(config.move_retries, config.retry_backoff());
        let sink: Arc<dyn RecordSink> = Arc::new(CsvSink::new(&config.output_csv));

        Self::new(config, extractor, relocator, sink)
    }

    /// Builds a pipeline from explicit collaborators.
    pub fn new(
        config: Arc<IntakeConfig>,
        extractor: FieldExtractor,
        relocator: Relocator,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            config,
            extractor,
            relocator,
            sink,
        }
    }

    /// Runs one file to completion. Every file that passes the extension
    /// filter ends in exactly one sink append; stage failures are folded into
    /// the record instead of aborting the run.
    pub async fn run(&self, job: Job, progress: &dyn ProgressReporter) -> RunOutcome {
        let span = info_span!("pipeline",
            job_id = %job.id,
            filename = %sanitize::redact_path(&job.source_path),
        );
        self.run_stages(PipelineContext::new(job), progress)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        mut ctx: PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> RunOutcome {
        // Detected
        progress.report(ProgressEvent::Stage(Stage::Detected));
        info!("Detected: {}", ctx.original_file);
        if !ctx.job.is_pdf() {
            info!("Skip non-pdf: {}", ctx.original_file);
            progress.report(ProgressEvent::Skipped {
                original_file: ctx.original_file.clone(),
            });
            return RunOutcome::Skipped {
                original_file: ctx.original_file,
            };
        }

        // Stabilizing
        ctx.advance(progress);
        tokio::time::sleep(self.config.settle_delay()).await;

        // Extracting
        ctx.advance(progress);
        self.step_extract(&mut ctx)
            .instrument(info_span!("extract"))
            .await;

        // Classified
        ctx.advance(progress);
        let mut classification = self.step_classify(&ctx);

        // Relocating
        ctx.advance(progress);
        let new_file = self
            .step_relocate(&ctx, &mut classification)
            .instrument(info_span!("relocate"))
            .await;

        // Logged
        ctx.advance(progress);
        self.step_record(&ctx, classification, new_file)
    }

    async fn step_extract(&self, ctx: &mut PipelineContext) {
        match self.extract(&ctx.job.source_path).await {
            Ok(fields) => {
                debug!(?fields, "Extraction finished");
                ctx.extracted = fields;
            }
            Err(e) => {
                warn!("Extraction failed for {}: {}", ctx.original_file, e);
                ctx.extracted = ExtractedFields::default();
                ctx.extraction_error = Some(e.to_string());
            }
        }
    }

    /// Reads the file and runs the extractor on the blocking pool, bounded by
    /// the configured timeout.
    async fn extract(&self, path: &Path) -> Result<ExtractedFields, ExtractError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ExtractError::ReadDocument {
                path: path.to_path_buf(),
                source: e,
            })?;

        let extractor = self.extractor.clone();
        let task = tokio::task::spawn_blocking(move || extractor.extract(&bytes));

        let joined = match self.config.extract_timeout() {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| ExtractError::Timeout(limit))?,
            None => task.await,
        };

        joined.map_err(|e| ExtractError::Aborted(e.to_string()))?
    }

    fn step_classify(&self, ctx: &PipelineContext) -> Classification {
        let classification = classify(
            &ctx.extracted,
            &ctx.fallback,
            ctx.extraction_error.as_deref(),
        );
        debug!(
            status = %classification.status,
            note = %classification.note,
            "Classified {}",
            ctx.original_file
        );
        classification
    }

    /// Returns the basename the file ended up with, or the canonical name when
    /// the move failed and the file stayed in place.
    async fn step_relocate(
        &self,
        ctx: &PipelineContext,
        classification: &mut Classification,
    ) -> String {
        let filename = canonical_filename(classification);
        let dest_dir = destination_dir(&self.config, classification);

        match self
            .relocator
            .relocate(&ctx.job.source_path, &dest_dir, &filename)
            .await
        {
            Ok(target) => {
                info!("Moved: {} -> {}", ctx.original_file, target.display());
                target
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or(filename)
            }
            Err(e) => {
                classification.downgrade(format!("Move error: {}", e));
                warn!(
                    "Move failed: {} ({})",
                    ctx.original_file, classification.note
                );
                filename
            }
        }
    }

    fn step_record(
        &self,
        ctx: &PipelineContext,
        classification: Classification,
        new_file: String,
    ) -> RunOutcome {
        let record = IntakeRecord {
            timestamp: format_timestamp(&ctx.job.detected_at),
            original_file: ctx.original_file.clone(),
            new_file,
            vendor: classification.vendor,
            invoice_no: classification.invoice_no,
            invoice_date: classification.invoice_date,
            total: classification.total,
            status: classification.status,
            note: classification.note,
        };

        match self.sink.append(&record) {
            Ok(()) => {
                debug!(status = %record.status, "Record appended");
                RunOutcome::Logged(record)
            }
            Err(e) => {
                error!(
                    "Record sink write failed for {}: {}",
                    ctx.original_file, e
                );
                RunOutcome::SinkFailed {
                    record,
                    error: e.to_string(),
                }
            }
        }
    }
}
