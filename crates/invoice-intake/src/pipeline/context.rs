use crate::extractor::ExtractedFields;
use crate::heuristics::FilenameGuess;
use crate::worker::job::Job;

use super::progress::{ProgressEvent, ProgressReporter};
use super::stage::Stage;

pub struct PipelineContext {
    pub job: Job,

    pub original_file: String,

    // Filename fallbacks, available from detection onwards
    pub fallback: FilenameGuess,

    // Extracting result; empty fields when extraction failed
    pub extracted: ExtractedFields,
    pub extraction_error: Option<String>,

    stage: Stage,
}

impl PipelineContext {
    pub fn new(job: Job) -> Self {
        let original_file = job.original_file();
        let fallback = FilenameGuess::from_filename(&original_file);
        Self {
            job,
            original_file,
            fallback,
            extracted: ExtractedFields::default(),
            extraction_error: None,
            stage: Stage::Detected,
        }
    }

    /// Moves to the next stage and reports it. Stages are never skipped.
    pub(crate) fn advance(&mut self, progress: &dyn ProgressReporter) {
        if let Some(next) = self.stage.next() {
            self.stage = next;
            progress.report(ProgressEvent::Stage(next));
        }
    }
}
