//! Test harness for isolated pipeline runs.
//!
//! Every harness owns a temporary directory holding the watch, success and
//! review roots plus the record log, so tests never share filesystem state.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use walkdir::WalkDir;

use invoice_intake::{
    ensure_roots, FieldExtractor, FileMover, IntakeConfig, IntakeRecord, IntakeService,
    MemorySink, Pipeline, RecordSink, Relocator, TextBackend,
};

pub struct TestHarness {
    temp_dir: TempDir,
    pub config: Arc<IntakeConfig>,
}

impl TestHarness {
    /// Harness with near-zero settle and backoff delays.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Harness whose config is adjusted by `tweak` before the roots are created.
    pub fn with_config<F>(tweak: F) -> Self
    where
        F: FnOnce(&mut IntakeConfig),
    {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = IntakeConfig {
            settle_delay_ms: 1,
            retry_backoff_ms: 1,
            ..IntakeConfig::rooted_at(temp_dir.path())
        };
        tweak(&mut config);
        ensure_roots(&config).expect("Failed to create intake roots");

        Self {
            temp_dir,
            config: Arc::new(config),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn watch_dir(&self) -> &Path {
        &self.config.watch_dir
    }

    pub fn success_dir(&self) -> &Path {
        &self.config.success_dir
    }

    pub fn review_dir(&self) -> &Path {
        &self.config.review_dir
    }

    /// Writes a file into the watch directory.
    pub fn write_input(&self, filename: &str, content: &[u8]) -> PathBuf {
        let path = self.config.watch_dir.join(filename);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    /// The production pipeline: lopdf, filesystem moves, CSV record log.
    pub fn csv_pipeline(&self) -> Pipeline {
        Pipeline::from_config(Arc::clone(&self.config))
    }

    /// lopdf extraction and filesystem moves, recording into memory.
    pub fn memory_pipeline(&self) -> (Pipeline, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let pipeline = self.pipeline_with(
            FieldExtractor::pdf(),
            None,
            Arc::clone(&sink) as Arc<dyn RecordSink>,
        );
        (pipeline, sink)
    }

    /// Pipeline with a fixed-text backend recording into memory.
    pub fn static_text_pipeline(
        &self,
        backend: Arc<dyn TextBackend>,
    ) -> (Pipeline, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let pipeline = self.pipeline_with(
            FieldExtractor::new(backend),
            None,
            Arc::clone(&sink) as Arc<dyn RecordSink>,
        );
        (pipeline, sink)
    }

    /// Pipeline with explicit collaborators. `None` keeps the filesystem mover.
    pub fn pipeline_with(
        &self,
        extractor: FieldExtractor,
        mover: Option<Arc<dyn FileMover>>,
        sink: Arc<dyn RecordSink>,
    ) -> Pipeline {
        let attempts = self.config.move_retries;
        let backoff = self.config.retry_backoff();
        let relocator = match mover {
            Some(mover) => Relocator::with_mover(mover, attempts, backoff),
            None => Relocator::new(attempts, backoff),
        };
        Pipeline::new(Arc::clone(&self.config), extractor, relocator, sink)
    }

    pub fn service(&self, pipeline: Pipeline) -> IntakeService {
        IntakeService::new(Arc::new(pipeline))
    }

    /// Rows of the CSV record log, or none when it was never created.
    pub fn read_csv(&self) -> Vec<IntakeRecord> {
        if !self.config.output_csv.exists() {
            return Vec::new();
        }
        let mut reader =
            csv::Reader::from_path(&self.config.output_csv).expect("Failed to open record log");
        reader
            .deserialize()
            .map(|row| row.expect("Failed to parse record row"))
            .collect()
    }

    /// Every file beneath `root`, relative to it, sorted.
    pub fn files_under(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
            .collect();
        files.sort();
        files
    }
}
