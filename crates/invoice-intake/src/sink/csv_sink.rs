use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::SinkError;
use crate::record::IntakeRecord;
use crate::sink::RecordSink;

/// CSV record log. The header is written once, when the file is empty;
/// rows are only ever appended.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }
}

impl RecordSink for CsvSink {
    fn append(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        let _guard = self.lock.lock().map_err(|_| SinkError::Poisoned)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SinkError::Open {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SinkError::Open {
                path: self.path.clone(),
                source: e,
            })?;

        let needs_header = file
            .metadata()
            .map(|m| m.len() == 0)
            .map_err(|e| SinkError::Open {
                path: self.path.clone(),
                source: e,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        writer.serialize(record).map_err(|e| SinkError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        writer.flush().map_err(|e| SinkError::Flush {
            path: self.path.clone(),
            source: e,
        })
    }
}
