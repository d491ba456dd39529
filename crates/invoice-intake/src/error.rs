use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    #[error("Record sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load PDF: {0}")]
    PdfLoad(String),

    #[error("Text extraction failed: {0}")]
    TextExtraction(String),

    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move file from '{from}' to '{to}' after {attempts} attempt(s): {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("No free destination name for '{0}'")]
    NameExhausted(PathBuf),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to open record log '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write record to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to flush record log '{path}': {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record sink lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to start watcher on '{path}': {reason}")]
    Setup { path: PathBuf, reason: String },

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open log file '{path}': {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install global subscriber: {0}")]
    Install(String),
}

pub type Result<T> = std::result::Result<T, IntakeError>;
