use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::record::IntakeStatus;

/// Runtime configuration for the intake pipeline.
///
/// Passed explicitly into [`crate::pipeline::Pipeline`] so that tests can run
/// against isolated temporary roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Directory monitored for new files.
    pub watch_dir: PathBuf,
    /// Root for files classified as success.
    pub success_dir: PathBuf,
    /// Root for files that need manual review.
    pub review_dir: PathBuf,
    /// Append-only CSV record log.
    pub output_csv: PathBuf,
    /// Free-text operational log.
    pub log_file: PathBuf,
    pub settle_delay_ms: u64,
    pub move_retries: u32,
    pub retry_backoff_ms: u64,
    /// Upper bound on a single extraction. 0 disables the bound.
    pub extract_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub debounce_ms: u64,
    /// How long a detected file's size and mtime must stay unchanged before
    /// it is handed to the pipeline.
    pub stability_window_ms: u64,
    /// Enqueue PDFs already present in `watch_dir` at startup.
    pub scan_existing: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("./input"),
            success_dir: PathBuf::from("./processed/success"),
            review_dir: PathBuf::from("./processed/needs-review"),
            output_csv: PathBuf::from("./output/invoice_log.csv"),
            log_file: PathBuf::from("./logs/run.log"),
            settle_delay_ms: 500,
            move_retries: 3,
            retry_backoff_ms: 300,
            extract_timeout_secs: 60,
            poll_interval_ms: 2000,
            debounce_ms: 500,
            stability_window_ms: 800,
            scan_existing: false,
        }
    }
}

impl IntakeConfig {
    /// Config rooted in `base`, with every directory and file placed beneath it.
    pub fn rooted_at<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        Self {
            watch_dir: base.join("input"),
            success_dir: base.join("processed").join("success"),
            review_dir: base.join("processed").join("needs-review"),
            output_csv: base.join("output").join("invoice_log.csv"),
            log_file: base.join("logs").join("run.log"),
            ..Self::default()
        }
    }

    pub fn status_root(&self, status: IntakeStatus) -> &Path {
        match status {
            IntakeStatus::Success => &self.success_dir,
            IntakeStatus::NeedsReview => &self.review_dir,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn extract_timeout(&self) -> Option<Duration> {
        (self.extract_timeout_secs > 0).then(|| Duration::from_secs(self.extract_timeout_secs))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn stability_window(&self) -> Duration {
        Duration::from_millis(self.stability_window_ms)
    }

    /// The three roots that must exist before watching starts.
    pub fn roots(&self) -> [&Path; 3] {
        [&self.watch_dir, &self.success_dir, &self.review_dir]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = IntakeConfig::default();
        assert_eq!(config.watch_dir, PathBuf::from("./input"));
        assert_eq!(config.success_dir, PathBuf::from("./processed/success"));
        assert_eq!(config.review_dir, PathBuf::from("./processed/needs-review"));
        assert_eq!(config.output_csv, PathBuf::from("./output/invoice_log.csv"));
        assert_eq!(config.log_file, PathBuf::from("./logs/run.log"));
        assert_eq!(config.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.move_retries, 3);
        assert_eq!(config.retry_backoff(), Duration::from_millis(300));
        assert_eq!(config.stability_window(), Duration::from_millis(800));
    }

    #[test]
    fn test_status_root() {
        let config = IntakeConfig::rooted_at("/tmp/intake");
        assert_eq!(
            config.status_root(IntakeStatus::Success),
            Path::new("/tmp/intake/processed/success")
        );
        assert_eq!(
            config.status_root(IntakeStatus::NeedsReview),
            Path::new("/tmp/intake/processed/needs-review")
        );
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let config = IntakeConfig {
            extract_timeout_secs: 0,
            ..IntakeConfig::default()
        };
        assert!(config.extract_timeout().is_none());
    }
}
