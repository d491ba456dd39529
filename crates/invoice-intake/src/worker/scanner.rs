use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use log::{debug, error, info, warn};
use notify::{Config as NotifyConfig, PollWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer_opt, Config as DebouncerConfig, DebouncedEventKind};
use walkdir::WalkDir;

use crate::config::IntakeConfig;
use crate::error::WatchError;
use crate::worker::job::has_pdf_extension;

/// How often pending files are re-checked for stability.
const STABILITY_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Watches the top level of the intake directory. Subdirectories are never
/// entered, so output roots nested under the watch dir are not re-ingested.
pub struct DirectoryScanner {
    input_directory: PathBuf,
    poll_interval: Duration,
    debounce: Duration,
    stability_window: Duration,
    initial_scan: bool,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
            poll_interval: Duration::from_secs(2),
            debounce: Duration::from_millis(500),
            stability_window: Duration::from_millis(800),
            initial_scan: false,
        }
    }

    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(&config.watch_dir)
            .with_intervals(config.poll_interval(), config.debounce())
            .with_stability_window(config.stability_window())
            .with_initial_scan(config.scan_existing)
    }

    pub fn with_intervals(mut self, poll_interval: Duration, debounce: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.debounce = debounce;
        self
    }

    pub fn with_stability_window(mut self, window: Duration) -> Self {
        self.stability_window = window;
        self
    }

    /// Also report PDFs already present when watching starts.
    pub fn with_initial_scan(mut self, enabled: bool) -> Self {
        self.initial_scan = enabled;
        self
    }

    /// Lists PDFs already sitting in the watch directory, sorted by path.
    pub fn scan(&self) -> Result<Vec<PathBuf>, WatchError> {
        let mut found = Vec::new();

        for entry in WalkDir::new(&self.input_directory)
            .min_depth(1)
            .max_depth(1) // Only scan top level
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(WatchError::ScanFailed {
                        path: self.input_directory.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if has_pdf_extension(entry.path()) {
                debug!("Found document: {}", entry.path().display());
                found.push(entry.into_path());
            }
        }

        info!(
            "Scanned {} documents in {}",
            found.len(),
            self.input_directory.display()
        );
        Ok(found)
    }

    /// Blocks until `shutdown` is set, calling `callback` once a file that
    /// appeared or changed has kept its size and mtime for the stability
    /// window. Extension filtering is left to the caller so that skips can be
    /// reported.
    ///
    /// The initial scan, when enabled, runs after the watcher has taken its
    /// first snapshot, so a file arriving during startup is seen by one or
    /// the other.
    pub fn watch<F>(&self, callback: F, shutdown: Arc<AtomicBool>) -> Result<(), WatchError>
    where
        F: Fn(PathBuf) + Send + 'static,
    {
        let input_dir = self.input_directory.clone();
        let setup_error = |e: notify::Error| WatchError::Setup {
            path: input_dir.clone(),
            reason: e.to_string(),
        };

        // Use PollWatcher for Docker/NFS compatibility
        let poll_config = NotifyConfig::default().with_poll_interval(self.poll_interval);

        let debouncer_config = DebouncerConfig::default()
            .with_timeout(self.debounce)
            .with_notify_config(poll_config);

        let (tx, rx) = std::sync::mpsc::channel();

        let mut debouncer =
            new_debouncer_opt::<_, PollWatcher>(debouncer_config, tx).map_err(setup_error)?;

        debouncer
            .watcher()
            .watch(&input_dir, RecursiveMode::NonRecursive)
            .map_err(setup_error)?;

        info!("Watching directory: {}", input_dir.display());

        let mut pending = PendingFiles::new(self.stability_window);
        if self.initial_scan {
            let now = Instant::now();
            for path in self.scan()? {
                pending.observe(path, now);
            }
        }

        loop {
            if shutdown.load(Ordering::Relaxed) {
                info!("Watch mode shutting down...");
                break;
            }

            match rx.recv_timeout(STABILITY_CHECK_INTERVAL) {
                Ok(Ok(events)) => {
                    let now = Instant::now();
                    for event in events {
                        if !matches!(event.kind, DebouncedEventKind::Any) {
                            continue;
                        }
                        debug!("File event: {}", event.path.display());
                        pending.observe(event.path, now);
                    }
                }
                Ok(Err(errors)) => {
                    warn!("Watch error: {:?}", errors);
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watch channel disconnected");
                    break;
                }
            }

            for path in pending.take_stable(Instant::now()) {
                debug!("Stable: {}", path.display());
                callback(path);
            }
        }

        Ok(())
    }
}

/// Size and modification time of a regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(path: &Path) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        metadata.is_file().then(|| Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Files seen by the watcher that have not yet been stable for `window`.
struct PendingFiles {
    window: Duration,
    files: HashMap<PathBuf, (Fingerprint, Instant)>,
}

impl PendingFiles {
    fn new(window: Duration) -> Self {
        Self {
            window,
            files: HashMap::new(),
        }
    }

    /// Records a sighting. A path that is gone or not a regular file is dropped.
    fn observe(&mut self, path: PathBuf, now: Instant) {
        match Fingerprint::of(&path) {
            Some(fingerprint) => {
                let entry = self.files.entry(path).or_insert((fingerprint, now));
                if entry.0 != fingerprint {
                    *entry = (fingerprint, now);
                }
            }
            None => {
                self.files.remove(&path);
            }
        }
    }

    /// Removes and returns every path unchanged since at least `window` ago,
    /// sorted. Changed paths restart their window.
    fn take_stable(&mut self, now: Instant) -> Vec<PathBuf> {
        let window = self.window;
        let mut stable = Vec::new();

        self.files
            .retain(|path, (fingerprint, since)| match Fingerprint::of(path) {
                None => false,
                Some(current) if current != *fingerprint => {
                    *fingerprint = current;
                    *since = now;
                    true
                }
                Some(_) if now.duration_since(*since) >= window => {
                    stable.push(path.clone());
                    false
                }
                Some(_) => true,
            });

        stable.sort();
        stable
    }
}
