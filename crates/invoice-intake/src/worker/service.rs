use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::pipeline::{NoopProgress, Pipeline, ProgressReporter, RunOutcome};
use crate::record::IntakeStatus;
use crate::worker::job::Job;

/// Totals for one service run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeSummary {
    pub success: usize,
    pub needs_review: usize,
    pub skipped: usize,
    pub sink_failed: usize,
    pub crashed: usize,
    /// Events dropped because the same path was already being processed.
    pub duplicates: usize,
}

impl IntakeSummary {
    /// Files that produced a record, whether or not the sink accepted it.
    pub fn recorded(&self) -> usize {
        self.success + self.needs_review + self.sink_failed
    }

    fn tally(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Skipped { .. } => self.skipped += 1,
            RunOutcome::Logged(record) => match record.status {
                IntakeStatus::Success => self.success += 1,
                IntakeStatus::NeedsReview => self.needs_review += 1,
            },
            RunOutcome::SinkFailed { .. } => self.sink_failed += 1,
        }
    }
}

type InFlight = Arc<Mutex<HashSet<PathBuf>>>;

/// Releases an in-flight claim when the run finishes, panics included.
struct InFlightGuard {
    in_flight: InFlight,
    path: PathBuf,
}

impl InFlightGuard {
    fn claim(in_flight: &InFlight, path: &PathBuf) -> Option<Self> {
        let mut set = in_flight.lock().ok()?;
        if !set.insert(path.clone()) {
            return None;
        }
        Some(Self {
            in_flight: Arc::clone(in_flight),
            path: path.clone(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.in_flight.lock() {
            set.remove(&self.path);
        }
    }
}

/// Consumes file-detection events and runs one pipeline per file. Runs for
/// different files overlap; a second event for a path that is still in
/// flight is dropped.
pub struct IntakeService {
    pipeline: Arc<Pipeline>,
    progress: Arc<dyn ProgressReporter>,
    in_flight: InFlight,
}

impl IntakeService {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            progress: Arc::new(NoopProgress),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Processes events until the sender side closes, then waits for the
    /// runs still in flight.
    pub async fn run(&self, mut events: mpsc::Receiver<PathBuf>) -> IntakeSummary {
        let mut summary = IntakeSummary::default();
        let mut tasks: JoinSet<(PathBuf, Result<RunOutcome, tokio::task::JoinError>)> =
            JoinSet::new();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(path) => {
                        if !self.dispatch(&mut tasks, path) {
                            summary.duplicates += 1;
                        }
                    }
                    None => break,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::settle(&mut summary, joined);
                }
            }
        }

        debug!("Event stream closed, draining {} run(s)", tasks.len());
        while let Some(joined) = tasks.join_next().await {
            Self::settle(&mut summary, joined);
        }

        info!(
            success = summary.success,
            needs_review = summary.needs_review,
            skipped = summary.skipped,
            sink_failed = summary.sink_failed,
            crashed = summary.crashed,
            "Intake finished"
        );
        summary
    }

    /// Feeds a fixed list of paths through [`IntakeService::run`].
    pub async fn process_paths(&self, paths: Vec<PathBuf>) -> IntakeSummary {
        let (tx, rx) = mpsc::channel(paths.len().max(1));
        for path in paths {
            // Capacity covers every path
            if tx.try_send(path).is_err() {
                break;
            }
        }
        drop(tx);
        self.run(rx).await
    }

    fn dispatch(
        &self,
        tasks: &mut JoinSet<(PathBuf, Result<RunOutcome, tokio::task::JoinError>)>,
        path: PathBuf,
    ) -> bool {
        let Some(guard) = InFlightGuard::claim(&self.in_flight, &path) else {
            debug!("Already in flight, ignoring event: {}", path.display());
            return false;
        };

        let pipeline = Arc::clone(&self.pipeline);
        let progress = Arc::clone(&self.progress);
        let job = Job::new(path.clone());

        tasks.spawn(async move {
            // The inner task isolates a panicking run so the path is still known
            let run = tokio::spawn(async move { pipeline.run(job, progress.as_ref()).await });
            let result = run.await;
            drop(guard);
            (path, result)
        });
        true
    }

    fn settle(
        summary: &mut IntakeSummary,
        joined: Result<(PathBuf, Result<RunOutcome, tokio::task::JoinError>), tokio::task::JoinError>,
    ) {
        match joined {
            Ok((_, Ok(outcome))) => summary.tally(&outcome),
            Ok((path, Err(e))) => {
                error!("Unhandled error for {}: {}", path.display(), e);
                summary.crashed += 1;
            }
            Err(e) => {
                error!("Intake task failed: {}", e);
                summary.crashed += 1;
            }
        }
    }
}
