pub mod context;
pub mod progress;
pub mod runner;
pub mod stage;

pub use context::PipelineContext;
pub use progress::{NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{Pipeline, RunOutcome};
pub use stage::Stage;
