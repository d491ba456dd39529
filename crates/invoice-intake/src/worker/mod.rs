pub mod job;
pub mod scanner;
pub mod service;

pub use job::Job;
pub use scanner::DirectoryScanner;
pub use service::{IntakeService, IntakeSummary};
