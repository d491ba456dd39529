pub mod csv_sink;
pub mod memory;

use crate::error::SinkError;
use crate::record::IntakeRecord;

pub use csv_sink::CsvSink;
pub use memory::MemorySink;

/// Append-only destination for intake records.
///
/// Each `append` is a complete, flushed write; implementations serialize
/// concurrent callers themselves.
pub trait RecordSink: Send + Sync {
    fn append(&self, record: &IntakeRecord) -> Result<(), SinkError>;
}
