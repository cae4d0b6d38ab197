use connectors::file::csv::error::FileError;
use engine_processing::error::ProducerError;
use thiserror::Error;

/// Top‐level errors of an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Fetching entries from the content source failed.
    #[error("Fetch error: {0}")]
    Producer(#[from] ProducerError),

    /// Writing the CSV feed failed.
    #[error("Output error: {0}")]
    Output(#[from] FileError),

    /// An error occurred while joining a task.
    /// This usually indicates that the task was cancelled or panicked.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
