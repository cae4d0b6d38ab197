use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to move the finished feed into {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to flush CSV output: {0}")]
    Flush(#[from] std::io::Error),
    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),
}
