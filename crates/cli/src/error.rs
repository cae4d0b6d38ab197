use connectors::error::SourceError;
use engine_runtime::error::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid content source configuration: {0}")]
    Source(#[from] SourceError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to write the report file: {0}")]
    ReportWrite(#[from] std::io::Error),
}
