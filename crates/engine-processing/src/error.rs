use connectors::error::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Failed to fetch entries page (skip {skip}, limit {limit}): {source}")]
    Fetch {
        skip: usize,
        limit: usize,
        #[source]
        source: SourceError,
    },
}
