use crate::error::SourceError;
use async_trait::async_trait;
use model::pagination::page::{EntryPage, PageRequest};

/// A paginated source of raw content entries.
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<EntryPage, SourceError>;
}
