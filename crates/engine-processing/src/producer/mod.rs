use crate::error::ProducerError;
use connectors::source::EntrySource;
use model::{pagination::page::PageRequest, records::entry::Entry};
use std::sync::Arc;
use tracing::info;

pub mod config;

pub use config::ProducerConfig;

/// Pulls every entry of one content type from an [`EntrySource`], one page
/// at a time.
pub struct EntryProducer {
    source: Arc<dyn EntrySource>,
    config: ProducerConfig,
}

impl EntryProducer {
    pub fn new(source: Arc<dyn EntrySource>, config: ProducerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    /// Fetches pages sequentially until the accumulated entries reach the
    /// reported total. Stops early on an empty page. Any fetch error aborts.
    pub async fn fetch_all(&self) -> Result<Vec<Entry>, ProducerError> {
        let mut request = PageRequest::first(&self.config.content_type, self.config.page_size);
        let mut entries = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .source
                .fetch_page(&request)
                .await
                .map_err(|source| ProducerError::Fetch {
                    skip: request.skip,
                    limit: request.limit,
                    source,
                })?;
            pages += 1;

            let fetched = page.len();
            let total = page.total;
            entries.extend(page.items);

            info!(
                content_type = %request.content_type,
                page = pages,
                fetched,
                accumulated = entries.len(),
                total,
                took_ms = page.took_ms,
                "Fetched entries page"
            );

            if total == 0 || fetched == 0 || entries.len() >= total {
                break;
            }
            request = request.next();
        }

        info!(
            content_type = %self.config.content_type,
            entries = entries.len(),
            pages,
            "Finished fetching entries"
        );
        Ok(entries)
    }
}
