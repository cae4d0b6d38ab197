use model::pagination::page::DEFAULT_PAGE_SIZE;

/// Content type exported by default.
pub const DEFAULT_CONTENT_TYPE: &str = "topicProduct";

/// Configuration for producer behavior.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Content type whose entries are fetched
    pub content_type: String,

    /// Number of entries to fetch per page
    pub page_size: usize,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProducerConfig {
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }
}
