use crate::records::entry::Entry;

/// Locale wildcard: request every locale of every field.
pub const ALL_LOCALES: &str = "*";

/// Default number of entries requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Reference resolution depth: inline directly referenced entries only.
pub const INCLUDE_DEPTH: u8 = 1;

/// One page request against the entry source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub content_type: String,
    pub locale: String,
    pub include: u8,
    pub limit: usize,
    pub skip: usize,
}

impl PageRequest {
    /// Request for the first page of `content_type`, all locales, one level
    /// of reference resolution.
    pub fn first(content_type: impl Into<String>, limit: usize) -> Self {
        PageRequest {
            content_type: content_type.into(),
            locale: ALL_LOCALES.to_string(),
            include: INCLUDE_DEPTH,
            limit: limit.max(1),
            skip: 0,
        }
    }

    /// Request for the page following this one.
    pub fn next(&self) -> Self {
        PageRequest {
            skip: self.skip + self.limit,
            ..self.clone()
        }
    }
}

/// Result of fetching one page.
#[derive(Debug, Clone, Default)]
pub struct EntryPage {
    pub items: Vec<Entry>,
    /// Total number of entries matching the query, across all pages.
    pub total: usize,
    pub took_ms: u128,
}

impl EntryPage {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
