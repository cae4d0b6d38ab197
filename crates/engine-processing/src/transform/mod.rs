pub mod error;
pub mod feed_item;
pub mod flatten;
pub mod pipeline;
pub mod rich_text;
