pub mod contentful;
pub mod error;
pub mod file;
pub mod source;
