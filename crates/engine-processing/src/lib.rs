pub mod error;
pub mod producer;
pub mod transform;
