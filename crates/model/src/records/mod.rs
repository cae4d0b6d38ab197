pub mod entry;
pub mod flat;
