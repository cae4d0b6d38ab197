pub mod identifiers;
pub mod locale;
pub mod value;
