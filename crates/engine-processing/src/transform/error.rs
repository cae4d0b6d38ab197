use thiserror::Error;

/// Why an entry could not be flattened. Every variant names the field path
/// that failed, e.g. `fields.variants[0].fields.sizeClass`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("missing field '{path}'")]
    MissingField { path: String },

    #[error("field '{path}' has no locale values")]
    EmptyLocaleMap { path: String },

    #[error("field '{path}' is an empty list")]
    EmptyList { path: String },

    #[error("field '{path}' should be {expected}, found {found}")]
    UnexpectedType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl TransformError {
    pub fn missing(path: impl Into<String>) -> Self {
        TransformError::MissingField { path: path.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            TransformError::MissingField { path }
            | TransformError::EmptyLocaleMap { path }
            | TransformError::EmptyList { path }
            | TransformError::UnexpectedType { path, .. } => path,
        }
    }
}
