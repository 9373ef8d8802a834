//! Error types for the fields crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while loading or formatting collection schemas
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Collection definition not found by slug
    #[error("collection not found: {slug}")]
    CollectionNotFound { slug: String },

    /// The definition cannot be turned into a field schema
    #[error("invalid schema for collection '{collection}': {message}")]
    InvalidSchema { collection: String, message: String },

    /// Collections directory not found
    #[error("collections directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FieldsError {
    /// Create an invalid schema error
    pub fn invalid_schema(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            collection: collection.into(),
            message: message.into(),
        }
    }
}
