//! Error types for the edit workflow

use thiserror::Error;

/// Result type for edit workflow operations
pub type Result<T> = std::result::Result<T, EditError>;

/// Errors that can occur while driving an edit or create form
#[derive(Debug, Error)]
pub enum EditError {
    /// The collection definition could not be formatted
    #[error(transparent)]
    Schema(#[from] quire_fields::FieldsError),

    /// Edit mode was requested without a record identifier
    #[error("edit view for '{slug}' mounted without a record id")]
    MissingRecordId { slug: String },

    /// A create-mode save response carried no document id
    #[error("save response for '{slug}' has no document id")]
    MissingDocumentId { slug: String },

    /// The view instance has navigated away, errored, or been unmounted
    #[error("edit view for '{slug}' is no longer active")]
    Retired { slug: String },

    /// Building form state failed
    #[error("failed to build form state: {message}")]
    StateBuild { message: String },

    /// A computed default names a resolver that isn't registered
    #[error("unknown default resolver '{name}' for field '{path}'")]
    UnknownResolver { name: String, path: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl EditError {
    /// Create a state build error
    pub fn state_build(message: impl Into<String>) -> Self {
        Self::StateBuild {
            message: message.into(),
        }
    }

    /// Create a retired-view error
    pub fn retired(slug: impl Into<String>) -> Self {
        Self::Retired { slug: slug.into() }
    }
}

impl From<figment::Error> for EditError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
