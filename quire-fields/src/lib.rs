//! Content-type definitions and field schemas
//!
//! `quire-fields` owns the schema side of the admin: what a collection is
//! called, which fields it has, and how those fields are presented for a
//! create or an edit form. It knows nothing about documents, HTTP, or form
//! values.
//!
//! # Architecture
//!
//! - **Definitions**: [`ContentTypeDefinition`] describes one collection; nested
//!   optional configuration is modelled explicitly with `Option` at each level
//! - **Formatting**: [`format_fields`] turns a definition plus a mode flag into a
//!   render-ready [`NormalizedFieldSchema`]
//! - **YAML on disk**: [`CollectionsContext`] loads one `.yaml` file per collection
//!   and seeds defaults that don't already exist

pub mod definition;
pub mod error;
pub mod format;
pub mod registry;
pub mod types;

pub use definition::{
    CollectionAdmin, ComponentOverrides, ContentTypeDefinition, Labels, VersionsConfig,
    ViewOverrides,
};
pub use error::{FieldsError, Result};
pub use format::{format_fields, FieldKind, NormalizedField, NormalizedFieldSchema};
pub use registry::{CollectionDefaults, CollectionsContext, CollectionsContextBuilder};
pub use types::{Applies, Editor, FieldAdmin, FieldDef, FieldDefault, FieldType, SelectOption};
