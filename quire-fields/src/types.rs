//! Core field types for collection schemas.
//!
//! All types serialize to/from YAML via serde. A field definition describes a
//! named, typed attribute of a document. Container fields (`group`, `row`,
//! `array`) nest further field definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single option in a select field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The type of a field — determines what shape the value takes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Textarea,
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Checkbox,
    Date,
    Select {
        options: Vec<SelectOption>,
        #[serde(default)]
        has_many: bool,
    },
    /// Stores document IDs pointing into another collection.
    Relationship {
        relation_to: String,
        #[serde(default)]
        has_many: bool,
    },
    /// Nests its children under its own name in the document.
    Group { fields: Vec<FieldDef> },
    /// Layout only: children live at the same level as the row.
    Row { fields: Vec<FieldDef> },
    /// Repeating rows of its children, addressed as `name.N.child`.
    Array { fields: Vec<FieldDef> },
}

impl FieldType {
    /// Nested field definitions for container types, empty otherwise.
    pub fn children(&self) -> &[FieldDef] {
        match self {
            FieldType::Group { fields } | FieldType::Row { fields } | FieldType::Array { fields } => {
                fields
            }
            _ => &[],
        }
    }

    /// Whether this type contributes a path segment and a value of its own.
    pub fn is_presentational(&self) -> bool {
        matches!(self, FieldType::Row { .. })
    }
}

/// How a field value is edited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Editor {
    Text,
    Textarea,
    Number,
    Checkbox,
    Date,
    Select,
    MultiSelect,
    Relationship,
    None,
}

/// Which form mode a field takes part in.
///
/// The rule that decides this lives with whoever writes the definition; the
/// formatter only honours it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Applies {
    #[default]
    Always,
    /// Only shown when editing an existing document.
    Edit,
    /// Only shown when creating a new document.
    Create,
}

impl Applies {
    /// Whether a field with this applicability belongs in the given mode.
    pub fn includes(self, is_editing: bool) -> bool {
        match self {
            Applies::Always => true,
            Applies::Edit => is_editing,
            Applies::Create => !is_editing,
        }
    }
}

/// Initial value for a field when the document has none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum FieldDefault {
    /// A literal JSON value.
    Value(Value),
    /// Resolved at form-build time by a named resolver.
    Computed(String),
}

/// Presentation hints for a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldAdmin {
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Path of a sibling value that must be truthy for the field to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<Editor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A field definition — the complete schema for a single named attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    /// Empty only for `row` fields.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub type_: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub applies: Applies,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<FieldAdmin>,
}

impl FieldDef {
    /// A plain field of the given type with every option at its default.
    pub fn new(name: impl Into<String>, type_: FieldType) -> Self {
        Self {
            name: name.into(),
            label: None,
            type_,
            default: None,
            required: false,
            localized: false,
            applies: Applies::Always,
            admin: None,
        }
    }

    /// Infer editor from field type if not explicitly set.
    pub fn effective_editor(&self) -> Editor {
        if let Some(editor) = self.admin.as_ref().and_then(|a| a.editor) {
            return editor;
        }
        match &self.type_ {
            FieldType::Text => Editor::Text,
            FieldType::Textarea => Editor::Textarea,
            FieldType::Number { .. } => Editor::Number,
            FieldType::Checkbox => Editor::Checkbox,
            FieldType::Date => Editor::Date,
            FieldType::Select {
                has_many: true, ..
            } => Editor::MultiSelect,
            FieldType::Select {
                has_many: false, ..
            } => Editor::Select,
            FieldType::Relationship { .. } => Editor::Relationship,
            FieldType::Group { .. } | FieldType::Row { .. } | FieldType::Array { .. } => {
                Editor::None
            }
        }
    }
}
