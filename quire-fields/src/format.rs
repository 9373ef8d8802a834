//! Field schema formatting for create and edit forms.
//!
//! [`format_fields`] is a pure function of the definition and the mode flag:
//! it drops fields that don't apply to the mode, resolves labels and editors,
//! and rejects definitions that cannot produce a usable schema.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definition::ContentTypeDefinition;
use crate::error::{FieldsError, Result};
use crate::types::{Editor, FieldDef, FieldDefault, FieldType, SelectOption};

/// Field type with container children split out into [`NormalizedField::children`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldKind {
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
        has_many: bool,
    },
    Relationship {
        relation_to: String,
        has_many: bool,
    },
    Group,
    Row,
    Array,
}

impl From<&FieldType> for FieldKind {
    fn from(type_: &FieldType) -> Self {
        match type_ {
            FieldType::Text => FieldKind::Text,
            FieldType::Textarea => FieldKind::Textarea,
            FieldType::Number { min, max } => FieldKind::Number {
                min: *min,
                max: *max,
            },
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Date => FieldKind::Date,
            FieldType::Select { options, has_many } => FieldKind::Select {
                options: options.clone(),
                has_many: *has_many,
            },
            FieldType::Relationship {
                relation_to,
                has_many,
            } => FieldKind::Relationship {
                relation_to: relation_to.clone(),
                has_many: *has_many,
            },
            FieldType::Group { .. } => FieldKind::Group,
            FieldType::Row { .. } => FieldKind::Row,
            FieldType::Array { .. } => FieldKind::Array,
        }
    }
}

/// A render-ready field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedField {
    /// Empty for rows.
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub editor: Editor,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NormalizedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
    pub required: bool,
    pub localized: bool,
    pub read_only: bool,
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl NormalizedField {
    /// Whether the field owns a value in the document.
    pub fn has_value(&self) -> bool {
        !matches!(self.kind, FieldKind::Row)
    }
}

/// The ordered, immutable field schema for one (definition, mode) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct NormalizedFieldSchema {
    fields: Vec<NormalizedField>,
}

impl NormalizedFieldSchema {
    /// Top-level fields, in definition order.
    pub fn fields(&self) -> &[NormalizedField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Find a field by dotted path. Rows are transparent; array rows are
    /// addressed without the row index.
    pub fn find(&self, path: &str) -> Option<&NormalizedField> {
        let mut level = self.fields.as_slice();
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let field = find_in_level(level, segment)?;
            if segments.peek().is_none() {
                return Some(field);
            }
            level = &field.children;
        }
        None
    }
}

fn find_in_level<'a>(level: &'a [NormalizedField], name: &str) -> Option<&'a NormalizedField> {
    for field in level {
        if field.has_value() {
            if field.name == name {
                return Some(field);
            }
        } else if let Some(found) = find_in_level(&field.children, name) {
            return Some(found);
        }
    }
    None
}

/// Build the field schema for a create (`is_editing = false`) or edit form.
pub fn format_fields(
    definition: &ContentTypeDefinition,
    is_editing: bool,
) -> Result<NormalizedFieldSchema> {
    if definition.slug.trim().is_empty() {
        return Err(FieldsError::invalid_schema(
            &definition.slug,
            "collection slug is empty",
        ));
    }
    if definition.labels.plural.trim().is_empty() {
        return Err(FieldsError::invalid_schema(
            &definition.slug,
            "plural label is empty",
        ));
    }

    let fields = format_level(&definition.slug, &definition.fields, is_editing)?;
    debug!(
        slug = %definition.slug,
        is_editing,
        fields = fields.len(),
        "formatted field schema"
    );
    Ok(NormalizedFieldSchema { fields })
}

fn format_level(
    collection: &str,
    defs: &[FieldDef],
    is_editing: bool,
) -> Result<Vec<NormalizedField>> {
    let formatted = defs
        .iter()
        .filter(|def| def.applies.includes(is_editing))
        .map(|def| format_field(collection, def, is_editing))
        .collect::<Result<Vec<_>>>()?;

    {
        let mut seen = HashSet::new();
        check_unique(collection, &formatted, &mut seen)?;
    }
    Ok(formatted)
}

/// Names must be unique among the values at one level; rows flatten into
/// their parent's level.
fn check_unique<'a>(
    collection: &str,
    level: &'a [NormalizedField],
    seen: &mut HashSet<&'a str>,
) -> Result<()> {
    for field in level {
        if field.has_value() {
            if !seen.insert(field.name.as_str()) {
                return Err(FieldsError::invalid_schema(
                    collection,
                    format!("duplicate field name: {}", field.name),
                ));
            }
        } else {
            check_unique(collection, &field.children, seen)?;
        }
    }
    Ok(())
}

fn format_field(collection: &str, def: &FieldDef, is_editing: bool) -> Result<NormalizedField> {
    let presentational = def.type_.is_presentational();
    if !presentational && def.name.trim().is_empty() {
        return Err(FieldsError::invalid_schema(
            collection,
            "field without a name",
        ));
    }
    if def.name.contains('.') {
        return Err(FieldsError::invalid_schema(
            collection,
            format!("field name may not contain '.': {}", def.name),
        ));
    }
    match &def.type_ {
        FieldType::Select { options, .. } if options.is_empty() => {
            return Err(FieldsError::invalid_schema(
                collection,
                format!("select field '{}' has no options", def.name),
            ));
        }
        FieldType::Relationship { relation_to, .. } if relation_to.trim().is_empty() => {
            return Err(FieldsError::invalid_schema(
                collection,
                format!("relationship field '{}' has no target", def.name),
            ));
        }
        _ => {}
    }

    let children = format_level(collection, def.type_.children(), is_editing)?;
    let admin = def.admin.clone().unwrap_or_default();

    Ok(NormalizedField {
        name: def.name.clone(),
        label: def.label.clone().unwrap_or_else(|| humanize(&def.name)),
        kind: FieldKind::from(&def.type_),
        editor: def.effective_editor(),
        children,
        default: def.default.clone(),
        required: def.required,
        localized: def.localized,
        read_only: admin.read_only || def.name == "id",
        hidden: admin.hidden,
        condition: admin.condition,
    })
}

/// `published_at` → `Published At`
fn humanize(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
