//! Form state and the builders that derive it from a field schema.
//!
//! Form state is always rebuilt from scratch: schema + document + user + id +
//! operation in, a flat `path → field` map out.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use quire_fields::{FieldDefault, FieldKind, NormalizedField, NormalizedFieldSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::trace;

use crate::auth::User;
use crate::error::{EditError, Result};

/// Whether the form creates a document or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    pub fn for_mode(is_editing: bool) -> Self {
        if is_editing {
            Operation::Update
        } else {
            Operation::Create
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
        }
    }
}

/// One entry of form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub value: Value,
    pub initial_value: Value,
    /// Placeholder until validation runs; always `true` after a build.
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FormField {
    pub fn new(value: Value) -> Self {
        Self {
            initial_value: value.clone(),
            value,
            valid: true,
            error_message: None,
        }
    }
}

/// Everything the form holds, keyed by dotted field path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState(IndexMap<String, FormField>);

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, field: FormField) {
        self.0.insert(path.into(), field);
    }

    pub fn get(&self, path: &str) -> Option<&FormField> {
        self.0.get(path)
    }

    /// Current value at `path`.
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.0.get(path).map(|f| &f.value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Inputs to one form-state build.
#[derive(Debug, Clone)]
pub struct BuildStateArgs {
    pub field_schema: Arc<NormalizedFieldSchema>,
    pub data: Option<Value>,
    pub user: Option<User>,
    pub id: Option<String>,
    pub operation: Operation,
}

/// Derives form state from a schema and a document.
#[async_trait]
pub trait StateBuilder: Send + Sync {
    async fn build(&self, args: BuildStateArgs) -> Result<FormState>;
}

/// What a computed default can see.
#[derive(Debug, Clone, Copy)]
pub struct DefaultContext<'a> {
    pub path: &'a str,
    pub user: Option<&'a User>,
    pub id: Option<&'a str>,
    pub operation: Operation,
}

/// Produces the value of a `computed` field default.
#[async_trait]
pub trait DefaultResolver: Send + Sync {
    async fn resolve(&self, ctx: &DefaultContext<'_>) -> Result<Value>;
}

/// `current-user`: the signed-in user's id, or null.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUserDefault;

#[async_trait]
impl DefaultResolver for CurrentUserDefault {
    async fn resolve(&self, ctx: &DefaultContext<'_>) -> Result<Value> {
        Ok(ctx.user.map(|u| json!(u.id)).unwrap_or(Value::Null))
    }
}

/// Name under which [`CurrentUserDefault`] is registered.
pub const CURRENT_USER_DEFAULT: &str = "current-user";

/// The standard builder: walks the schema, reads values from the document,
/// and falls back to static or computed defaults.
///
/// Groups prefix their children's paths, rows don't, and arrays record their
/// row count at their own path with rows at `path.N.child`.
#[derive(Clone)]
pub struct SchemaStateBuilder {
    resolvers: HashMap<String, Arc<dyn DefaultResolver>>,
}

impl SchemaStateBuilder {
    /// A builder with the built-in `current-user` resolver.
    pub fn new() -> Self {
        Self {
            resolvers: HashMap::new(),
        }
        .with_resolver(CURRENT_USER_DEFAULT, CurrentUserDefault)
    }

    /// Register a computed-default resolver under `name`.
    pub fn with_resolver(
        mut self,
        name: impl Into<String>,
        resolver: impl DefaultResolver + 'static,
    ) -> Self {
        self.resolvers.insert(name.into(), Arc::new(resolver));
        self
    }
}

impl Default for SchemaStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct PendingField<'a> {
    path: String,
    value: Option<Value>,
    default: Option<&'a FieldDefault>,
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn collect_fields<'a>(
    fields: &'a [NormalizedField],
    data: Option<&Value>,
    prefix: &str,
    out: &mut Vec<PendingField<'a>>,
) {
    for field in fields {
        if !field.has_value() {
            collect_fields(&field.children, data, prefix, out);
            continue;
        }

        let path = join_path(prefix, &field.name);
        let raw = data
            .and_then(|d| d.get(&field.name))
            .filter(|v| !v.is_null());

        match field.kind {
            FieldKind::Group => collect_fields(&field.children, raw, &path, out),
            FieldKind::Array => {
                let rows = raw.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
                out.push(PendingField {
                    path: path.clone(),
                    value: Some(json!(rows.len())),
                    default: None,
                });
                for (i, row) in rows.iter().enumerate() {
                    collect_fields(&field.children, Some(row), &format!("{path}.{i}"), out);
                }
            }
            _ => out.push(PendingField {
                path,
                value: raw.cloned(),
                default: field.default.as_ref(),
            }),
        }
    }
}

#[async_trait]
impl StateBuilder for SchemaStateBuilder {
    async fn build(&self, args: BuildStateArgs) -> Result<FormState> {
        let mut pending = Vec::new();
        collect_fields(
            args.field_schema.fields(),
            args.data.as_ref(),
            "",
            &mut pending,
        );

        let mut state = FormState::new();
        for field in pending {
            let value = match (field.value, field.default) {
                (Some(value), _) => value,
                (None, Some(FieldDefault::Value(value))) => value.clone(),
                (None, Some(FieldDefault::Computed(name))) => {
                    let resolver =
                        self.resolvers
                            .get(name)
                            .ok_or_else(|| EditError::UnknownResolver {
                                name: name.clone(),
                                path: field.path.clone(),
                            })?;
                    let ctx = DefaultContext {
                        path: &field.path,
                        user: args.user.as_ref(),
                        id: args.id.as_deref(),
                        operation: args.operation,
                    };
                    resolver.resolve(&ctx).await?
                }
                (None, None) => Value::Null,
            };
            state.insert(field.path, FormField::new(value));
        }

        trace!(
            operation = %args.operation,
            fields = state.len(),
            "built form state"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_fields::{format_fields, ContentTypeDefinition, FieldDef, FieldType};

    fn schema() -> Arc<NormalizedFieldSchema> {
        let mut status = FieldDef::new(
            "status",
            FieldType::Select {
                options: vec![quire_fields::SelectOption {
                    value: "draft".into(),
                    label: None,
                }],
                has_many: false,
            },
        );
        status.default = Some(FieldDefault::Value(json!("draft")));

        let mut author = FieldDef::new(
            "author",
            FieldType::Relationship {
                relation_to: "users".into(),
                has_many: false,
            },
        );
        author.default = Some(FieldDefault::Computed(CURRENT_USER_DEFAULT.into()));

        let def = ContentTypeDefinition::new(
            "posts",
            "Post",
            "Posts",
            vec![
                FieldDef::new("title", FieldType::Text),
                status,
                author,
                FieldDef::new(
                    "meta",
                    FieldType::Group {
                        fields: vec![FieldDef::new("description", FieldType::Textarea)],
                    },
                ),
                FieldDef::new(
                    "",
                    FieldType::Row {
                        fields: vec![FieldDef::new("subtitle", FieldType::Text)],
                    },
                ),
                FieldDef::new(
                    "links",
                    FieldType::Array {
                        fields: vec![FieldDef::new("url", FieldType::Text)],
                    },
                ),
            ],
        );
        Arc::new(format_fields(&def, true).unwrap())
    }

    fn args(data: Option<Value>, operation: Operation) -> BuildStateArgs {
        BuildStateArgs {
            field_schema: schema(),
            data,
            user: Some(User::new("u1")),
            id: None,
            operation,
        }
    }

    #[tokio::test]
    async fn create_uses_defaults() {
        let state = SchemaStateBuilder::new()
            .build(args(None, Operation::Create))
            .await
            .unwrap();

        assert_eq!(state.value("title"), Some(&Value::Null));
        assert_eq!(state.value("status"), Some(&json!("draft")));
        assert_eq!(state.value("author"), Some(&json!("u1")));
        assert_eq!(state.value("meta.description"), Some(&Value::Null));
        assert_eq!(state.value("subtitle"), Some(&Value::Null));
        assert_eq!(state.value("links"), Some(&json!(0)));
        assert!(state.get("status").unwrap().valid);
    }

    #[tokio::test]
    async fn update_reads_document_values() {
        let data = json!({
            "id": "42",
            "title": "Widget",
            "status": "published",
            "author": "u9",
            "meta": {"description": "A widget"},
            "subtitle": "Small",
            "links": [{"url": "https://a"}, {"url": "https://b"}]
        });
        let state = SchemaStateBuilder::new()
            .build(args(Some(data), Operation::Update))
            .await
            .unwrap();

        assert_eq!(state.value("title"), Some(&json!("Widget")));
        assert_eq!(state.value("status"), Some(&json!("published")));
        assert_eq!(state.value("author"), Some(&json!("u9")));
        assert_eq!(state.value("meta.description"), Some(&json!("A widget")));
        assert_eq!(state.value("subtitle"), Some(&json!("Small")));
        assert_eq!(state.value("links"), Some(&json!(2)));
        assert_eq!(state.value("links.1.url"), Some(&json!("https://b")));
        assert_eq!(
            state.get("title").unwrap().initial_value,
            json!("Widget")
        );
    }

    #[tokio::test]
    async fn paths_follow_schema_order() {
        let state = SchemaStateBuilder::new()
            .build(args(None, Operation::Create))
            .await
            .unwrap();
        let paths: Vec<_> = state.paths().collect();
        assert_eq!(
            paths,
            vec!["title", "status", "author", "meta.description", "subtitle", "links"]
        );
    }

    struct Failing;

    #[async_trait]
    impl DefaultResolver for Failing {
        async fn resolve(&self, _ctx: &DefaultContext<'_>) -> Result<Value> {
            Err(EditError::state_build("lookup failed"))
        }
    }

    #[tokio::test]
    async fn resolver_failure_fails_the_build() {
        let builder = SchemaStateBuilder::new().with_resolver(CURRENT_USER_DEFAULT, Failing);
        let err = builder
            .build(args(None, Operation::Create))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("lookup failed"));
    }

    #[tokio::test]
    async fn unknown_resolver_is_an_error() {
        let builder = SchemaStateBuilder {
            resolvers: HashMap::new(),
        };
        let err = builder
            .build(args(None, Operation::Create))
            .await
            .unwrap_err();
        assert!(matches!(err, EditError::UnknownResolver { ref path, .. } if path == "author"));
    }

    #[test]
    fn operation_for_mode() {
        assert_eq!(Operation::for_mode(true), Operation::Update);
        assert_eq!(Operation::for_mode(false).to_string(), "create");
    }
}
