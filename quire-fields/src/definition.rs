//! Collection (content type) definitions.
//!
//! Every optional level of admin configuration is an explicit `Option`, so
//! callers use the accessor methods instead of chaining lookups.

use serde::{Deserialize, Serialize};

use crate::types::FieldDef;

/// Display labels for a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Labels {
    pub singular: String,
    pub plural: String,
}

/// Custom view component overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewOverrides {
    /// Component name that replaces the default edit view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
}

/// Custom component overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<ViewOverrides>,
}

/// Admin presentation options for a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionAdmin {
    /// Field path whose value titles a document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_as_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentOverrides>,
}

/// Versioning options for a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VersionsConfig {
    #[serde(default)]
    pub drafts: bool,
}

/// A content type: identity, labels, and field schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentTypeDefinition {
    pub slug: String,
    pub labels: Labels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<CollectionAdmin>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<VersionsConfig>,
}

impl ContentTypeDefinition {
    /// A collection with the given slug, labels and fields and no admin options.
    pub fn new(
        slug: impl Into<String>,
        singular: impl Into<String>,
        plural: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> Self {
        Self {
            slug: slug.into(),
            labels: Labels {
                singular: singular.into(),
                plural: plural.into(),
            },
            admin: None,
            fields,
            versions: None,
        }
    }

    /// Set the title field path.
    pub fn with_use_as_title(mut self, path: impl Into<String>) -> Self {
        self.admin.get_or_insert_with(Default::default).use_as_title = Some(path.into());
        self
    }

    /// Enable or disable drafts.
    pub fn with_drafts(mut self, drafts: bool) -> Self {
        self.versions = Some(VersionsConfig { drafts });
        self
    }

    /// Set the custom edit view component.
    pub fn with_custom_edit_view(mut self, component: impl Into<String>) -> Self {
        let admin = self.admin.get_or_insert_with(Default::default);
        let components = admin.components.get_or_insert_with(Default::default);
        components.views.get_or_insert_with(Default::default).edit = Some(component.into());
        self
    }

    /// The field path used as a document's title, if configured.
    pub fn use_as_title(&self) -> Option<&str> {
        self.admin
            .as_ref()
            .and_then(|admin| admin.use_as_title.as_deref())
            .filter(|path| !path.is_empty())
    }

    /// The component that replaces the default edit view, if configured.
    pub fn custom_edit_view(&self) -> Option<&str> {
        self.admin
            .as_ref()
            .and_then(|admin| admin.components.as_ref())
            .and_then(|components| components.views.as_ref())
            .and_then(|views| views.edit.as_deref())
    }

    /// Whether documents of this collection have drafts.
    pub fn drafts_enabled(&self) -> bool {
        self.versions.as_ref().is_some_and(|v| v.drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    #[test]
    fn minimal_definition_from_yaml() {
        let yaml_input = r#"
slug: posts
labels:
  singular: Post
  plural: Posts
fields:
  - name: title
    type:
      kind: text
"#;
        let def: ContentTypeDefinition = serde_yaml_ng::from_str(yaml_input).unwrap();
        assert_eq!(def.slug, "posts");
        assert_eq!(def.labels.plural, "Posts");
        assert_eq!(def.use_as_title(), None);
        assert_eq!(def.custom_edit_view(), None);
        assert!(!def.drafts_enabled());
        assert_eq!(def.fields.len(), 1);
    }

    #[test]
    fn full_definition_from_yaml() {
        let yaml_input = r#"
slug: pages
labels:
  singular: Page
  plural: Pages
admin:
  use_as_title: title
  components:
    views:
      edit: PageEditor
versions:
  drafts: true
fields:
  - name: title
    type:
      kind: text
"#;
        let def: ContentTypeDefinition = serde_yaml_ng::from_str(yaml_input).unwrap();
        assert_eq!(def.use_as_title(), Some("title"));
        assert_eq!(def.custom_edit_view(), Some("PageEditor"));
        assert!(def.drafts_enabled());
    }

    #[test]
    fn partial_admin_levels_resolve_to_none() {
        let yaml_input = r#"
slug: media
labels:
  singular: Medium
  plural: Media
admin:
  components: {}
"#;
        let def: ContentTypeDefinition = serde_yaml_ng::from_str(yaml_input).unwrap();
        assert_eq!(def.custom_edit_view(), None);
        assert_eq!(def.use_as_title(), None);
    }

    #[test]
    fn empty_title_path_is_unset() {
        let def = ContentTypeDefinition::new("posts", "Post", "Posts", vec![]).with_use_as_title("");
        assert_eq!(def.use_as_title(), None);
    }

    #[test]
    fn builders_fill_nested_options() {
        let def = ContentTypeDefinition::new(
            "posts",
            "Post",
            "Posts",
            vec![FieldDef::new("title", FieldType::Text)],
        )
        .with_use_as_title("title")
        .with_custom_edit_view("PostEditor")
        .with_drafts(true);
        assert_eq!(def.use_as_title(), Some("title"));
        assert_eq!(def.custom_edit_view(), Some("PostEditor"));
        assert!(def.drafts_enabled());
    }
}
