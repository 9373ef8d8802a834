//! Breadcrumb trail for the edit view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label used for the second crumb while creating.
pub const CREATE_NEW_LABEL: &str = "Create New";

/// Label used when the title field is configured but empty.
pub const UNTITLED_LABEL: &str = "[Untitled]";

/// One breadcrumb. Entries without a URL are not navigable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepNavItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub label: String,
}

impl StepNavItem {
    pub fn link(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            label: label.into(),
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        Self {
            url: None,
            label: label.into(),
        }
    }
}

/// Ordered breadcrumbs, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationTrail(Vec<StepNavItem>);

impl NavigationTrail {
    pub fn items(&self) -> &[StepNavItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything the trail depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct NavInputs {
    pub list_url: String,
    pub plural_label: String,
    pub is_editing: bool,
    /// The document being edited, once available.
    pub display_datum: Option<Value>,
    pub title_field_path: Option<String>,
}

/// Receives the trail; the navigation chrome outside the edit view.
pub trait StepNav: Send + Sync {
    fn set_step_nav(&self, trail: &NavigationTrail);
}

/// Build the breadcrumbs for the current inputs.
pub fn build_trail(inputs: &NavInputs) -> NavigationTrail {
    let mut items = vec![StepNavItem::link(&inputs.list_url, &inputs.plural_label)];

    if inputs.is_editing {
        let label = match &inputs.display_datum {
            None => String::new(),
            Some(datum) => match inputs.title_field_path.as_deref() {
                Some(path) => {
                    title_label(value_at_path(datum, path)).unwrap_or_else(|| UNTITLED_LABEL.into())
                }
                None => datum.get("id").and_then(scalar_label).unwrap_or_default(),
            },
        };
        items.push(StepNavItem::text(label));
    } else {
        items.push(StepNavItem::text(CREATE_NEW_LABEL));
    }

    NavigationTrail(items)
}

/// Look up a dotted path inside a document.
pub fn value_at_path<'a>(datum: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(datum, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(rows) => segment.parse::<usize>().ok().and_then(|i| rows.get(i)),
        _ => None,
    })
}

/// A non-empty title, if the value has one. Null, `false`, `0` and `""` are empty.
fn title_label(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => scalar_label(other).filter(|label| !label.is_empty()),
    }
}

fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(datum: Option<Value>, title: Option<&str>) -> NavInputs {
        NavInputs {
            list_url: "/admin/collections/posts".into(),
            plural_label: "Posts".into(),
            is_editing: true,
            display_datum: datum,
            title_field_path: title.map(String::from),
        }
    }

    fn second_label(trail: &NavigationTrail) -> &str {
        &trail.items()[1].label
    }

    #[test]
    fn first_entry_links_to_list() {
        let trail = build_trail(&inputs(None, Some("name")));
        assert_eq!(
            trail.items()[0],
            StepNavItem::link("/admin/collections/posts", "Posts")
        );
    }

    #[test]
    fn title_from_configured_field() {
        let trail = build_trail(&inputs(Some(json!({"id": "42", "name": "Widget"})), Some("name")));
        assert_eq!(second_label(&trail), "Widget");
        assert_eq!(trail.items()[1].url, None);
    }

    #[test]
    fn empty_or_missing_title_is_untitled() {
        let empty = build_trail(&inputs(Some(json!({"id": "42", "name": ""})), Some("name")));
        assert_eq!(second_label(&empty), "[Untitled]");

        let missing = build_trail(&inputs(Some(json!({"id": "42"})), Some("name")));
        assert_eq!(second_label(&missing), "[Untitled]");

        let null = build_trail(&inputs(Some(json!({"id": "42", "name": null})), Some("name")));
        assert_eq!(second_label(&null), "[Untitled]");
    }

    #[test]
    fn id_when_no_title_field() {
        let trail = build_trail(&inputs(Some(json!({"id": "42", "name": "Widget"})), None));
        assert_eq!(second_label(&trail), "42");

        let numeric = build_trail(&inputs(Some(json!({"id": 7})), None));
        assert_eq!(second_label(&numeric), "7");
    }

    #[test]
    fn placeholder_while_loading() {
        let trail = build_trail(&inputs(None, Some("name")));
        assert_eq!(trail.len(), 2);
        assert_eq!(second_label(&trail), "");
    }

    #[test]
    fn create_mode_crumb() {
        let mut create = inputs(None, Some("name"));
        create.is_editing = false;
        let trail = build_trail(&create);
        assert_eq!(trail.items()[1], StepNavItem::text("Create New"));
        assert_eq!(trail.items()[1].url, None);
    }

    #[test]
    fn nested_title_path() {
        let trail = build_trail(&inputs(
            Some(json!({"id": "1", "meta": {"title": "Nested"}})),
            Some("meta.title"),
        ));
        assert_eq!(second_label(&trail), "Nested");
    }

    #[test]
    fn zero_or_false_title_is_untitled() {
        let zero = build_trail(&inputs(Some(json!({"id": "1", "name": 0})), Some("name")));
        assert_eq!(second_label(&zero), "[Untitled]");

        let float_zero = build_trail(&inputs(Some(json!({"id": "1", "name": 0.0})), Some("name")));
        assert_eq!(second_label(&float_zero), "[Untitled]");

        let off = build_trail(&inputs(Some(json!({"id": "1", "name": false})), Some("name")));
        assert_eq!(second_label(&off), "[Untitled]");
    }

    #[test]
    fn nonzero_number_title_is_stringified() {
        let trail = build_trail(&inputs(Some(json!({"id": "1", "name": 12})), Some("name")));
        assert_eq!(second_label(&trail), "12");
    }

    #[test]
    fn trail_serializes_without_missing_urls() {
        let mut create = inputs(None, None);
        create.is_editing = false;
        let json = serde_json::to_value(build_trail(&create)).unwrap();
        assert_eq!(
            json,
            json!([
                {"url": "/admin/collections/posts", "label": "Posts"},
                {"label": "Create New"}
            ])
        );
    }
}
