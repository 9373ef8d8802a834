//! What the edit view hands to the rendering layer, and what comes back from it.

use quire_fields::{ContentTypeDefinition, NormalizedFieldSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::PermissionView;
use crate::state::FormState;

/// Props for the presentation component.
///
/// The save callback isn't carried here: the rendering layer reports a
/// successful save through [`EditOrchestrator::on_save`](crate::EditOrchestrator::on_save).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditViewProps {
    pub is_loading: bool,
    pub data: Option<Value>,
    pub collection: ContentTypeDefinition,
    pub field_schema: NormalizedFieldSchema,
    pub permissions: Option<PermissionView>,
    pub is_editing: bool,
    /// `None` until the first build commits.
    pub initial_state: Option<FormState>,
    pub has_save_permission: bool,
    /// The document's REST URL. Absent while creating.
    #[serde(rename = "apiURL")]
    pub api_url: Option<String>,
    /// Where the form submits.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_edit_component: Option<String>,
}

/// A successful save as reported by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// The document as stored by the server.
    pub doc: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveResponse {
    pub fn new(doc: Value) -> Self {
        Self { doc, message: None }
    }

    /// The saved document's id. Numeric ids are stringified.
    pub fn document_id(&self) -> Option<String> {
        match self.doc.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// What the orchestrator did with a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Created: this instance is done and the edit view for the new document
    /// takes over.
    Navigated { url: String },
    /// Updated: form state is being rebuilt from the saved document.
    Rebuilding,
}
