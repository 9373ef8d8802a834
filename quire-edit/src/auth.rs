//! Signed-in user and the permission projection for a collection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The signed-in user, as handed to form-state building.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            roles: Vec::new(),
        }
    }
}

/// A single granted-or-not permission.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    #[serde(default)]
    pub permission: bool,
}

impl Permission {
    pub fn granted() -> Self {
        Self { permission: true }
    }

    pub fn denied() -> Self {
        Self { permission: false }
    }
}

/// Operation permissions scoped to one collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionView {
    #[serde(default)]
    pub create: Permission,
    #[serde(default)]
    pub read: Permission,
    #[serde(default)]
    pub update: Permission,
    #[serde(default)]
    pub delete: Permission,
}

impl PermissionView {
    /// Every operation granted.
    pub fn all() -> Self {
        Self {
            create: Permission::granted(),
            read: Permission::granted(),
            update: Permission::granted(),
            delete: Permission::granted(),
        }
    }

    /// Whether the save button may submit in the given mode.
    pub fn can_save(&self, is_editing: bool) -> bool {
        if is_editing {
            self.update.permission
        } else {
            self.create.permission
        }
    }
}

/// Permissions computed for the signed-in user, keyed by collection slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Permissions {
    #[serde(default)]
    pub collections: HashMap<String, PermissionView>,
}

impl Permissions {
    /// Grant `view` on `slug`.
    pub fn with_collection(mut self, slug: impl Into<String>, view: PermissionView) -> Self {
        self.collections.insert(slug.into(), view);
        self
    }

    /// The projection for one collection, if the user has any entry for it.
    pub fn collection(&self, slug: &str) -> Option<&PermissionView> {
        self.collections.get(slug)
    }
}

/// Auth state shared by the admin. Read-only to the edit workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthContext {
    pub user: Option<User>,
    pub permissions: Permissions,
}

impl AuthContext {
    pub fn new(user: Option<User>, permissions: Permissions) -> Self {
        Self { user, permissions }
    }
}

/// `update` when editing, `create` when creating; absent permissions deny.
pub fn has_save_permission(view: Option<&PermissionView>, is_editing: bool) -> bool {
    view.is_some_and(|v| v.can_save(is_editing))
}
