//! Collaborators injected into the edit workflow.
//!
//! Config, auth and locale are read-only inputs owned elsewhere. Navigation,
//! breadcrumbs and version metadata are outbound effects.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::auth::AuthContext;
use crate::config::AdminConfig;
use crate::loader::DocumentLoader;
use crate::nav::StepNav;
use crate::state::StateBuilder;

/// The currently selected content locale.
pub trait LocaleSource: Send + Sync {
    fn current(&self) -> String;
}

/// A locale that never changes.
#[derive(Debug, Clone)]
pub struct StaticLocale(pub String);

impl StaticLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self(locale.into())
    }
}

impl LocaleSource for StaticLocale {
    fn current(&self) -> String {
        self.0.clone()
    }
}

/// Follows a locale selector that publishes through a watch channel.
impl LocaleSource for watch::Receiver<String> {
    fn current(&self) -> String {
        self.borrow().clone()
    }
}

/// The routing primitive.
pub trait Navigator: Send + Sync {
    /// Navigate forward, keeping history.
    fn push(&self, url: &str);

    /// Replace the current location.
    fn redirect(&self, url: &str);
}

/// Version metadata for the document being edited.
#[async_trait]
pub trait DocumentVersions: Send + Sync {
    /// Re-request version metadata after a save.
    async fn refresh(&self);
}

/// For collections without version history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVersions;

#[async_trait]
impl DocumentVersions for NoopVersions {
    async fn refresh(&self) {}
}

/// Everything an [`EditOrchestrator`](crate::EditOrchestrator) needs from outside.
#[derive(Clone)]
pub struct EditDeps {
    pub config: Arc<AdminConfig>,
    pub auth: Arc<AuthContext>,
    pub locale: Arc<dyn LocaleSource>,
    pub loader: Arc<dyn DocumentLoader>,
    pub state_builder: Arc<dyn StateBuilder>,
    pub step_nav: Arc<dyn StepNav>,
    pub navigator: Arc<dyn Navigator>,
    pub versions: Arc<dyn DocumentVersions>,
}
