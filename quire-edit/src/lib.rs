//! Edit/create workflow core
//!
//! `quire-edit` drives the edit view for one document of a collection: it
//! formats the field schema, fetches (or receives) the document, derives the
//! initial form state, keeps the breadcrumbs current, and decides what the
//! save button may do. Rendering, HTTP transport choices, permission
//! computation and routing are collaborators passed in through [`EditDeps`].
//!
//! # Architecture
//!
//! - **Orchestrator**: [`EditOrchestrator`] owns one mounted view and its
//!   `Creating / Loading / Loaded / Errored` lifecycle
//! - **Latest wins**: fetches and form-state builds are tagged by a
//!   [`Sequencer`]; completions that were superseded or outlived the view are
//!   dropped
//! - **Value-compared recomputation**: breadcrumbs and builds rerun only when
//!   their inputs differ by value ([`Tracked`], [`Derived`])
//! - **Configuration**: [`AdminConfig`] layers defaults, a config file and
//!   `QUIRE_*` environment variables

pub mod auth;
pub mod config;
pub mod deps;
pub mod error;
pub mod loader;
pub mod logging;
pub mod nav;
pub mod orchestrator;
pub mod sequence;
pub mod state;
pub mod tracked;
pub mod urls;
pub mod view;

pub use auth::{has_save_permission, AuthContext, Permission, PermissionView, Permissions, User};
pub use config::{AdminConfig, Routes, ENV_PREFIX};
pub use deps::{DocumentVersions, EditDeps, LocaleSource, Navigator, NoopVersions, StaticLocale};
pub use error::{EditError, Result};
pub use loader::{DocumentLoader, HttpDocumentLoader, LoadResult};
pub use logging::Pretty;
pub use nav::{build_trail, NavInputs, NavigationTrail, StepNav, StepNavItem};
pub use orchestrator::{EditOrchestrator, EditProps, EditStatus, RouteContext};
pub use sequence::{Sequencer, Ticket};
pub use state::{
    BuildStateArgs, CurrentUserDefault, DefaultContext, DefaultResolver, FormField, FormState,
    Operation, SchemaStateBuilder, StateBuilder,
};
pub use tracked::{Derived, Tracked};
pub use urls::{api_url, collection_list_url, edit_url, fetch_target, save_action, FetchTarget};
pub use view::{EditViewProps, SaveOutcome, SaveResponse};
