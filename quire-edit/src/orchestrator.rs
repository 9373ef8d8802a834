//! The edit/create lifecycle for one document.
//!
//! An [`EditOrchestrator`] is one mounted edit view. It owns the formatted
//! field schema, the current document, the committed form state and the
//! breadcrumb trail, and it decides when to fetch and when to rebuild.
//!
//! Fetches and state builds run as spawned tasks. Each takes a ticket from
//! its own [`Sequencer`]; a completion commits only while its ticket is the
//! newest and the instance hasn't been retired. Erroring, navigating away after
//! a create, and unmounting all retire the instance.
//!
//! ```text
//!   mount ──(no id)──► Creating ──save──► navigate to edit URL (retired)
//!     │
//!     ├─(preload)────► Loaded ◄──fetch ok── Loading ◄─(id, no preload)
//!     │                  │                     │
//!     │               locale change ───────────┘
//!     │                                        │
//!     └────────────────────────────── fetch error ──► Errored (redirect)
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use quire_fields::{format_fields, ContentTypeDefinition, NormalizedFieldSchema};
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn, Instrument};

use crate::auth::{has_save_permission, User};
use crate::deps::EditDeps;
use crate::error::{EditError, Result};
use crate::loader::LoadResult;
use crate::logging::Pretty;
use crate::nav::{build_trail, NavInputs, NavigationTrail};
use crate::sequence::{Sequencer, Ticket};
use crate::state::{BuildStateArgs, FormState, Operation};
use crate::tracked::{Derived, Tracked};
use crate::urls::{
    api_url, collection_list_url, edit_url, fetch_target, not_found_url, save_action, FetchTarget,
};
use crate::view::{EditViewProps, SaveOutcome, SaveResponse};

/// Inbound props.
#[derive(Debug, Clone)]
pub struct EditProps {
    pub collection: Arc<ContentTypeDefinition>,
    pub is_editing: bool,
}

impl EditProps {
    pub fn edit(collection: Arc<ContentTypeDefinition>) -> Self {
        Self {
            collection,
            is_editing: true,
        }
    }

    pub fn create(collection: Arc<ContentTypeDefinition>) -> Self {
        Self {
            collection,
            is_editing: false,
        }
    }
}

/// What the router knows about the current location.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    /// Record id from the path.
    pub id: Option<String>,
    /// Document data carried along with the navigation.
    pub preload: Option<Value>,
}

impl RouteContext {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            preload: None,
        }
    }

    pub fn with_preload(mut self, data: Value) -> Self {
        self.preload = Some(data);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditStatus {
    /// No document expected.
    Creating,
    /// Document fetch in flight.
    Loading,
    Loaded,
    /// Fetch failed. Terminal.
    Errored,
}

/// Inputs to a form-state build other than the schema, which is fixed per instance.
#[derive(Debug, Clone, PartialEq)]
struct StateInputs {
    data: Option<Value>,
    user: Option<User>,
    id: Option<String>,
    operation: Operation,
}

struct ViewState {
    status: EditStatus,
    document: Option<Value>,
    user: Option<User>,
    initial_state: Option<FormState>,
    build_pending: bool,
    last_build_error: Option<String>,
    nav: Derived<NavInputs, NavigationTrail>,
    state_inputs: Tracked<StateInputs>,
    fetch_target: Tracked<FetchTarget>,
    redirected: bool,
    navigated: bool,
}

impl ViewState {
    /// A committed state never outlives the inputs it was built from: while a
    /// build is pending the form has nothing to show.
    fn visible_state(&self) -> Option<FormState> {
        if self.build_pending {
            None
        } else {
            self.initial_state.clone()
        }
    }
}

struct Shared {
    deps: EditDeps,
    collection: Arc<ContentTypeDefinition>,
    field_schema: Arc<NormalizedFieldSchema>,
    is_editing: bool,
    id: Option<String>,
    builds: Sequencer,
    fetches: Sequencer,
    view: tokio::sync::Mutex<ViewState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// One mounted edit or create view.
pub struct EditOrchestrator {
    shared: Arc<Shared>,
}

impl EditOrchestrator {
    /// Format the schema, publish the first breadcrumbs, and start loading.
    ///
    /// Editing requires a route id. A preload is shown as the document and
    /// no fetch is issued for it.
    pub async fn mount(props: EditProps, route: RouteContext, deps: EditDeps) -> Result<Self> {
        let slug = props.collection.slug.clone();
        let id = if props.is_editing {
            Some(
                route
                    .id
                    .ok_or_else(|| EditError::MissingRecordId { slug: slug.clone() })?,
            )
        } else {
            None
        };

        let field_schema = Arc::new(format_fields(&props.collection, props.is_editing)?);

        let status = match (props.is_editing, &route.preload) {
            (false, _) => EditStatus::Creating,
            (true, Some(_)) => EditStatus::Loaded,
            (true, None) => EditStatus::Loading,
        };
        debug!(%slug, id = ?id, ?status, fields = field_schema.len(), "mounting edit view");

        let view = ViewState {
            status,
            document: route.preload.filter(|_| props.is_editing),
            user: deps.auth.user.clone(),
            initial_state: None,
            build_pending: false,
            last_build_error: None,
            nav: Derived::new(),
            state_inputs: Tracked::new(),
            fetch_target: Tracked::new(),
            redirected: false,
            navigated: false,
        };

        let shared = Arc::new(Shared {
            deps,
            collection: props.collection,
            field_schema,
            is_editing: props.is_editing,
            id,
            builds: Sequencer::new(),
            fetches: Sequencer::new(),
            view: tokio::sync::Mutex::new(view),
            tasks: Mutex::new(Vec::new()),
        });

        {
            let mut view = shared.view.lock().await;
            if shared.is_editing {
                let target = shared.current_target();
                view.fetch_target.observe(target.clone());
                if status == EditStatus::Loading {
                    shared.start_fetch(target);
                }
            }
            shared.sync(&mut view);
        }

        Ok(Self { shared })
    }

    /// Re-fetch if the locale-dependent fetch target changed.
    pub async fn refresh_document(&self) {
        let shared = &self.shared;
        if !shared.is_editing || shared.fetches.is_retired() {
            return;
        }
        let mut view = shared.view.lock().await;
        let target = shared.current_target();
        if view.fetch_target.observe(target.clone()) {
            debug!(slug = %shared.collection.slug, url = ?target.url(), "fetch target changed");
            view.status = EditStatus::Loading;
            shared.start_fetch(target);
        }
    }

    /// Fetch the current target again even if it hasn't changed.
    pub async fn reload(&self) {
        let shared = &self.shared;
        if !shared.is_editing || shared.fetches.is_retired() {
            return;
        }
        let mut view = shared.view.lock().await;
        let target = shared.current_target();
        view.fetch_target.observe(target.clone());
        view.status = EditStatus::Loading;
        shared.start_fetch(target);
    }

    /// The signed-in user changed.
    pub async fn set_user(&self, user: Option<User>) {
        let mut view = self.shared.view.lock().await;
        view.user = user;
        self.shared.sync(&mut view);
    }

    /// Handle a successful save.
    ///
    /// Version metadata is refreshed first. A create then hands over to the
    /// edit view for the new id; an update rebuilds form state from the saved
    /// document without re-fetching it.
    pub async fn on_save(&self, response: SaveResponse) -> Result<SaveOutcome> {
        let shared = &self.shared;
        let slug = &shared.collection.slug;
        if shared.builds.is_retired() {
            return Err(EditError::retired(slug));
        }

        shared.deps.versions.refresh().await;

        if !shared.is_editing {
            let id = response
                .document_id()
                .ok_or_else(|| EditError::MissingDocumentId { slug: slug.clone() })?;
            let url = edit_url(&shared.deps.config, slug, &id);

            let mut view = shared.view.lock().await;
            if view.navigated || shared.builds.is_retired() {
                return Err(EditError::retired(slug));
            }
            view.navigated = true;
            shared.retire();
            drop(view);

            info!(%slug, %id, %url, "document created");
            shared.deps.navigator.push(&url);
            return Ok(SaveOutcome::Navigated { url });
        }

        let mut view = shared.view.lock().await;
        if shared.builds.is_retired() {
            return Err(EditError::retired(slug));
        }
        // The saved document supersedes anything still being fetched.
        shared.fetches.begin();
        view.status = EditStatus::Loaded;
        view.document = Some(response.doc);
        shared.publish_nav(&mut view);

        let inputs = shared.state_inputs(&view);
        view.state_inputs.observe(inputs.clone());
        shared.start_build(&mut view, inputs);
        debug!(%slug, "document saved, rebuilding form state");
        Ok(SaveOutcome::Rebuilding)
    }

    /// Props for the rendering layer.
    pub async fn view_props(&self) -> EditViewProps {
        let shared = &self.shared;
        let config = &shared.deps.config;
        let collection = &shared.collection;
        let view = shared.view.lock().await;
        let permissions = shared
            .deps
            .auth
            .permissions
            .collection(&collection.slug)
            .copied();
        let locale = shared.deps.locale.current();

        EditViewProps {
            is_loading: view.status == EditStatus::Loading || view.build_pending,
            data: view.document.clone(),
            collection: collection.as_ref().clone(),
            field_schema: shared.field_schema.as_ref().clone(),
            permissions,
            is_editing: shared.is_editing,
            initial_state: view.visible_state(),
            has_save_permission: has_save_permission(permissions.as_ref(), shared.is_editing),
            api_url: shared
                .id
                .as_deref()
                .map(|id| api_url(config, &collection.slug, id, collection.drafts_enabled())),
            action: save_action(config, &collection.slug, shared.id.as_deref(), &locale),
            custom_edit_component: collection.custom_edit_view().map(String::from),
        }
    }

    pub async fn status(&self) -> EditStatus {
        self.shared.view.lock().await.status
    }

    /// The most recently committed form state, or `None` while a rebuild is pending.
    pub async fn initial_state(&self) -> Option<FormState> {
        self.shared.view.lock().await.visible_state()
    }

    pub async fn navigation_trail(&self) -> Option<NavigationTrail> {
        self.shared.view.lock().await.nav.get().cloned()
    }

    /// Why the newest build failed, if it did.
    pub async fn last_build_error(&self) -> Option<String> {
        self.shared.view.lock().await.last_build_error.clone()
    }

    pub fn field_schema(&self) -> &NormalizedFieldSchema {
        &self.shared.field_schema
    }

    pub fn is_editing(&self) -> bool {
        self.shared.is_editing
    }

    /// Wait until every spawned fetch and build, including ones they spawn, has finished.
    pub async fn settle(&self) {
        loop {
            let pending: Vec<_> = self.shared.lock_tasks().drain(..).collect();
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    warn!(%e, "edit view task failed");
                }
            }
        }
    }

    /// Turn every outstanding and future completion into a no-op.
    pub fn unmount(&self) {
        debug!(slug = %self.shared.collection.slug, "unmounting edit view");
        self.shared.retire();
    }
}

impl Drop for EditOrchestrator {
    fn drop(&mut self) {
        self.shared.retire();
    }
}

impl Shared {
    fn current_target(&self) -> FetchTarget {
        fetch_target(
            &self.deps.config,
            &self.collection.slug,
            self.id.as_deref(),
            self.is_editing,
            &self.deps.locale.current(),
        )
    }

    fn state_inputs(&self, view: &ViewState) -> StateInputs {
        StateInputs {
            data: view.document.clone(),
            user: view.user.clone(),
            id: self.id.clone(),
            operation: Operation::for_mode(self.is_editing),
        }
    }

    fn retire(&self) {
        self.builds.retire();
        self.fetches.retire();
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self.lock_tasks();
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Recompute everything derived from the current view.
    fn sync(self: &Arc<Self>, view: &mut ViewState) {
        self.publish_nav(view);

        if self.builds.is_retired()
            || matches!(view.status, EditStatus::Loading | EditStatus::Errored)
            || (self.is_editing && view.document.is_none())
        {
            return;
        }

        let inputs = self.state_inputs(view);
        if view.state_inputs.observe(inputs.clone()) {
            self.start_build(view, inputs);
        }
    }

    fn publish_nav(&self, view: &mut ViewState) {
        let inputs = NavInputs {
            list_url: collection_list_url(&self.deps.config, &self.collection.slug),
            plural_label: self.collection.labels.plural.clone(),
            is_editing: self.is_editing,
            display_datum: view.document.clone(),
            title_field_path: self.collection.use_as_title().map(String::from),
        };
        let (trail, changed) = view.nav.update(inputs, build_trail);
        if changed {
            trace!("breadcrumbs: {}", Pretty(trail));
            self.deps.step_nav.set_step_nav(trail);
        }
    }

    fn start_fetch(self: &Arc<Self>, target: FetchTarget) {
        let ticket = self.fetches.begin();
        let shared = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = shared.deps.loader.load(&target).await;
            shared.finish_fetch(ticket, result).await;
        }
        .in_current_span());
        self.track(handle);
    }

    async fn finish_fetch(self: &Arc<Self>, ticket: Ticket, result: LoadResult) {
        let mut view = self.view.lock().await;
        if !self.fetches.is_current(ticket) {
            debug!(ticket = ticket.seq(), "discarding superseded fetch");
            return;
        }

        if result.is_error {
            view.status = EditStatus::Errored;
            self.retire();
            if !view.redirected {
                view.redirected = true;
                let url = not_found_url(&self.deps.config);
                warn!(slug = %self.collection.slug, id = ?self.id, %url, "document fetch failed");
                self.deps.navigator.redirect(&url);
            }
            return;
        }

        if result.is_loading {
            view.status = EditStatus::Loading;
            return;
        }

        debug!(slug = %self.collection.slug, id = ?self.id, "document loaded");
        view.status = EditStatus::Loaded;
        view.document = result.data;
        self.sync(&mut view);
    }

    fn start_build(self: &Arc<Self>, view: &mut ViewState, inputs: StateInputs) {
        let ticket = self.builds.begin();
        view.build_pending = true;
        trace!(ticket = ticket.seq(), operation = %inputs.operation, "scheduling form state build");
        let args = BuildStateArgs {
            field_schema: Arc::clone(&self.field_schema),
            data: inputs.data,
            user: inputs.user,
            id: inputs.id,
            operation: inputs.operation,
        };
        let shared = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = shared.deps.state_builder.build(args).await;
            shared.finish_build(ticket, result).await;
        }
        .in_current_span());
        self.track(handle);
    }

    async fn finish_build(&self, ticket: Ticket, result: Result<FormState>) {
        let mut view = self.view.lock().await;
        if !self.builds.is_current(ticket) {
            debug!(ticket = ticket.seq(), "discarding superseded form state build");
            return;
        }
        view.build_pending = false;
        match result {
            Ok(state) => {
                trace!(ticket = ticket.seq(), fields = state.len(), "committed form state");
                view.initial_state = Some(state);
                view.last_build_error = None;
            }
            Err(e) => {
                warn!(slug = %self.collection.slug, %e, "form state build failed, keeping previous state");
                view.last_build_error = Some(e.to_string());
            }
        }
    }
}
