//! Mount one edit view, let it settle, and collect what it rendered.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use quire_edit::{
    AdminConfig, AuthContext, EditDeps, EditOrchestrator, EditProps, EditStatus, EditViewProps,
    HttpDocumentLoader, NavigationTrail, Navigator, NoopVersions, Permission, PermissionView,
    Permissions, Pretty, RouteContext, SchemaStateBuilder, StaticLocale, StepNav, User,
};
use quire_fields::CollectionsContext;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands, SessionArgs};

/// What the view ended up showing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub status: EditStatus,
    pub breadcrumbs: Option<NavigationTrail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_to: Option<String>,
    pub view: EditViewProps,
}

impl Report {
    pub fn is_errored(&self) -> bool {
        self.status == EditStatus::Errored
    }
}

/// Logs breadcrumbs and records where the view tried to go.
#[derive(Default)]
struct TerminalChrome {
    last_visit: Mutex<Option<String>>,
}

impl TerminalChrome {
    fn last_visit(&self) -> Option<String> {
        self.last_visit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn visit(&self, url: &str) {
        *self.last_visit.lock().unwrap_or_else(PoisonError::into_inner) = Some(url.to_string());
    }
}

impl StepNav for TerminalChrome {
    fn set_step_nav(&self, trail: &NavigationTrail) {
        debug!("breadcrumbs: {}", Pretty(trail));
    }
}

impl Navigator for TerminalChrome {
    fn push(&self, url: &str) {
        info!(%url, "navigate");
        self.visit(url);
    }

    fn redirect(&self, url: &str) {
        warn!(%url, "redirect");
        self.visit(url);
    }
}

fn auth_for(slug: &str, session: &SessionArgs) -> AuthContext {
    let view = if session.read_only {
        PermissionView {
            read: Permission::granted(),
            ..Default::default()
        }
    } else {
        PermissionView::all()
    };
    AuthContext::new(
        session.user.as_deref().map(User::new),
        Permissions::default().with_collection(slug, view),
    )
}

async fn read_document(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading document {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing document {}", path.display()))
}

pub async fn run(cli: Cli) -> Result<Report> {
    let config = AdminConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let collections = CollectionsContext::open(&cli.collections)
        .build()
        .await
        .with_context(|| format!("loading collections from {}", cli.collections.display()))?;

    let (slug, is_editing, route, session) = match cli.command {
        Commands::Edit {
            slug,
            id,
            document,
            session,
        } => {
            let mut route = RouteContext::with_id(id);
            if let Some(path) = document {
                route = route.with_preload(read_document(&path).await?);
            }
            (slug, true, route, session)
        }
        Commands::Create { slug, session } => (slug, false, RouteContext::default(), session),
    };

    let collection = Arc::new(collections.require(&slug)?.clone());
    let chrome = Arc::new(TerminalChrome::default());
    let deps = EditDeps {
        config: Arc::new(config),
        auth: Arc::new(auth_for(&slug, &session)),
        locale: Arc::new(StaticLocale::new(session.locale.clone())),
        loader: Arc::new(HttpDocumentLoader::new()),
        state_builder: Arc::new(SchemaStateBuilder::new()),
        step_nav: chrome.clone(),
        navigator: chrome.clone(),
        versions: Arc::new(NoopVersions),
    };

    let props = EditProps {
        collection,
        is_editing,
    };
    let edit = EditOrchestrator::mount(props, route, deps).await?;
    edit.settle().await;

    if let Some(error) = edit.last_build_error().await {
        warn!(%error, "form state could not be built");
    }

    let report = Report {
        status: edit.status().await,
        breadcrumbs: edit.navigation_trail().await,
        redirected_to: chrome.last_visit(),
        view: edit.view_props().await,
    };
    edit.unmount();
    Ok(report)
}
