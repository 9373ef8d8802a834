//! End-to-end edit workflow against a mock REST API

use std::sync::{Arc, Mutex};

use quire_edit::{
    AdminConfig, AuthContext, EditDeps, EditOrchestrator, EditProps, EditStatus,
    HttpDocumentLoader, Navigator, NavigationTrail, NoopVersions, PermissionView, Permissions,
    RouteContext, SaveOutcome, SaveResponse, SchemaStateBuilder, StaticLocale, StepNav, User,
};
use quire_fields::{
    CollectionDefaults, CollectionsContext, ContentTypeDefinition, FieldDef, FieldDefault,
    FieldType,
};
use serde_json::json;
use tempfile::TempDir;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Chrome {
    trails: Mutex<Vec<NavigationTrail>>,
    visits: Mutex<Vec<String>>,
}

impl StepNav for Chrome {
    fn set_step_nav(&self, trail: &NavigationTrail) {
        self.trails.lock().unwrap().push(trail.clone());
    }
}

impl Navigator for Chrome {
    fn push(&self, url: &str) {
        self.visits.lock().unwrap().push(url.to_string());
    }

    fn redirect(&self, url: &str) {
        self.visits.lock().unwrap().push(format!("redirect:{url}"));
    }
}

fn posts() -> ContentTypeDefinition {
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

    ContentTypeDefinition::new(
        "posts",
        "Post",
        "Posts",
        vec![
            FieldDef::new("title", FieldType::Text),
            status,
            FieldDef::new(
                "tags",
                FieldType::Array {
                    fields: vec![FieldDef::new("tag", FieldType::Text)],
                },
            ),
        ],
    )
    .with_use_as_title("title")
    .with_drafts(true)
}

async fn load_posts(tmp: &TempDir) -> Arc<ContentTypeDefinition> {
    let ctx = CollectionsContext::open(tmp.path().join("collections"))
        .with_defaults(CollectionDefaults::new().collection(posts()))
        .build()
        .await
        .unwrap();
    Arc::new(ctx.require("posts").unwrap().clone())
}

fn deps(server_url: &str, chrome: &Arc<Chrome>) -> EditDeps {
    EditDeps {
        config: Arc::new(AdminConfig::new(server_url)),
        auth: Arc::new(AuthContext::new(
            Some(User::new("editor")),
            Permissions::default().with_collection("posts", PermissionView::all()),
        )),
        locale: Arc::new(StaticLocale::new("en")),
        loader: Arc::new(HttpDocumentLoader::new()),
        state_builder: Arc::new(SchemaStateBuilder::new()),
        step_nav: chrome.clone(),
        navigator: chrome.clone(),
        versions: Arc::new(NoopVersions),
    }
}

#[tokio::test]
async fn test_edit_loads_document_and_builds_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/42"))
        .and(query_param("locale", "en"))
        .and(query_param("depth", "0"))
        .and(query_param("draft", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42",
            "title": "Hello",
            "tags": [{"tag": "rust"}, {"tag": "cms"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let collection = load_posts(&tmp).await;
    let chrome = Arc::new(Chrome::default());

    let edit = EditOrchestrator::mount(
        EditProps::edit(collection),
        RouteContext::with_id("42"),
        deps(&server.uri(), &chrome),
    )
    .await
    .unwrap();
    edit.settle().await;

    assert_eq!(edit.status().await, EditStatus::Loaded);
    let state = edit.initial_state().await.unwrap();
    assert_eq!(state.value("title"), Some(&json!("Hello")));
    assert_eq!(state.value("status"), Some(&json!("draft")));
    assert_eq!(state.value("tags"), Some(&json!(2)));
    assert_eq!(state.value("tags.0.tag"), Some(&json!("rust")));

    let trail = edit.navigation_trail().await.unwrap();
    assert_eq!(trail.items()[1].label, "Hello");
    assert_eq!(chrome.trails.lock().unwrap().len(), 2);

    let props = serde_json::to_value(edit.view_props().await).unwrap();
    assert_eq!(props["isLoading"], false);
    assert_eq!(props["hasSavePermission"], true);
    assert_eq!(props["apiURL"], format!("{}/api/posts/42?draft=true", server.uri()));
    assert_eq!(props["initialState"]["title"]["value"], "Hello");

    let outcome = edit
        .on_save(SaveResponse::new(json!({"id": "42", "title": "Hello again", "tags": []})))
        .await
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Rebuilding);
    edit.settle().await;

    let state = edit.initial_state().await.unwrap();
    assert_eq!(state.value("title"), Some(&json!("Hello again")));
    assert_eq!(state.value("tags"), Some(&json!(0)));
    assert_eq!(
        edit.navigation_trail().await.unwrap().items()[1].label,
        "Hello again"
    );
}

#[tokio::test]
#[traced_test]
async fn test_missing_document_redirects_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let collection = load_posts(&tmp).await;
    let chrome = Arc::new(Chrome::default());

    let edit = EditOrchestrator::mount(
        EditProps::edit(collection),
        RouteContext::with_id("gone"),
        deps(&server.uri(), &chrome),
    )
    .await
    .unwrap();
    edit.settle().await;

    assert_eq!(edit.status().await, EditStatus::Errored);
    assert_eq!(
        *chrome.visits.lock().unwrap(),
        vec!["redirect:/admin/not-found".to_string()]
    );
    assert!(edit.initial_state().await.is_none());
    assert!(logs_contain("document fetch failed"));
}

#[tokio::test]
async fn test_create_then_save_hands_over_to_edit_view() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let collection = load_posts(&tmp).await;
    let chrome = Arc::new(Chrome::default());

    let create = EditOrchestrator::mount(
        EditProps::create(collection.clone()),
        RouteContext::default(),
        deps(&server.uri(), &chrome),
    )
    .await
    .unwrap();
    create.settle().await;

    let state = create.initial_state().await.unwrap();
    assert_eq!(state.value("status"), Some(&json!("draft")));
    assert_eq!(state.value("title"), Some(&json!(null)));

    let saved = json!({"id": "new-1", "title": "Fresh", "status": "draft", "tags": []});
    let outcome = create.on_save(SaveResponse::new(saved.clone())).await.unwrap();
    let SaveOutcome::Navigated { url } = outcome else {
        panic!("create save should navigate");
    };
    assert_eq!(url, "/admin/collections/posts/new-1");
    create.unmount();

    // The router mounts a fresh edit view, carrying the saved document along.
    let edit = EditOrchestrator::mount(
        EditProps::edit(collection),
        RouteContext::with_id("new-1").with_preload(saved),
        deps(&server.uri(), &chrome),
    )
    .await
    .unwrap();
    edit.settle().await;

    assert_eq!(edit.status().await, EditStatus::Loaded);
    assert_eq!(
        edit.initial_state().await.unwrap().value("title"),
        Some(&json!("Fresh"))
    );
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(
        *chrome.visits.lock().unwrap(),
        vec!["/admin/collections/posts/new-1".to_string()]
    );
}
