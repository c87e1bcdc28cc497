//! Test utilities for session testing
//!
//! Provides a mock MCM server speaking the browser binding, with a small
//! fixture of repositories, folders and documents.

use crate::session::Session;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

pub const TEST_USER: &str = "alice";
pub const TEST_PASSWORD: &str = "secret";

/// Basic credentials for `alice:secret`
const EXPECTED_AUTHORIZATION: &str = "Basic YWxpY2U6c2VjcmV0";

const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Route the client is pointed at for discovery
const API_PATH: &str = "/mcm/b/json";

/// Payload to send, or the status and raw body of a failure
type Reply = std::result::Result<Value, (StatusCode, String)>;

/// Install a test-friendly subscriber; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Children listing of one folder
#[derive(Debug, Clone)]
struct FolderPage {
    children: Vec<String>,
    has_more_items: bool,
    num_items: u64,
}

/// Mock server state
#[derive(Debug, Clone)]
pub struct MockServerState {
    /// Discovery response
    repositories: Arc<Mutex<Value>>,
    /// Succinct properties by object id
    objects: Arc<Mutex<HashMap<String, Map<String, Value>>>>,
    /// Children pages by folder id
    children: Arc<Mutex<HashMap<String, FolderPage>>>,
    /// CSRF token sent with each request, in order
    tokens: Arc<Mutex<Vec<String>>>,
    /// Query string of each request, in order
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    /// Response returned for every authorized request while set
    failure: Arc<Mutex<Option<(StatusCode, String)>>>,
    success_status: Arc<Mutex<StatusCode>>,
    rotate_tokens: Arc<AtomicBool>,
    issued_tokens: Arc<AtomicU64>,
}

impl Default for MockServerState {
    fn default() -> Self {
        let mut objects = HashMap::new();
        let mut children = HashMap::new();

        for (id, name, path) in [
            ("mydocs-root", "", "/"),
            ("shared-root", "", "/"),
            ("corp-hr-root", "", "/"),
            ("corp-legal-root", "", "/"),
        ] {
            objects.insert(id.to_string(), folder(id, name, path, None));
        }
        objects.insert(
            "home-folder".to_string(),
            folder("home-folder", "Home", "/Home", Some("mydocs-root")),
        );
        objects.insert(
            "shared-home".to_string(),
            folder("shared-home", "Shared", "/Shared", Some("shared-root")),
        );
        objects.insert(
            "sub-1".to_string(),
            folder("sub-1", "Archive", "/Home/Archive", Some("home-folder")),
        );
        objects.insert("doc-1".to_string(), document());
        objects.insert(
            "item-1".to_string(),
            succinct(json!({
                "cmis:objectId": "item-1",
                "cmis:baseTypeId": "cmis:item",
                "cmis:objectTypeId": "cmis:item",
                "cmis:name": "Contact",
            })),
        );

        children.insert(
            "home-folder".to_string(),
            FolderPage {
                children: vec!["doc-1".to_string(), "sub-1".to_string()],
                has_more_items: true,
                num_items: 42,
            },
        );

        Self {
            repositories: Arc::new(Mutex::new(Value::Object(Map::new()))),
            objects: Arc::new(Mutex::new(objects)),
            children: Arc::new(Mutex::new(children)),
            tokens: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            success_status: Arc::new(Mutex::new(StatusCode::OK)),
            rotate_tokens: Arc::new(AtomicBool::new(true)),
            issued_tokens: Arc::new(AtomicU64::new(0)),
        }
    }
}

fn succinct(properties: Value) -> Map<String, Value> {
    match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn folder(id: &str, name: &str, path: &str, parent_id: Option<&str>) -> Map<String, Value> {
    let mut properties = succinct(json!({
        "cmis:objectId": id,
        "cmis:baseTypeId": "cmis:folder",
        "cmis:objectTypeId": "cmis:folder",
        "cmis:name": name,
        "cmis:path": path,
        "cmis:createdBy": TEST_USER,
        "cmis:creationDate": 1_690_000_000_000i64,
    }));
    if let Some(parent_id) = parent_id {
        properties.insert("cmis:parentId".to_string(), json!(parent_id));
    }
    properties
}

fn document() -> Map<String, Value> {
    succinct(json!({
        "cmis:objectId": "doc-1",
        "cmis:baseTypeId": "cmis:document",
        "cmis:objectTypeId": "cmis:document",
        "cmis:name": "report.pdf",
        "cmis:createdBy": TEST_USER,
        "cmis:creationDate": 1_700_000_000_123i64,
        "cmis:lastModifiedBy": TEST_USER,
        "cmis:lastModificationDate": 1_700_000_100_000i64,
        "cmis:contentStreamLength": 4096,
        "cmis:contentStreamMimeType": "application/pdf",
        "cmis:contentStreamFileName": "report.pdf",
        "cmis:versionLabel": "1.0",
        "cmis:isLatestVersion": true,
        "cmis:isMajorVersion": true,
    }))
}

/// Discovery response for a server whose API lives at `api_url`
fn default_repositories(api_url: &str) -> Value {
    let descriptor = |id: &str, root: &str| {
        json!({
            "repositoryId": id,
            "rootFolderId": root,
            "rootFolderUrl": format!("{}/{}/root", api_url, id),
            "repositoryUrl": format!("{}/{}", api_url, id),
        })
    };

    let mut my_documents = descriptor("mydocs", "mydocs-root");
    my_documents["myDocuments"] = json!("home-folder");
    my_documents["repositoryName"] = json!("My Documents");

    let mut sharing = descriptor("shared", "shared-root");
    sharing["sharing"] = json!("shared-home");
    sharing["repositoryName"] = json!("Shared Documents");

    let mut hr = descriptor("corp-hr", "corp-hr-root");
    hr["corporate"] = json!(true);

    let mut legal = descriptor("corp-legal", "corp-legal-root");
    legal["corporate"] = json!(true);

    json!({
        "mydocs": my_documents,
        "shared": sharing,
        "corp-hr": hr,
        "corp-legal": legal,
        "restricted": null,
    })
}

impl MockServerState {
    /// Replace the discovery response
    pub fn set_repositories(&self, repositories: Value) {
        *self.repositories.lock().unwrap() = repositories;
    }

    /// Status used for successful responses
    pub fn set_success_status(&self, status: StatusCode) {
        *self.success_status.lock().unwrap() = status;
    }

    /// Whether responses carry a fresh CSRF token
    pub fn set_rotate_tokens(&self, rotate: bool) {
        self.rotate_tokens.store(rotate, Ordering::SeqCst);
    }

    fn render(&self, properties: &Map<String, Value>, succinct: bool) -> Value {
        if succinct {
            return json!({ "succinctProperties": properties });
        }

        let verbose: Map<String, Value> = properties
            .iter()
            .map(|(id, value)| (id.clone(), json!({ "id": id, "value": value })))
            .collect();
        json!({ "properties": verbose })
    }

    fn lookup(&self, object_id: &str) -> std::result::Result<Map<String, Value>, (StatusCode, String)> {
        self.objects
            .lock()
            .unwrap()
            .get(object_id)
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::NOT_FOUND,
                    json!({
                        "exception": "objectNotFound",
                        "message": format!("Object {} not found", object_id),
                    })
                    .to_string(),
                )
            })
    }

    fn object(&self, query: &HashMap<String, String>) -> Reply {
        let object_id = query.get("objectId").map(String::as_str).unwrap_or_default();
        let properties = self.lookup(object_id)?;
        Ok(self.render(&properties, wants_succinct(query)))
    }

    fn children(&self, query: &HashMap<String, String>) -> Reply {
        let folder_id = query.get("objectId").map(String::as_str).unwrap_or_default();
        self.lookup(folder_id)?;

        let page = self.children.lock().unwrap().get(folder_id).cloned();
        let Some(page) = page else {
            return Ok(json!({ "objects": [] }));
        };

        let skip = parse_count(query, "skipCount").unwrap_or(0);
        let max = parse_count(query, "maxItems").unwrap_or(usize::MAX);
        let mut objects = Vec::new();
        for child_id in page.children.iter().skip(skip).take(max) {
            let properties = self.lookup(child_id)?;
            objects.push(json!({ "object": self.render(&properties, wants_succinct(query)) }));
        }

        Ok(json!({
            "objects": objects,
            "hasMoreItems": page.has_more_items,
            "numItems": page.num_items,
        }))
    }

    /// Record the request, then answer it with the route's payload
    fn respond(
        &self,
        headers: &HeaderMap,
        query: HashMap<String, String>,
        route: impl FnOnce(&Self, &HashMap<String, String>) -> Reply,
    ) -> Response {
        let token = headers
            .get(&CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.tokens.lock().unwrap().push(token);
        self.queries.lock().unwrap().push(query.clone());

        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some(EXPECTED_AUTHORIZATION);

        let failure = self.failure.lock().unwrap().clone();
        let (status, body) = if !authorized {
            (StatusCode::UNAUTHORIZED, String::new())
        } else if let Some(failure) = failure {
            failure
        } else {
            match route(self, &query) {
                Ok(payload) => (*self.success_status.lock().unwrap(), payload.to_string()),
                Err(failure) => failure,
            }
        };

        let mut response_headers = HeaderMap::new();
        response_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if self.rotate_tokens.load(Ordering::SeqCst) {
            let issued = self.issued_tokens.fetch_add(1, Ordering::SeqCst) + 1;
            if let Ok(value) = HeaderValue::from_str(&format!("token-{}", issued)) {
                response_headers.insert(CSRF_HEADER, value);
            }
        }

        (status, response_headers, body).into_response()
    }
}

fn wants_succinct(query: &HashMap<String, String>) -> bool {
    query.get("succinct").map(String::as_str) != Some("false")
}

fn parse_count(query: &HashMap<String, String>, key: &str) -> Option<usize> {
    query.get(key).and_then(|value| value.parse().ok())
}

/// Mock server implementation
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        init_tracing();
        Self {
            state: MockServerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock server on its own thread and return the discovery URL.
    ///
    /// The server runs on a dedicated runtime so blocking clients can call it
    /// from plain `#[test]` functions.
    pub fn start(mut self) -> Result<(Self, String)> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        self.port = listener.local_addr()?.port();

        self.state.set_repositories(default_repositories(&self.api_url()));
        let app = self.create_router();

        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    eprintln!("Mock server runtime error: {}", e);
                    return;
                }
            };

            runtime.block_on(async move {
                let listener = match TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(e) => {
                        eprintln!("Mock server listener error: {}", e);
                        return;
                    }
                };
                if let Err(e) = axum::serve(listener, app).await {
                    eprintln!("Mock server error: {}", e);
                }
            });
        });

        let url = self.api_url();
        Ok((self, url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL of the browser binding, which is also the discovery URL
    pub fn api_url(&self) -> String {
        format!("http://127.0.0.1:{}{}", self.port, API_PATH)
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    /// Open a session with the test credentials
    pub fn connect(&self) -> crate::Result<Session> {
        Session::new(TEST_USER, TEST_PASSWORD, self.api_url())
    }

    /// CSRF tokens received so far, in request order
    pub fn received_tokens(&self) -> Vec<String> {
        self.state.tokens.lock().unwrap().clone()
    }

    /// Query string of the latest request
    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.state.queries.lock().unwrap().last().cloned()
    }

    /// Answer every authorized request with `status` and `body`
    pub fn fail_with(&self, status: StatusCode, body: &str) {
        *self.state.failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn clear_failure(&self) {
        *self.state.failure.lock().unwrap() = None;
    }

    /// Create the mock server router
    fn create_router(&self) -> Router {
        Router::new()
            // Repository discovery
            .route(API_PATH, get(discovery_handler))
            // Object and children selectors
            .route(&format!("{}/:repository/root", API_PATH), get(root_handler))
            .with_state(self.state.clone())
    }
}

// Handler functions

async fn discovery_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.respond(&headers, query, |state, _| {
        Ok(state.repositories.lock().unwrap().clone())
    })
}

async fn root_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.respond(&headers, query, |state, query| {
        match query.get("cmisselector").map(String::as_str) {
            Some("object") => state.object(query),
            Some("children") => state.children(query),
            other => Err((
                StatusCode::BAD_REQUEST,
                json!({
                    "exception": "invalidArgument",
                    "message": format!("Unknown selector {:?}", other),
                })
                .to_string(),
            )),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorized_get(url: &str) -> reqwest::blocking::Response {
        reqwest::blocking::Client::new()
            .get(url)
            .basic_auth(TEST_USER, Some(TEST_PASSWORD))
            .send()
            .unwrap()
    }

    #[test]
    fn test_mock_server_startup() {
        let (server, url) = MockServer::new().start().unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));

        let response = authorized_get(&url);
        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get("X-CSRF-Token")
                .and_then(|value| value.to_str().ok()),
            Some("token-1")
        );
    }

    #[test]
    fn test_rejects_missing_credentials() {
        let (_server, url) = MockServer::new().start().unwrap();

        let response = reqwest::blocking::get(&url).unwrap();
        assert_eq!(response.status().as_u16(), StatusCode::UNAUTHORIZED.as_u16());
    }

    #[test]
    fn test_discovery_fixture() {
        let (server, url) = MockServer::new().start().unwrap();

        let repositories: Value = authorized_get(&url).json().unwrap();
        assert_eq!(repositories["mydocs"]["myDocuments"], "home-folder");
        assert_eq!(
            repositories["corp-hr"]["rootFolderUrl"],
            format!("{}/corp-hr/root", server.api_url())
        );
        assert!(repositories["restricted"].is_null());
    }

    #[test]
    fn test_verbose_rendering() {
        let (server, _) = MockServer::new().start().unwrap();

        let url = format!(
            "{}/mydocs/root?objectId=doc-1&cmisselector=object&succinct=false",
            server.api_url()
        );
        let object: Value = authorized_get(&url).json().unwrap();
        assert_eq!(
            object["properties"]["cmis:contentStreamLength"]["value"],
            4096
        );
        assert!(object.get("succinctProperties").is_none());

        let query = server.last_query().unwrap();
        assert_eq!(query.get("objectId").map(String::as_str), Some("doc-1"));
    }
}
