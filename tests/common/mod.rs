#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use subscription_order::config::{AppConfig, DirectoryConfig, FormConfig, ValidationConfig, ValidationModeType};

pub const FORM_TOKEN: &str = "form-token";
pub const DIRECTORY_TOKEN: &str = "directory-token";

/// Serve a router on an ephemeral local port and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h == format!("Bearer {}", token))
        .unwrap_or(false)
}

/// Form service answering `GET /jira/{key}` from a fixed set of responses
pub async fn start_form_service(forms: HashMap<String, Value>) -> String {
    async fn get_form(
        State(forms): State<Arc<HashMap<String, Value>>>,
        Path(key): Path<String>,
        headers: HeaderMap,
    ) -> Response {
        if !authorized(&headers, FORM_TOKEN) {
            return (StatusCode::UNAUTHORIZED, "missing token").into_response();
        }
        match key.as_str() {
            "BROKEN" => (StatusCode::INTERNAL_SERVER_ERROR, "jira is down").into_response(),
            "GARBLED" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
            _ => match forms.get(&key) {
                Some(answers) => Json(answers.clone()).into_response(),
                None => (StatusCode::NOT_FOUND, "").into_response(),
            },
        }
    }

    let app = Router::new()
        .route("/jira/{key}", get(get_form))
        .with_state(Arc::new(forms));
    serve(app).await
}

/// Stub directory state shared by the Graph and SCIM fakes
pub struct FakeDirectory {
    pub emails: Vec<String>,
    /// When false the search ignores the filter and returns every user
    pub filter_server_side: bool,
    pub requests: AtomicUsize,
    pub fail: bool,
}

impl FakeDirectory {
    pub fn new(emails: &[&str], filter_server_side: bool) -> Arc<Self> {
        Arc::new(Self {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            filter_server_side,
            requests: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            emails: Vec::new(),
            filter_server_side: true,
            requests: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn search(&self, wanted: &str) -> Vec<(usize, &String)> {
        self.emails
            .iter()
            .enumerate()
            .filter(|(_, email)| !self.filter_server_side || email.to_lowercase() == wanted.to_lowercase())
            .collect()
    }
}

/// Microsoft Graph fake: `GET /v1.0/users?$filter=mail eq '...'&$top=n[&$skiptoken=offset]`
pub async fn start_graph_directory(directory: Arc<FakeDirectory>) -> String {
    async fn list_users(
        State(directory): State<Arc<FakeDirectory>>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Response {
        directory.requests.fetch_add(1, Ordering::SeqCst);
        if directory.fail {
            return (StatusCode::SERVICE_UNAVAILABLE, "throttled").into_response();
        }
        if !authorized(&headers, DIRECTORY_TOKEN) {
            return (StatusCode::UNAUTHORIZED, "").into_response();
        }
        if headers.get("consistencylevel").and_then(|h| h.to_str().ok()) != Some("eventual") {
            return (StatusCode::BAD_REQUEST, "ConsistencyLevel header required").into_response();
        }

        let filter = params.get("$filter").cloned().unwrap_or_default();
        let Some(wanted) = filter
            .strip_prefix("mail eq '")
            .and_then(|f| f.strip_suffix('\''))
            .map(|f| f.replace("''", "'"))
        else {
            return (StatusCode::BAD_REQUEST, "unsupported filter").into_response();
        };
        let top: usize = params.get("$top").and_then(|t| t.parse().ok()).unwrap_or(100);
        let skip: usize = params.get("$skiptoken").and_then(|t| t.parse().ok()).unwrap_or(0);

        let matches = directory.search(&wanted);
        let page: Vec<Value> = matches
            .iter()
            .skip(skip)
            .take(top)
            .map(|(i, mail)| json!({"id": i.to_string(), "mail": mail, "userPrincipalName": mail}))
            .collect();

        let mut body = json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users(id,mail)",
            "value": page,
        });
        if skip + top < matches.len() {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("127.0.0.1");
            let mut next = url::Url::parse(&format!("http://{}/v1.0/users", host)).unwrap();
            next.query_pairs_mut()
                .append_pair("$filter", &filter)
                .append_pair("$top", &top.to_string())
                .append_pair("$skiptoken", &(skip + top).to_string());
            body["@odata.nextLink"] = json!(next.to_string());
        }
        Json(body).into_response()
    }

    let app = Router::new()
        .route("/v1.0/users", get(list_users))
        .with_state(directory);
    format!("{}/v1.0", serve(app).await)
}

/// SCIM 2.0 fake: `GET /scim/v2/Users?filter=emails.value eq "..."&startIndex=i&count=n`
pub async fn start_scim_directory(directory: Arc<FakeDirectory>) -> String {
    async fn search_users(
        State(directory): State<Arc<FakeDirectory>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        directory.requests.fetch_add(1, Ordering::SeqCst);
        if directory.fail {
            return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
        }

        let filter = params.get("filter").cloned().unwrap_or_default();
        let Some(wanted) = filter
            .strip_prefix("emails.value eq \"")
            .and_then(|f| f.strip_suffix('"'))
            .map(|f| f.replace("\\\"", "\"").replace("\\\\", "\\"))
        else {
            return (StatusCode::BAD_REQUEST, "invalidFilter").into_response();
        };
        let start_index: usize = params.get("startIndex").and_then(|t| t.parse().ok()).unwrap_or(1).max(1);
        let count: usize = params.get("count").and_then(|t| t.parse().ok()).unwrap_or(100);

        let matches = directory.search(&wanted);
        let resources: Vec<Value> = matches
            .iter()
            .skip(start_index - 1)
            .take(count)
            .map(|(i, mail)| {
                json!({
                    "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
                    "id": i.to_string(),
                    "userName": format!("user{}", i),
                    "emails": [{"value": mail, "type": "work", "primary": true}]
                })
            })
            .collect();

        Json(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
            "totalResults": matches.len(),
            "startIndex": start_index,
            "itemsPerPage": resources.len(),
            "Resources": resources,
        }))
        .into_response()
    }

    let app = Router::new()
        .route("/scim/v2/Users", get(search_users))
        .with_state(directory);
    format!("{}/scim/v2", serve(app).await)
}

/// Answer array in the form service wire format
pub fn form_answers(pairs: &[(&str, &str)]) -> Value {
    Value::Array(
        pairs
            .iter()
            .map(|(key, answer)| json!({"label": format!("Label for {}", key), "questionKey": key, "answer": answer}))
            .collect(),
    )
}

pub fn create_test_app_config(form_url: &str, directory_type: &str, directory_url: &str) -> AppConfig {
    AppConfig {
        form: FormConfig {
            form_type: "http".to_string(),
            base_url: Some(form_url.to_string()),
            token: Some(FORM_TOKEN.to_string()),
            path: None,
            timeout_seconds: 5,
        },
        directory: DirectoryConfig {
            directory_type: directory_type.to_string(),
            base_url: Some(directory_url.to_string()),
            token: Some(DIRECTORY_TOKEN.to_string()),
            page_size: 10,
            timeout_seconds: 5,
            validation: ValidationConfig {
                mode: ValidationModeType::Paginated,
                max_inspected: 25,
            },
            entries: Vec::new(),
            server_side_filter: true,
        },
    }
}
