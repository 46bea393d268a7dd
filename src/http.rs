//! Thin JSON-over-HTTP client shared by the form and directory adapters.

use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, AppResult, TransportError};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: &str, token: Option<String>, timeout_seconds: u64) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the base URL
    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::Configuration(format!("Invalid request path {}: {}", path, e)))
    }

    /// Resolve `path` and append `segment` as one percent-encoded path segment
    pub fn endpoint_with_segment(&self, path: &str, segment: &str) -> AppResult<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration(format!("Base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// GET a URL and decode its JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url, headers: HeaderMap) -> AppResult<T> {
        let mut request = self
            .client
            .request(Method::GET, url)
            .header(ACCEPT, "application/json")
            .headers(headers);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = check_response(Method::GET, request.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(AppError::decode)
    }
}

fn parse_base_url(raw: &str) -> AppResult<Url> {
    // Url::join drops the last path segment unless the base ends with a slash
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash)
        .map_err(|e| AppError::Configuration(format!("Invalid base URL {}: {}", raw, e)))
}

async fn check_response(method: Method, response: Response) -> AppResult<Response> {
    match response.status() {
        StatusCode::OK
        | StatusCode::CREATED
        | StatusCode::ACCEPTED
        | StatusCode::NO_CONTENT
        | StatusCode::NOT_MODIFIED => return Ok(response),
        _ => {}
    }

    let status = response.status().to_string();
    // query strings may carry filter values, keep them out of error messages
    let mut url = response.url().clone();
    url.set_query(None);
    let url = url.to_string();
    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.trim().is_empty());

    Err(AppError::Transport(TransportError::Status {
        method: method.to_string(),
        url,
        status,
        message,
    }))
}
