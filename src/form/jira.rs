use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::debug;

use super::FormSource;
use crate::error::{AppError, AppResult, TransportError};
use crate::http::HttpClient;
use crate::models::RawAnswer;

/// Form service client: `GET {base}/jira/{key}` returns the answer array.
#[derive(Debug, Clone)]
pub struct JiraFormClient {
    http: HttpClient,
}

impl JiraFormClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `{base}/jira/{key}` with the key encoded as a single path segment
    pub fn form_url(&self, key: &str) -> AppResult<url::Url> {
        if matches!(key, "" | "." | "..") {
            return Err(AppError::Transport(TransportError::Io(format!(
                "Invalid form key: {}",
                key
            ))));
        }
        self.http.endpoint_with_segment("jira/", key)
    }
}

#[async_trait]
impl FormSource for JiraFormClient {
    async fn fetch_answers(&self, key: &str) -> AppResult<Vec<RawAnswer>> {
        let url = self.form_url(key)?;
        let answers: Vec<RawAnswer> = self.http.get_json(url, HeaderMap::new()).await?;
        debug!(key, answers = answers.len(), "Fetched form answers");
        Ok(answers)
    }
}
