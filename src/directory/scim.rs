use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::DirectorySource;
use crate::error::{AppError, AppResult};
use crate::models::{DirectoryEntry, DirectoryPage, PageCursor, ScimListResponse};
use crate::http::HttpClient;

/// SCIM 2.0 user directory (RFC 7644 `/Users` search with `startIndex`/`count` paging).
#[derive(Debug, Clone)]
pub struct ScimDirectory {
    http: HttpClient,
    page_size: usize,
}

impl ScimDirectory {
    pub fn new(http: HttpClient, page_size: usize) -> Self {
        Self {
            http,
            page_size: page_size.max(1),
        }
    }

    fn users_url(&self, filter: &str, start_index: usize) -> AppResult<Url> {
        let mut url = self.http.endpoint("Users")?;
        url.query_pairs_mut()
            .append_pair("filter", filter)
            .append_pair("startIndex", &start_index.to_string())
            .append_pair("count", &self.page_size.to_string());
        Ok(url)
    }

    async fn fetch(&self, filter: &str, start_index: usize) -> AppResult<DirectoryPage> {
        let url = self.users_url(filter, start_index)?;
        let response: ScimListResponse = self.http.get_json(url, HeaderMap::new()).await?;

        let start = response
            .start_index
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i >= 1)
            .unwrap_or(start_index);
        let total = usize::try_from(response.total_results).unwrap_or(0);
        let entries: Vec<DirectoryEntry> = response.resources.iter().map(entry_from_resource).collect();

        let following = start + entries.len();
        let next = if !entries.is_empty() && following <= total {
            Some(PageCursor::NextLink(self.users_url(filter, following)?))
        } else {
            None
        };
        debug!(start, total, entries = entries.len(), "Fetched SCIM users page");
        Ok(DirectoryPage { entries, next })
    }
}

/// SCIM filter comparing any email value, with the value quoted per RFC 7644
pub fn email_filter(email: &str) -> String {
    let escaped = email.replace('\\', "\\\\").replace('"', "\\\"");
    format!("emails.value eq \"{}\"", escaped)
}

fn entry_from_resource(resource: &Value) -> DirectoryEntry {
    let emails = resource
        .get("emails")
        .and_then(Value::as_array)
        .map(|emails| {
            emails
                .iter()
                .filter_map(|email| email.get("value").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    DirectoryEntry {
        id: resource.get("id").and_then(Value::as_str).map(str::to_string),
        emails,
    }
}

fn start_index_of(url: &Url) -> Option<(String, usize)> {
    let filter = url.query_pairs().find(|(k, _)| k == "filter")?.1.into_owned();
    let start = url
        .query_pairs()
        .find(|(k, _)| k == "startIndex")?
        .1
        .parse::<usize>()
        .ok()?;
    Some((filter, start))
}

#[async_trait]
impl DirectorySource for ScimDirectory {
    async fn query_by_email_filter(&self, email: &str) -> AppResult<DirectoryPage> {
        self.fetch(&email_filter(email), 1).await
    }

    async fn next_page(&self, cursor: &PageCursor) -> AppResult<DirectoryPage> {
        let parsed = match cursor {
            PageCursor::NextLink(url) => start_index_of(url),
            PageCursor::StartIndex(_) => None,
        };
        match parsed {
            Some((filter, start)) => self.fetch(&filter, start).await,
            None => Err(AppError::decode(format!(
                "Unsupported page cursor for SCIM directory: {:?}",
                cursor
            ))),
        }
    }
}
