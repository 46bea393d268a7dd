use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use super::DirectorySource;
use crate::error::{AppError, AppResult};
use crate::http::HttpClient;
use crate::models::{DirectoryEntry, DirectoryPage, GraphUserCollection, PageCursor};

/// Microsoft Graph (Entra ID) user directory.
///
/// Queries `GET /users?$filter=mail eq '...'` with eventual consistency and
/// follows `@odata.nextLink` for further pages.
#[derive(Debug, Clone)]
pub struct GraphDirectory {
    http: HttpClient,
    page_size: usize,
}

impl GraphDirectory {
    pub fn new(http: HttpClient, page_size: usize) -> Self {
        Self {
            http,
            page_size: page_size.max(1),
        }
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("consistencylevel", HeaderValue::from_static("eventual"));
        headers
    }

    async fn fetch(&self, url: url::Url) -> AppResult<DirectoryPage> {
        let collection: GraphUserCollection = self.http.get_json(url, Self::headers()).await?;
        let next = match collection.next_link {
            Some(link) => Some(PageCursor::NextLink(
                url::Url::parse(&link).map_err(|e| AppError::decode(format!("invalid @odata.nextLink: {}", e)))?,
            )),
            None => None,
        };
        let entries: Vec<DirectoryEntry> = collection.value.into_iter().map(Into::into).collect();
        debug!(entries = entries.len(), more = next.is_some(), "Fetched Graph users page");
        Ok(DirectoryPage { entries, next })
    }
}

/// OData string literal for a mail filter
pub fn mail_filter(email: &str) -> String {
    format!("mail eq '{}'", email.replace('\'', "''"))
}

#[async_trait]
impl DirectorySource for GraphDirectory {
    async fn query_by_email_filter(&self, email: &str) -> AppResult<DirectoryPage> {
        let mut url = self.http.endpoint("users")?;
        url.query_pairs_mut()
            .append_pair("$filter", &mail_filter(email))
            .append_pair("$select", "id,mail")
            .append_pair("$top", &self.page_size.to_string());
        self.fetch(url).await
    }

    async fn next_page(&self, cursor: &PageCursor) -> AppResult<DirectoryPage> {
        match cursor {
            PageCursor::NextLink(url) => {
                // the bearer token only goes back to the configured origin
                if url.origin() != self.http.base_url().origin() {
                    return Err(AppError::decode(format!(
                        "@odata.nextLink points outside {}: {}",
                        self.http.base_url().origin().ascii_serialization(),
                        url.origin().ascii_serialization()
                    )));
                }
                self.fetch(url.clone()).await
            }
            other => Err(AppError::decode(format!(
                "Unsupported page cursor for Graph directory: {:?}",
                other
            ))),
        }
    }
}
