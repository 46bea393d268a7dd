use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::DirectorySource;
use crate::error::{AppError, AppResult};

pub const DEFAULT_MAX_INSPECTED: usize = 25;

/// Existence check for contact email addresses.
#[async_trait]
pub trait IdentityValidator: Send + Sync {
    /// `Ok(())` when the address is a known identity, `AppError::NotFound` otherwise
    async fn exists(&self, email: &str) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationMode {
    /// The directory filters server-side; only the first page is inspected.
    DirectMatch,
    /// Walk pages until a match or until `max_inspected` entries were seen.
    /// At most `max_inspected` pages are fetched, so empty pages still end the scan.
    PaginatedScan { max_inspected: usize },
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::PaginatedScan {
            max_inspected: DEFAULT_MAX_INSPECTED,
        }
    }
}

pub struct DirectoryValidator {
    source: Arc<dyn DirectorySource>,
    mode: ValidationMode,
}

impl DirectoryValidator {
    pub fn new(source: Arc<dyn DirectorySource>, mode: ValidationMode) -> Self {
        Self { source, mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    async fn direct_match(&self, email: &str) -> AppResult<()> {
        let page = self.source.query_by_email_filter(email).await?;
        if page.entries.iter().any(|entry| entry.has_email(email)) {
            debug!(email, "Found email in directory");
            return Ok(());
        }
        Err(AppError::NotFound(email.to_string()))
    }

    async fn paginated_scan(&self, email: &str, max_inspected: usize) -> AppResult<()> {
        let mut page = self.source.query_by_email_filter(email).await?;
        let mut inspected = 0;
        let mut pages = 1;

        loop {
            for entry in &page.entries {
                inspected += 1;
                if entry.has_email(email) {
                    debug!(email, inspected, "Found email in directory");
                    return Ok(());
                }
                if inspected >= max_inspected {
                    debug!(email, inspected, "Stopped scanning directory");
                    return Err(AppError::NotFound(email.to_string()));
                }
            }

            match page.next.take() {
                Some(_) if pages >= max_inspected => {
                    debug!(email, inspected, pages, "Stopped paging directory");
                    return Err(AppError::NotFound(email.to_string()));
                }
                Some(cursor) => {
                    debug!(email, inspected, ?cursor, "Fetching next directory page");
                    page = self.source.next_page(&cursor).await?;
                    pages += 1;
                }
                None => return Err(AppError::NotFound(email.to_string())),
            }
        }
    }
}

#[async_trait]
impl IdentityValidator for DirectoryValidator {
    async fn exists(&self, email: &str) -> AppResult<()> {
        match self.mode {
            ValidationMode::DirectMatch => self.direct_match(email).await,
            ValidationMode::PaginatedScan { max_inspected } => {
                self.paginated_scan(email, max_inspected).await
            }
        }
    }
}
