use async_trait::async_trait;

use super::DirectorySource;
use crate::error::{AppError, AppResult};
use crate::models::{DirectoryEntry, DirectoryPage, PageCursor};

/// Fixed in-process directory.
///
/// With `server_side_filter` only entries holding the queried address are
/// returned; without it every entry is returned, like an upstream filter that
/// is looser than the exact match the validator needs.
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    entries: Vec<DirectoryEntry>,
    page_size: usize,
    server_side_filter: bool,
}

impl MemoryDirectory {
    pub fn new(entries: Vec<DirectoryEntry>, page_size: usize, server_side_filter: bool) -> Self {
        Self {
            entries,
            page_size: page_size.max(1),
            server_side_filter,
        }
    }

    /// Page of all entries starting at a 1-based index
    fn page(&self, start_index: usize) -> DirectoryPage {
        let offset = start_index.saturating_sub(1);
        let entries: Vec<DirectoryEntry> = self
            .entries
            .iter()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();
        let seen = offset + entries.len();
        let next = (!entries.is_empty() && seen < self.entries.len())
            .then(|| PageCursor::StartIndex(seen + 1));
        DirectoryPage { entries, next }
    }
}

#[async_trait]
impl DirectorySource for MemoryDirectory {
    async fn query_by_email_filter(&self, email: &str) -> AppResult<DirectoryPage> {
        if self.server_side_filter {
            let matching: Vec<DirectoryEntry> = self
                .entries
                .iter()
                .filter(|entry| entry.has_email(email))
                .cloned()
                .collect();
            // filtered results always fit one page
            return Ok(DirectoryPage {
                entries: matching,
                next: None,
            });
        }
        Ok(self.page(1))
    }

    async fn next_page(&self, cursor: &PageCursor) -> AppResult<DirectoryPage> {
        match cursor {
            PageCursor::StartIndex(start_index) if *start_index >= 1 => {
                Ok(self.page(*start_index))
            }
            other => Err(AppError::decode(format!(
                "Unsupported page cursor for in-memory directory: {:?}",
                other
            ))),
        }
    }
}
