//! Identity directory access
//!
//! A [`DirectorySource`] answers email filter queries page by page; the
//! [`validator::DirectoryValidator`] decides existence on top of it using the
//! configured [`validator::ValidationMode`].
//!
//! ```text
//! DirectoryValidator::exists(email)
//!     ↓
//! DirectorySource
//!     ├── graph.rs  (Microsoft Graph /users, @odata.nextLink paging)
//!     ├── scim.rs   (SCIM 2.0 /Users, startIndex paging)
//!     └── memory.rs (fixed entry list)
//! ```

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{DirectoryPage, PageCursor};

pub mod graph;
pub mod memory;
pub mod scim;
pub mod validator;

pub use graph::GraphDirectory;
pub use memory::MemoryDirectory;
pub use scim::ScimDirectory;
pub use validator::{DirectoryValidator, IdentityValidator, ValidationMode};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Read-only, paginated view of an identity directory.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// First page of entries matching a case-insensitive email filter
    async fn query_by_email_filter(&self, email: &str) -> AppResult<DirectoryPage>;

    /// Page following a cursor returned by a previous page
    async fn next_page(&self, cursor: &PageCursor) -> AppResult<DirectoryPage>;
}
