//! Form service access and normalization
//!
//! ```text
//! FormSource::fetch_answers(key) -> Vec<RawAnswer> -> normalizer::normalize -> SubscriptionOrder
//!     ├── jira.rs  (HTTP form service)
//!     └── file.rs  (JSON answer files on disk)
//! ```

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::RawAnswer;

pub mod file;
pub mod jira;
pub mod normalizer;

pub use file::FileFormSource;
pub use jira::JiraFormClient;
pub use normalizer::normalize;

/// Source of raw questionnaire answers, keyed by submission identifier.
#[async_trait]
pub trait FormSource: Send + Sync {
    /// Fetch the answers of one submission. Failures are transport errors.
    async fn fetch_answers(&self, key: &str) -> AppResult<Vec<RawAnswer>>;
}
