pub mod config;
pub mod directory;
pub mod error;
pub mod form;
pub mod http;
pub mod logging;
pub mod models;
pub mod order;
pub mod startup;

// Re-export commonly used types for easier access
pub use error::{AppError, AppResult};
pub use models::{RawAnswer, SubscriptionOrder};
pub use order::OrderService;
