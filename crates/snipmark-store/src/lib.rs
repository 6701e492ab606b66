//! # Snipmark Store
//!
//! Ephemeral snippet sharing: save a piece of text, get back a short id,
//! fetch / delete / list by id until the entry expires.
//!
//! ## Layers
//!
//! ```text
//! api::handle ──► SnippetService ──► dyn SnippetStore ──► MemoryStore
//!  (JSON + CORS)   (validation,        (contract)          (expiring map)
//!                   unconfigured store)
//! ```
//!
//! ## Learning: Trait Objects at the Seam
//!
//! The service holds an `Option<Arc<dyn SnippetStore>>`. Any backend that
//! implements the trait can be plugged in, and `None` models a deployment
//! where no store has been configured at all.

pub mod api;
mod id;
mod memory;
mod service;
mod store;

pub use id::SnippetId;
pub use memory::{MemoryStore, StoreConfig};
pub use service::SnippetService;
pub use store::{Clock, Listing, SnippetStore, SystemClock};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Content must not be empty")]
    EmptyInput,

    #[error("Missing snippet id")]
    MissingId,

    #[error("Not found")]
    NotFound,

    #[error("Snippet store is not configured")]
    StoreUnavailable,

    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// HTTP status code reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            StoreError::EmptyInput | StoreError::MissingId => 400,
            StoreError::NotFound => 404,
            StoreError::StoreUnavailable | StoreError::Backend(_) => 500,
        }
    }
}
