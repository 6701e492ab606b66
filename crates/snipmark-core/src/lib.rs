//! # Snipmark Core
//!
//! Everything that sits between the highlighting engine and a front end.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    HighlightSession                      │
//! │   text + loaded id ──► Highlighter ──► Highlighted       │
//! │          │                                               │
//! │          └──► SnippetService (save / load / delete)      │
//! └──────────────────────────────────────────────────────────┘
//!   FileWatcher ──► DebouncedHighlighter ──► latest Rendered
//!   Config (TOML) ──► Vocabulary, StoreConfig, debounce delay
//! ```
//!
//! ## Learning: Error Conversion with `#[from]`
//!
//! `CoreError` wraps the error types of the crates below it. The `#[from]`
//! attribute generates `From` impls, so `?` converts a `StoreError` or a
//! `ConfigError` into a `CoreError` automatically.

pub mod config;
pub mod debounce;
pub mod session;
pub mod watch;

pub use config::{Config, ConfigError};
pub use debounce::{DebouncedHighlighter, Rendered};
pub use session::HighlightSession;
pub use watch::FileWatcher;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No snippet is loaded")]
    NothingLoaded,

    #[error("Store error: {0}")]
    Store(#[from] snipmark_store::StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] snipmark_highlight::VocabularyError),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<notify::Error> for CoreError {
    fn from(err: notify::Error) -> Self {
        CoreError::Watch(err.to_string())
    }
}
