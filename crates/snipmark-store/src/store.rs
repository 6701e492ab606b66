//! The snippet store contract.

use serde::Serialize;
use std::time::Instant;

use crate::{SnippetId, StoreResult};

/// A key-value backend holding snippets with a fixed expiry.
///
/// Implementations are shared across threads behind an `Arc`, so every
/// method takes `&self`.
pub trait SnippetStore: Send + Sync {
    /// Stores `text` under a freshly generated id.
    fn save(&self, text: &str) -> StoreResult<SnippetId>;

    /// Fetches the text stored under `id`; `NotFound` if absent or expired.
    fn get(&self, id: &SnippetId) -> StoreResult<String>;

    /// Removes `id`. Deleting a missing id succeeds.
    fn delete(&self, id: &SnippetId) -> StoreResult<()>;

    /// Lists stored ids, up to the backend's page limit.
    fn list(&self) -> StoreResult<Listing>;
}

/// One page of stored ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub ids: Vec<SnippetId>,
    /// `false` when the page limit truncated the listing
    pub complete: bool,
}

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
