//! Request-level validation in front of a snippet store.

use std::sync::Arc;

use crate::store::{Listing, SnippetStore};
use crate::{SnippetId, StoreError, StoreResult};

/// Validates requests and forwards them to an optional backend.
///
/// A service built with [`SnippetService::unconfigured`] answers every
/// request as if the deployment had no store bound.
#[derive(Clone, Default)]
pub struct SnippetService {
    store: Option<Arc<dyn SnippetStore>>,
}

impl SnippetService {
    pub fn new(store: Arc<dyn SnippetStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> StoreResult<&dyn SnippetStore> {
        self.store.as_deref().ok_or(StoreError::StoreUnavailable)
    }

    /// Saves non-blank text and returns its new id.
    pub fn save(&self, text: &str) -> StoreResult<SnippetId> {
        let store = self.store()?;
        if text.trim().is_empty() {
            return Err(StoreError::EmptyInput);
        }
        let id = store.save(text)?;
        tracing::info!(%id, "snippet shared");
        Ok(id)
    }

    /// Fetches a snippet. A blank id or a missing store both read as `NotFound`.
    pub fn get(&self, id: &str) -> StoreResult<String> {
        let (Some(id), Some(store)) = (SnippetId::new(id), self.store.as_deref()) else {
            return Err(StoreError::NotFound);
        };
        store.get(&id)
    }

    /// Deletes a snippet, echoing back the id that was removed.
    pub fn delete(&self, id: &str) -> StoreResult<SnippetId> {
        let id = SnippetId::new(id).ok_or(StoreError::MissingId)?;
        self.store()?.delete(&id)?;
        Ok(id)
    }

    pub fn list(&self) -> StoreResult<Listing> {
        self.store()?.list()
    }
}

impl std::fmt::Debug for SnippetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnippetService")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn service() -> SnippetService {
        SnippetService::new(Arc::new(MemoryStore::default()))
    }

    #[test]
    fn test_save_rejects_blank_text() {
        assert_eq!(service().save("  \n"), Err(StoreError::EmptyInput));
    }

    #[test]
    fn test_round_trip_through_service() {
        let service = service();
        let id = service.save("fetch(url)").unwrap();

        assert_eq!(service.get(id.as_str()).unwrap(), "fetch(url)");
        assert_eq!(service.list().unwrap().ids, vec![id.clone()]);
        assert_eq!(service.delete(id.as_str()).unwrap(), id);
        assert_eq!(service.get(id.as_str()), Err(StoreError::NotFound));
    }

    #[test]
    fn test_unconfigured_store() {
        let service = SnippetService::unconfigured();
        assert!(!service.is_configured());
        assert_eq!(service.save("x"), Err(StoreError::StoreUnavailable));
        assert_eq!(service.delete("abc"), Err(StoreError::StoreUnavailable));
        assert_eq!(service.list(), Err(StoreError::StoreUnavailable));
        assert_eq!(service.get("abc"), Err(StoreError::NotFound));
    }

    #[test]
    fn test_delete_requires_id() {
        assert_eq!(service().delete(""), Err(StoreError::MissingId));
        assert_eq!(
            SnippetService::unconfigured().delete(" "),
            Err(StoreError::MissingId)
        );
    }
}
