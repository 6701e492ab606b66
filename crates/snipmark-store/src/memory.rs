//! In-process snippet store with expiry and a listing page limit.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::store::{Clock, Listing, SnippetStore, SystemClock};
use crate::{SnippetId, StoreError, StoreResult};

/// Attempts at drawing an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

/// Tuning knobs for [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long a snippet lives after it is saved
    pub ttl: Duration,
    /// Maximum ids returned by one `list` call
    pub list_limit: usize,
    /// Length of generated ids
    pub id_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60 * 24 * 30),
            list_limit: 1000,
            id_length: 8,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    text: String,
    expires_at: Instant,
}

/// A [`SnippetStore`] backed by an in-memory ordered map.
///
/// Ids are listed in lexicographic order. Expired entries are dropped
/// lazily, whenever an operation touches them.
pub struct MemoryStore {
    entries: RwLock<BTreeMap<SnippetId, Entry>>,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> StoreResult<usize> {
        let now = self.clock.now();
        Ok(self.read()?.values().filter(|e| e.expires_at > now).count())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<SnippetId, Entry>>> {
        self.entries
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<SnippetId, Entry>>> {
        self.entries
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl SnippetStore for MemoryStore {
    fn save(&self, text: &str) -> StoreResult<SnippetId> {
        let now = self.clock.now();
        let mut entries = self.write()?;
        entries.retain(|_, e| e.expires_at > now);

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = SnippetId::generate(self.config.id_length);
            if entries.contains_key(&id) {
                continue;
            }
            entries.insert(
                id.clone(),
                Entry {
                    text: text.to_string(),
                    expires_at: now + self.config.ttl,
                },
            );
            tracing::debug!(%id, bytes = text.len(), "snippet saved");
            return Ok(id);
        }

        Err(StoreError::Backend("could not allocate an unused id".to_string()))
    }

    fn get(&self, id: &SnippetId) -> StoreResult<String> {
        let now = self.clock.now();
        {
            let entries = self.read()?;
            match entries.get(id) {
                Some(entry) if entry.expires_at > now => return Ok(entry.text.clone()),
                Some(_) => {}
                None => return Err(StoreError::NotFound),
            }
        }

        // Present but expired.
        self.write()?.remove(id);
        tracing::debug!(%id, "snippet expired");
        Err(StoreError::NotFound)
    }

    fn delete(&self, id: &SnippetId) -> StoreResult<()> {
        let removed = self.write()?.remove(id).is_some();
        tracing::debug!(%id, removed, "snippet deleted");
        Ok(())
    }

    fn list(&self) -> StoreResult<Listing> {
        let now = self.clock.now();
        let mut entries = self.write()?;
        entries.retain(|_, e| e.expires_at > now);

        let ids: Vec<SnippetId> = entries
            .keys()
            .take(self.config.list_limit)
            .cloned()
            .collect();
        let complete = entries.len() <= self.config.list_limit;

        Ok(Listing { ids, complete })
    }
}
