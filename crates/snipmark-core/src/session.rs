//! An editing session: the live text, its last highlight, and the shared
//! snippet it was loaded from.

use std::sync::Arc;

use snipmark_highlight::{Highlighted, Highlighter, InputStats, Vocabulary};
use snipmark_store::{SnippetId, SnippetService};

use crate::{CoreError, CoreResult};

/// State behind one editor pane.
#[derive(Debug)]
pub struct HighlightSession {
    text: String,
    loaded: Option<SnippetId>,
    service: SnippetService,
    vocabulary: Arc<Vocabulary>,
    last: Highlighted,
}

impl HighlightSession {
    pub fn new(service: SnippetService, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            text: String::new(),
            loaded: None,
            service,
            vocabulary,
            last: Highlighted::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the live text. The previous highlight stays until
    /// [`highlight`](Self::highlight) runs again.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Line and character counts of the live text.
    pub fn input_stats(&self) -> InputStats {
        InputStats::measure(&self.text)
    }

    /// Highlights the live text and keeps the result.
    pub fn highlight(&mut self) -> &Highlighted {
        self.last = Highlighter::new(&self.vocabulary).highlight(&self.text);
        &self.last
    }

    /// The most recent highlight result.
    pub fn last(&self) -> &Highlighted {
        &self.last
    }

    pub fn loaded_id(&self) -> Option<&SnippetId> {
        self.loaded.as_ref()
    }

    /// Whether there is a loaded snippet to delete.
    pub fn can_delete(&self) -> bool {
        self.loaded.is_some()
    }

    /// Shares the live text. The new id becomes the loaded snippet.
    pub fn save(&mut self) -> CoreResult<SnippetId> {
        let id = self.service.save(&self.text)?;
        self.loaded = Some(id.clone());
        Ok(id)
    }

    /// Loads a shared snippet and highlights it.
    ///
    /// On failure the session is cleared, so a bad link never leaves stale
    /// text on screen.
    pub fn load(&mut self, id: &str) -> CoreResult<&Highlighted> {
        match self.service.get(id) {
            Ok(text) => {
                self.text = text;
                self.loaded = SnippetId::new(id);
                Ok(self.highlight())
            }
            Err(e) => {
                tracing::warn!(id, "Failed to load snippet: {}", e);
                self.clear();
                Err(e.into())
            }
        }
    }

    /// Deletes the loaded snippet and clears the session.
    pub fn delete_loaded(&mut self) -> CoreResult<SnippetId> {
        let id = self.loaded.as_ref().ok_or(CoreError::NothingLoaded)?;
        let deleted = self.service.delete(id.as_str())?;
        self.clear();
        Ok(deleted)
    }

    /// Empties the text, the highlight, and the loaded id.
    pub fn clear(&mut self) {
        self.text.clear();
        self.loaded = None;
        self.last = Highlighted::default();
    }

    /// Link that opens the loaded snippet, e.g. `https://host/?id=ab12cd34`.
    pub fn share_url(&self, base: &str) -> Option<String> {
        self.loaded
            .as_ref()
            .map(|id| format!("{}/?id={}", base.trim_end_matches('/'), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snipmark_store::{MemoryStore, StoreError};

    fn session() -> HighlightSession {
        HighlightSession::new(
            SnippetService::new(Arc::new(MemoryStore::default())),
            Arc::new(Vocabulary::default()),
        )
    }

    #[test]
    fn test_highlight_live_text() {
        let mut session = session();
        session.set_text("const r = parse(src);");
        assert_eq!(session.last(), &Highlighted::default());

        let result = session.highlight();
        assert_eq!(result.stats.keyword_count, 1);
        assert_eq!(result.stats.function_count, 1);
        assert_eq!(session.input_stats().chars, 21);
    }

    #[test]
    fn test_save_then_load() {
        let mut session = session();
        session.set_text("let a = 1;");
        let id = session.save().unwrap();
        assert_eq!(session.loaded_id(), Some(&id));
        assert!(session.can_delete());

        session.clear();
        assert!(!session.can_delete());

        let loaded = session.load(id.as_str()).unwrap();
        assert_eq!(loaded.stats.keyword_count, 1);
        assert_eq!(session.text(), "let a = 1;");
        assert_eq!(session.loaded_id(), Some(&id));
    }

    #[test]
    fn test_failed_load_clears_session() {
        let mut session = session();
        session.set_text("let a = 1;");
        session.highlight();

        let err = session.load("nope").unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::NotFound)));
        assert_eq!(session.text(), "");
        assert_eq!(session.last(), &Highlighted::default());
        assert!(session.loaded_id().is_none());
    }

    #[test]
    fn test_delete_loaded() {
        let mut session = session();
        assert!(matches!(session.delete_loaded(), Err(CoreError::NothingLoaded)));

        session.set_text("return x;");
        let id = session.save().unwrap();
        assert_eq!(session.delete_loaded().unwrap(), id);
        assert_eq!(session.text(), "");
        assert!(session.load(id.as_str()).is_err());
    }

    #[test]
    fn test_save_blank_text() {
        let mut session = session();
        session.set_text("   ");
        assert!(matches!(
            session.save(),
            Err(CoreError::Store(StoreError::EmptyInput))
        ));
        assert!(session.loaded_id().is_none());
    }

    #[test]
    fn test_unconfigured_store() {
        let mut session =
            HighlightSession::new(SnippetService::unconfigured(), Arc::new(Vocabulary::default()));
        session.set_text("x");
        assert!(matches!(
            session.save(),
            Err(CoreError::Store(StoreError::StoreUnavailable))
        ));
    }

    #[test]
    fn test_share_url() {
        let mut session = session();
        assert_eq!(session.share_url("https://snip.example"), None);
        session.set_text("x");
        let id = session.save().unwrap();
        assert_eq!(
            session.share_url("https://snip.example/").unwrap(),
            format!("https://snip.example/?id={}", id)
        );
    }
}
