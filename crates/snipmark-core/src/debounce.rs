//! Debounced re-highlighting.
//!
//! ## Learning: Superseding Work Instead of Cancelling It
//!
//! The engine has no cancellation primitive and always runs to completion.
//! Debouncing therefore lives entirely on the caller's side:
//!
//! 1. Every submitted edit gets a generation number.
//! 2. A background task waits for a quiet period after the latest edit,
//!    then highlights only that edit.
//! 3. Results carry their generation; anything older than the most recent
//!    submission is dropped by the receiver.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use snipmark_highlight::{Highlighted, Highlighter, Vocabulary};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// A highlight result tagged with the edit that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub generation: u64,
    pub result: Highlighted,
}

#[derive(Debug)]
struct Edit {
    generation: u64,
    text: String,
    immediate: bool,
}

/// Highlights the latest submitted text once edits settle.
///
/// Must be created inside a tokio runtime. Dropping it stops the worker.
pub struct DebouncedHighlighter {
    edits: mpsc::UnboundedSender<Edit>,
    results: watch::Receiver<Option<Rendered>>,
    generation: Arc<AtomicU64>,
    worker: JoinHandle<()>,
}

impl DebouncedHighlighter {
    /// Spawns the worker task.
    pub fn spawn(vocabulary: Arc<Vocabulary>, delay: Duration) -> Self {
        let (edit_tx, edit_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = watch::channel(None);
        let generation = Arc::new(AtomicU64::new(0));

        let worker = tokio::spawn(run_worker(
            edit_rx,
            result_tx,
            vocabulary,
            delay,
            generation.clone(),
        ));

        Self {
            edits: edit_tx,
            results: result_rx,
            generation,
            worker,
        }
    }

    /// Queues `text` for highlighting after the quiet period.
    ///
    /// Returns the generation the eventual result will carry.
    pub fn submit(&self, text: impl Into<String>) -> u64 {
        self.send(text.into(), false)
    }

    /// Queues `text` for highlighting without waiting for edits to settle.
    pub fn submit_now(&self, text: impl Into<String>) -> u64 {
        self.send(text.into(), true)
    }

    fn send(&self, text: String, immediate: bool) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if self
            .edits
            .send(Edit {
                generation,
                text,
                immediate,
            })
            .is_err()
        {
            tracing::warn!(generation, "Debounce worker has stopped; edit dropped");
        }
        generation
    }

    /// Whether `generation` is the most recent submission.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation.load(Ordering::SeqCst)
    }

    /// The most recent result, if any has been produced.
    pub fn latest(&self) -> Option<Rendered> {
        self.results.borrow().clone()
    }

    /// Waits for the result of the most recent submission.
    ///
    /// Results that were superseded while in flight are skipped. Returns
    /// `None` once the worker has stopped.
    pub async fn next(&mut self) -> Option<Rendered> {
        loop {
            if self.results.changed().await.is_err() {
                return None;
            }
            let rendered = self.results.borrow_and_update().clone();
            match rendered {
                Some(rendered) if self.is_current(rendered.generation) => return Some(rendered),
                Some(stale) => {
                    tracing::trace!(generation = stale.generation, "discarding stale result");
                }
                None => {}
            }
        }
    }
}

impl Drop for DebouncedHighlighter {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_worker(
    mut edits: mpsc::UnboundedReceiver<Edit>,
    results: watch::Sender<Option<Rendered>>,
    vocabulary: Arc<Vocabulary>,
    delay: Duration,
    generation: Arc<AtomicU64>,
) {
    while let Some(mut edit) = edits.recv().await {
        // Keep absorbing edits until the input has been quiet for `delay`.
        while !edit.immediate {
            tokio::select! {
                newer = edits.recv() => match newer {
                    Some(newer) => edit = newer,
                    None => break,
                },
                _ = tokio::time::sleep(delay) => break,
            }
        }

        if edit.generation != generation.load(Ordering::SeqCst) {
            // A newer edit is already queued behind this one.
            continue;
        }

        let result = Highlighter::new(&vocabulary).highlight(&edit.text);
        tracing::debug!(generation = edit.generation, "debounced highlight ready");

        if results
            .send(Some(Rendered {
                generation: edit.generation,
                result,
            }))
            .is_err()
        {
            break;
        }
    }
}
