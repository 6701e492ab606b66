//! Watching a single source file for edits.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a temp file and renaming it over the original are
//! still picked up.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::{CoreError, CoreResult};

/// Reports changes to one file on a channel.
pub struct FileWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Starts watching `path`. The file must already exist.
    ///
    /// The receiver yields the watched path each time it is created or modified.
    pub fn start(path: impl AsRef<Path>) -> CoreResult<(Self, mpsc::Receiver<PathBuf>)> {
        let path = path.as_ref().canonicalize()?;
        let (dir, name) = match (path.parent(), path.file_name()) {
            (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_os_string()),
            _ => return Err(CoreError::Watch(format!("{} is not a file", path.display()))),
        };

        let (tx, rx) = mpsc::channel(100);
        let target = path.clone();
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Watch error: {}", e);
                    return;
                }
            };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            if event.paths.iter().any(|p| p.file_name() == Some(name.as_os_str())) {
                let _ = tx.blocking_send(target.clone());
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!("Watching {}", path.display());
        Ok((
            Self {
                path,
                _watcher: watcher,
            },
            rx,
        ))
    }

    /// The canonical path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
