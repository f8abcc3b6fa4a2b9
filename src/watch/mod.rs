use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Events emitted by the snapshot watcher
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// The watched snapshot file was written, replaced or removed
    SnapshotChanged,
}

/// A debounced watcher for a single snapshot file.
///
/// Editors often save by writing a temp file and renaming it over the
/// original, so the parent directory is watched and events are filtered down
/// to the target path.
pub struct SnapshotWatcher {
    _watcher: notify_debouncer_mini::Debouncer<RecommendedWatcher>,
}

impl SnapshotWatcher {
    pub fn new(file: &Path, debounce_ms: u64, tx: mpsc::Sender<WatchEvent>) -> Result<Self> {
        let target = absolute(file)?;
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .context("snapshot file has no parent directory")?;
        let file_name = target.file_name().map(|n| n.to_os_string());

        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            move |result: std::result::Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                match result {
                    Ok(events) => {
                        let hit = events.iter().any(|e| {
                            e.kind == DebouncedEventKind::Any
                                && e.path.file_name().map(|n| n.to_os_string()) == file_name
                        });
                        if hit {
                            let _ = tx.send(WatchEvent::SnapshotChanged);
                        }
                    }
                    Err(err) => tracing::warn!(%err, "snapshot watcher error"),
                }
            },
        )?;

        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %target.display(), "watching snapshot file");

        Ok(SnapshotWatcher {
            _watcher: debouncer,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn relative_paths_are_made_absolute() {
        let p = absolute(Path::new("snap.json")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("snap.json"));
    }

    #[test]
    fn watcher_reports_writes_to_target() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("snap.json");
        std::fs::write(&file, "{}").unwrap();

        let (tx, rx) = mpsc::channel();
        let _w = SnapshotWatcher::new(&file, 50, tx).unwrap();
        // The OS watch is registered asynchronously; a write issued before it
        // is live would be missed, so give it time to settle.
        std::thread::sleep(Duration::from_millis(500));
        std::fs::write(&file, r#"{"command": "updateAnnotations"}"#).unwrap();

        let ev = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(ev, WatchEvent::SnapshotChanged);
    }
}
