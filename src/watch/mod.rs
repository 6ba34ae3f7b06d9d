//! Rebuild-on-change watching of the notes directory.
//!
//! A debounced filesystem watcher forwards note-file changes over a
//! channel; the CLI consumes them and re-runs the site build.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Watcher configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory to watch (recursive)
    pub notes_dir: PathBuf,

    /// Debounce window for filesystem events
    pub debounce: Duration,
}

impl WatchConfig {
    /// Create a config with the default debounce window
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
            debounce: Duration::from_millis(500),
        }
    }
}

/// A debounced batch of changed note files
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Changed `.md` paths
    pub paths: Vec<PathBuf>,
}

/// Handle to a running watcher task
pub struct NoteWatcher {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<Result<()>>,
}

impl NoteWatcher {
    /// Start watching. Change batches arrive on `event_tx`.
    pub fn spawn(config: WatchConfig, event_tx: mpsc::Sender<ChangeEvent>) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel(1);

        let handle = tokio::spawn(run_watcher(config, event_tx, stop_rx));

        Self { stop_tx, handle }
    }

    /// Ask the watcher to stop and wait for it to finish
    pub async fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(()).await;
        self.handle.await??;
        Ok(())
    }
}

/// Whether a changed path is a note file
fn is_note_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Internal watcher loop
async fn run_watcher(
    config: WatchConfig,
    event_tx: mpsc::Sender<ChangeEvent>,
    mut stop_rx: mpsc::Receiver<()>,
) -> Result<()> {
    // Debounced watcher delivers over a std channel
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(config.debounce, tx)?;
    debouncer
        .watcher()
        .watch(&config.notes_dir, RecursiveMode::Recursive)?;

    tracing::info!("Watching {} for note changes", config.notes_dir.display());

    loop {
        // Check for stop signal
        if stop_rx.try_recv().is_ok() {
            tracing::info!("Watcher stopping...");
            break;
        }

        // Check for file events (non-blocking with timeout)
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(Ok(events)) => {
                let paths: Vec<PathBuf> = events
                    .into_iter()
                    .map(|e| e.path)
                    .filter(|p| is_note_file(p))
                    .collect();

                if !paths.is_empty() {
                    tracing::debug!("{} note file(s) changed", paths.len());
                    if event_tx.send(ChangeEvent { paths }).await.is_err() {
                        // Receiver gone, nothing left to notify
                        break;
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::warn!("Watcher error: {:?}", e);
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Expected - loop back to the stop check
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("Watcher channel disconnected");
                break;
            }
        }

        // Small sleep to prevent busy loop
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_note_file() {
        assert!(is_note_file(Path::new("notes/2021/kerberos.md")));
        assert!(!is_note_file(Path::new("notes/2021/diagram.png")));
        assert!(!is_note_file(Path::new("notes/2021")));
    }

    #[tokio::test]
    async fn test_watcher_reports_note_change() {
        let temp = TempDir::new().unwrap();
        let year = temp.path().join("2021");
        std::fs::create_dir_all(&year).unwrap();

        let (event_tx, mut event_rx) = mpsc::channel(8);
        let config = WatchConfig {
            notes_dir: temp.path().to_path_buf(),
            debounce: Duration::from_millis(50),
        };
        let watcher = NoteWatcher::spawn(config, event_tx);

        // Give the watcher a moment to register before writing
        tokio::time::sleep(Duration::from_millis(300)).await;
        std::fs::write(year.join("new-note.md"), "# New\n").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(10), event_rx.recv())
            .await
            .expect("timed out waiting for change event")
            .expect("watcher closed the channel");

        assert!(event.paths.iter().any(|p| p.ends_with("new-note.md")));

        watcher.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_terminates_watcher() {
        let temp = TempDir::new().unwrap();

        let (event_tx, _event_rx) = mpsc::channel(8);
        let watcher = NoteWatcher::spawn(WatchConfig::new(temp.path()), event_tx);

        tokio::time::timeout(Duration::from_secs(5), watcher.stop())
            .await
            .expect("stop timed out")
            .unwrap();
    }
}
