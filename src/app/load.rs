// DomainLens - app/load.rs
//
// Dataset load lifecycle. Reads and parses the dataset file on a background
// thread, sending the result to the UI thread via an mpsc channel.
//
// Architecture:
//   - `LoadManager` lives on the UI thread; `run_load` runs on a background thread.
//   - An `Arc<AtomicBool>` cancel flag lets a newer load supersede an older one.
//   - All cross-thread communication is via `LoadProgress` channel messages.
//
// A load either delivers a complete `Table` or fails; a failed load is not
// retried.

use crate::core::model::Table;
use crate::core::table::{parse_table, TableOptions};
use crate::platform::fs::read_dataset;
use crate::util::error::LoadError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Messages sent from the load thread to the UI thread.
#[derive(Debug)]
pub enum LoadProgress {
    /// Reading has begun.
    Started { path: PathBuf },

    /// The dataset was read and parsed.
    Loaded {
        path: PathBuf,
        table: Table,
        duration: Duration,
    },

    /// The dataset is unusable for this session.
    Failed { path: PathBuf, error: LoadError },
}

/// Manages a dataset load on a background thread.
pub struct LoadManager {
    /// Channel receiver for the UI to poll progress messages.
    pub progress_rx: Option<mpsc::Receiver<LoadProgress>>,

    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl LoadManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start loading `path`.
    ///
    /// Spawns a background thread immediately. A load already running is
    /// cancelled first and its result is discarded.
    pub fn start_load(&mut self, path: PathBuf, options: TableOptions, max_bytes: u64) {
        self.cancel_load();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        tracing::info!(path = %path.display(), "Dataset load started");

        std::thread::spawn(move || {
            run_load(path, options, max_bytes, tx, cancel);
        });
    }

    /// Request cancellation of the running load.
    pub fn cancel_load(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
        self.progress_rx = None;
    }

    /// Poll for progress messages without blocking. Returns all pending messages.
    pub fn poll_progress(&self) -> Vec<LoadProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }

    /// Block until the current load finishes. Used by headless runs.
    ///
    /// Returns `None` when no load was started or the thread exited without
    /// a final message.
    pub fn wait(&self) -> Option<LoadProgress> {
        let rx = self.progress_rx.as_ref()?;
        while let Ok(msg) = rx.recv() {
            match msg {
                LoadProgress::Started { .. } => continue,
                done => return Some(done),
            }
        }
        None
    }
}

impl Default for LoadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Load synchronously on the calling thread.
pub fn load_dataset(path: &Path, options: &TableOptions, max_bytes: u64) -> Result<Table, LoadError> {
    let text = read_dataset(path, max_bytes)?;
    parse_table(&text, path, options)
}

/// Background load: read -> parse -> deliver.
fn run_load(
    path: PathBuf,
    options: TableOptions,
    max_bytes: u64,
    tx: mpsc::Sender<LoadProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                return; // Receiver dropped (UI closed or load superseded).
            }
        };
    }

    send!(LoadProgress::Started { path: path.clone() });

    let start = Instant::now();
    let result = load_dataset(&path, &options, max_bytes);

    if cancel.load(Ordering::SeqCst) {
        tracing::debug!(path = %path.display(), "Load cancelled; result discarded");
        return;
    }

    match result {
        Ok(table) => {
            let duration = start.elapsed();
            tracing::info!(
                path = %path.display(),
                rows = table.len(),
                columns = table.columns().len(),
                elapsed_ms = duration.as_millis() as u64,
                "Dataset loaded"
            );
            send!(LoadProgress::Loaded {
                path,
                table,
                duration,
            });
        }
        Err(error) => {
            tracing::error!(path = %path.display(), error = %error, "Dataset load failed");
            send!(LoadProgress::Failed { path, error });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants;

    #[test]
    fn test_background_load_delivers_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "Domain,Family\nFinance,Ledger\n").unwrap();

        let mut manager = LoadManager::new();
        manager.start_load(
            path.clone(),
            TableOptions::default(),
            constants::MAX_DATASET_FILE_SIZE,
        );
        match manager.wait() {
            Some(LoadProgress::Loaded {
                path: loaded,
                table,
                ..
            }) => {
                assert_eq!(loaded, path);
                assert_eq!(table.len(), 1);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = LoadManager::new();
        manager.start_load(
            dir.path().join("absent.csv"),
            TableOptions::default(),
            constants::MAX_DATASET_FILE_SIZE,
        );
        assert!(matches!(
            manager.wait(),
            Some(LoadProgress::Failed {
                error: LoadError::Io { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_idle_manager_has_nothing_to_poll() {
        let manager = LoadManager::default();
        assert!(manager.poll_progress().is_empty());
        assert!(manager.wait().is_none());
    }
}
