//! File watcher for config hot reload and active-document edits.
//!
//! Watches a single file and reports a change once modifications have gone
//! quiet for the debounce delay. Watches the parent directory so atomic saves
//! (write temp + rename) are seen. Debouncing is trailing-edge: a burst of
//! writes yields one change, reported after the last write of the burst.

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Event indicating a watched file has changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    /// Canonical path of the file that changed.
    pub path: PathBuf,
}

/// Trailing-edge debounce over raw file events.
#[derive(Debug)]
struct Debouncer {
    delay: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    /// Note a raw event; it restarts the quiet period.
    fn record(&mut self, at: Instant) {
        self.last_event = Some(at);
    }

    /// Consume the pending change once `delay` has passed since the last event.
    fn settle(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// Watches one file and reports settled changes.
pub struct FileWatcher {
    /// The file system watcher (kept alive to maintain watching).
    _watcher: Box<dyn Watcher + Send>,
    /// Pending change state shared with the watcher callback.
    debouncer: Arc<Mutex<Debouncer>>,
    /// Canonical path being watched.
    path: PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Build the event-handler closure shared by both watcher backends.
///
/// Filters events to `filename` and records each match on `debouncer`.
fn make_event_handler(
    filename: std::ffi::OsString,
    canonical_path: PathBuf,
    debouncer: Arc<Mutex<Debouncer>>,
) -> impl Fn(std::result::Result<Event, notify::Error>) + Send + 'static {
    move |result: std::result::Result<Event, notify::Error>| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::warn!("File watch error for {}: {}", canonical_path.display(), e);
                return;
            }
        };

        // Only modify and create events matter (create handles atomic saves)
        if !matches!(
            event.kind,
            notify::EventKind::Modify(_) | notify::EventKind::Create(_)
        ) {
            return;
        }

        let matches_file = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|f| f == filename).unwrap_or(false));
        if !matches_file {
            return;
        }

        log::trace!("Change event for {}", canonical_path.display());
        debouncer.lock().record(Instant::now());
    }
}

impl FileWatcher {
    /// Start watching `path`.
    ///
    /// Uses the platform's native watcher and falls back to a 500 ms
    /// `PollWatcher` when the native backend cannot be initialised (containers,
    /// network filesystems).
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or both backends fail.
    pub fn new(path: &Path, debounce_delay_ms: u64) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Watched file not found: {}", path.display());
        }

        let canonical = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        let filename = canonical
            .file_name()
            .context("Watched path has no filename")?
            .to_os_string();
        let parent_dir = canonical
            .parent()
            .context("Watched path has no parent directory")?
            .to_path_buf();

        let debouncer = Arc::new(Mutex::new(Debouncer::new(Duration::from_millis(
            debounce_delay_ms,
        ))));

        let mut watcher =
            Self::create_watcher(filename, canonical.clone(), Arc::clone(&debouncer))?;

        watcher
            .watch(&parent_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", parent_dir.display()))?;

        log::info!("Watching {}", canonical.display());

        Ok(Self {
            _watcher: watcher,
            debouncer,
            path: canonical,
        })
    }

    fn create_watcher(
        filename: std::ffi::OsString,
        canonical_path: PathBuf,
        debouncer: Arc<Mutex<Debouncer>>,
    ) -> Result<Box<dyn Watcher + Send>> {
        let handler = make_event_handler(
            filename.clone(),
            canonical_path.clone(),
            Arc::clone(&debouncer),
        );

        match notify::recommended_watcher(handler) {
            Ok(w) => {
                log::debug!("File watcher: using native (RecommendedWatcher) backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "File watcher: native backend unavailable ({}); falling back to PollWatcher",
                    e
                );
                let fallback_handler = make_event_handler(filename, canonical_path, debouncer);
                let poll_watcher = PollWatcher::new(
                    fallback_handler,
                    NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll_watcher))
            }
        }
    }

    /// Canonical path of the watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the pending change if it has settled (non-blocking).
    pub fn try_recv(&self) -> Option<FileChangeEvent> {
        if !self.debouncer.lock().settle(Instant::now()) {
            return None;
        }
        log::debug!("Watched file changed: {}", self.path.display());
        Some(FileChangeEvent {
            path: self.path.clone(),
        })
    }

    /// Whether a settled change was pending; the change is consumed.
    pub fn drain(&self) -> bool {
        self.try_recv().is_some()
    }
}
