use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::gltf::import_gltf;
use crate::model::{ModelData, ModelLibrary};

#[derive(Debug)]
enum LoadEvent {
    Loaded(Arc<ModelData>),
    Failed { name: String, reason: String },
}

/// One-shot completion signal for a single requested model.
///
/// Whoever performs the load (a loader thread, an engine callback) consumes
/// the handle with [`Completion::complete`] or [`Completion::fail`]. A handle
/// dropped unfulfilled means the model never arrives.
#[derive(Debug)]
pub struct Completion {
    name: String,
    tx: Sender<LoadEvent>,
}

impl Completion {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn complete(self, mut model: ModelData) {
        model.name = self.name;
        // the tracker may already be gone; nothing is waiting then
        let _ = self.tx.send(LoadEvent::Loaded(Arc::new(model)));
    }

    pub fn fail(self, reason: impl std::fmt::Display) {
        let _ = self.tx.send(LoadEvent::Failed {
            name: self.name,
            reason: reason.to_string(),
        });
    }
}

/// Where the barrier stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading { loaded: usize, total: usize },
    /// Every requested model arrived.
    Ready,
    /// At least one model failed; the barrier will never open.
    Failed { failed: Vec<String> },
}

/// Tracks N model requests and opens once all of them completed.
///
/// Completions arrive over a channel and are only applied on the thread
/// calling [`LoadTracker::poll`], so the frame thread never shares state
/// with loader threads.
#[derive(Debug)]
pub struct LoadTracker {
    tx: Sender<LoadEvent>,
    rx: Receiver<LoadEvent>,
    total: usize,
    loaded: usize,
    failed: Vec<String>,
    library: ModelLibrary,
}

impl Default for LoadTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadTracker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            total: 0,
            loaded: 0,
            failed: Vec::new(),
            library: ModelLibrary::new(),
        }
    }

    /// Register one more model and hand back its completion signal.
    pub fn request(&mut self, name: &str) -> Completion {
        self.total += 1;
        Completion {
            name: name.to_string(),
            tx: self.tx.clone(),
        }
    }

    /// Import a glTF file on a background thread.
    pub fn request_file(&mut self, name: &str, path: impl Into<PathBuf>) {
        let completion = self.request(name);
        let path = path.into();
        tracing::debug!(name, path = %path.display(), "requesting model");
        std::thread::spawn(move || match import_gltf(completion.name(), &path) {
            Ok(model) => completion.complete(model),
            Err(e) => completion.fail(e),
        });
    }

    /// Apply every completion received so far and report the barrier state.
    pub fn poll(&mut self) -> LoadStatus {
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
        }
        self.status()
    }

    /// Block until the barrier settles (ready or failed) or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> LoadStatus {
        let deadline = Instant::now() + timeout;
        loop {
            let status = self.poll();
            if !matches!(status, LoadStatus::Loading { .. }) {
                return status;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(event) => self.apply(event),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return self.status();
                }
            }
        }
    }

    pub fn status(&self) -> LoadStatus {
        if !self.failed.is_empty() {
            LoadStatus::Failed {
                failed: self.failed.clone(),
            }
        } else if self.loaded >= self.total {
            LoadStatus::Ready
        } else {
            LoadStatus::Loading {
                loaded: self.loaded,
                total: self.total,
            }
        }
    }

    /// Fraction of requested models that arrived, for a loading indicator.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f32 / self.total as f32
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn library(&self) -> &ModelLibrary {
        &self.library
    }

    pub fn take_library(&mut self) -> ModelLibrary {
        std::mem::take(&mut self.library)
    }

    fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded(model) => {
                self.loaded += 1;
                tracing::debug!(
                    name = %model.name,
                    loaded = self.loaded,
                    total = self.total,
                    "model loaded"
                );
                self.library.insert(model);
            }
            LoadEvent::Failed { name, reason } => {
                tracing::error!(%name, %reason, "model failed to load");
                self.failed.push(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_requests_is_ready() {
        let mut tracker = LoadTracker::new();
        assert_eq!(tracker.poll(), LoadStatus::Ready);
        assert_eq!(tracker.progress(), 1.0);
    }

    #[test]
    fn barrier_opens_after_all_completions() {
        let mut tracker = LoadTracker::new();
        let zebra = tracker.request("zebra");
        let horse = tracker.request("horse");
        assert_eq!(tracker.poll(), LoadStatus::Loading { loaded: 0, total: 2 });

        zebra.complete(ModelData::placeholder("ignored", &[("Walk", 1.0)]));
        assert_eq!(tracker.poll(), LoadStatus::Loading { loaded: 1, total: 2 });
        assert!((tracker.progress() - 0.5).abs() < 1e-6);
        assert!(tracker.library().get("zebra").is_some());

        horse.complete(ModelData::placeholder("horse", &[]));
        assert_eq!(tracker.poll(), LoadStatus::Ready);
        assert_eq!(tracker.take_library().len(), 2);
    }

    #[test]
    fn failure_keeps_barrier_closed() {
        let mut tracker = LoadTracker::new();
        let ok = tracker.request("ok");
        let bad = tracker.request("bad");
        ok.complete(ModelData::placeholder("ok", &[]));
        bad.fail("404");
        assert_eq!(
            tracker.poll(),
            LoadStatus::Failed {
                failed: vec!["bad".to_string()]
            }
        );
        assert!(tracker.library().get("bad").is_none());
    }

    #[test]
    fn dropped_completion_never_arrives() {
        let mut tracker = LoadTracker::new();
        drop(tracker.request("lost"));
        let status = tracker.wait(Duration::from_millis(10));
        assert_eq!(status, LoadStatus::Loading { loaded: 0, total: 1 });
    }

    #[test]
    fn completion_from_another_thread() {
        let mut tracker = LoadTracker::new();
        let completion = tracker.request("knight");
        std::thread::spawn(move || {
            completion.complete(ModelData::placeholder("knight", &[("Idle", 2.0)]));
        });
        assert_eq!(tracker.wait(Duration::from_secs(5)), LoadStatus::Ready);
    }

    #[test]
    fn request_file_imports_on_background_thread() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            r#"{"animations": [{"name": "Fly", "samplers": []}]}"#,
        )
        .unwrap();
        let mut tracker = LoadTracker::new();
        tracker.request_file("phoenix", tmp.path());
        assert_eq!(tracker.wait(Duration::from_secs(5)), LoadStatus::Ready);
        let model = tracker.library().get("phoenix").unwrap();
        assert_eq!(model.first_clip().unwrap().name, "Fly");
    }

    #[test]
    fn request_missing_file_fails() {
        let mut tracker = LoadTracker::new();
        tracker.request_file("ghost", "/definitely/not/here.gltf");
        let status = tracker.wait(Duration::from_secs(5));
        assert!(matches!(status, LoadStatus::Failed { .. }));
    }
}
