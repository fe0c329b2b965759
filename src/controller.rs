//! Capture / preview / upload controller.
//!
//! All session state lives here and is mutated from exactly one place: the
//! event loop in [`Controller::run`]. User actions and adapter completions
//! arrive as [`Event`]s over a channel; camera, renderer, and storage calls
//! are spawned tasks that loop exactly one terminal outcome back into the
//! same channel. At most one capture is pending and at most one upload is in
//! flight at any time.

use crate::camera::{CameraService, CaptureOutcome};
use crate::capture_file::{CaptureFile, CaptureHandle};
use crate::config::CaptureConfig;
use crate::renderer::Renderer;
use crate::uploader::{RemoteStorage, UploadError};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Events processed by the controller, one at a time.
#[derive(Debug)]
pub enum Event {
    /// User asked for a new photo
    CaptureRequested,
    /// Terminal outcome of a capture request, delivered exactly once
    CaptureFinished {
        request_id: Uuid,
        outcome: CaptureOutcome,
    },
    /// User asked to upload the visible photo
    UploadRequested,
    /// Terminal outcome of an upload, delivered exactly once
    UploadFinished {
        key: String,
        result: Result<(), UploadError>,
    },
    /// Host regained foreground; re-render the visible photo if any
    Foregrounded,
}

/// One-line user-visible notices. How they are shown is the host's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PathGenerationFailed,
    CaptureInProgress,
    NothingToUpload,
    UploadUnavailable,
    UploadInProgress,
    Uploaded,
    UploadFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PathGenerationFailed => write!(f, "Could not create a file for the new photo"),
            Notice::CaptureInProgress => write!(f, "A photo capture is already in progress"),
            Notice::NothingToUpload => write!(f, "Take a picture first"),
            Notice::UploadUnavailable => write!(f, "Uploads are not configured"),
            Notice::UploadInProgress => write!(f, "An upload is already running"),
            Notice::Uploaded => write!(f, "Image uploaded"),
            Notice::UploadFailed(detail) => write!(f, "Error uploading image: {}", detail),
        }
    }
}

/// The capture request currently waiting for the camera.
///
/// Lives only for the duration of one request; a restored session carries the
/// path but no live request (`in_flight` false), so a new capture may replace
/// it.
#[derive(Debug, Clone)]
struct PendingCapture {
    request_id: Uuid,
    file: CaptureFile,
    in_flight: bool,
}

/// Where the next upload goes: the confirmed photo and its remote key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub path: PathBuf,
    pub key: String,
}

/// Serialized form of the session, the entire persisted surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub pending_capture_path: Option<String>,
    pub visible_image_path: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    pending: Option<PendingCapture>,
    visible_image: Option<PathBuf>,
    upload_target: Option<UploadTarget>,
    upload_in_flight: bool,
}

/// The capture/preview/upload controller. See the module docs for the
/// threading discipline.
pub struct Controller {
    capture_config: CaptureConfig,
    camera: Arc<dyn CameraService>,
    renderer: Arc<dyn Renderer>,
    /// Optional capability: absent in the preview-only configuration
    storage: Option<Arc<dyn RemoteStorage>>,
    /// Completions from spawned adapter calls loop back through here
    events_tx: mpsc::Sender<Event>,
    notices_tx: mpsc::Sender<Notice>,
    state: SessionState,
}

impl Controller {
    pub fn new(
        capture_config: CaptureConfig,
        camera: Arc<dyn CameraService>,
        renderer: Arc<dyn Renderer>,
        storage: Option<Arc<dyn RemoteStorage>>,
        events_tx: mpsc::Sender<Event>,
        notices_tx: mpsc::Sender<Notice>,
    ) -> Self {
        Self {
            capture_config,
            camera,
            renderer,
            storage,
            events_tx,
            notices_tx,
            state: SessionState::default(),
        }
    }

    /// Path currently rendered on screen, if any.
    pub fn visible_image(&self) -> Option<&Path> {
        self.state.visible_image.as_deref()
    }

    /// What an upload request would transfer, if anything.
    pub fn upload_target(&self) -> Option<&UploadTarget> {
        self.state.upload_target.as_ref()
    }

    pub fn upload_in_flight(&self) -> bool {
        self.state.upload_in_flight
    }

    pub fn capture_in_flight(&self) -> bool {
        self.state
            .pending
            .as_ref()
            .is_some_and(|pending| pending.in_flight)
    }

    /// Serialize the restorable part of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            pending_capture_path: self
                .state
                .pending
                .as_ref()
                .map(|pending| pending.file.path.display().to_string()),
            visible_image_path: self
                .state
                .visible_image
                .as_ref()
                .map(|path| path.display().to_string()),
        }
    }

    /// Repopulate the session from a snapshot, verbatim.
    ///
    /// The upload target is not part of the snapshot; it only reappears once
    /// a fresh capture confirms.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.state.pending = snapshot.pending_capture_path.as_ref().map(|path| {
            let path = PathBuf::from(path);
            PendingCapture {
                request_id: Uuid::new_v4(),
                file: CaptureFile {
                    remote_key: remote_key_for(&path),
                    path,
                },
                in_flight: false,
            }
        });
        self.state.visible_image = snapshot.visible_image_path.as_ref().map(PathBuf::from);
        self.state.upload_target = None;
        self.state.upload_in_flight = false;
    }

    /// Process events until the channel closes, then hand the controller
    /// back so the host can snapshot the final session.
    pub async fn run(mut self, mut events: mpsc::Receiver<Event>) -> Self {
        info!("Controller started");
        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }
        info!("Controller stopped");
        self
    }

    /// Apply one event. This is the only place session state changes.
    pub async fn handle(&mut self, event: Event) {
        match event {
            Event::CaptureRequested => self.on_capture_requested().await,
            Event::CaptureFinished {
                request_id,
                outcome,
            } => self.on_capture_finished(request_id, outcome).await,
            Event::UploadRequested => self.on_upload_requested().await,
            Event::UploadFinished { key, result } => self.on_upload_finished(key, result).await,
            Event::Foregrounded => self.on_foregrounded(),
        }
    }

    async fn on_capture_requested(&mut self) {
        if self.capture_in_flight() {
            debug!("Capture requested while one is pending, rejecting");
            self.notify(Notice::CaptureInProgress).await;
            return;
        }

        let file = match CaptureFile::create(
            &self.capture_config.pictures_dir,
            &self.capture_config.file_prefix,
            Local::now().naive_local(),
        ) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "Capture aborted, no file to write into");
                self.notify(Notice::PathGenerationFailed).await;
                return;
            }
        };

        let request_id = Uuid::new_v4();
        info!(
            request_id = %request_id,
            path = %file.path.display(),
            "Capture requested"
        );

        self.spawn_capture(request_id, file.handle());
        self.state.pending = Some(PendingCapture {
            request_id,
            file,
            in_flight: true,
        });
    }

    fn spawn_capture(&self, request_id: Uuid, target: CaptureHandle) {
        let camera = self.camera.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = camera.capture(target).await;
            let _ = events
                .send(Event::CaptureFinished {
                    request_id,
                    outcome,
                })
                .await;
        });
    }

    async fn on_capture_finished(&mut self, request_id: Uuid, outcome: CaptureOutcome) {
        let pending = match self.state.pending.take() {
            Some(pending) if pending.request_id == request_id => pending,
            other => {
                // Stale completion from a superseded or restored request
                debug!(request_id = %request_id, "Dropping stale capture completion");
                self.state.pending = other;
                return;
            }
        };

        match outcome {
            CaptureOutcome::Confirmed => {
                info!(path = %pending.file.path.display(), "Picture taken");
                metrics::counter!("collage.captures.confirmed").increment(1);

                self.state.visible_image = Some(pending.file.path.clone());
                self.state.upload_target = Some(UploadTarget {
                    path: pending.file.path.clone(),
                    key: pending.file.remote_key,
                });
                self.spawn_render(pending.file.path);
            }
            CaptureOutcome::Canceled => {
                debug!("Capture canceled, no picture taken");
                metrics::counter!("collage.captures.canceled").increment(1);
            }
        }
    }

    async fn on_upload_requested(&mut self) {
        let Some(storage) = self.storage.clone() else {
            self.notify(Notice::UploadUnavailable).await;
            return;
        };

        let Some(target) = self.state.upload_target.clone() else {
            debug!("Upload requested with no confirmed capture");
            self.notify(Notice::NothingToUpload).await;
            return;
        };

        if self.state.upload_in_flight {
            debug!(key = %target.key, "Upload requested while one is in flight, ignoring");
            self.notify(Notice::UploadInProgress).await;
            return;
        }

        info!(path = %target.path.display(), key = %target.key, "Upload requested");
        self.state.upload_in_flight = true;

        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = storage.put(&target.path, &target.key).await;
            let _ = events
                .send(Event::UploadFinished {
                    key: target.key,
                    result,
                })
                .await;
        });
    }

    async fn on_upload_finished(&mut self, key: String, result: Result<(), UploadError>) {
        self.state.upload_in_flight = false;

        match result {
            Ok(()) => {
                info!(key = %key, "Upload finished");
                metrics::counter!("collage.uploads.succeeded").increment(1);
                self.notify(Notice::Uploaded).await;
            }
            Err(e) => {
                // Target stays set so the user may retry manually
                warn!(key = %key, error = %e, "Upload failed");
                metrics::counter!("collage.uploads.failed").increment(1);
                self.notify(Notice::UploadFailed(e.to_string())).await;
            }
        }
    }

    fn on_foregrounded(&mut self) {
        if let Some(path) = self.state.visible_image.clone() {
            debug!(path = %path.display(), "Foregrounded, re-rendering visible photo");
            self.spawn_render(path);
        }
    }

    fn spawn_render(&self, path: PathBuf) {
        let renderer = self.renderer.clone();
        tokio::spawn(async move {
            // Outcome is for the log only; a placeholder is already on screen
            if let Err(e) = renderer.show(&path).await {
                warn!(path = %path.display(), error = %e, "Preview render failed");
            }
        });
    }

    async fn notify(&self, notice: Notice) {
        if self.notices_tx.send(notice).await.is_err() {
            debug!("Notice receiver gone");
        }
    }
}

fn remote_key_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct ScriptedCamera {
        outcome: Mutex<CaptureOutcome>,
        seen: Mutex<Vec<PathBuf>>,
    }

    impl ScriptedCamera {
        fn new(outcome: CaptureOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome: Mutex::new(outcome),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn set_outcome(&self, outcome: CaptureOutcome) {
            *self.outcome.lock() = outcome;
        }

        fn seen(&self) -> Vec<PathBuf> {
            self.seen.lock().clone()
        }
    }

    #[async_trait]
    impl CameraService for ScriptedCamera {
        async fn capture(&self, target: CaptureHandle) -> CaptureOutcome {
            self.seen.lock().push(target.path().to_path_buf());
            *self.outcome.lock()
        }
    }

    struct RecordingRenderer {
        shown_tx: mpsc::UnboundedSender<PathBuf>,
    }

    #[async_trait]
    impl Renderer for RecordingRenderer {
        async fn show(&self, path: &Path) -> Result<(), RenderError> {
            let _ = self.shown_tx.send(path.to_path_buf());
            Ok(())
        }
    }

    struct RecordingStorage {
        puts: Mutex<Vec<(PathBuf, String)>>,
        fail_with: Option<String>,
    }

    impl RecordingStorage {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                puts: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(detail: &str) -> Arc<Self> {
            Arc::new(Self {
                puts: Mutex::new(Vec::new()),
                fail_with: Some(detail.to_string()),
            })
        }

        fn puts(&self) -> Vec<(PathBuf, String)> {
            self.puts.lock().clone()
        }
    }

    #[async_trait]
    impl RemoteStorage for RecordingStorage {
        async fn put(&self, local: &Path, key: &str) -> Result<(), UploadError> {
            self.puts.lock().push((local.to_path_buf(), key.to_string()));
            match &self.fail_with {
                Some(detail) => Err(UploadError::Transfer(detail.clone())),
                None => Ok(()),
            }
        }
    }

    struct Harness {
        controller: Controller,
        events_rx: mpsc::Receiver<Event>,
        notices_rx: mpsc::Receiver<Notice>,
        camera: Arc<ScriptedCamera>,
        shown_rx: mpsc::UnboundedReceiver<PathBuf>,
        storage: Arc<RecordingStorage>,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        fn new(outcome: CaptureOutcome, storage: Option<Arc<RecordingStorage>>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let capture_config = CaptureConfig {
                pictures_dir: dir.path().to_path_buf(),
                file_prefix: "COLLAGE_".to_string(),
                camera_command: "unused".to_string(),
                camera_args: vec![],
            };

            let (events_tx, events_rx) = mpsc::channel(16);
            let (notices_tx, notices_rx) = mpsc::channel(16);
            let (shown_tx, shown_rx) = mpsc::unbounded_channel();

            let camera = ScriptedCamera::new(outcome);
            let recording_storage = storage.unwrap_or_else(RecordingStorage::new);

            let controller = Controller::new(
                capture_config,
                camera.clone(),
                Arc::new(RecordingRenderer { shown_tx }),
                Some(recording_storage.clone() as Arc<dyn RemoteStorage>),
                events_tx,
                notices_tx,
            );

            Self {
                controller,
                events_rx,
                notices_rx,
                camera,
                shown_rx,
                storage: recording_storage,
                _dir: dir,
            }
        }

        /// Wait for the next looped-back completion and apply it.
        async fn pump(&mut self) {
            let event = self.events_rx.recv().await.expect("completion event");
            self.controller.handle(event).await;
        }

        fn drain_notices(&mut self) -> Vec<Notice> {
            let mut notices = Vec::new();
            while let Ok(notice) = self.notices_rx.try_recv() {
                notices.push(notice);
            }
            notices
        }
    }

    #[tokio::test]
    async fn test_capture_confirm_sets_visible_image_and_target() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        h.controller.handle(Event::CaptureRequested).await;
        assert!(h.controller.capture_in_flight());
        h.pump().await;

        let captured = h.camera.seen()[0].clone();
        assert_eq!(h.controller.visible_image(), Some(captured.as_path()));

        let target = h.controller.upload_target().unwrap();
        assert_eq!(target.path, captured);
        assert_eq!(
            target.key,
            captured.file_stem().unwrap().to_string_lossy()
        );

        // Render triggered with the confirmed photo
        assert_eq!(h.shown_rx.recv().await.unwrap(), captured);
    }

    #[tokio::test]
    async fn test_cancellation_leaves_state_untouched() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        // First capture confirms and becomes visible
        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;
        let visible = h.controller.visible_image().unwrap().to_path_buf();
        let target = h.controller.upload_target().cloned();

        // Second capture is canceled
        h.camera.set_outcome(CaptureOutcome::Canceled);
        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;

        assert_eq!(h.controller.visible_image(), Some(visible.as_path()));
        assert_eq!(h.controller.upload_target().cloned(), target);
        assert!(!h.controller.capture_in_flight());
    }

    #[tokio::test]
    async fn test_second_capture_request_rejected_while_pending() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        h.controller.handle(Event::CaptureRequested).await;
        h.controller.handle(Event::CaptureRequested).await;
        assert_eq!(h.drain_notices(), vec![Notice::CaptureInProgress]);

        // Only the one pending capture confirms and becomes visible
        h.pump().await;
        assert_eq!(h.camera.seen().len(), 1);
        assert_eq!(
            h.controller.visible_image(),
            Some(h.camera.seen()[0].as_path())
        );
    }

    #[tokio::test]
    async fn test_stale_capture_completion_is_dropped() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        h.controller
            .handle(Event::CaptureFinished {
                request_id: Uuid::new_v4(),
                outcome: CaptureOutcome::Confirmed,
            })
            .await;

        assert_eq!(h.controller.visible_image(), None);
        assert_eq!(h.controller.upload_target(), None);
    }

    #[tokio::test]
    async fn test_upload_without_capture_reports_nothing_to_upload() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        h.controller.handle(Event::UploadRequested).await;

        assert_eq!(h.drain_notices(), vec![Notice::NothingToUpload]);
        assert!(h.storage.puts().is_empty());
        assert!(!h.controller.upload_in_flight());
    }

    #[tokio::test]
    async fn test_upload_unavailable_without_storage_capability() {
        let dir = tempfile::tempdir().unwrap();
        let (events_tx, _events_rx) = mpsc::channel(16);
        let (notices_tx, mut notices_rx) = mpsc::channel(16);
        let (shown_tx, _shown_rx) = mpsc::unbounded_channel();

        let mut controller = Controller::new(
            CaptureConfig {
                pictures_dir: dir.path().to_path_buf(),
                ..CaptureConfig::default()
            },
            ScriptedCamera::new(CaptureOutcome::Confirmed),
            Arc::new(RecordingRenderer { shown_tx }),
            None,
            events_tx,
            notices_tx,
        );

        controller.handle(Event::UploadRequested).await;
        assert_eq!(notices_rx.try_recv().unwrap(), Notice::UploadUnavailable);
    }

    #[tokio::test]
    async fn test_no_duplicate_concurrent_transfer() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;

        h.controller.handle(Event::UploadRequested).await;
        h.controller.handle(Event::UploadRequested).await;
        assert_eq!(h.drain_notices(), vec![Notice::UploadInProgress]);

        h.pump().await;
        assert_eq!(h.storage.puts().len(), 1);
        assert_eq!(h.drain_notices(), vec![Notice::Uploaded]);
        assert!(!h.controller.upload_in_flight());
    }

    #[tokio::test]
    async fn test_upload_failure_preserves_target_for_manual_retry() {
        let storage = RecordingStorage::failing("bucket is on fire");
        let mut h = Harness::new(CaptureOutcome::Confirmed, Some(storage));

        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;
        let target = h.controller.upload_target().cloned().unwrap();

        h.controller.handle(Event::UploadRequested).await;
        h.pump().await;

        assert_eq!(
            h.drain_notices(),
            vec![Notice::UploadFailed(
                "Transfer failed: bucket is on fire".to_string()
            )]
        );
        assert!(!h.controller.upload_in_flight());
        assert_eq!(h.controller.upload_target(), Some(&target));

        // Manual retry invokes the storage client again
        h.controller.handle(Event::UploadRequested).await;
        h.pump().await;
        assert_eq!(h.storage.puts().len(), 2);
    }

    #[tokio::test]
    async fn test_foregrounded_rerenders_visible_image() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        // Nothing visible yet: no render
        h.controller.handle(Event::Foregrounded).await;

        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;
        let visible = h.controller.visible_image().unwrap().to_path_buf();
        assert_eq!(h.shown_rx.recv().await.unwrap(), visible);

        let snapshot = h.controller.snapshot();
        h.controller.handle(Event::Foregrounded).await;
        assert_eq!(h.shown_rx.recv().await.unwrap(), visible);
        // Pure side effect, state unchanged
        assert_eq!(h.controller.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn test_snapshot_restore_is_idempotent() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;
        let snapshot = h.controller.snapshot();
        assert!(snapshot.visible_image_path.is_some());

        let mut other = Harness::new(CaptureOutcome::Confirmed, None);
        other.controller.restore(&snapshot);
        assert_eq!(other.controller.snapshot(), snapshot);

        // Restoring twice from the same snapshot yields the same result
        other.controller.restore(&snapshot);
        assert_eq!(other.controller.snapshot(), snapshot);

        // The snapshot survives a serde round trip verbatim
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[tokio::test]
    async fn test_upload_unavailable_after_restore_until_fresh_capture() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);
        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;
        let snapshot = h.controller.snapshot();

        let mut restored = Harness::new(CaptureOutcome::Confirmed, None);
        restored.controller.restore(&snapshot);

        // The upload target is not persisted, so upload is unavailable
        restored.controller.handle(Event::UploadRequested).await;
        assert_eq!(restored.drain_notices(), vec![Notice::NothingToUpload]);
        assert!(restored.storage.puts().is_empty());

        // A fresh confirmed capture makes upload available again
        restored.controller.handle(Event::CaptureRequested).await;
        restored.pump().await;
        restored.controller.handle(Event::UploadRequested).await;
        restored.pump().await;
        assert_eq!(restored.storage.puts().len(), 1);
    }

    #[tokio::test]
    async fn test_restored_pending_path_does_not_block_new_capture() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);
        h.controller.restore(&SessionSnapshot {
            pending_capture_path: Some("/pictures/COLLAGE_20240101_120000.jpg".to_string()),
            visible_image_path: None,
        });
        assert!(!h.controller.capture_in_flight());

        h.controller.handle(Event::CaptureRequested).await;
        assert!(h.controller.capture_in_flight());
        assert!(h.drain_notices().is_empty());
        h.pump().await;
        assert_eq!(h.camera.seen().len(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_capture_render_upload() {
        let mut h = Harness::new(CaptureOutcome::Confirmed, None);

        h.controller.handle(Event::CaptureRequested).await;
        h.pump().await;

        let path = h.controller.visible_image().unwrap().to_path_buf();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("COLLAGE_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(h.shown_rx.recv().await.unwrap(), path);

        h.controller.handle(Event::UploadRequested).await;
        h.pump().await;

        let key = path.file_stem().unwrap().to_string_lossy().into_owned();
        assert_eq!(h.storage.puts(), vec![(path.clone(), key)]);
        assert_eq!(h.drain_notices(), vec![Notice::Uploaded]);
        assert!(!h.controller.upload_in_flight());
        assert_eq!(h.controller.upload_target().map(|t| &t.path), Some(&path));
    }
}
