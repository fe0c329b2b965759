//! Collage
//!
//! Capture a photo with an external camera program, preview it, and upload it
//! to a remote object store. One controller owns the session state and
//! processes every event on a single loop; the camera, the preview renderer,
//! and the remote storage client are asynchronous collaborators that each
//! report exactly one terminal outcome per request.
//!
//! ## Architecture
//!
//! ```text
//!  user / host events          completions loop back
//! ┌──────────────┐            ┌───────────────────────┐
//! │ capture      │            │                       │
//! │ upload       │──────┐     │   ┌──────────────┐    │
//! │ foregrounded │      ▼     ▼   │ Camera       │────┤
//! └──────────────┘   ┌──────────┐ │ Service      │    │
//!                    │Controller│▶└──────────────┘    │
//! ┌──────────────┐   │ (session │ ┌──────────────┐    │
//! │ Notices      │◀──│  state)  │▶│ Remote       │────┘
//! │ (one-liners) │   └──────────┘ │ Storage      │
//! └──────────────┘         │      └──────────────┘
//!                          ▼
//!                    ┌──────────┐
//!                    │ Preview  │
//!                    │ Renderer │
//!                    └──────────┘
//! ```

pub mod camera;
pub mod capture_file;
pub mod config;
pub mod controller;
pub mod renderer;
pub mod uploader;

pub use camera::{CameraService, CaptureOutcome, CommandCamera};
pub use capture_file::{CaptureFile, CaptureFileError, CaptureHandle};
pub use config::Config;
pub use controller::{Controller, Event, Notice, SessionSnapshot, UploadTarget};
pub use renderer::{ImagePreview, PreviewFrame, RenderError, Renderer};
pub use uploader::{RemoteStorage, S3Uploader, UploadError};
