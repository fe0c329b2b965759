//! Camera service boundary.
//!
//! The controller hands the camera a write-scoped [`CaptureHandle`] and gets
//! back exactly one terminal outcome. Cancellation is a normal outcome, not
//! an error; anything the camera reports that we do not recognize is treated
//! as a cancellation.

use crate::capture_file::CaptureHandle;
use crate::config::CaptureConfig;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Terminal outcome of a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The camera wrote a photo into the capture file
    Confirmed,
    /// The user backed out, or the camera reported anything unrecognized
    Canceled,
}

/// External camera that can write a photo into a capture file.
#[async_trait]
pub trait CameraService: Send + Sync {
    /// Take a photo into `target`, reporting exactly one terminal outcome.
    async fn capture(&self, target: CaptureHandle) -> CaptureOutcome;
}

/// Camera backed by an external capture program.
///
/// The configured command is run with `{path}` in its arguments replaced by
/// the capture file location. A zero exit status confirms the capture;
/// non-zero exits, signals, and spawn failures all map to [`CaptureOutcome::Canceled`].
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            program: config.camera_command.clone(),
            args: config.camera_args.clone(),
        }
    }

    fn resolved_args(&self, target: &CaptureHandle) -> Vec<String> {
        let path = target.path().display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{path}", &path))
            .collect()
    }
}

#[async_trait]
impl CameraService for CommandCamera {
    async fn capture(&self, target: CaptureHandle) -> CaptureOutcome {
        let args = self.resolved_args(&target);

        debug!(
            program = %self.program,
            path = %target.path().display(),
            "Launching camera program"
        );

        match Command::new(&self.program).args(&args).status().await {
            Ok(status) if status.success() => {
                debug!(path = %target.path().display(), "Camera confirmed capture");
                CaptureOutcome::Confirmed
            }
            Ok(status) => {
                debug!(
                    status = %status,
                    path = %target.path().display(),
                    "Camera exited without confirming, treating as canceled"
                );
                CaptureOutcome::Canceled
            }
            Err(e) => {
                warn!(
                    error = %e,
                    program = %self.program,
                    "Failed to launch camera program, treating as canceled"
                );
                CaptureOutcome::Canceled
            }
        }
    }
}
