//! Timestamped capture file creation.
//!
//! New photos get a `<prefix>yyyyMMdd_HHmmss.jpg` name inside the pictures
//! directory. The file is created atomically (create-if-absent) before the
//! camera is asked to write into it, so a capture request never races another
//! process for the same path.

use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Timestamp layout used in capture file names, second resolution.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Collision retries before giving up. More than one collision per second
/// only happens when the clock is stuck.
const MAX_CREATE_ATTEMPTS: u32 = 16;

/// Errors that can occur while creating a capture file.
#[derive(Debug, Error)]
pub enum CaptureFileError {
    #[error("Pictures directory {0} is unavailable: {1}")]
    DirectoryUnavailable(PathBuf, std::io::Error),

    #[error("Failed to create capture file {0}: {1}")]
    CreateFailed(PathBuf, std::io::Error),

    #[error("Exhausted all attempts to find an unused capture file name")]
    AttemptsExhausted,
}

/// A freshly created, empty file a new photo can be written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFile {
    /// Absolute-ish path of the created file
    pub path: PathBuf,
    /// File stem, used as the remote storage key
    pub remote_key: String,
}

/// Write-scoped handle handed to the camera service. The camera only ever
/// sees the output location, never the session state around it.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    path: PathBuf,
}

impl CaptureHandle {
    /// Location the camera must write the photo to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureFile {
    /// Create a new, unused capture file under `dir`.
    ///
    /// The name is `<prefix><timestamp>.jpg`; if that already exists a
    /// numeric suffix is appended. Creation uses `create_new`, so the
    /// returned path is guaranteed not to have existed before this call.
    pub fn create(
        dir: &Path,
        prefix: &str,
        now: NaiveDateTime,
    ) -> Result<Self, CaptureFileError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| CaptureFileError::DirectoryUnavailable(dir.to_path_buf(), e))?;

        let base = format!("{}{}", prefix, now.format(TIMESTAMP_FORMAT));

        for attempt in 0..MAX_CREATE_ATTEMPTS {
            let stem = if attempt == 0 {
                base.clone()
            } else {
                format!("{}_{}", base, attempt)
            };
            let path = dir.join(format!("{}.jpg", stem));

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    debug!(path = %path.display(), "Created capture file");
                    return Ok(Self {
                        path,
                        remote_key: stem,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(CaptureFileError::CreateFailed(path, e)),
            }
        }

        Err(CaptureFileError::AttemptsExhausted)
    }

    /// Handle the camera service is allowed to write through.
    pub fn handle(&self) -> CaptureHandle {
        CaptureHandle {
            path: self.path.clone(),
        }
    }
}
