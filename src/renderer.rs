//! Preview rendering boundary.
//!
//! Given a photo on disk, decode it and scale it to the preview surface with
//! a center-crop fit. Rendering is a pure side effect: the controller only
//! logs the outcome, and a decode failure substitutes a placeholder frame
//! instead of leaving the surface empty.

use crate::config::PreviewConfig;
use async_trait::async_trait;
use image::imageops::FilterType;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while rendering a preview.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Render worker failed: {0}")]
    Worker(String),
}

/// One decoded frame sized for the preview surface, RGBA bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Set when decoding failed and the error placeholder was substituted
    pub placeholder: bool,
    /// Photo this frame was rendered from
    pub source: PathBuf,
}

/// Renderer for the visible photo.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Decode and display the photo at `path`. The result is for logging
    /// only; failures still leave a placeholder on the surface.
    async fn show(&self, path: &Path) -> Result<(), RenderError>;
}

/// In-memory preview surface.
///
/// The latest frame is published behind a lock so a UI can poll it, the same
/// way stream statistics are exposed elsewhere. Decoding runs on the blocking
/// pool.
pub struct ImagePreview {
    width: u32,
    height: u32,
    latest: Arc<RwLock<Option<PreviewFrame>>>,
}

impl ImagePreview {
    pub fn new(config: &PreviewConfig) -> Self {
        Self {
            width: config.max_width,
            height: config.max_height,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Most recently rendered frame, if any.
    pub fn latest(&self) -> Option<PreviewFrame> {
        self.latest.read().clone()
    }

    fn placeholder_frame(&self, source: &Path) -> PreviewFrame {
        // Mid-grey surface standing in for the broken photo
        let pixels = [0x60, 0x60, 0x60, 0xff]
            .iter()
            .copied()
            .cycle()
            .take((self.width * self.height * 4) as usize)
            .collect();

        PreviewFrame {
            width: self.width,
            height: self.height,
            pixels,
            placeholder: true,
            source: source.to_path_buf(),
        }
    }
}

#[async_trait]
impl Renderer for ImagePreview {
    async fn show(&self, path: &Path) -> Result<(), RenderError> {
        let (width, height) = (self.width, self.height);
        let decode_path = path.to_path_buf();

        let decoded = tokio::task::spawn_blocking(move || {
            image::open(&decode_path).map(|img| {
                // Scale to fill the surface, cropping the excess around the center
                let scaled = img.resize_to_fill(width, height, FilterType::Triangle);
                scaled.to_rgba8()
            })
        })
        .await
        .map_err(|e| RenderError::Worker(e.to_string()))?;

        match decoded {
            Ok(rgba) => {
                let frame = PreviewFrame {
                    width: rgba.width(),
                    height: rgba.height(),
                    pixels: rgba.into_raw(),
                    placeholder: false,
                    source: path.to_path_buf(),
                };
                *self.latest.write() = Some(frame);
                debug!(path = %path.display(), "Rendered preview");
                Ok(())
            }
            Err(e) => {
                *self.latest.write() = Some(self.placeholder_frame(path));
                warn!(path = %path.display(), error = %e, "Failed to decode photo, showing placeholder");
                Err(RenderError::Decode {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}
