use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration for the collage tool
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// Capture configuration
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Preview configuration
    #[serde(default)]
    pub preview: PreviewConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name for logging
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format ("pretty" or "json")
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Prometheus metrics port; exporter is not installed when unset
    pub metrics_port: Option<u16>,
    /// File the session snapshot is persisted to across runs
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

/// Photo capture configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// Directory new photos are written into
    #[serde(default = "default_pictures_dir")]
    pub pictures_dir: PathBuf,
    /// File name prefix for new photos
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// External camera program invoked to take the photo
    #[serde(default = "default_camera_command")]
    pub camera_command: String,
    /// Arguments for the camera program; `{path}` is replaced with the output path
    #[serde(default = "default_camera_args")]
    pub camera_args: Vec<String>,
}

/// Preview rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Preview surface width in pixels
    #[serde(default = "default_preview_width")]
    pub max_width: u32,
    /// Preview surface height in pixels
    #[serde(default = "default_preview_height")]
    pub max_height: u32,
}

/// Upload configuration for the remote object store
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Enable uploads; when false the controller runs preview-only
    #[serde(default)]
    pub enabled: bool,
    /// S3 bucket name
    #[serde(default)]
    pub bucket: String,
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint URL (for MinIO, LocalStack, etc.)
    pub endpoint_url: Option<String>,
    /// Force path-style access (required for MinIO)
    #[serde(default)]
    pub force_path_style: bool,
    /// Logical namespace objects are stored under
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

// Default value functions
fn default_service_name() -> String {
    "collage".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_state_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("collage")
        .join("session.json")
}

fn default_pictures_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("collage")
}

fn default_file_prefix() -> String {
    "COLLAGE_".to_string()
}

fn default_camera_command() -> String {
    "libcamera-still".to_string()
}

fn default_camera_args() -> Vec<String> {
    vec!["-o".to_string(), "{path}".to_string()]
}

fn default_preview_width() -> u32 {
    1280
}

fn default_preview_height() -> u32 {
    720
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_key_prefix() -> String {
    "images".to_string()
}

impl Config {
    /// Load configuration from config files and the environment
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/collage").required(false))
            .add_source(config::File::with_name("/etc/collage/collage").required(false))
            // COLLAGE__UPLOAD__BUCKET -> upload.bucket
            .add_source(
                config::Environment::with_prefix("COLLAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize().map_err(Into::into)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_port: None,
            state_file: default_state_file(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            pictures_dir: default_pictures_dir(),
            file_prefix: default_file_prefix(),
            camera_command: default_camera_command(),
            camera_args: default_camera_args(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_width: default_preview_width(),
            max_height: default_preview_height(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket: String::new(),
            region: default_region(),
            endpoint_url: None,
            force_path_style: false,
            key_prefix: default_key_prefix(),
        }
    }
}
