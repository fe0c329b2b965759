//! Collage binary.
//!
//! Wires the capture/preview/upload controller to its collaborators: the
//! configured external camera program, the in-memory preview surface, and
//! (when enabled) the S3 uploader. Commands are read from stdin; notices are
//! printed back. The session snapshot is persisted across runs.
//!
//! Configuration is loaded from `config/collage.toml`,
//! `/etc/collage/collage.toml`, and `COLLAGE__`-prefixed environment
//! variables. See `config.rs` for the options.

use anyhow::{Context, Result};
use collage::config::{Config, ServiceConfig};
use collage::controller::{Controller, Event, Notice, SessionSnapshot};
use collage::{CommandCamera, ImagePreview, RemoteStorage, S3Uploader};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    init_tracing(&config.service);

    info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        pictures_dir = %config.capture.pictures_dir.display(),
        upload_enabled = config.upload.enabled,
        "Starting collage"
    );

    if let Some(port) = config.service.metrics_port {
        init_metrics(port)?;
    }

    // Collaborators; storage is an optional capability
    let camera = Arc::new(CommandCamera::new(&config.capture));
    let preview = Arc::new(ImagePreview::new(&config.preview));
    let storage: Option<Arc<dyn RemoteStorage>> = if config.upload.enabled {
        Some(Arc::new(S3Uploader::new(&config.upload).await))
    } else {
        None
    };

    let (events_tx, events_rx) = mpsc::channel::<Event>(32);
    let (notices_tx, notices_rx) = mpsc::channel::<Notice>(32);

    let mut controller = Controller::new(
        config.capture.clone(),
        camera,
        preview,
        storage,
        events_tx.clone(),
        notices_tx,
    );

    // Pick up where the previous run left off
    if let Some(snapshot) = load_snapshot(&config.service.state_file).await {
        info!(
            visible = ?snapshot.visible_image_path,
            "Restored session snapshot"
        );
        controller.restore(&snapshot);
    }

    let controller_handle = tokio::spawn(controller.run(events_rx));
    let notice_handle = tokio::spawn(print_notices(notices_rx));

    // Re-render the visible photo from the restored session, if any
    events_tx
        .send(Event::Foregrounded)
        .await
        .context("Controller stopped before startup")?;

    run_command_loop(&events_tx).await;

    // Close the event channel so the controller winds down
    drop(events_tx);

    let controller = controller_handle
        .await
        .context("Controller task panicked")?;
    save_snapshot(&config.service.state_file, &controller.snapshot()).await?;

    notice_handle.abort();
    info!("Shutdown complete");

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(config: &ServiceConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

/// Initialize Prometheus metrics exporter
fn init_metrics(port: u16) -> Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus metrics exporter")?;

    info!(port = port, "Prometheus metrics exporter started");

    Ok(())
}

/// Surface controller notices to the user.
async fn print_notices(mut notices: mpsc::Receiver<Notice>) {
    while let Some(notice) = notices.recv().await {
        info!(notice = %notice, "Notice");
        println!("{}", notice);
    }
}

/// Read commands from stdin until EOF, `quit`, or a shutdown signal.
async fn run_command_loop(events: &mpsc::Sender<Event>) {
    let mut lines = BufReader::new(io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    println!("Commands: capture | upload | show | quit");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "Failed to read command");
                        break;
                    }
                };

                let event = match line.trim() {
                    "" => continue,
                    "capture" | "c" => Event::CaptureRequested,
                    "upload" | "u" => Event::UploadRequested,
                    "show" | "s" => Event::Foregrounded,
                    "quit" | "q" => break,
                    other => {
                        println!("Unknown command: {}", other);
                        continue;
                    }
                };

                if events.send(event).await.is_err() {
                    warn!("Controller stopped, exiting command loop");
                    break;
                }
            }
        }
    }
}

/// Load the previous session snapshot, if one was persisted.
async fn load_snapshot(path: &Path) -> Option<SessionSnapshot> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read session snapshot");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable session snapshot");
            None
        }
    }
}

/// Persist the session snapshot for the next run.
async fn save_snapshot(path: &Path, snapshot: &SessionSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Session snapshot saved");
    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
