//! Configuration file watcher for hot reload.
//!
//! # Design Decisions
//! - Watches the parent directory, so editors that save by writing a temp
//!   file and renaming it over the original keep triggering reloads
//! - A reload is published only when it validates and differs from the last
//!   published config; bursts of events for one save collapse into one swap
//! - Invalid files are logged and the running config stays in place

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    current: GatewayConfig,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, whose contents are currently `current`.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path, current: GatewayConfig) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            current,
            update_tx,
        }, update_rx)
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (dir, file) = watch_location(&self.path)?;
        let mut reloader = Reloader {
            path: file.clone(),
            current: self.current,
            tx: self.update_tx,
        };

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if touches(&event, &file) => {
                    tracing::debug!(kind = ?event.kind, "Config file change detected");
                    reloader.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

/// Canonical directory to watch and the absolute file path events will carry.
fn watch_location(path: &Path) -> Result<(PathBuf, PathBuf), notify::Error> {
    let file_name = path
        .file_name()
        .ok_or_else(|| notify::Error::generic("config path has no file name"))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let dir = parent.canonicalize().map_err(notify::Error::io)?;
    let file = dir.join(file_name);
    Ok((dir, file))
}

fn touches(event: &Event, file: &Path) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event.paths.iter().any(|p| p == file)
}

/// Loads the file and publishes it when it is valid and new.
struct Reloader {
    path: PathBuf,
    current: GatewayConfig,
    tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl Reloader {
    /// Returns true when a new config was sent.
    fn reload(&mut self) -> bool {
        match load_config(&self.path) {
            Ok(config) if config == self.current => {
                tracing::debug!("Config unchanged, skipping reload");
                false
            }
            Ok(config) => {
                tracing::info!(services = config.services.len(), "Config reloaded");
                self.current = config.clone();
                self.tx.send(config).is_ok()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                false
            }
        }
    }
}
