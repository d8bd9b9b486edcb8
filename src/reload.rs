//! Live configuration reload on SIGHUP.
//!
//! The watcher only parses and validates; the scheduler is the single
//! writer of running state and applies the new config between sweeps.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;

/// Spawn the signal watcher. Each SIGHUP re-reads `path`; a config
/// that fails to load or validate is logged and dropped, leaving the
/// previous one in force.
#[cfg(unix)]
pub fn spawn_watcher(path: String, tx: mpsc::Sender<Config>) {
    tokio::spawn(async move {
        let mut hangup = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
        {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Cannot install SIGHUP handler, live reload disabled");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            info!(path = %path, "SIGHUP received, reloading configuration");
            let config = match Config::load(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "Reload failed, keeping previous configuration");
                    continue;
                }
            };
            if let Err(e) = config.validate() {
                warn!(error = %e, "Reloaded configuration invalid, keeping previous");
                continue;
            }
            if tx.send(config).await.is_err() {
                // Scheduler is gone; nothing left to reload.
                return;
            }
        }
    });
}

#[cfg(not(unix))]
pub fn spawn_watcher(_path: String, _tx: mpsc::Sender<Config>) {
    warn!("Live reload requires SIGHUP and is unavailable on this platform");
}
