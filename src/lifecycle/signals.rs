//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP)
//! - Translate signals to internal events
//! - Trigger appropriate actions (shutdown, reload)
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown
//! - Without a config file SIGHUP is logged and ignored

use std::path::PathBuf;

use crate::config::loader::reload_into;
use crate::config::SharedConfig;
use crate::lifecycle::Shutdown;

/// Wait for signals until a shutdown signal arrives, then trigger `shutdown`.
pub async fn listen(shutdown: Shutdown, config_path: Option<PathBuf>, config: SharedConfig) {
    wait_for_termination(config_path, config).await;
    tracing::info!("Termination signal received, shutting down");
    shutdown.trigger();
}

#[cfg(unix)]
async fn wait_for_termination(config_path: Option<PathBuf>, config: SharedConfig) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut terminate, mut hangup) = match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
        (Ok(terminate), Ok(hangup)) => (terminate, hangup),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Failed to register signal handlers, falling back to Ctrl-C");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return,
            _ = terminate.recv() => return,
            _ = hangup.recv() => reload(config_path.as_deref(), &config),
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination(_config_path: Option<PathBuf>, _config: SharedConfig) {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg_attr(not(unix), allow(dead_code))]
fn reload(path: Option<&std::path::Path>, config: &SharedConfig) {
    let Some(path) = path else {
        tracing::warn!("SIGHUP received but no config file is in use");
        return;
    };
    match reload_into(path, config) {
        Ok(()) => tracing::info!(path = %path.display(), "Configuration reloaded on SIGHUP"),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "Reload failed, keeping current configuration"),
    }
}
