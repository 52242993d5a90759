pub mod cli;
pub mod headless;
pub mod tui_runner;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::SigningConfig;
use crate::paths;
use crate::session::Document;
use crate::state_machine::{SessionSnapshot, WorkflowController};
use crate::structured_logger::StructuredLogger;
use crate::transmission::SimulatedChannel;
use cli::Cli;

/// A controller wired to its logger and snapshot feed, ready for a front end.
pub struct SigningSession {
    pub controller: WorkflowController,
    pub snapshots: watch::Receiver<SessionSnapshot>,
    pub logger: Arc<StructuredLogger>,
}

impl SigningSession {
    /// Opens the session log under `logs_dir` and creates the controller.
    pub fn start(
        session_id: &str,
        document: Document,
        config: &SigningConfig,
        logs_dir: &Path,
    ) -> Result<Self> {
        let logger = Arc::new(
            StructuredLogger::new(session_id, logs_dir)
                .context("Failed to open the session log")?,
        );
        let channel = if config.share.offline {
            SimulatedChannel::offline()
        } else {
            SimulatedChannel::default()
        };
        let (controller, snapshots) = WorkflowController::new(
            session_id,
            document,
            config,
            Box::new(channel),
            logger.clone(),
        );

        Ok(Self {
            controller,
            snapshots,
            logger,
        })
    }
}

/// Loads configuration: `--config`, then `~/.signdesk/config.yaml`, then the
/// built-in defaults.
pub fn load_config(cli: &Cli) -> Result<SigningConfig> {
    if let Some(path) = &cli.config {
        return SigningConfig::load(path);
    }
    let user_config = paths::user_config_path()?;
    if user_config.exists() {
        return SigningConfig::load(&user_config);
    }
    Ok(SigningConfig::default_config())
}

/// The configured document with command-line overrides applied.
pub fn resolve_document(cli: &Cli, config: &SigningConfig) -> Result<Document> {
    let mut document = config.document.to_document();
    if let Some(title) = &cli.title {
        document.title = title.clone();
    }
    if let Some(path) = &cli.body_file {
        document.body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document body: {}", path.display()))?;
    }
    Ok(document)
}

/// Where the receipt of a session is exported.
pub fn export_dir(out: Option<&Path>, session_id: &str) -> Result<PathBuf> {
    match out {
        Some(dir) => Ok(dir.to_path_buf()),
        None => paths::session_exports_dir(session_id),
    }
}

/// Export directory of one signing round, so a session signed again after a
/// reset keeps every earlier receipt.
pub fn round_export_dir(base: &Path, run_id: u64) -> PathBuf {
    base.join(format!("round-{}", run_id))
}
