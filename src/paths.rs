//! Home-based storage paths for signdesk.
//!
//! Everything lives under `~/.signdesk/` (or `$SIGNDESK_HOME`):
//! - `config.yaml` - optional user configuration
//! - `logs/<session-id>/` - structured session logs
//! - `exports/<session-id>/` - exported signatures and receipts

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The name of the signdesk directory under the home directory.
const SIGNDESK_DIR: &str = ".signdesk";

/// Overrides the storage root when set.
const SIGNDESK_HOME_ENV: &str = "SIGNDESK_HOME";

/// Returns the storage root, creating it if it doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - Home directory cannot be determined
/// - Directory creation fails
pub fn signdesk_home_dir() -> Result<PathBuf> {
    let root = match std::env::var_os(SIGNDESK_HOME_ENV) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => dirs::home_dir()
            .context("Could not determine home directory for signdesk storage")?
            .join(SIGNDESK_DIR),
    };
    fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create signdesk directory: {}", root.display()))?;
    Ok(root)
}

/// Returns the user configuration path: `~/.signdesk/config.yaml`
///
/// The file is not created; callers check for its existence.
pub fn user_config_path() -> Result<PathBuf> {
    Ok(signdesk_home_dir()?.join("config.yaml"))
}

/// Returns the log directory of a session: `~/.signdesk/logs/<session-id>/`
///
/// Creates the directory if it doesn't exist.
pub fn session_logs_dir(session_id: &str) -> Result<PathBuf> {
    let dir = signdesk_home_dir()?.join("logs").join(session_id);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the export directory of a session: `~/.signdesk/exports/<session-id>/`
///
/// Creates the directory if it doesn't exist.
pub fn session_exports_dir(session_id: &str) -> Result<PathBuf> {
    let dir = signdesk_home_dir()?.join("exports").join(session_id);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create exports directory: {}", dir.display()))?;
    Ok(dir)
}
