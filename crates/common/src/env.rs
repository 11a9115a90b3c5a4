//! Environment/runtime helpers
//!
//! Sanity checks so the file-backed storage area has somewhere to live.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the parent directory of `data_file` exists.
pub fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    warn!(dir = %parent.display(), "data directory missing; creating it");
    std::fs::create_dir_all(parent)
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    debug!(dir = %parent.display(), "data directory created");
    Ok(())
}

/// Read an environment override, treating blank values as unset.
pub fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
