use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use shared::protocol::{SessionSnapshot, SNAPSHOT_VERSION};
use tracing::info;

/// Writes the snapshot as pretty JSON, creating parent directories.
///
/// The file is written beside the target and renamed over it, so a crash
/// mid-write leaves the previous snapshot intact.
pub fn save_snapshot(path: &Path, snapshot: &SessionSnapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create snapshot directory '{}'", parent.display())
        })?;
    }

    let body = serde_json::to_vec_pretty(snapshot).context("failed to encode session snapshot")?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, body)
        .with_context(|| format!("failed to write '{}'", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("failed to move snapshot into '{}'", path.display()))?;

    info!(
        path = %path.display(),
        reports = snapshot.reports.len(),
        messages = snapshot.messages.len(),
        "session snapshot saved"
    );
    Ok(())
}

/// Returns `None` when no snapshot has been written yet.
pub fn load_snapshot(path: &Path) -> Result<Option<SessionSnapshot>> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };

    let snapshot: SessionSnapshot = serde_json::from_slice(&raw)
        .with_context(|| format!("malformed session snapshot '{}'", path.display()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        bail!(
            "unsupported snapshot version {} in '{}' (expected {SNAPSHOT_VERSION})",
            snapshot.version,
            path.display()
        );
    }

    info!(
        path = %path.display(),
        reports = snapshot.reports.len(),
        messages = snapshot.messages.len(),
        "session snapshot loaded"
    );
    Ok(Some(snapshot))
}
