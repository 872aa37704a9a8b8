//! Command file lifecycle

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Permissions that let an unprivileged writer append to the file
pub const COMMAND_FILE_MODE: u32 = 0o666;

/// Start from an empty command file
///
/// Any existing file is deleted first so directives from an earlier run
/// can't be replayed. If it can't be deleted it is truncated instead.
pub fn prepare(path: &Path) -> Result<()> {
    remove(path);

    if path.exists() {
        info!("Existing file at {}. Cleaning", path.display());
        fs::write(path, "")
            .with_context(|| format!("Failed to truncate command file: {}", path.display()))?;
    } else {
        info!("Creating file at {}", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create command file directory")?;
        }
        File::create(path)
            .with_context(|| format!("Failed to create command file: {}", path.display()))?;
    }

    if let Err(e) = set_shared_permissions(path) {
        warn!("{:#}", e);
    }

    Ok(())
}

fn remove(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Deleted command file {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => debug!("Unable to delete file at path {}: {}", path.display(), e),
    }
}

#[cfg(unix)]
fn set_shared_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(COMMAND_FILE_MODE))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_shared_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
