//! Filesystem helpers for use inside actions.
//!
//! The walker itself never writes; these are the effects build scripts reach
//! for most often, with directory creation folded in.

use std::path::Path;

use tracing::debug;

use crate::entry::Entry;
use crate::error::{BlogwareError, Result};
use crate::path::SitePath;

/// Copy `entry` to the same relative location under `to` that it has under
/// `from`, creating parent directories. Existing output is overwritten.
/// Returns the destination path.
pub fn copy_rerooted(
    entry: &Entry,
    from: impl AsRef<Path>,
    to: impl AsRef<Path>,
) -> Result<SitePath> {
    let dest = entry.path.reroot(from, to)?;
    create_parent(&dest)?;
    std::fs::copy(&entry.path, &dest).map_err(|e| BlogwareError::from_io(&entry.path, e))?;
    debug!(src = %entry.path, dest = %dest, "copied");
    Ok(dest)
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_creating_dirs(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    std::fs::write(path, contents).map_err(|e| BlogwareError::from_io(path, e))?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| BlogwareError::from_io(parent, e))
        }
        _ => Ok(()),
    }
}
