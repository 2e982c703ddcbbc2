use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};
use tracing::{debug, trace};

use crate::entry::{Entry, EntryKind};
use crate::error::{BlogwareError, Result};
use crate::path::SitePath;

// ---------------------------------------------------------------------------
// WalkOptions
// ---------------------------------------------------------------------------

/// Enumeration parameters carried from a [`DirIndex`](crate::DirIndex) into
/// the engine. Configured through the index's builder methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    pub follow_links: bool,
    pub skip_hidden:  bool,
    pub sort_by_name: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            follow_links: true,
            skip_hidden:  false,
            sort_by_name: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Lazy sequence of the direct children of one directory.
///
/// Yields `Err` for children that could not be inspected; the root itself is
/// validated up front by [`enumerate`], so a missing root never shows up as an
/// empty sequence. Dangling symlinks are skipped, and a symlink back to an
/// ancestor is listed as a directory.
pub struct Entries {
    inner: ignore::Walk,
}

impl Iterator for Entries {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(e) => e,
                Err(e) => match recover(e) {
                    Recovered::Skip => continue,
                    Recovered::Entry(entry) => return Some(Ok(entry)),
                    Recovered::Fail(err) => return Some(Err(err)),
                },
            };

            // The root comes back at depth 0
            if entry.depth() == 0 {
                continue;
            }

            let entry = to_entry(entry);
            trace!(path = %entry.path, kind = ?entry.kind, "entry");
            return Some(Ok(entry));
        }
    }
}

/// Validate `root` and start enumerating its direct children.
pub(crate) fn enumerate(root: &Path, opts: WalkOptions) -> Result<Entries> {
    let meta = std::fs::metadata(root).map_err(|e| BlogwareError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(BlogwareError::NotADirectory(root.to_path_buf()));
    }

    // Listing can still be refused after `stat` succeeds.
    std::fs::read_dir(root).map_err(|e| BlogwareError::from_io(root, e))?;

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(opts.skip_hidden)
        .follow_links(opts.follow_links)
        .same_file_system(false)
        .max_depth(Some(1));

    if opts.sort_by_name {
        builder.sort_by_file_name(|a, b| a.cmp(b));
    }

    debug!(root = %root.display(), ?opts, "enumerating directory");
    Ok(Entries { inner: builder.build() })
}

fn to_entry(entry: DirEntry) -> Entry {
    let kind = match entry.file_type() {
        Some(ft) if ft.is_dir()     => EntryKind::Dir,
        Some(ft) if ft.is_file()    => EntryKind::File,
        Some(ft) if ft.is_symlink() => EntryKind::Symlink,
        _                           => EntryKind::Other,
    };

    let name = entry.file_name().to_string_lossy().into_owned();

    Entry {
        path: SitePath::from(entry.into_path()),
        name,
        kind,
    }
}

// ---------------------------------------------------------------------------
// Per-child errors
// ---------------------------------------------------------------------------

enum Recovered {
    Skip,
    Entry(Entry),
    Fail(BlogwareError),
}

/// Decide what a per-child error means. The walk stops at depth 1, so a link
/// problem only ever concerns the child itself.
fn recover(e: ignore::Error) -> Recovered {
    match strip_depth(e) {
        // A link to an ancestor is still a directory as far as listing goes
        ignore::Error::Loop { child, .. } => {
            debug!(path = %child.display(), "symlink to ancestor");
            let name = child
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Recovered::Entry(Entry {
                path: SitePath::from(child),
                name,
                kind: EntryKind::Dir,
            })
        }
        ignore::Error::WithPath { path, err } if is_dangling(&path, &err) => {
            debug!(path = %path.display(), "skipping dangling symlink");
            Recovered::Skip
        }
        other => Recovered::Fail(map_ignore_error(other)),
    }
}

fn strip_depth(mut e: ignore::Error) -> ignore::Error {
    loop {
        match e {
            ignore::Error::WithDepth { err, .. } => e = *err,
            other => return other,
        }
    }
}

fn is_dangling(path: &Path, err: &ignore::Error) -> bool {
    let missing = err
        .io_error()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false);
    missing
        && std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Map ignore::Error to BlogwareError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> BlogwareError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => BlogwareError::from_io(path, io_err),
            ignore::Error::WithDepth { err, .. } => with_path(path, *err),
            other => BlogwareError::Walk(format!("{}: {}", path.display(), other)),
        },
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::Loop { child, .. } => BlogwareError::SymlinkLoop(child),
        ignore::Error::Io(io_err) => BlogwareError::from_io(PathBuf::new(), io_err),
        other => BlogwareError::Walk(other.to_string()),
    }
}

fn with_path(path: PathBuf, err: ignore::Error) -> BlogwareError {
    match err {
        ignore::Error::Io(io_err) => BlogwareError::from_io(path, io_err),
        other => map_ignore_error(other),
    }
}
