use crate::engine::{enumerate, Entries, WalkOptions};
use crate::entry::Entry;
use crate::error::{BlogwareError, Result};
use crate::path::SitePath;
use crate::walk::Walk;

// ---------------------------------------------------------------------------
// DirIndex
// ---------------------------------------------------------------------------

/// A directory whose direct children can be enumerated.
///
/// Constructing an index touches nothing on disk; the root is only checked
/// when [`entries()`](DirIndex::entries) or [`walk()`](DirIndex::walk) is
/// called. Enumeration is one level deep. To go further, call
/// [`descend()`](DirIndex::descend) from a directory action.
///
/// # Example
///
/// ```rust,no_run
/// use blogware::{DirIndex, IS_FILE};
///
/// let walk = DirIndex::new("site")
///     .sort_by_name(true)
///     .walk()?
///     .match_exec(IS_FILE, |entry| {
///         println!("{}", entry.path);
///         Ok::<_, blogware::BlogwareError>(())
///     })?;
/// # Ok::<(), blogware::BlogwareError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirIndex {
    path:    SitePath,
    options: WalkOptions,
}

impl DirIndex {
    pub fn new(path: impl Into<SitePath>) -> Self {
        Self {
            path:    path.into(),
            options: WalkOptions::default(),
        }
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Report symlinks as the kind of their target. On by default.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }

    /// Leave out dot-files. Off by default: everything is enumerated.
    pub fn skip_hidden(mut self, yes: bool) -> Self {
        self.options.skip_hidden = yes;
        self
    }

    /// Yield children sorted by file name instead of in filesystem order.
    pub fn sort_by_name(mut self, yes: bool) -> Self {
        self.options.sort_by_name = yes;
        self
    }

    pub fn options(&self) -> WalkOptions {
        self.options
    }

    pub fn path(&self) -> &SitePath {
        &self.path
    }

    // ── Enumerate ─────────────────────────────────────────────────────────

    /// Lazily enumerate the direct children of the root.
    ///
    /// # Errors
    ///
    /// [`BlogwareError::NotFound`] if the root does not exist,
    /// [`BlogwareError::NotADirectory`] if it is not a directory, and
    /// [`BlogwareError::PermissionDenied`] if it cannot be listed.
    pub fn entries(&self) -> Result<Entries> {
        enumerate(&self.path, self.options)
    }

    /// Enumerate and wrap the children in a [`Walk`] for matching.
    pub fn walk(&self) -> Result<Walk> {
        Ok(Walk::new(self.path.clone(), self.entries()?))
    }

    /// An index over a directory entry, inheriting this index's options.
    pub fn descend(&self, entry: &Entry) -> Result<DirIndex> {
        if !entry.is_dir() {
            return Err(BlogwareError::NotADirectory(entry.path.to_path_buf()));
        }
        Ok(DirIndex {
            path:    entry.path.clone(),
            options: self.options,
        })
    }
}
