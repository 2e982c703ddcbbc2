use crate::entry::{Entry, EntryKind};

/// Counters accumulated by a [`Walk`](crate::Walk).
///
/// Entry counts reflect what the walk has pulled from the directory so far;
/// with lazy enumeration they stay at zero until the first matching pass.
/// They include entries that `files()`, `dirs()` or `filter()` then removed,
/// so they describe the directory rather than the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Regular files seen.
    pub files: usize,

    /// Directories seen.
    pub dirs: usize,

    /// Symlinks and special files seen.
    pub other: usize,

    /// Number of times an action ran, across all chained passes.
    pub actions_fired: usize,
}

impl WalkStats {
    pub(crate) fn record(&mut self, entry: &Entry) {
        match entry.kind {
            EntryKind::File => self.files += 1,
            EntryKind::Dir => self.dirs += 1,
            EntryKind::Symlink | EntryKind::Other => self.other += 1,
        }
    }

    /// Total entries seen.
    pub fn entries(&self) -> usize {
        self.files + self.dirs + self.other
    }
}
