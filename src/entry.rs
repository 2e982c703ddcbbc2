use crate::document::Document;
use crate::error::{BlogwareError, Result};
use crate::path::SitePath;
use crate::walk::Walk;

/// A single child of a directory, produced during enumeration.
///
/// Entries are transient: the walker creates one per child, hands it to the
/// matching actions, and drops it. Nothing about the file is read until an
/// action asks for it ([`read_to_string`](Entry::read_to_string),
/// [`document`](Entry::document)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path to the entry (the walked directory joined with `name`).
    pub path: SitePath,

    /// The entry's file name.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,
}

/// The kind of an enumerated entry.
///
/// With link following on (the default), a symlink is reported as the kind
/// of its target; `Symlink` only appears when following is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Extension without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension_str()
    }

    /// File name without its extension.
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }

    pub fn read_to_string(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| BlogwareError::from_io(&self.path, e))
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| BlogwareError::from_io(&self.path, e))
    }

    /// Read the entry as a [`Document`], splitting off its front matter.
    pub fn document(&self) -> Result<Document> {
        Document::load(&self.path)
    }

    /// Walk this entry's children with default options. Fails with
    /// [`BlogwareError::NotADirectory`] when called on a non-directory.
    pub fn walk(&self) -> Result<Walk> {
        if !self.is_dir() {
            return Err(BlogwareError::NotADirectory(self.path.to_path_buf()));
        }
        Walk::from_dir(&self.path)
    }
}
