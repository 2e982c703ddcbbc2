use std::ffi::OsStr;
use std::fmt;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};

use crate::error::{BlogwareError, Result};

/// An immutable filesystem location with the two manipulations build scripts
/// need most: moving a path from the input tree to the output tree
/// ([`reroot`](SitePath::reroot)) and changing its extension
/// ([`with_extension`](SitePath::with_extension)).
///
/// Derefs to [`Path`], so every read-only `Path` method is available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SitePath(PathBuf);

impl SitePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Replace the leading `old_root` with `new_root`.
    ///
    /// ```rust
    /// use blogware::SitePath;
    ///
    /// let p = SitePath::from("site/posts/hello.md");
    /// let out = p.reroot("site", "public").unwrap();
    /// assert_eq!(out, SitePath::from("public/posts/hello.md"));
    /// ```
    ///
    /// Leading `.` components are ignored on both sides, so `./site/a.md`
    /// is considered to live under `site`. A path outside `old_root` yields
    /// [`BlogwareError::NotUnderRoot`], and so does one that climbs back out
    /// through `..`, such as `site/../other/a.md`.
    pub fn reroot(&self, old_root: impl AsRef<Path>, new_root: impl AsRef<Path>) -> Result<SitePath> {
        let old_root = old_root.as_ref();
        let relative = relative_to(&self.0, old_root)?;

        if relative.as_os_str().is_empty() {
            return Ok(SitePath(new_root.as_ref().to_path_buf()));
        }
        Ok(SitePath(new_root.as_ref().join(relative)))
    }

    /// Swap the extension. A leading `.` on `ext` is optional; an empty
    /// `ext` strips the extension.
    ///
    /// ```rust
    /// use blogware::SitePath;
    ///
    /// assert_eq!(SitePath::from("index.md").with_extension(".html"), SitePath::from("index.html"));
    /// ```
    pub fn with_extension(&self, ext: &str) -> SitePath {
        SitePath(self.0.with_extension(ext.trim_start_matches('.')))
    }

    /// The extension without the leading dot, if it is valid UTF-8.
    pub fn extension_str(&self) -> Option<&str> {
        self.0.extension().and_then(OsStr::to_str)
    }
}

/// Drop `.` components so prefixes compare the way a user reads them.
fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// `path` with the `root` prefix removed, compared lexically. The remainder
/// may not contain `..`, since it could then point anywhere.
pub(crate) fn relative_to(path: &Path, root: &Path) -> Result<PathBuf> {
    let outside = || BlogwareError::NotUnderRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };
    let full = lexical(path);
    let relative = full.strip_prefix(lexical(root)).map_err(|_| outside())?;
    if relative.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(outside());
    }
    Ok(relative.to_path_buf())
}

impl Deref for SitePath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for SitePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for SitePath {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

impl From<&Path> for SitePath {
    fn from(p: &Path) -> Self {
        Self(p.to_path_buf())
    }
}

impl From<&str> for SitePath {
    fn from(p: &str) -> Self {
        Self(PathBuf::from(p))
    }
}

impl From<String> for SitePath {
    fn from(p: String) -> Self {
        Self(PathBuf::from(p))
    }
}

impl From<SitePath> for PathBuf {
    fn from(p: SitePath) -> Self {
        p.0
    }
}

impl fmt::Display for SitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}
