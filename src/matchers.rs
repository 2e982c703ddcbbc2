//! Built-in predicates for the common cases: selecting by extension and by
//! entry kind.

use crate::entry::Entry;
use crate::traits::Matcher;

/// Matches files whose extension is one of `exts`.
///
/// A leading `.` is optional (`".md"` and `"md"` are equivalent). The
/// comparison is case-sensitive, so `ext(["md"])` does not match `README.MD`.
/// `ext([""])` selects files without an extension, such as `Makefile`.
/// Directories never match, even if their name has an extension.
///
/// ```rust
/// use blogware::{ext, Entry, EntryKind, Matcher, SitePath};
///
/// let entry = Entry {
///     path: SitePath::from("site/index.md"),
///     name: "index.md".into(),
///     kind: EntryKind::File,
/// };
/// assert!(ext([".md"]).is_match(&entry));
/// assert!(ext(["md", "html"]).is_match(&entry));
/// assert!(!ext(["html"]).is_match(&entry));
/// ```
pub fn ext<I, S>(exts: I) -> ExtensionMatcher
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ExtensionMatcher {
        exts: exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_owned())
            .collect(),
    }
}

/// Returned by [`ext`].
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    exts: Vec<String>,
}

impl Matcher for ExtensionMatcher {
    fn is_match(&self, entry: &Entry) -> bool {
        // No extension at all compares as ""
        let found = match entry.path.extension() {
            None => Some(""),
            Some(e) => e.to_str(),
        };
        entry.is_file() && found.map(|e| self.exts.iter().any(|x| x == e)).unwrap_or(false)
    }
}

/// Matches directories.
#[derive(Debug, Clone, Copy)]
pub struct IsDir;

impl Matcher for IsDir {
    fn is_match(&self, entry: &Entry) -> bool {
        entry.is_dir()
    }
}

/// Matches regular files.
#[derive(Debug, Clone, Copy)]
pub struct IsFile;

impl Matcher for IsFile {
    fn is_match(&self, entry: &Entry) -> bool {
        entry.is_file()
    }
}

pub const IS_DIR: IsDir = IsDir;
pub const IS_FILE: IsFile = IsFile;

/// Matches every entry. Useful as a catch-all last rule.
#[derive(Debug, Clone, Copy)]
pub struct AllMatcher;

impl Matcher for AllMatcher {
    fn is_match(&self, _entry: &Entry) -> bool {
        true
    }
}
