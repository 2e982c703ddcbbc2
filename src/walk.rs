//! The match-then-execute combinator over one directory's children.
//!
//! A [`Walk`] owns the (lazy) entries of a directory. Each `match_exec` call
//! is one pass: every entry is offered to the predicate, and the action runs
//! on those that match. The first pass pulls entries from the directory and
//! keeps them, so later passes in the same chain see exactly the same
//! entries without listing the directory again.
//!
//! For a set of mutually exclusive rules, build a [`Rules`] list and use
//! [`Walk::match_rules`]: the first rule whose predicate matches an entry
//! claims it.

use std::path::Path;

use tracing::debug;

use crate::builder::DirIndex;
use crate::engine::Entries;
use crate::entry::Entry;
use crate::error::{BlogwareError, Result};
use crate::path::SitePath;
use crate::results::WalkStats;
use crate::traits::{Action, Matcher};

type Keep = Box<dyn Fn(&Entry) -> bool>;

enum Items {
    // Filters stay separate until the first pass so stats see every child
    Pending {
        iter: Box<dyn Iterator<Item = Result<Entry>>>,
        keep: Vec<Keep>,
    },
    Ready(Vec<Entry>),
}

/// Chainable iteration over the children of one directory.
///
/// # Example
///
/// ```rust,no_run
/// use blogware::{actions, ext, BlogwareError, Entry, Walk, IS_DIR};
///
/// fn build(dir: &Entry) -> Result<(), BlogwareError> {
///     dir.walk()?
///         .match_exec(ext(["css", "png"]), |e| {
///             actions::copy_rerooted(e, "site", "public").map(|_| ())
///         })?
///         .match_exec(IS_DIR, build)?;
///     Ok(())
/// }
///
/// Walk::from_dir("site")?.match_exec(IS_DIR, build)?;
/// # Ok::<(), BlogwareError>(())
/// ```
pub struct Walk {
    root:  SitePath,
    items: Items,
    stats: WalkStats,
}

impl Walk {
    pub(crate) fn new(root: SitePath, entries: Entries) -> Self {
        Self {
            root,
            items: Items::Pending { iter: Box::new(entries), keep: Vec::new() },
            stats: WalkStats::default(),
        }
    }

    /// Walk `dir` with default options. See [`DirIndex`] to configure them.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Walk> {
        DirIndex::new(dir.as_ref()).walk()
    }

    /// The directory whose children this walk covers.
    pub fn root(&self) -> &SitePath {
        &self.root
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    // ── Filters ───────────────────────────────────────────────────────────

    /// Keep only regular files.
    pub fn files(self) -> Self {
        self.retain(Entry::is_file)
    }

    /// Keep only directories.
    pub fn dirs(self) -> Self {
        self.retain(Entry::is_dir)
    }

    /// Keep only entries the matcher accepts.
    pub fn filter(self, matcher: impl Matcher + 'static) -> Self {
        self.retain(move |e| matcher.is_match(e))
    }

    fn retain(mut self, keep: impl Fn(&Entry) -> bool + 'static) -> Self {
        self.items = match self.items {
            Items::Pending { iter, keep: mut kept } => {
                kept.push(Box::new(keep));
                Items::Pending { iter, keep: kept }
            }
            Items::Ready(mut entries) => {
                entries.retain(|e| keep(e));
                Items::Ready(entries)
            }
        };
        self
    }

    // ── Match and execute ─────────────────────────────────────────────────

    /// Run `action` on every entry `predicate` matches, in enumeration order.
    ///
    /// Entries that don't match are left alone. The returned walk holds the
    /// same entries, so calls chain; each chained call is an independent pass.
    ///
    /// # Errors
    ///
    /// Stops at the first failure. Enumeration failures are converted into
    /// `E`; action failures are returned untouched.
    pub fn match_exec<P, A, E>(self, predicate: P, mut action: A) -> std::result::Result<Self, E>
    where
        P: Matcher,
        A: FnMut(&Entry) -> std::result::Result<(), E>,
        E: From<BlogwareError>,
    {
        self.pass(|entry| {
            if !predicate.is_match(entry) {
                return Ok(false);
            }
            debug!(path = %entry.path, "match");
            action(entry)?;
            Ok(true)
        })
    }

    /// Offer each entry to `rules`; the first matching rule fires and the
    /// rest are skipped for that entry. Entries no rule matches are skipped
    /// silently.
    pub fn match_rules<E>(self, rules: &mut Rules<'_, E>) -> std::result::Result<Self, E>
    where
        E: From<BlogwareError>,
    {
        self.pass(|entry| rules.apply(entry))
    }

    fn pass<E, F>(mut self, mut visit: F) -> std::result::Result<Self, E>
    where
        F: FnMut(&Entry) -> std::result::Result<bool, E>,
        E: From<BlogwareError>,
    {
        let items = std::mem::replace(&mut self.items, Items::Ready(Vec::new()));
        let entries = match items {
            Items::Pending { iter, keep } => {
                let mut seen = Vec::new();
                for res in iter {
                    let entry = res?;
                    self.stats.record(&entry);
                    if !keeps(&keep, &entry) {
                        continue;
                    }
                    if visit(&entry)? {
                        self.stats.actions_fired += 1;
                    }
                    seen.push(entry);
                }
                seen
            }
            Items::Ready(entries) => {
                for entry in &entries {
                    if visit(entry)? {
                        self.stats.actions_fired += 1;
                    }
                }
                entries
            }
        };
        self.items = Items::Ready(entries);
        Ok(self)
    }

    // ── Consume ───────────────────────────────────────────────────────────

    /// The remaining entries, lazily if no pass has run yet.
    pub fn entries(self) -> Box<dyn Iterator<Item = Result<Entry>>> {
        match self.items {
            // Errors pass through so the caller still sees them
            Items::Pending { iter, keep } => Box::new(
                iter.filter(move |res| res.as_ref().map(|e| keeps(&keep, e)).unwrap_or(true)),
            ),
            Items::Ready(entries) => Box::new(entries.into_iter().map(Ok)),
        }
    }

    pub fn collect(self) -> Result<Vec<Entry>> {
        self.entries().collect()
    }
}

fn keeps(keep: &[Keep], entry: &Entry) -> bool {
    keep.iter().all(|k| k(entry))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// An ordered list of predicate/action pairs, evaluated first-match-wins.
///
/// ```rust
/// use blogware::{ext, BlogwareError, Entry, Rules, Walk, IS_DIR};
///
/// let tmp = tempfile::tempdir().unwrap();
/// std::fs::write(tmp.path().join("a.md"), "# a").unwrap();
/// std::fs::create_dir(tmp.path().join("posts")).unwrap();
///
/// let mut pages = Vec::new();
/// let mut dirs = Vec::new();
/// let mut rules = Rules::<BlogwareError>::new()
///     .rule(ext(["md"]), |e: &Entry| { pages.push(e.name.clone()); Ok(()) })
///     .rule(IS_DIR, |e: &Entry| { dirs.push(e.name.clone()); Ok(()) });
///
/// Walk::from_dir(tmp.path())?.match_rules(&mut rules)?;
/// drop(rules);
///
/// assert_eq!(pages, ["a.md"]);
/// assert_eq!(dirs, ["posts"]);
/// # Ok::<(), BlogwareError>(())
/// ```
pub struct Rules<'a, E> {
    rules: Vec<(Box<dyn Matcher + 'a>, Box<dyn Action<E> + 'a>)>,
}

impl<'a, E> Rules<'a, E> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn rule<P, A>(mut self, predicate: P, action: A) -> Self
    where
        P: Matcher + 'a,
        A: FnMut(&Entry) -> std::result::Result<(), E> + 'a,
    {
        self.rules.push((Box::new(predicate), Box::new(action)));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fire the first rule matching `entry`. Returns whether any rule fired.
    pub fn apply(&mut self, entry: &Entry) -> std::result::Result<bool, E> {
        for (i, (predicate, action)) in self.rules.iter_mut().enumerate() {
            if predicate.is_match(entry) {
                debug!(path = %entry.path, rule = i, "rule matched");
                action.run(entry)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<E> Default for Rules<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}


impl std::fmt::Debug for Walk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walk")
            .field("root", &self.root)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
