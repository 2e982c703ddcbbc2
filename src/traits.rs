use crate::entry::Entry;

/// Decides whether an entry is selected for an action.
///
/// Matchers are pure: they must not touch the filesystem beyond what the
/// [`Entry`] already carries. Any `Fn(&Entry) -> bool` is a matcher, so ad-hoc
/// predicates can be written inline.
///
/// # Example
///
/// ```rust
/// use blogware::{Entry, Matcher};
///
/// struct Drafts;
///
/// impl Matcher for Drafts {
///     fn is_match(&self, entry: &Entry) -> bool {
///         entry.name.starts_with("draft-")
///     }
/// }
/// ```
pub trait Matcher {
    /// Returns `true` if the paired action should run on `entry`.
    fn is_match(&self, entry: &Entry) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&Entry) -> bool,
{
    fn is_match(&self, entry: &Entry) -> bool {
        self(entry)
    }
}

/// An effect run on a matched entry: copy it, render it, recurse into it.
///
/// The error type belongs to the caller. The walker never wraps or swallows
/// it; the first failing action stops the walk and its error is returned
/// as-is.
pub trait Action<E> {
    fn run(&mut self, entry: &Entry) -> Result<(), E>;
}

impl<F, E> Action<E> for F
where
    F: FnMut(&Entry) -> Result<(), E>,
{
    fn run(&mut self, entry: &Entry) -> Result<(), E> {
        self(entry)
    }
}
