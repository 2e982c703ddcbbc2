//! # blogware
//!
//! Small helpers for writing static-site build scripts: walk a directory,
//! match its children against predicates, and run an action on each match.
//!
//! blogware owns the walk, the predicate and action contracts ([`Matcher`],
//! [`Action`]), the error type, and a few path and file utilities. It does
//! **not** own rendering or templating; those belong to the build script.
//!
//! Enumeration is one level deep. Recursion is done by the caller, by walking
//! again from inside a directory action, so the traversal is depth-first and
//! entirely under the script's control.
//!
//! # Quick Start
//!
//! ```rust
//! use blogware::{actions, ext, BlogwareError, Entry, Walk, IS_DIR};
//! use std::path::Path;
//!
//! fn copy_assets(dir: &Path, src: &Path, out: &Path) -> Result<(), BlogwareError> {
//!     Walk::from_dir(dir)?
//!         .match_exec(ext(["css", "png"]), |e| actions::copy_rerooted(e, src, out).map(|_| ()))?
//!         .match_exec(IS_DIR, |e: &Entry| copy_assets(&e.path, src, out))?;
//!     Ok(())
//! }
//!
//! let tmp = tempfile::tempdir().unwrap();
//! let (src, out) = (tmp.path().join("site"), tmp.path().join("public"));
//! std::fs::create_dir_all(src.join("img")).unwrap();
//! std::fs::write(src.join("style.css"), "body {}").unwrap();
//! std::fs::write(src.join("img").join("logo.png"), [0u8; 4]).unwrap();
//! std::fs::write(src.join("notes.txt"), "skip me").unwrap();
//!
//! copy_assets(&src, &src, &out).unwrap();
//!
//! assert!(out.join("style.css").is_file());
//! assert!(out.join("img").join("logo.png").is_file());
//! assert!(!out.join("notes.txt").exists());
//! ```
//!
//! # Rules
//!
//! Chained `match_exec` calls are independent passes: an entry matched by
//! two predicates is acted on twice. For mutually exclusive handling, use a
//! [`Rules`] list with [`Walk::match_rules`]; the first matching rule wins.
//!
//! # Documents and config
//!
//! [`Document`] splits a `---`-fenced TOML header from a file's body, and
//! [`SiteConfig`] cascades `config.toml` files from the build root down to a
//! directory.

#![forbid(unsafe_code)]

pub mod actions;
pub mod engine;

mod builder;
mod config;
mod document;
mod entry;
mod error;
mod matchers;
mod path;
mod results;
mod traits;
mod walk;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::DirIndex;
pub use config::{SiteConfig, CONFIG_NAME};
pub use document::Document;
pub use engine::{Entries, WalkOptions};
pub use entry::{Entry, EntryKind};
pub use error::{BlogwareError, Result};
pub use matchers::{ext, AllMatcher, ExtensionMatcher, IsDir, IsFile, IS_DIR, IS_FILE};
pub use path::SitePath;
pub use results::WalkStats;
pub use traits::{Action, Matcher};
pub use walk::{Rules, Walk};
