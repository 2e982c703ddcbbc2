use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogwareError {
    // Traversal
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("symlink loop at {}", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(String),

    // Paths
    #[error("{} is not under {}", path.display(), root.display())]
    NotUnderRoot { path: PathBuf, root: PathBuf },

    // Documents and config
    #[error("front matter in {} has no closing `---`", .0.display())]
    UnterminatedFrontmatter(PathBuf),

    #[error("invalid front matter in {}", path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, BlogwareError>;

impl BlogwareError {
    /// Classify an I/O failure at `path` into the matching variant.
    pub(crate) fn from_io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source: err },
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::PermissionDenied(p)
            | Self::SymlinkLoop(p)
            | Self::UnterminatedFrontmatter(p)
            | Self::Io { path: p, .. }
            | Self::NotUnderRoot { path: p, .. }
            | Self::Frontmatter { path: p, .. }
            | Self::Config { path: p, .. } => Some(p),
            Self::Walk(_) => None,
        }
    }
}
