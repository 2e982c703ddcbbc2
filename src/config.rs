//! Per-directory configuration from `config.toml` files, cascaded from the
//! build root down to the directory being processed.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{BlogwareError, Result};
use crate::path::relative_to;

/// File name looked up in every directory between the root and the target.
pub const CONFIG_NAME: &str = "config.toml";

/// Effective configuration for one directory.
///
/// Built by overlaying every `config.toml` from the build root down to the
/// directory. A key set in a nearer directory replaces the same top-level key
/// from a farther one; tables are not merged recursively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfig {
    table: toml::Table,
}

impl SiteConfig {
    /// Load the cascaded configuration of `dir`, which must lie under `root`.
    ///
    /// Directories without a `config.toml` contribute nothing. A file that
    /// exists but can't be read or parsed is an error.
    pub fn for_dir(dir: impl AsRef<Path>, root: impl AsRef<Path>) -> Result<SiteConfig> {
        let (dir, root) = (dir.as_ref(), root.as_ref());
        let relative = relative_to(dir, root)?;

        let mut table = toml::Table::new();
        let mut current = root.to_path_buf();
        merge(&mut table, &current)?;
        for component in relative.components() {
            current.push(component);
            merge(&mut table, &current)?;
        }

        Ok(SiteConfig { table })
    }

    /// Parse a single config file's text.
    pub fn from_toml(path: impl AsRef<Path>, text: &str) -> Result<SiteConfig> {
        let table = toml::from_str(text).map_err(|source| BlogwareError::Config {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Ok(SiteConfig { table })
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.table.get(key)
    }

    pub fn table(&self) -> &toml::Table {
        &self.table
    }

    pub fn into_table(self) -> toml::Table {
        self.table
    }

    /// Deserialize the whole configuration into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        toml::Value::Table(self.table.clone())
            .try_into()
            .map_err(|source| BlogwareError::Config {
                path: PathBuf::from(CONFIG_NAME),
                source,
            })
    }
}

fn merge(into: &mut toml::Table, dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_NAME);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(BlogwareError::from_io(&path, e)),
    };

    let layer = SiteConfig::from_toml(&path, &text)?;
    debug!(path = %path.display(), keys = layer.table.len(), "loaded config");
    into.extend(layer.table);
    Ok(())
}
