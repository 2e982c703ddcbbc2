//! Source files with an optional TOML front matter header.
//!
//! ```text
//! ---
//! title = "Hello"
//! tags = ["greet"]
//! ---
//! # Hello
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{BlogwareError, Result};
use crate::path::SitePath;

const FENCE: &str = "---";

/// A text file split into front matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path:        SitePath,
    content:     String,
    frontmatter: toml::Table,
    body:        String,
}

impl Document {
    pub fn load(path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BlogwareError::from_io(path, e))?;
        Document::parse(path, content)
    }

    /// Split `content` into front matter and body.
    ///
    /// If the text starts (after leading whitespace) with `---`, everything up
    /// to the next `---` is parsed as a TOML table and the remainder is the
    /// body. Otherwise the front matter is empty and the whole text is the
    /// body.
    pub fn parse(path: impl Into<SitePath>, content: String) -> Result<Document> {
        let path = path.into();
        let (frontmatter, body) = match split(&content) {
            None => (toml::Table::new(), content.clone()),
            Some(None) => return Err(BlogwareError::UnterminatedFrontmatter(path.into())),
            Some(Some((header, body))) => {
                let table = toml::from_str::<toml::Table>(header).map_err(|source| {
                    BlogwareError::Frontmatter {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                (table, body.to_owned())
            }
        };

        trace!(path = %path, keys = frontmatter.len(), "parsed document");
        Ok(Document {
            path,
            content,
            frontmatter,
            body,
        })
    }

    pub fn path(&self) -> &SitePath {
        &self.path
    }

    /// The full text, front matter included.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn frontmatter(&self) -> &toml::Table {
        &self.frontmatter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deserialize the front matter into `T`.
    pub fn frontmatter_as<T: DeserializeOwned>(&self) -> Result<T> {
        toml::Value::Table(self.frontmatter.clone())
            .try_into()
            .map_err(|source| BlogwareError::Frontmatter {
                path: self.path.to_path_buf(),
                source,
            })
    }
}

/// `None` when there is no opening fence, `Some(None)` when the closing fence
/// is missing, otherwise the header and body slices.
fn split(content: &str) -> Option<Option<(&str, &str)>> {
    let rest = content.trim_start().strip_prefix(FENCE)?;
    Some(rest.find(FENCE).map(|i| (&rest[..i], &rest[i + FENCE.len()..])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn splits_frontmatter_from_body() {
        let doc = Document::parse(
            "post.md",
            "---\ntitle = \"Hello\"\ndraft = true\n---\n# Hi\n".to_owned(),
        )
        .unwrap();

        assert_eq!(doc.frontmatter()["title"].as_str(), Some("Hello"));
        assert_eq!(doc.frontmatter()["draft"].as_bool(), Some(true));
        assert_eq!(doc.body(), "\n# Hi\n");
        assert!(doc.content().starts_with("---"));
    }

    #[test]
    fn leading_whitespace_before_fence_is_allowed() {
        let doc = Document::parse("p.md", "\n\n---\nx = 1\n---\nbody".to_owned()).unwrap();
        assert_eq!(doc.frontmatter()["x"].as_integer(), Some(1));
        assert_eq!(doc.body(), "\nbody");
    }

    #[test]
    fn no_fence_means_empty_frontmatter() {
        let doc = Document::parse("p.md", "just text\n---\n".to_owned()).unwrap();
        assert!(doc.frontmatter().is_empty());
        assert_eq!(doc.body(), "just text\n---\n");
    }

    #[test]
    fn missing_closing_fence_is_an_error() {
        let err = Document::parse("p.md", "---\ntitle = \"x\"\n".to_owned()).unwrap_err();
        assert!(matches!(err, BlogwareError::UnterminatedFrontmatter(_)));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = Document::parse("p.md", "---\ntitle = \n---\n".to_owned()).unwrap_err();
        assert!(matches!(err, BlogwareError::Frontmatter { .. }));
        assert_eq!(err.path(), Some(Path::new("p.md")));
    }

    #[test]
    fn frontmatter_deserializes_into_a_struct() {
        #[derive(Deserialize)]
        struct Meta {
            title: String,
            #[serde(default)]
            tags: Vec<String>,
        }

        let doc = Document::parse(
            "p.md",
            "---\ntitle = \"T\"\ntags = [\"a\", \"b\"]\n---\n".to_owned(),
        )
        .unwrap();
        let meta: Meta = doc.frontmatter_as().unwrap();
        assert_eq!(meta.title, "T");
        assert_eq!(meta.tags, ["a", "b"]);
    }
}
