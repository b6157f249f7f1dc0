//! Inline icons: which tokens in a message are replaced by which image.

mod generate;

pub use generate::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Supplies the image that stands in for a token inside message text.
///
/// Implementations only answer questions; a token that resolves to a missing
/// file is not an error; the layout reserves its box and draws nothing.
pub trait IconProvider {
    /// Every token that should be recognised in message text
    fn tokens(&self) -> Vec<&str>;

    fn resolve(&self, token: &str) -> Option<PathBuf>;

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Token to image path mapping, built once and then only read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IconRegistry {
    icons: BTreeMap<String, PathBuf>,
}

impl IconRegistry {
    /// Build a registry from `(token, path)` pairs. Empty tokens are dropped; later
    /// duplicates replace earlier ones. Paths that don't exist yet are kept but
    /// warned about, since the icons may be generated after the registry is built.
    pub fn new<I, K, P>(icons: I) -> IconRegistry
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        let mut map = BTreeMap::new();
        for (token, path) in icons {
            let token = token.into();
            let path = path.into();
            if token.is_empty() {
                warn!(path = %path.display(), "ignoring icon with an empty token");
                continue;
            }
            if !path.is_file() {
                warn!(%token, path = %path.display(), "icon image not found, token will render as a blank box");
            }
            map.insert(token, path);
        }
        IconRegistry { icons: map }
    }

    /// The default icon set, looked up in `dir`
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> IconRegistry {
        let dir = dir.as_ref();
        IconRegistry::new(
            IconShape::ALL
                .iter()
                .map(|shape| (shape.token(), dir.join(shape.file_name()))),
        )
    }

    pub fn get(&self, token: &str) -> Option<&Path> {
        self.icons.get(token).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.icons.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

impl IconProvider for IconRegistry {
    fn tokens(&self) -> Vec<&str> {
        self.icons.keys().map(String::as_str).collect()
    }

    fn resolve(&self, token: &str) -> Option<PathBuf> {
        self.icons.get(token).cloned()
    }
}
