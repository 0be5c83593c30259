//! Static assets and the ordered content set

use std::collections::HashSet;

use deploy_fs::NormalizedPath;

/// Extensions accepted as static content.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "html", "css", "js", "json", "txt", "md", "svg", "png", "jpg", "jpeg", "gif", "ico",
];

/// Subset of [`ALLOWED_EXTENSIONS`] stored base64-encoded.
pub const BINARY_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "ico"];

/// How an asset's payload is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// UTF-8 text, stored verbatim
    Text,
    /// Raw bytes, stored as base64 text
    Binary,
}

impl AssetKind {
    /// Classify a path by extension, or `None` if it is not allow-listed.
    pub fn classify(path: &NormalizedPath) -> Option<Self> {
        let ext = path.extension()?;
        if BINARY_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Binary)
        } else if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// One collected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAsset {
    /// Path relative to the project directory, forward slashes
    pub path: NormalizedPath,
    pub kind: AssetKind,
    /// Verbatim text for [`AssetKind::Text`], base64 for [`AssetKind::Binary`]
    pub content: String,
}

/// Assets in discovery order, keyed uniquely by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSet {
    assets: Vec<StaticAsset>,
    seen: HashSet<String>,
}

impl ContentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an asset. Returns `false` (and keeps the first) on a duplicate path.
    pub fn insert(&mut self, asset: StaticAsset) -> bool {
        if !self.seen.insert(asset.path.as_str().to_string()) {
            return false;
        }
        self.assets.push(asset);
        true
    }

    pub fn get(&self, path: &str) -> Option<&StaticAsset> {
        self.assets.iter().find(|a| a.path.as_str() == path)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaticAsset> {
        self.assets.iter()
    }

    /// Relative paths in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.path.as_str())
    }
}

impl<'a> IntoIterator for &'a ContentSet {
    type Item = &'a StaticAsset;
    type IntoIter = std::slice::Iter<'a, StaticAsset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
