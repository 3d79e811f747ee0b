//! Application-shell asset registry.
//!
//! The registry is the ordered list of relative paths that make up the
//! shell. It is consumed as data: the precache step fetches every entry
//! and the classifier matches request paths against it.

use serde::{Deserialize, Serialize};

/// Paths shipped with the cocktail PWA shell.
pub const DEFAULT_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./main.js",
    "./styles/main.css",
    "./scripts/app.js",
    "./styles/200x300.svg",
    "./images/icons/192.png",
    "./images/icons/512.png",
    "./manifest.json",
];

/// How a request path is compared against registry entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Request path ends with the normalized entry.
    #[default]
    Suffix,
    /// Request path equals the normalized entry.
    Exact,
}

/// Ordered sequence of shell asset paths.
///
/// Duplicates are tolerated; order carries no meaning beyond enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRegistry {
    entries: Vec<String>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ASSETS.iter().copied())
    }
}

impl AssetRegistry {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { entries: entries.into_iter().map(Into::into).collect() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Membership test after `./` normalization on both sides.
    pub fn contains(&self, path: &str) -> bool {
        let wanted = trim_root(normalize(path));
        self.iter().any(|entry| trim_root(normalize(entry)) == wanted)
    }

    /// First entry matching a request path, if any.
    pub fn find_match(&self, request_path: &str, mode: MatchMode) -> Option<&str> {
        self.iter().find(|entry| path_matches(request_path, entry, mode))
    }
}

/// Strip a single leading `./` from an entry.
pub fn normalize(entry: &str) -> &str {
    entry.strip_prefix("./").unwrap_or(entry)
}

fn trim_root(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Whether `request_path` (a URL path, always starting with `/`) is served
/// by the registry entry `entry`.
///
/// The root entry (`./` or `/`) only ever matches `/`; every path ends with
/// the empty string, so a suffix test on it would claim the whole origin.
pub fn path_matches(request_path: &str, entry: &str, mode: MatchMode) -> bool {
    let entry = normalize(entry);
    if trim_root(entry).is_empty() {
        return request_path == "/";
    }

    match mode {
        MatchMode::Suffix => request_path.ends_with(entry),
        MatchMode::Exact => trim_root(request_path) == trim_root(entry),
    }
}
