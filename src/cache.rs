//! Fix-up cache — hand-corrected replacements for lines the grammar cannot
//! parse.
//!
//! The cache is a JSON file of verbatim line matches:
//!
//! ```json
//! {"lines": [{"line": "void Broken(...", "replacement": "void Fixed(..."}]}
//! ```
//!
//! The driver consults it only after a grammar candidate failed; an entry
//! without a replacement merely marks the line as known-bad.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct FixupCache {
    lines: Vec<FixupEntry>,
}

#[derive(Debug, Deserialize)]
struct FixupEntry {
    line: String,
    #[serde(default)]
    replacement: Option<String>,
}

impl FixupCache {
    /// Load the cache from a JSON file.
    pub fn load(path: &Path) -> Result<FixupCache> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read cache file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("malformed cache file: {}", path.display()))
    }

    /// Hand-corrected replacement for a line, if one is cached.
    pub fn replacement(&self, line: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|entry| entry.line == line)
            .and_then(|entry| entry.replacement.as_deref())
    }
}

#[cfg(test)]
impl FixupCache {
    pub fn from_entries(entries: Vec<(String, String)>) -> FixupCache {
        FixupCache {
            lines: entries
                .into_iter()
                .map(|(line, replacement)| FixupEntry {
                    line,
                    replacement: Some(replacement),
                })
                .collect(),
        }
    }
}
