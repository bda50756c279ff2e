//! Patch manifest model and loader.
//!
//! The manifest is a comment-JSON array; each entry declares one patch file
//! the output tree should contain and how to obtain it. Validation is
//! fail-fast: the first malformed entry aborts the load with the offending
//! entry quoted.

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::jsonc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// Fetched from the review system by ID, named after a human-readable
    /// title.
    Phabricator {
        id: String,
        name: String,
        replaces: Vec<(String, String)>,
    },
    /// Fetched from a direct URL into a destination subdirectory.
    Remote {
        url: String,
        dest: String,
        replaces: Vec<(String, String)>,
    },
    /// Maintained by hand inside the output tree; never fetched.
    Local { path: String },
}

/// Lowercase with spaces replaced by underscores; used to derive the on-disk
/// filename for review-system patches.
pub fn slug(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

fn required_str(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

fn parse_replaces(entry: &Value) -> Result<Vec<(String, String)>> {
    let Some(v) = entry.get("replaces") else {
        return Ok(Vec::new());
    };
    let Some(obj) = v.as_object() else {
        return Err(Error::msg(format!(
            "'replaces' must be an object of string pairs: {entry}"
        )));
    };
    let mut out = Vec::with_capacity(obj.len());
    for (find, replace) in obj {
        let Some(replace) = replace.as_str() else {
            return Err(Error::msg(format!(
                "'replaces' value for '{find}' must be a string: {entry}"
            )));
        };
        out.push((find.clone(), replace.to_string()));
    }
    Ok(out)
}

fn parse_entry(entry: &Value) -> Result<ManifestEntry> {
    let kind = entry.get("type").and_then(Value::as_str).unwrap_or("");
    match kind {
        "phabricator" => {
            let (Some(id), Some(name)) = (required_str(entry, "id"), required_str(entry, "name"))
            else {
                return Err(Error::msg(format!(
                    "patch entry missing 'id' or 'name': {entry}"
                )));
            };
            Ok(ManifestEntry::Phabricator {
                id,
                name,
                replaces: parse_replaces(entry)?,
            })
        }
        "patch" => {
            let (Some(url), Some(dest)) = (required_str(entry, "url"), required_str(entry, "dest"))
            else {
                return Err(Error::msg(format!(
                    "patch entry missing 'url' or 'dest': {entry}"
                )));
            };
            Ok(ManifestEntry::Remote {
                url,
                dest,
                replaces: parse_replaces(entry)?,
            })
        }
        "local" => {
            let Some(path) = required_str(entry, "path") else {
                return Err(Error::msg(format!("local entry missing 'path': {entry}")));
            };
            Ok(ManifestEntry::Local { path })
        }
        other => Err(Error::msg(format!("unknown patch type '{other}': {entry}"))),
    }
}

pub fn load(path: &Path) -> Result<Vec<ManifestEntry>> {
    let doc = jsonc::load(path)?;
    let Some(entries) = doc.as_array() else {
        return Err(Error::msg(format!(
            "manifest {} must be a JSON array of patch entries",
            path.display()
        )));
    };
    entries.iter().map(parse_entry).collect()
}
