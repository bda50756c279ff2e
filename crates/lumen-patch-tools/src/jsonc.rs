//! JSON-with-comments loader.
//!
//! The manifest and dump-update files allow whole-line `//` comments. Only
//! lines whose leading spaces are followed by `//` are recognized; inline and
//! block comments are not supported.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub fn strip_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| !line.trim_start_matches(' ').starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse(input: &str) -> Result<serde_json::Value> {
    let stripped = strip_comments(input);
    serde_json::from_str(&stripped).map_err(|e| Error::msg(format!("JSON parse error: {e}")))
}

pub fn load(path: &Path) -> Result<serde_json::Value> {
    let data = fs::read_to_string(path)
        .map_err(|e| Error::msg(format!("failed to read {}: {e}", path.display())))?;
    let stripped = strip_comments(&data);
    serde_json::from_str(&stripped)
        .map_err(|e| Error::msg(format!("JSON parse error in {}: {e}", path.display())))
}

pub fn load_as<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .map_err(|e| Error::msg(format!("failed to read {}: {e}", path.display())))?;
    let stripped = strip_comments(&data);
    serde_json::from_str(&stripped)
        .map_err(|e| Error::msg(format!("JSON parse error in {}: {e}", path.display())))
}
