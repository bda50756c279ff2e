//! Remote-settings dump maintenance.
//!
//! Each update file under the updates directory names records to drop from
//! the engine's dump of the same filename. The dump is rewritten in place;
//! every top-level field other than `data` and `timestamp` passes through
//! untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::jsonc;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DumpUpdates {
    pub remove: RemoveRules,
    pub timestamp: Option<Value>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RemoveRules {
    pub identifiers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub updates_dir: PathBuf,
    pub dumps_dir: PathBuf,
}

/// A rule ending in `*` matches any identifier sharing its prefix; anything
/// else must match exactly.
pub fn rule_matches(rule: &str, identifier: &str) -> bool {
    match rule.strip_suffix('*') {
        Some(prefix) => identifier.starts_with(prefix),
        None => identifier == rule,
    }
}

/// Drop every `data` entry whose identifier matches a removal rule, keep all
/// other top-level fields in their original order, and take `timestamp` from
/// the updates file when present.
pub fn merge_dumps(original: &Value, updates: &DumpUpdates) -> Value {
    let kept: Vec<Value> = original
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter(|entry| {
            let identifier = entry
                .get("identifier")
                .and_then(Value::as_str)
                .unwrap_or("");
            !updates
                .remove
                .identifiers
                .iter()
                .any(|rule| rule_matches(rule, identifier))
        })
        .cloned()
        .collect();

    let mut out = serde_json::Map::new();
    out.insert("data".to_string(), Value::Array(kept));
    if let Some(obj) = original.as_object() {
        for (k, v) in obj {
            if k != "data" {
                out.insert(k.clone(), v.clone());
            }
        }
    }
    if let Some(ts) = updates.timestamp.clone() {
        out.insert("timestamp".to_string(), ts);
    }
    Value::Object(out)
}

fn write_dump(path: &Path, dump: &Value) -> Result<()> {
    // 2-space indent, non-ASCII characters written literally.
    let s = serde_json::to_string_pretty(dump)
        .map_err(|e| Error::msg(format!("json encode error: {e}")))?;
    fs::write(path, s).map_err(|e| Error::msg(format!("failed to write {}: {e}", path.display())))
}

/// Merge every `*.json` updates file into its same-named original dump.
/// Returns the rewritten dump paths. A missing original is fatal: there is
/// nothing to merge into.
pub fn update_dumps(opts: &MergeOptions) -> Result<Vec<PathBuf>> {
    let mut names: Vec<String> = fs::read_dir(&opts.updates_dir)
        .map_err(|e| Error::msg(format!("failed to read {}: {e}", opts.updates_dir.display())))?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().to_string_lossy().into_owned();
            name.ends_with(".json").then_some(name)
        })
        .collect();
    names.sort();

    let mut updated = Vec::with_capacity(names.len());
    for name in names {
        let updates: DumpUpdates = jsonc::load_as(&opts.updates_dir.join(&name))?;
        let original_path = opts.dumps_dir.join(&name);
        if !original_path.exists() {
            return Err(Error::msg(format!(
                "original dump file not found: {}",
                original_path.display()
            )));
        }
        // Originals may carry comment lines of their own.
        let original = jsonc::load(&original_path)?;
        let merged = merge_dumps(&original, &updates);
        write_dump(&original_path, &merged)?;
        println!("Updated dump: {name}");
        updated.push(original_path);
    }
    Ok(updated)
}
