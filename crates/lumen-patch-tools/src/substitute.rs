use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Apply ordered find/replace rules to a file.
///
/// Every rule is validated and applied in memory, in declared order, and the
/// file is written back once at the end. A rule whose find-string is absent
/// from the current content aborts the whole operation without persisting any
/// partial replacement; that usually means the rule went stale against a
/// refreshed upstream patch.
pub fn apply_replacements(path: &Path, rules: &[(String, String)]) -> Result<()> {
    if rules.is_empty() {
        return Ok(());
    }
    let mut content = fs::read_to_string(path)
        .map_err(|e| Error::msg(format!("failed to read {}: {e}", path.display())))?;
    for (find, replace) in rules {
        if !content.contains(find.as_str()) {
            return Err(Error::msg(format!(
                "replace string '{}' not found in {}",
                find,
                path.display()
            )));
        }
        content = content.replace(find.as_str(), replace.as_str());
    }
    fs::write(path, content)
        .map_err(|e| Error::msg(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(f, r)| (f.to_string(), r.to_string()))
            .collect()
    }

    #[test]
    fn replaces_all_occurrences_in_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let p = tmp.path().join("a.patch");
        fs::write(&p, "foo bar foo").expect("write");
        apply_replacements(&p, &rules(&[("foo", "baz"), ("bar", "qux")])).expect("apply");
        assert_eq!(fs::read_to_string(&p).expect("read"), "baz qux baz");
    }

    #[test]
    fn later_rule_can_match_earlier_output() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let p = tmp.path().join("a.patch");
        fs::write(&p, "one").expect("write");
        apply_replacements(&p, &rules(&[("one", "two"), ("two", "three")])).expect("apply");
        assert_eq!(fs::read_to_string(&p).expect("read"), "three");
    }

    #[test]
    fn missing_find_string_persists_nothing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let p = tmp.path().join("a.patch");
        fs::write(&p, "foo bar").expect("write");
        let err = apply_replacements(&p, &rules(&[("foo", "baz"), ("absent", "x")]))
            .expect_err("must fail");
        assert!(err.to_string().contains("'absent' not found"));
        // The first rule matched but the file must be untouched.
        assert_eq!(fs::read_to_string(&p).expect("read"), "foo bar");
    }

    #[test]
    fn empty_rule_list_is_a_no_op() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let p = tmp.path().join("missing.patch");
        // No rules means the file is never even opened.
        apply_replacements(&p, &[]).expect("no-op");
    }
}
