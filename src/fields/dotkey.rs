// OutlierCrab - GPL-3.0-or-later
// This file is part of OutlierCrab.
//
// Copyright (C) 2026 OutlierCrab contributors
//
// OutlierCrab is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// OutlierCrab is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with OutlierCrab.  If not, see <https://www.gnu.org/licenses/>.

//! Dotted key resolution.
//!
//! `"OsqueryFilter.process_name"` walks into the `OsqueryFilter` mapping and
//! returns its `process_name` entry. In case-insensitive mode every segment
//! is compared against the lower-cased sibling keys, and the first key in
//! map order wins when several siblings fold to the same text.

use serde_json::{Map, Value};

/// A dotted key that does not resolve against a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("key '{key}' not found in record")]
pub struct KeyNotFound {
    pub key: String,
}

/// Resolve `dotted_key` against `record`.
///
/// Fails when a segment is absent or when the walk reaches a non-mapping
/// value before the last segment.
pub fn resolve<'a>(
    record: &'a Value,
    dotted_key: &str,
    case_sensitive: bool,
) -> Result<&'a Value, KeyNotFound> {
    let mut current = record;

    for segment in dotted_key.split('.') {
        let found = current.as_object().and_then(|map| {
            if case_sensitive {
                map.get(segment)
            } else {
                lookup_folded(map, segment)
            }
        });

        current = found.ok_or_else(|| KeyNotFound {
            key: dotted_key.to_string(),
        })?;
    }

    Ok(current)
}

/// Whether `dotted_key` resolves against `record`.
#[must_use]
pub fn contains(record: &Value, dotted_key: &str, case_sensitive: bool) -> bool {
    resolve(record, dotted_key, case_sensitive).is_ok()
}

fn lookup_folded<'a>(map: &'a Map<String, Value>, segment: &str) -> Option<&'a Value> {
    let folded = segment.to_lowercase();
    map.iter()
        .find(|(key, _)| key.to_lowercase() == folded)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested() {
        let record = json!({"OsqueryFilter": {"process_name": "cmd.exe"}});
        let value = resolve(&record, "OsqueryFilter.process_name", true).unwrap();
        assert_eq!(value, &json!("cmd.exe"));
    }

    #[test]
    fn test_resolve_case_sensitive_miss() {
        let record = json!({"OsqueryFilter": {"process_name": "cmd.exe"}});
        let err = resolve(&record, "osqueryfilter.PROCESS_NAME", true).unwrap_err();
        assert_eq!(err.key, "osqueryfilter.PROCESS_NAME");
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let record = json!({"osqueryfilter": {"prOcEss_nAme": "cmd.exe"}});
        let value = resolve(&record, "OsqueryFilter.process_name", false).unwrap();
        assert_eq!(value, &json!("cmd.exe"));
    }

    #[test]
    fn test_case_insensitive_collision_takes_first() {
        let record = json!({"User": "first", "user": "second"});
        assert_eq!(resolve(&record, "USER", false).unwrap(), &json!("first"));
        assert_eq!(resolve(&record, "user", true).unwrap(), &json!("second"));
    }

    #[test]
    fn test_case_insensitive_final_sigma() {
        let record = json!({"ΟΔΟΣ": "x"});
        assert_eq!(resolve(&record, "ΟΔΟΣ", false).unwrap(), &json!("x"));
        assert_eq!(resolve(&record, "οδος", false).unwrap(), &json!("x"));
        assert!(contains(&record, "Οδος", false));
    }

    #[test]
    fn test_resolve_through_scalar_fails() {
        let record = json!({"host": "h1"});
        assert!(resolve(&record, "host.name", true).is_err());
        assert!(resolve(&record, "host.name", false).is_err());
    }

    #[test]
    fn test_resolve_returns_lists_and_maps() {
        let record = json!({"a": {"b": [1, 2]}});
        assert_eq!(resolve(&record, "a.b", true).unwrap(), &json!([1, 2]));
        assert_eq!(resolve(&record, "a", true).unwrap(), &json!({"b": [1, 2]}));
    }

    #[test]
    fn test_contains() {
        let record = json!({"Meta": {"Host": null}});
        assert!(contains(&record, "meta.host", false));
        assert!(!contains(&record, "meta.host", true));
        assert!(!contains(&record, "meta.user", false));
    }
}
