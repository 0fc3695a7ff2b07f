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

//! Expansion of records into model input sentences.
//!
//! A sentence is one concrete combination of field values. List-valued
//! fields fan out into one branch per element:
//!
//! ```text
//! fields:  {hostname: [WIN-DRA, WIN-EVB], username: draman}
//! format:  [hostname, username]
//! output:  [[WIN-DRA, draman], [WIN-EVB, draman]]
//! ```

use crate::fields::dotkey::resolve;
use crate::fields::{is_scalar, scalar_to_string};
use serde_json::Value;

/// One concrete value combination, one entry per requested field.
pub type Sentence = Vec<String>;

/// Flatten a single value into sentence text.
///
/// Scalars are cast to text and lists of scalars are joined with `" - "`.
/// Null, mappings and lists holding lists or mappings cannot be flattened.
pub fn flatten_value(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            if items.iter().any(|item| item.is_array() || item.is_object()) {
                return None;
            }
            let parts: Vec<String> = items.iter().map(list_item_to_string).collect();
            Some(parts.join(" - "))
        }
        other => scalar_to_string(other),
    }
}

/// Scalar list elements, with null rendered as `null`.
fn list_item_to_string(item: &Value) -> String {
    if is_scalar(item) {
        scalar_to_string(item).unwrap_or_default()
    } else {
        item.to_string()
    }
}

/// Expand `record` into sentences following `field_names`.
///
/// Field names are resolved case-insensitively. For a list-valued field the
/// list elements form the outer loop and the existing partial sentences the
/// inner loop. Sentences holding a value that cannot be flattened, or built
/// from a field that is missing, are dropped. Duplicates are kept.
pub fn sentences(record: &Value, field_names: &[&str]) -> Vec<Sentence> {
    let mut partials: Vec<Vec<Option<String>>> = vec![Vec::new()];

    for field_name in field_names {
        partials = match resolve(record, field_name, false) {
            Ok(Value::Array(items)) => items
                .iter()
                .flat_map(|item| {
                    let flattened = flatten_value(item);
                    partials.iter().map(move |partial| {
                        let mut branch = partial.clone();
                        branch.push(flattened.clone());
                        branch
                    })
                })
                .collect(),
            Ok(value) => {
                let flattened = flatten_value(value);
                partials
                    .into_iter()
                    .map(|mut partial| {
                        partial.push(flattened.clone());
                        partial
                    })
                    .collect()
            }
            Err(_) => {
                tracing::trace!("Field '{field_name}' not present, no sentences built");
                return Vec::new();
            }
        };
    }

    partials
        .into_iter()
        .filter_map(|partial| partial.into_iter().collect::<Option<Sentence>>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_value() {
        assert_eq!(flatten_value(&json!("a")), Some("a".to_string()));
        assert_eq!(flatten_value(&json!(3)), Some("3".to_string()));
        assert_eq!(flatten_value(&json!([1, 2, 3])), Some("1 - 2 - 3".to_string()));
        assert_eq!(flatten_value(&json!([])), Some(String::new()));
        assert_eq!(flatten_value(&json!([1, [2]])), None);
        assert_eq!(flatten_value(&json!([{"a": 1}])), None);
        assert_eq!(flatten_value(&json!({"a": 1})), None);
        assert_eq!(flatten_value(&json!(null)), None);
    }

    #[test]
    fn test_list_and_scalar() {
        let record = json!({"user": ["a", "b"], "host": "h1"});
        assert_eq!(
            sentences(&record, &["user", "host"]),
            vec![vec!["a", "h1"], vec!["b", "h1"]]
        );
    }

    #[test]
    fn test_cross_product_order() {
        let record = json!({"user": ["a", "b"], "port": [1, 2]});
        assert_eq!(
            sentences(&record, &["user", "port"]),
            vec![
                vec!["a", "1"],
                vec!["b", "1"],
                vec!["a", "2"],
                vec!["b", "2"],
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let record = json!({"user": ["a", "a"]});
        assert_eq!(sentences(&record, &["user"]), vec![vec!["a"], vec!["a"]]);
    }

    #[test]
    fn test_unresolvable_elements_dropped() {
        let record = json!({"user": ["a", ["x", ["y"]], {"k": "v"}], "host": "h1"});
        assert_eq!(sentences(&record, &["user", "host"]), vec![vec!["a", "h1"]]);

        let record = json!({"user": {"name": "a"}});
        assert!(sentences(&record, &["user"]).is_empty());
    }

    #[test]
    fn test_scalar_list_element_is_joined() {
        let record = json!({"ports": [[80, 443], 22]});
        assert_eq!(sentences(&record, &["ports"]), vec![vec!["80 - 443"], vec!["22"]]);
    }

    #[test]
    fn test_missing_field_yields_nothing() {
        let record = json!({"user": "a"});
        assert!(sentences(&record, &["user", "host"]).is_empty());
    }

    #[test]
    fn test_case_insensitive_dotted_fields() {
        let record = json!({"Meta": {"Host": "h1"}, "user": "a"});
        assert_eq!(sentences(&record, &["meta.host", "USER"]), vec![vec!["h1", "a"]]);
    }

    #[test]
    fn test_empty_list_yields_nothing() {
        let record = json!({"user": [], "host": "h1"});
        assert!(sentences(&record, &["user", "host"]).is_empty());
    }

    #[test]
    fn test_no_fields_yields_one_empty_sentence() {
        let record = json!({"user": "a"});
        assert_eq!(sentences(&record, &[]), vec![Vec::<String>::new()]);
    }
}
