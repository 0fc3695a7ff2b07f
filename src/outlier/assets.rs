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

//! Asset labels identifying the entity an outlier is about.

use crate::fields::{contains, sentences};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Configured `field dotkey -> label` pairs, in configuration order.
pub type AssetMapping = IndexMap<String, String>;

/// One extracted asset, rendered as `label: value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetLabel {
    pub label: String,
    pub value: String,
}

impl fmt::Display for AssetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Extract the assets present in `record`.
///
/// Fields are matched case-insensitively. List-valued fields produce one
/// asset per element; empty values are skipped.
pub fn extract_assets(record: &Value, mapping: &AssetMapping) -> Vec<AssetLabel> {
    let mut assets = Vec::new();

    for (field_name, label) in mapping {
        if !contains(record, field_name, false) {
            continue;
        }

        for sentence in sentences(record, &[field_name.as_str()]) {
            let Some(value) = sentence.into_iter().next() else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            assets.push(AssetLabel {
                label: label.clone(),
                value,
            });
        }
    }

    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(pairs: &[(&str, &str)]) -> AssetMapping {
        pairs
            .iter()
            .map(|(field, label)| ((*field).to_string(), (*label).to_string()))
            .collect()
    }

    #[test]
    fn test_extract_assets() {
        let record = json!({
            "Meta": {"Hostname": "WIN-ABC"},
            "user": ["alice", "", "bob"],
            "process": {"name": ""}
        });
        let assets = extract_assets(
            &record,
            &mapping(&[
                ("meta.hostname", "hostname"),
                ("user", "user"),
                ("process.name", "process"),
                ("missing.field", "nothing"),
            ]),
        );
        let rendered: Vec<String> = assets.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["hostname: WIN-ABC", "user: alice", "user: bob"]
        );
    }

    #[test]
    fn test_unflattenable_field_skipped() {
        let record = json!({"host": {"name": "h1"}, "ids": [[[1, 2]]]});
        let assets = extract_assets(&record, &mapping(&[("host", "host"), ("ids", "id")]));
        assert!(assets.is_empty());
    }

    #[test]
    fn test_configuration_order_kept() {
        let record = json!({"a": "1", "b": "2"});
        let assets = extract_assets(&record, &mapping(&[("b", "second"), ("a", "first")]));
        assert_eq!(assets[0].to_string(), "second: 2");
        assert_eq!(assets[1].to_string(), "first: 1");
    }
}
