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

//! Leaf iteration and dotted flattening of nested records.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Iterator over the leaf values of a record, depth first, in map order.
///
/// Nested mappings are descended into; everything else (scalars, null and
/// lists) is a leaf. A non-mapping root is yielded as its own single leaf.
pub struct NestedValues<'a> {
    stack: Vec<serde_json::map::Values<'a>>,
    root: Option<&'a Value>,
}

impl<'a> Iterator for NestedValues<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            return Some(root);
        }

        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Value::Object(map)) => self.stack.push(map.values()),
                Some(leaf) => return Some(leaf),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Leaf values of `record`.
pub fn nested_values(record: &Value) -> NestedValues<'_> {
    match record {
        Value::Object(map) => NestedValues {
            stack: vec![map.values()],
            root: None,
        },
        other => NestedValues {
            stack: Vec::new(),
            root: Some(other),
        },
    }
}

/// Flatten nested mappings into a single level keyed by dotted paths.
///
/// `{"a": {"b": 1}, "c": [1]}` becomes `{"a.b": 1, "c": [1]}`.
pub fn flatten_record(record: &Map<String, Value>) -> IndexMap<String, Value> {
    let mut flat = IndexMap::new();
    flatten_into(record, "", &mut flat);
    flat
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut IndexMap<String, Value>) {
    for (key, value) in map {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Object(inner) => flatten_into(inner, &dotted, out),
            other => {
                out.insert(dotted, other.clone());
            }
        }
    }
}
