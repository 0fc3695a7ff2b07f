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

//! Structured field access over nested event records.
//!
//! Records are plain `serde_json::Value` trees. Maps keep insertion order
//! (the `preserve_order` feature), which makes case-insensitive lookups and
//! leaf iteration reproducible.

pub mod dotkey;
pub mod nested;
pub mod placeholder;
pub mod sentence;

pub use dotkey::{contains, resolve, KeyNotFound};
pub use nested::{flatten_record, nested_values};
pub use placeholder::render;
pub use sentence::{flatten_value, sentences, Sentence};

use serde_json::Value;

/// A nested event record.
pub type Record = Value;

/// String form of a scalar value, `None` for lists, maps and null.
///
/// Strings are returned verbatim (no JSON quoting).
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whether a value is a scalar (string, number or bool).
pub const fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&json!("abc")), Some("abc".to_string()));
        assert_eq!(scalar_to_string(&json!(42)), Some("42".to_string()));
        assert_eq!(scalar_to_string(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(scalar_to_string(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_to_string(&json!(null)), None);
        assert_eq!(scalar_to_string(&json!([1])), None);
        assert_eq!(scalar_to_string(&json!({"a": 1})), None);
    }
}
