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

//! `{field.name}` placeholder substitution for outlier reasons and summaries.

use crate::fields::dotkey::resolve;
use crate::fields::scalar_to_string;
use fancy_regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

#[allow(clippy::unwrap_used)]
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^\}]*)\}").unwrap());

/// Replace every `{name}` in `template` with the value of `name` in `record`.
///
/// Names resolve case-insensitively. Lists of strings are joined with `", "`,
/// any other list renders as `complex field <name>` and a missing field as
/// `field <name> not found in event`. Rendering never fails.
pub fn render(template: &str, record: &Value) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut last_end = 0;

    for captures in PLACEHOLDER_PATTERN.captures_iter(template) {
        let captures = match captures {
            Ok(captures) => captures,
            Err(e) => {
                tracing::warn!("Placeholder scan stopped early: {e}");
                break;
            }
        };
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        rendered.push_str(&template[last_end..whole.start()]);
        rendered.push_str(&substitution(name.as_str(), record));
        last_end = whole.end();
    }

    rendered.push_str(&template[last_end..]);
    rendered
}

fn substitution(field_name: &str, record: &Value) -> String {
    match resolve(record, field_name, false) {
        Ok(Value::Array(items)) => {
            let strings: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            strings.map_or_else(|| format!("complex field {field_name}"), |s| s.join(", "))
        }
        Ok(value) => scalar_to_string(value).unwrap_or_else(|| value.to_string()),
        Err(_) => format!("field {field_name} not found in event"),
    }
}
