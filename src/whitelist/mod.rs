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

//! Whitelist matching.
//!
//! A rule set holds literal lines and pattern lines. Every item of a line
//! has to match for the line to match, and any matching line whitelists the
//! outlier. Items are checked against the outlier summary and, when given,
//! against every leaf value of an auxiliary record (list leaves contribute
//! each of their elements).

pub mod rule;

use crate::fields::{nested_values, scalar_to_string};
pub use rule::{split_line, LiteralLine, PatternItem, PatternLine};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum WhitelistError {
    #[error("invalid whitelist pattern '{pattern}' in rule '{rule}'")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// Compiled literal and pattern whitelist lines.
///
/// Built once from configuration and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct WhitelistRuleSet {
    literal_rules: Vec<LiteralLine>,
    regexp_rules: Vec<PatternLine>,
}

impl WhitelistRuleSet {
    /// Build a rule set from `(name, line)` entries of the literal and
    /// pattern sections. Names only appear in error messages.
    pub fn from_lines<'a, L, R>(literals: L, regexps: R) -> Result<Self, WhitelistError>
    where
        L: IntoIterator<Item = (&'a str, &'a str)>,
        R: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let literal_rules = literals
            .into_iter()
            .map(|(_, line)| LiteralLine::parse(line))
            .collect();

        let regexp_rules = regexps
            .into_iter()
            .map(|(name, line)| {
                PatternLine::parse(line).map_err(|(pattern, source)| WhitelistError::InvalidPattern {
                    rule: name.to_string(),
                    pattern,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            literal_rules,
            regexp_rules,
        })
    }

    pub fn literal_rules(&self) -> &[LiteralLine] {
        &self.literal_rules
    }

    pub fn regexp_rules(&self) -> &[PatternLine] {
        &self.regexp_rules
    }

    pub fn is_empty(&self) -> bool {
        self.literal_rules.is_empty() && self.regexp_rules.is_empty()
    }

    /// Whether an outlier with this `summary` (and optional auxiliary record)
    /// is whitelisted. Literal lines are tried before pattern lines.
    pub fn is_whitelisted(&self, summary: &str, auxiliary: Option<&Value>) -> bool {
        let candidates = auxiliary.map(auxiliary_candidates).unwrap_or_default();

        let literal_hit = self.literal_rules.iter().any(|line| {
            line.items
                .iter()
                .all(|item| literal_matches(item, summary, &candidates))
        });
        if literal_hit {
            return true;
        }

        self.regexp_rules.iter().any(|line| {
            line.items
                .iter()
                .all(|item| pattern_matches(item, summary, &candidates))
        })
    }
}

fn literal_matches(item: &str, summary: &str, candidates: &[String]) -> bool {
    let item = item.trim();
    summary.trim() == item || candidates.iter().any(|candidate| candidate == item)
}

fn pattern_matches(item: &PatternItem, summary: &str, candidates: &[String]) -> bool {
    item.matches_start(summary) || candidates.iter().any(|candidate| item.matches_start(candidate))
}

/// Trimmed text of every leaf scalar and every element of every leaf list.
fn auxiliary_candidates(record: &Value) -> Vec<String> {
    let mut candidates = Vec::new();
    for leaf in nested_values(record) {
        match leaf {
            Value::Array(items) => {
                for item in items {
                    let text = scalar_to_string(item).unwrap_or_else(|| item.to_string());
                    candidates.push(text.trim().to_string());
                }
            }
            other => {
                if let Some(text) = scalar_to_string(other) {
                    candidates.push(text.trim().to_string());
                }
            }
        }
    }
    candidates
}
