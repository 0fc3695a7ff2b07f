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

//! Whitelist lines and their items.

use fancy_regex::Regex;

/// Split a configured line into its trimmed, comma-separated items.
pub fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|item| item.trim().to_string()).collect()
}

/// A conjunctive group of literal items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralLine {
    pub items: Vec<String>,
}

impl LiteralLine {
    pub fn parse(line: &str) -> Self {
        Self {
            items: split_line(line),
        }
    }
}

/// A whitelist pattern compiled case-insensitively, matched only at the
/// start of the text.
#[derive(Debug, Clone)]
pub struct PatternItem {
    source: String,
    regex: Regex,
}

impl PatternItem {
    /// Compile `source` as configured, only switching on case folding.
    pub fn compile(source: &str) -> Result<Self, Box<fancy_regex::Error>> {
        let regex = Regex::new(&format!("(?i){source}")).map_err(Box::new)?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches at the start of `text`.
    ///
    /// The leftmost match starts at offset 0 whenever a match there exists.
    pub fn matches_start(&self, text: &str) -> bool {
        match self.regex.find(text) {
            Ok(found) => found.is_some_and(|m| m.start() == 0),
            Err(e) => {
                tracing::warn!("Whitelist pattern '{}' failed on input: {e}", self.source);
                false
            }
        }
    }
}

/// A conjunctive group of pattern items.
#[derive(Debug, Clone)]
pub struct PatternLine {
    pub items: Vec<PatternItem>,
}

impl PatternLine {
    /// Compile every item of `line`; the first malformed item is returned
    /// with its error.
    pub fn parse(line: &str) -> Result<Self, (String, Box<fancy_regex::Error>)> {
        let items = split_line(line)
            .into_iter()
            .map(|item| PatternItem::compile(&item).map_err(|e| (item, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }
}
