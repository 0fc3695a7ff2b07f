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

//! The outlier value object handed from analyzers to the indexer.

pub mod assets;
pub mod wrap;

pub use assets::{extract_assets, AssetLabel, AssetMapping};

use crate::whitelist::WhitelistRuleSet;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Column width summaries are wrapped to.
pub const DEFAULT_SUMMARY_WIDTH: usize = 150;

/// One detected anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outlier {
    types: Vec<String>,
    reason: String,
    summary: String,
}

impl Outlier {
    /// `outlier_type` may list several types separated by commas, for
    /// example `"malware,powershell"`. Segments are kept as written.
    pub fn new(outlier_type: &str, reason: &str, summary: &str) -> Self {
        Self::with_width(outlier_type, reason, summary, DEFAULT_SUMMARY_WIDTH)
    }

    pub fn with_width(outlier_type: &str, reason: &str, summary: &str, width: usize) -> Self {
        Self {
            types: outlier_type.split(',').map(str::to_string).collect(),
            reason: reason.to_string(),
            summary: wrap::fill(summary, width),
        }
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The wrapped summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Whether `rules` suppress this outlier, also checking the values of
    /// `auxiliary` (typically the event fields) when given.
    pub fn is_whitelisted(&self, rules: &WhitelistRuleSet, auxiliary: Option<&Value>) -> bool {
        rules.is_whitelisted(&self.summary, auxiliary)
    }

    /// Every field as an array, ready for bulk indexing.
    pub fn to_field_arrays(&self) -> IndexMap<String, Vec<String>> {
        let mut fields = IndexMap::with_capacity(3);
        fields.insert("type".to_string(), self.types.clone());
        fields.insert("reason".to_string(), vec![self.reason.clone()]);
        fields.insert("summary".to_string(), vec![self.summary.clone()]);
        fields
    }
}

impl fmt::Display for Outlier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "=======")?;
        writeln!(f, "outlier")?;
        writeln!(f, "=======")?;
        writeln!(f, "type\t -> {:?}", self.types)?;
        writeln!(f, "reason\t -> {}", self.reason)?;
        writeln!(f, "summary\t -> {}", self.summary)
    }
}
