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

//! `OutlierCrab` - scoring core for log-based outlier detection.
//!
//! - [`frontier`]: decision frontiers and the outlier predicate
//! - [`fields`]: dotted field access, sentence expansion, placeholders
//! - [`whitelist`]: literal and pattern whitelisting
//! - [`outlier`]: the outlier value object and asset extraction
//! - [`encoding`]: entropy, base64, hex, URL and address probes
//! - [`config`]: configuration files and immutable snapshots

pub mod config;
pub mod encoding;
pub mod fields;
pub mod frontier;
pub mod outlier;
pub mod whitelist;

pub use config::{ConfigSnapshot, Settings, SettingsStore};
pub use fields::{contains, render, resolve, sentences, Record, Sentence};
pub use frontier::{compute_frontier, is_outlier, FrontierError, Trigger, TriggerMethod, TriggerOn, Verdict};
pub use outlier::{extract_assets, AssetLabel, Outlier};
pub use whitelist::WhitelistRuleSet;
