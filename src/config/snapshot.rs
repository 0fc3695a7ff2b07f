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

use crate::config::{ConfigError, LoadedSettings, Settings};
use crate::outlier::{extract_assets, AssetLabel, AssetMapping, Outlier};
use crate::whitelist::WhitelistRuleSet;
use serde_json::Value;
use std::path::PathBuf;

/// Compiled, read-only configuration shared by all analyzers.
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    whitelist: WhitelistRuleSet,
    assets: AssetMapping,
    loaded_paths: Vec<PathBuf>,
    failed_paths: Vec<PathBuf>,
}

impl ConfigSnapshot {
    /// Compile settings that did not come from files.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Self::build(LoadedSettings {
            settings: settings.clone(),
            ..LoadedSettings::default()
        })
    }

    pub(crate) fn build(loaded: LoadedSettings) -> Result<Self, ConfigError> {
        let settings = loaded.settings;
        let whitelist = WhitelistRuleSet::from_lines(
            settings
                .whitelist_literals
                .iter()
                .map(|(name, line)| (name.as_str(), line.as_str())),
            settings
                .whitelist_regexps
                .iter()
                .map(|(name, line)| (name.as_str(), line.as_str())),
        )?;

        Ok(Self {
            whitelist,
            assets: settings.assets,
            loaded_paths: loaded.loaded_paths,
            failed_paths: loaded.failed_paths,
        })
    }

    pub const fn whitelist(&self) -> &WhitelistRuleSet {
        &self.whitelist
    }

    pub const fn assets(&self) -> &AssetMapping {
        &self.assets
    }

    pub fn loaded_paths(&self) -> &[PathBuf] {
        &self.loaded_paths
    }

    pub fn failed_paths(&self) -> &[PathBuf] {
        &self.failed_paths
    }

    pub fn is_whitelisted(&self, outlier: &Outlier, auxiliary: Option<&Value>) -> bool {
        outlier.is_whitelisted(&self.whitelist, auxiliary)
    }

    pub fn extract_assets(&self, record: &Value) -> Vec<AssetLabel> {
        extract_assets(record, &self.assets)
    }
}
