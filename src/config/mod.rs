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

//! Configuration files and the snapshots built from them.
//!
//! Configuration is read from one or more JSON files. Each published
//! [`ConfigSnapshot`] is immutable; [`SettingsStore::reload`] builds a fresh
//! one and swaps it in, so readers holding the previous snapshot are never
//! disturbed.

pub mod snapshot;

pub use snapshot::ConfigSnapshot;

use crate::whitelist::WhitelistError;
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("none of the configuration files could be read: {0:?}")]
    NothingLoaded(Vec<PathBuf>),

    #[error(transparent)]
    Whitelist(#[from] WhitelistError),
}

/// Raw configuration sections, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Rule name -> comma-separated literal items
    #[serde(default)]
    pub whitelist_literals: IndexMap<String, String>,

    /// Rule name -> comma-separated patterns
    #[serde(default)]
    pub whitelist_regexps: IndexMap<String, String>,

    /// Field dotkey -> asset label
    #[serde(default)]
    pub assets: IndexMap<String, String>,
}

impl Settings {
    /// Default configuration file location.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("outliercrab").join("config.json"))
    }

    pub fn from_json(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `other` on top of `self`. Entries with an existing name keep
    /// their position and take the new value.
    pub fn merge(&mut self, other: Self) {
        self.whitelist_literals.extend(other.whitelist_literals);
        self.whitelist_regexps.extend(other.whitelist_regexps);
        self.assets.extend(other.assets);
    }
}

/// Merged settings plus which files contributed.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub loaded_paths: Vec<PathBuf>,
    pub failed_paths: Vec<PathBuf>,
}

/// Read and merge `paths` in order.
///
/// Unreadable files are skipped and reported as failed; a file that reads
/// but does not parse is an error. Failing to read every file is an error
/// as well.
pub fn read_settings(paths: &[PathBuf]) -> Result<LoadedSettings, ConfigError> {
    let mut loaded = LoadedSettings::default();

    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::debug!("Loading configuration from {path:?}");
                loaded.settings.merge(Settings::from_json(path, &contents)?);
                loaded.loaded_paths.push(path.clone());
            }
            Err(e) => {
                tracing::warn!("Could not read configuration file {path:?}: {e}");
                loaded.failed_paths.push(path.clone());
            }
        }
    }

    if loaded.loaded_paths.is_empty() && !paths.is_empty() {
        return Err(ConfigError::NothingLoaded(loaded.failed_paths));
    }

    Ok(loaded)
}

/// Holder of the current configuration snapshot.
pub struct SettingsStore {
    paths: Vec<PathBuf>,
    current: ArcSwap<ConfigSnapshot>,
}

impl SettingsStore {
    /// Load `paths`, falling back to [`Settings::config_path`] when none are
    /// given. A missing default file yields an empty configuration.
    pub fn load(paths: Vec<PathBuf>) -> Result<Self, ConfigError> {
        let paths = if paths.is_empty() {
            Settings::config_path()
                .filter(|path| path.exists())
                .into_iter()
                .collect()
        } else {
            paths
        };

        if paths.is_empty() {
            tracing::info!("No configuration found, using defaults");
        }

        let snapshot = ConfigSnapshot::build(read_settings(&paths)?)?;
        tracing::info!(
            "Loaded {} literal and {} pattern whitelist rules, {} asset fields",
            snapshot.whitelist().literal_rules().len(),
            snapshot.whitelist().regexp_rules().len(),
            snapshot.assets().len()
        );

        Ok(Self {
            paths,
            current: ArcSwap::from_pointee(snapshot),
        })
    }

    /// A store that never reads files, serving `snapshot` until replaced.
    pub fn from_snapshot(snapshot: ConfigSnapshot) -> Self {
        Self {
            paths: Vec::new(),
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// The snapshot readers should evaluate against.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Re-read the configuration files and publish a new snapshot.
    ///
    /// On error the current snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<ConfigSnapshot>, ConfigError> {
        let snapshot = Arc::new(ConfigSnapshot::build(read_settings(&self.paths)?)?);
        self.current.store(Arc::clone(&snapshot));
        tracing::info!("Configuration reloaded from {} file(s)", snapshot.loaded_paths().len());
        Ok(snapshot)
    }

    /// Publish `snapshot` in place of the current one.
    pub fn publish(&self, snapshot: ConfigSnapshot) {
        self.current.store(Arc::new(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BASE: &str = r#"{
        "whitelist_literals": {"admins": "admin, login", "svc": "backup"},
        "whitelist_regexps": {"internal": "^10\\.0\\."},
        "assets": {"host.name": "hostname", "user.name": "user"}
    }"#;

    const OVERRIDE: &str = r#"{
        "whitelist_literals": {"svc": "restore"},
        "assets": {"process.name": "process"}
    }"#;

    #[test]
    fn test_parse_sections_in_order() {
        let settings = Settings::from_json(Path::new("base.json"), BASE).unwrap();
        let names: Vec<&str> = settings.whitelist_literals.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["admins", "svc"]);
        assert_eq!(settings.whitelist_regexps["internal"], r"^10\.0\.");
        assert_eq!(settings.assets["user.name"], "user");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let settings = Settings::from_json(Path::new("empty.json"), "{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_merge_overrides_by_name() {
        let mut settings = Settings::from_json(Path::new("a"), BASE).unwrap();
        settings.merge(Settings::from_json(Path::new("b"), OVERRIDE).unwrap());
        assert_eq!(settings.whitelist_literals["svc"], "restore");
        assert_eq!(settings.whitelist_literals.len(), 2);
        let assets: Vec<&str> = settings.assets.keys().map(String::as_str).collect();
        assert_eq!(assets, vec!["host.name", "user.name", "process.name"]);
    }

    #[test]
    fn test_read_settings_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.json");
        fs::write(&base, BASE).unwrap();
        let missing = dir.path().join("missing.json");

        let loaded = read_settings(&[base.clone(), missing.clone()]).unwrap();
        assert_eq!(loaded.loaded_paths, vec![base]);
        assert_eq!(loaded.failed_paths, vec![missing.clone()]);

        assert!(matches!(
            read_settings(&[missing]),
            Err(ConfigError::NothingLoaded(_))
        ));
    }

    #[test]
    fn test_read_settings_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(read_settings(&[bad]), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_reload_publishes_new_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, BASE).unwrap();

        let store = SettingsStore::load(vec![path.clone()]).unwrap();
        let before = store.snapshot();
        assert_eq!(before.whitelist().literal_rules().len(), 2);

        fs::write(&path, OVERRIDE).unwrap();
        let after = store.reload().unwrap();

        assert_eq!(after.whitelist().literal_rules().len(), 1);
        assert_eq!(store.snapshot().assets().len(), 1);
        // the old snapshot is untouched
        assert_eq!(before.whitelist().literal_rules().len(), 2);
        assert_eq!(before.assets().len(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, BASE).unwrap();
        let store = SettingsStore::load(vec![path.clone()]).unwrap();

        fs::write(&path, r#"{"whitelist_regexps": {"broken": "(unclosed"}}"#).unwrap();
        assert!(matches!(store.reload(), Err(ConfigError::Whitelist(_))));
        assert_eq!(store.snapshot().whitelist().literal_rules().len(), 2);
    }
}
