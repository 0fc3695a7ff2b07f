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

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outliercrab::fields::{render, sentences};
use outliercrab::frontier::{Trigger, TriggerMethod, TriggerOn};
use outliercrab::{Outlier, SettingsStore};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "outliercrab")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
#[command(about = "Score event counts, expand event fields and check outliers against whitelists", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a decision frontier and list the values that are outliers
    Frontier {
        #[arg(long)]
        method: TriggerMethod,

        #[arg(long, allow_negative_numbers = true)]
        sensitivity: f64,

        /// high or low
        #[arg(long)]
        trigger_on: Option<TriggerOn>,

        #[arg(value_name = "VALUE", required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Expand an event into sentences over the given fields
    Sentences {
        /// JSON file holding one event
        #[arg(long, value_name = "FILE")]
        event: PathBuf,

        #[arg(value_name = "FIELD", required = true)]
        fields: Vec<String>,
    },

    /// Substitute {field} placeholders in a template
    Render {
        #[arg(long, value_name = "FILE")]
        event: PathBuf,

        template: String,
    },

    /// Extract the configured assets from an event
    Assets {
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Vec<PathBuf>,

        #[arg(long, value_name = "FILE")]
        event: PathBuf,
    },

    /// Check outlier candidates (JSON lines) against the configured whitelists
    Whitelist {
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Vec<PathBuf>,

        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
}

/// One line of `whitelist` input.
#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(rename = "type")]
    outlier_type: String,
    reason: String,
    summary: String,
    #[serde(default)]
    fields: Option<Value>,
}

fn main() -> Result<()> {
    // Set RUST_LOG to override (e.g. RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "OutlierCrab starting up (version {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    match Args::parse().command {
        Command::Frontier {
            method,
            sensitivity,
            trigger_on,
            values,
        } => run_frontier(Trigger::new(method, sensitivity, trigger_on), &values),
        Command::Sentences { event, fields } => {
            let record = read_event(&event)?;
            let names: Vec<&str> = fields.iter().map(String::as_str).collect();
            for sentence in sentences(&record, &names) {
                println!("{}", serde_json::to_string(&sentence)?);
            }
            Ok(())
        }
        Command::Render { event, template } => {
            let record = read_event(&event)?;
            println!("{}", render(&template, &record));
            Ok(())
        }
        Command::Assets { config, event } => {
            let store = SettingsStore::load(config).context("Failed to load configuration")?;
            let record = read_event(&event)?;
            for asset in store.snapshot().extract_assets(&record) {
                println!("{asset}");
            }
            Ok(())
        }
        Command::Whitelist { config, input } => run_whitelist(config, &input),
    }
}

fn run_frontier(trigger: Trigger, values: &[f64]) -> Result<()> {
    if trigger.trigger_on.is_none() {
        let frontier = trigger.frontier(values)?;
        println!("frontier: {frontier}");
        return Ok(());
    }

    let (frontier, verdicts) = trigger.evaluate(values)?;
    println!("frontier: {frontier}");
    for (value, verdict) in values.iter().zip(verdicts) {
        if verdict.is_outlier() {
            println!("outlier: {value}");
        }
    }
    Ok(())
}

fn run_whitelist(config: Vec<PathBuf>, input: &Path) -> Result<()> {
    let store = SettingsStore::load(config).context("Failed to load configuration")?;
    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read candidates from {}", input.display()))?;

    let candidates = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<Candidate>(line)
                .with_context(|| format!("Invalid candidate on line {}", idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    let snapshot = store.snapshot();
    let results: Vec<Value> = candidates
        .par_iter()
        .map(|candidate| {
            let outlier = Outlier::new(&candidate.outlier_type, &candidate.reason, &candidate.summary);
            let whitelisted = snapshot.is_whitelisted(&outlier, candidate.fields.as_ref());
            let assets: Vec<String> = candidate
                .fields
                .as_ref()
                .map(|fields| {
                    snapshot
                        .extract_assets(fields)
                        .iter()
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default();
            json!({
                "whitelisted": whitelisted,
                "assets": assets,
                "outlier": outlier.to_field_arrays(),
            })
        })
        .collect();

    let suppressed = results
        .iter()
        .filter(|result| result["whitelisted"] == Value::Bool(true))
        .count();
    tracing::info!("{suppressed} of {} candidates whitelisted", results.len());

    for result in results {
        println!("{result}");
    }
    Ok(())
}

fn read_event(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event from {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid event JSON in {}", path.display()))
}
