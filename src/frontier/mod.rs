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

//! Decision frontiers.
//!
//! A decision frontier is the threshold separating normal from anomalous
//! counts. It is derived from the observed counts of all buckets using one
//! of the trigger methods below, then every bucket is checked against it
//! with [`is_outlier`].

pub mod stats;

use serde::{Deserialize, Serialize};
use stats::Sample;
use std::fmt;
use std::str::FromStr;

/// Errors raised while computing a frontier or checking a count.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrontierError {
    #[error("unexpected trigger method '{0}', could not calculate decision frontier")]
    UnknownTriggerMethod(String),

    #[error("unexpected trigger condition '{0}', expected 'high' or 'low'")]
    InvalidTriggerCondition(String),

    #[error("percentile {0} is outside the range 0 to 100")]
    InvalidPercentile(f64),

    #[error("cannot calculate a decision frontier without values")]
    EmptyValues,
}

/// Statistical strategy used to derive a frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TriggerMethod {
    /// `sensitivity`-th percentile of the distinct values
    Percentile,
    PctOfMaxValue,
    PctOfMedianValue,
    PctOfAvgValue,
    /// Median plus or minus `sensitivity` median absolute deviations
    Mad,
    /// Like `Mad`, never below zero
    MadPos,
    /// Mean plus or minus `sensitivity` standard deviations
    Stdev,
    /// `sensitivity` itself is the frontier
    Float,
}

impl TriggerMethod {
    pub const ALL: [Self; 8] = [
        Self::Percentile,
        Self::PctOfMaxValue,
        Self::PctOfMedianValue,
        Self::PctOfAvgValue,
        Self::Mad,
        Self::MadPos,
        Self::Stdev,
        Self::Float,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentile => "percentile",
            Self::PctOfMaxValue => "pct_of_max_value",
            Self::PctOfMedianValue => "pct_of_median_value",
            Self::PctOfAvgValue => "pct_of_avg_value",
            Self::Mad => "mad",
            Self::MadPos => "madpos",
            Self::Stdev => "stdev",
            Self::Float => "float",
        }
    }
}

impl FromStr for TriggerMethod {
    type Err = FrontierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| FrontierError::UnknownTriggerMethod(s.to_string()))
    }
}

impl TryFrom<String> for TriggerMethod {
    type Error = FrontierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerMethod> for String {
    fn from(method: TriggerMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for TriggerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerOn {
    /// Counts above the frontier are outliers
    High,
    /// Counts below the frontier are outliers
    Low,
}

impl TriggerOn {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

impl FromStr for TriggerOn {
    type Err = FrontierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            other => Err(FrontierError::InvalidTriggerCondition(other.to_string())),
        }
    }
}

impl fmt::Display for TriggerOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn require_direction(trigger_on: Option<TriggerOn>) -> Result<TriggerOn, FrontierError> {
    trigger_on.ok_or_else(|| FrontierError::InvalidTriggerCondition("none".to_string()))
}

/// Compute the decision frontier for `values`.
///
/// `stdev`, `mad` and `madpos` need a direction. When the median absolute
/// deviation is zero (more than half of the values are equal) the MAD
/// methods fall back to `stdev` with a sensitivity of 1. A negative frontier
/// is logged but still returned.
pub fn compute_frontier(
    method: TriggerMethod,
    values: &[f64],
    sensitivity: f64,
    trigger_on: Option<TriggerOn>,
) -> Result<f64, FrontierError> {
    let sample = Sample::new(values).ok_or(FrontierError::EmptyValues)?;

    let frontier = match method {
        TriggerMethod::Percentile => {
            if !(0.0..=100.0).contains(&sensitivity) {
                return Err(FrontierError::InvalidPercentile(sensitivity));
            }
            sample.deduplicated().percentile(sensitivity)
        }
        TriggerMethod::PctOfMaxValue => sample.max() * (sensitivity / 100.0),
        TriggerMethod::PctOfMedianValue => sample.median() * (sensitivity / 100.0),
        TriggerMethod::PctOfAvgValue => sample.mean() * (sensitivity / 100.0),
        TriggerMethod::Mad | TriggerMethod::MadPos => {
            let direction = require_direction(trigger_on)?;
            let mut frontier = mad_frontier(&sample, sensitivity, direction);

            if equals_median(frontier, &sample) {
                tracing::debug!("Median absolute deviation is zero, falling back to stdev");
                frontier = stdev_frontier(&sample, 1.0, direction);
            }

            if method == TriggerMethod::MadPos {
                frontier = frontier.max(0.0);
            }
            frontier
        }
        TriggerMethod::Stdev => stdev_frontier(&sample, sensitivity, require_direction(trigger_on)?),
        TriggerMethod::Float => sensitivity,
    };

    if frontier < 0.0 {
        tracing::warn!("Negative decision frontier {frontier:.2}, this will not generate any outliers");
    }

    Ok(frontier)
}

#[allow(clippy::float_cmp)]
fn equals_median(frontier: f64, sample: &Sample) -> bool {
    frontier == sample.median()
}

fn stdev_frontier(sample: &Sample, sensitivity: f64, direction: TriggerOn) -> f64 {
    let spread = sensitivity * sample.population_stdev();
    match direction {
        TriggerOn::High => sample.mean() + spread,
        TriggerOn::Low => sample.mean() - spread,
    }
}

fn mad_frontier(sample: &Sample, sensitivity: f64, direction: TriggerOn) -> f64 {
    let spread = sensitivity * sample.median_absolute_deviation();
    match direction {
        TriggerOn::High => sample.median() + spread,
        TriggerOn::Low => sample.median() - spread,
    }
}

/// Outcome of checking one count against a frontier.
///
/// Only [`Verdict::NotOutlier`] means "normal". A low-side outlier carries
/// the frontier it fell below; callers should not rely on anything beyond
/// [`Verdict::is_outlier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    NotOutlier,
    /// Count is above the frontier
    Above,
    /// Count is below the frontier
    Below { frontier: f64 },
}

impl Verdict {
    #[must_use]
    pub const fn is_outlier(self) -> bool {
        !matches!(self, Self::NotOutlier)
    }

    /// The frontier carried by a low-side outlier.
    #[must_use]
    pub const fn frontier(self) -> Option<f64> {
        match self {
            Self::Below { frontier } => Some(frontier),
            Self::NotOutlier | Self::Above => None,
        }
    }
}

/// Check `observed_count` against `frontier` in the given direction.
pub fn is_outlier(
    observed_count: f64,
    frontier: f64,
    trigger_on: Option<TriggerOn>,
) -> Result<Verdict, FrontierError> {
    let verdict = match require_direction(trigger_on)? {
        TriggerOn::High if observed_count > frontier => Verdict::Above,
        TriggerOn::Low if observed_count < frontier => Verdict::Below { frontier },
        TriggerOn::High | TriggerOn::Low => Verdict::NotOutlier,
    };
    Ok(verdict)
}

/// A complete trigger configuration as analyzers carry it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub method: TriggerMethod,
    pub sensitivity: f64,
    #[serde(default)]
    pub trigger_on: Option<TriggerOn>,
}

impl Trigger {
    pub const fn new(method: TriggerMethod, sensitivity: f64, trigger_on: Option<TriggerOn>) -> Self {
        Self {
            method,
            sensitivity,
            trigger_on,
        }
    }

    pub fn frontier(&self, values: &[f64]) -> Result<f64, FrontierError> {
        compute_frontier(self.method, values, self.sensitivity, self.trigger_on)
    }

    /// Frontier of `values` and a verdict for each of them, in input order.
    pub fn evaluate(&self, values: &[f64]) -> Result<(f64, Vec<Verdict>), FrontierError> {
        let frontier = self.frontier(values)?;
        let verdicts = values
            .iter()
            .map(|&count| is_outlier(count, frontier, self.trigger_on))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((frontier, verdicts))
    }
}
