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

//! Aggregates over a sorted sample.
//!
//! Every aggregate is computed from the ascending copy held by [`Sample`],
//! so summation order never depends on the order the caller supplied.

/// An ascending, non-empty copy of the observed values.
#[derive(Debug, Clone)]
pub struct Sample {
    sorted: Vec<f64>,
}

impl Sample {
    /// Sort a copy of `values`. Returns `None` for an empty slice.
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self { sorted })
    }

    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    pub fn mean(&self) -> f64 {
        self.sorted.iter().sum::<f64>() / self.sorted.len() as f64
    }

    /// Middle value, or the mean of the two middle values.
    pub fn median(&self) -> f64 {
        median_of_sorted(&self.sorted)
    }

    /// Population standard deviation (divides by `n`).
    pub fn population_stdev(&self) -> f64 {
        let mean = self.mean();
        let variance = self
            .sorted
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / self.sorted.len() as f64;
        variance.sqrt()
    }

    /// Median absolute deviation around the median.
    pub fn median_absolute_deviation(&self) -> f64 {
        let median = self.median();
        let mut deviations: Vec<f64> = self.sorted.iter().map(|v| (v - median).abs()).collect();
        deviations.sort_by(f64::total_cmp);
        median_of_sorted(&deviations)
    }

    /// Copy with repeated values removed.
    pub fn deduplicated(&self) -> Self {
        let mut sorted = self.sorted.clone();
        sorted.dedup();
        Self { sorted }
    }

    /// The `q`-th percentile (`0..=100`), interpolating linearly between the
    /// two closest ranks.
    pub fn percentile(&self, q: f64) -> f64 {
        let last = self.sorted.len() - 1;
        let rank = q / 100.0 * last as f64;
        let lower = rank.floor() as usize;
        let upper = (lower + 1).min(last);
        let fraction = rank - lower as f64;

        let low = self.sorted[lower];
        let high = self.sorted[upper];
        // Interpolate from whichever end is nearer.
        if fraction >= 0.5 {
            high - (high - low) * (1.0 - fraction)
        } else {
            low + (high - low) * fraction
        }
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        f64::midpoint(sorted[n / 2 - 1], sorted[n / 2])
    } else {
        sorted[n / 2]
    }
}
