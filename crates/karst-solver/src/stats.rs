// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::time::Duration;

/// Summary figures of one adjustment run.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentStatistics {
    /// Anchor pairs whose misclosure was distributed.
    pub pairs_evaluated: u64,
    /// Anchor pairs skipped (unreachable partner or negligible misclosure).
    pub pairs_skipped: u64,
    /// Stations whose position moved.
    pub stations_adjusted: usize,
    /// Largest anchor residual left after clamping, feet.
    pub worst_residual: f64,
    pub adjust_duration: Duration,
}

impl std::fmt::Display for AdjustmentStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pair(s) evaluated, {} skipped, {} station(s) adjusted, worst residual {:.3} ft in {:.3}s",
            self.pairs_evaluated,
            self.pairs_skipped,
            self.stations_adjusted,
            self.worst_residual,
            self.adjust_duration.as_secs_f64(),
        )
    }
}

/// Builder for [`AdjustmentStatistics`].
#[derive(Debug, Clone, Default)]
pub struct AdjustmentStatisticsBuilder {
    pairs_evaluated: u64,
    pairs_skipped: u64,
    stations_adjusted: usize,
    worst_residual: f64,
    adjust_duration: Duration,
}

impl AdjustmentStatisticsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairs_evaluated(mut self, pairs_evaluated: u64) -> Self {
        self.pairs_evaluated = pairs_evaluated;
        self
    }

    pub fn pairs_skipped(mut self, pairs_skipped: u64) -> Self {
        self.pairs_skipped = pairs_skipped;
        self
    }

    pub fn stations_adjusted(mut self, stations_adjusted: usize) -> Self {
        self.stations_adjusted = stations_adjusted;
        self
    }

    pub fn worst_residual(mut self, worst_residual: f64) -> Self {
        self.worst_residual = worst_residual;
        self
    }

    pub fn adjust_duration(mut self, adjust_duration: Duration) -> Self {
        self.adjust_duration = adjust_duration;
        self
    }

    pub fn build(self) -> AdjustmentStatistics {
        AdjustmentStatistics {
            pairs_evaluated: self.pairs_evaluated,
            pairs_skipped: self.pairs_skipped,
            stations_adjusted: self.stations_adjusted,
            worst_residual: self.worst_residual,
            adjust_duration: self.adjust_duration,
        }
    }
}
