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

//! The clamped proportional adjuster.
//!
//! Multi-anchor propagation leaves a positional seam where two fronts
//! meet. For every anchor pair (P, Q) this adjuster re-propagates the
//! whole network from P alone, measures the misclosure at Q, and walks the
//! network from P a second time distributing the misclosure across each
//! shot in proportion to graph distance:
//!
//! ```text
//! f(s) = d_P(s) / (d_P(s) + d_Q(s))          graph-distance fraction
//! d'   = delta - (f(v) - f(u)) * misclosure   ideal corrected shot
//! ```
//!
//! Each corrected shot is then clamped, component by component in polar
//! form, to a tolerance of the original survey reading: the tape length
//! within ±5 %, the heading and the inclination within 15 % of the reading
//! with a 2° floor. A shot can only absorb as much correction as a
//! surveyor would accept as instrument error; whatever the clamps refuse
//! remains at Q as a residual, which is reported rather than forced.
//!
//! Scaling the whole misclosure globally was rejected: one blundered shot
//! would starve every other shot of correction. Stations reached by
//! several anchor pairs take the arithmetic mean of their corrected
//! positions. Anchors never move.

use crate::adjuster::{StationPositions, SurveyAdjuster};
use crate::stats::AdjustmentStatisticsBuilder;
use fixedbitset::FixedBitSet;
use karst_core::math::polar::{azimuth_difference, normalize_azimuth, Polar};
use karst_core::math::vec3::Vector3D;
use karst_model::diag::{DiagnosticKind, Diagnostics};
use karst_net::network::{StationIndex, SurveyNetwork};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Misclosures below this magnitude (feet) are treated as closed.
const MISCLOSURE_EPSILON: f64 = 1e-9;

/// Traverse adjustment with per-shot polar clamping.
#[derive(Clone, Copy, Debug)]
pub struct ProportionalAdjuster {
    length_fraction: f64,
    angle_fraction: f64,
    angle_floor: f64,
    residual_threshold: f64,
}

impl Default for ProportionalAdjuster {
    fn default() -> Self {
        Self {
            length_fraction: 0.05,
            angle_fraction: 0.15,
            angle_floor: 2.0,
            residual_threshold: 1.0,
        }
    }
}

impl ProportionalAdjuster {
    /// Creates an adjuster with the default tolerances: ±5 % length, 15 %
    /// angles with a 2° floor, residuals reported above 1 ft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum relative change of a shot's tape length.
    pub fn with_length_fraction(mut self, fraction: f64) -> Self {
        self.length_fraction = fraction;
        self
    }

    /// Maximum relative change of a shot's heading and inclination.
    pub fn with_angle_fraction(mut self, fraction: f64) -> Self {
        self.angle_fraction = fraction;
        self
    }

    /// Minimum angular allowance in degrees, independent of the reading.
    pub fn with_angle_floor(mut self, degrees: f64) -> Self {
        self.angle_floor = degrees;
        self
    }

    /// Residual magnitude (feet) above which a `solver.residual`
    /// diagnostic is emitted.
    pub fn with_residual_threshold(mut self, feet: f64) -> Self {
        self.residual_threshold = feet;
        self
    }

    /// Clamps a proposed corrected delta against the original reading.
    fn clamp_to_reading(&self, original: Vector3D, proposed: Vector3D) -> Vector3D {
        let reading = Polar::from_delta(original);
        if reading.length <= 0.0 {
            return original;
        }
        let ideal = Polar::from_delta(proposed);

        let length = ideal.length.clamp(
            reading.length * (1.0 - self.length_fraction),
            reading.length * (1.0 + self.length_fraction),
        );

        let heading_allowance =
            (self.angle_fraction * reading.azimuth.abs()).max(self.angle_floor);
        let heading_change =
            azimuth_difference(reading.azimuth, ideal.azimuth).clamp(-heading_allowance, heading_allowance);
        let azimuth = normalize_azimuth(reading.azimuth + heading_change);

        let inclination_allowance =
            (self.angle_fraction * reading.inclination.abs()).max(self.angle_floor);
        let inclination = ideal
            .inclination
            .clamp(
                reading.inclination - inclination_allowance,
                reading.inclination + inclination_allowance,
            )
            .clamp(-90.0, 90.0);

        Polar::new(length, azimuth, inclination).to_delta()
    }

    /// Second walk from `start`: every traversed edge takes its share of
    /// the misclosure, clamped to the original reading. `C`-flagged shots
    /// pass through verbatim.
    fn clamped_propagate(
        &self,
        network: &SurveyNetwork,
        start: StationIndex,
        dist_p: &[f64],
        dist_q: &[f64],
        misclosure: Vector3D,
    ) -> Vec<Option<Vector3D>> {
        let station_count = network.station_count();
        let mut positions: Vec<Option<Vector3D>> = vec![None; station_count];
        positions[start.get()] = network.station(start).position;

        let mut visited = FixedBitSet::with_capacity(station_count);
        visited.insert(start.get());
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let position = positions[current.get()].expect("visited stations carry positions");

            for neighbor in network.neighbors(current) {
                let next = neighbor.station;
                if visited.contains(next.get()) {
                    continue;
                }
                visited.insert(next.get());

                let shot = network.shot(neighbor.shot);
                let delta = shot.oriented_delta(neighbor.reversed);

                let corrected = if shot.flags.no_adjust {
                    delta
                } else {
                    let share = fraction(dist_p[next.get()], dist_q[next.get()])
                        - fraction(dist_p[current.get()], dist_q[current.get()]);
                    self.clamp_to_reading(delta, delta - misclosure * share)
                };

                positions[next.get()] = Some(position + corrected);
                queue.push_back(next);
            }
        }

        positions
    }
}

impl SurveyAdjuster for ProportionalAdjuster {
    fn name(&self) -> &str {
        "ProportionalAdjuster"
    }

    fn adjust(&self, network: &SurveyNetwork, diag: &mut Diagnostics) -> StationPositions {
        let start_time = std::time::Instant::now();
        let mut result = network.positions();
        let anchors = network.anchors();

        if anchors.len() < 2 {
            info!("fewer than 2 anchors, nothing to adjust");
            return result;
        }

        let station_count = network.station_count();
        let mut contributions: Vec<Vec<Vector3D>> = vec![Vec::new(); station_count];
        let mut pairs_evaluated = 0u64;
        let mut pairs_skipped = 0u64;
        let mut worst_residual = 0.0f64;

        for (i, &anchor_p) in anchors.iter().enumerate() {
            for &anchor_q in &anchors[i + 1..] {
                // 1. Unclamped re-propagation from P alone.
                let (propagated, dist_p) = bfs_propagate(network, anchor_p);
                let Some(measured_q) = propagated[anchor_q.get()] else {
                    pairs_skipped += 1;
                    continue;
                };

                // 2. Misclosure at Q.
                let fixed_q = network
                    .station(anchor_q)
                    .position
                    .expect("anchors always carry a position");
                let misclosure = measured_q - fixed_q;
                if misclosure.length() < MISCLOSURE_EPSILON {
                    pairs_skipped += 1;
                    continue;
                }

                debug!(
                    from = %network.station(anchor_p).name,
                    to = %network.station(anchor_q).name,
                    misclosure_feet = misclosure.length(),
                    "distributing traverse misclosure"
                );

                // 3. Graph distances from both anchors.
                let dist_q = bfs_distances(network, anchor_q);

                // 4. Clamped re-propagation from P.
                let clamped =
                    self.clamped_propagate(network, anchor_p, &dist_p, &dist_q, misclosure);

                if let Some(position_q) = clamped[anchor_q.get()] {
                    let residual = (position_q - fixed_q).length();
                    worst_residual = worst_residual.max(residual);
                    if residual > self.residual_threshold {
                        warn!(
                            anchor = %network.station(anchor_q).name,
                            residual_feet = residual,
                            "clamps bound before closing the traverse"
                        );
                        diag.info(
                            DiagnosticKind::SolverResidual,
                            format!(
                                "traverse {} -> {} leaves a residual of {:.3} ft",
                                network.station(anchor_p).name,
                                network.station(anchor_q).name,
                                residual
                            ),
                        );
                    }
                }

                // 5. Accumulate per-station contributions.
                for (index, position) in clamped.iter().enumerate() {
                    if let Some(position) = position {
                        if !network.station(StationIndex::new(index)).fixed {
                            contributions[index].push(*position);
                        }
                    }
                }
                pairs_evaluated += 1;
            }
        }

        let mut stations_adjusted = 0usize;
        for (index, positions) in contributions.iter().enumerate() {
            if !positions.is_empty() {
                let name = &network.station(StationIndex::new(index)).name;
                result.insert(name.clone(), Vector3D::mean(positions));
                stations_adjusted += 1;
            }
        }

        let statistics = AdjustmentStatisticsBuilder::new()
            .pairs_evaluated(pairs_evaluated)
            .pairs_skipped(pairs_skipped)
            .stations_adjusted(stations_adjusted)
            .worst_residual(worst_residual)
            .adjust_duration(start_time.elapsed())
            .build();
        info!(%statistics, "traverse adjustment finished");

        result
    }
}

/// Distance-weighted interpolation fraction: 0 at P, 1 at Q. Stations
/// unreachable from Q (infinite distance) take no correction.
#[inline]
fn fraction(dist_p: f64, dist_q: f64) -> f64 {
    let total = dist_p + dist_q;
    if total > 0.0 && total.is_finite() {
        dist_p / total
    } else {
        0.0
    }
}

/// BFS from `start`, summing oriented measurement deltas and cumulative
/// shot lengths. Unreached stations stay `None` / infinite.
fn bfs_propagate(
    network: &SurveyNetwork,
    start: StationIndex,
) -> (Vec<Option<Vector3D>>, Vec<f64>) {
    let station_count = network.station_count();
    let mut positions: Vec<Option<Vector3D>> = vec![None; station_count];
    let mut distances = vec![f64::INFINITY; station_count];

    positions[start.get()] = network.station(start).position;
    distances[start.get()] = 0.0;

    let mut visited = FixedBitSet::with_capacity(station_count);
    visited.insert(start.get());
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let position = positions[current.get()].expect("visited stations carry positions");
        let distance = distances[current.get()];

        for neighbor in network.neighbors(current) {
            let next = neighbor.station;
            if visited.contains(next.get()) {
                continue;
            }
            visited.insert(next.get());

            let shot = network.shot(neighbor.shot);
            positions[next.get()] = Some(position + shot.oriented_delta(neighbor.reversed));
            distances[next.get()] = distance + shot.length;
            queue.push_back(next);
        }
    }

    (positions, distances)
}

/// BFS from `start`, cumulative shot-length distances only.
fn bfs_distances(network: &SurveyNetwork, start: StationIndex) -> Vec<f64> {
    let station_count = network.station_count();
    let mut distances = vec![f64::INFINITY; station_count];
    distances[start.get()] = 0.0;

    let mut visited = FixedBitSet::with_capacity(station_count);
    visited.insert(start.get());
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let distance = distances[current.get()];
        for neighbor in network.neighbors(current) {
            let next = neighbor.station;
            if visited.contains(next.get()) {
                continue;
            }
            visited.insert(next.get());
            distances[next.get()] = distance + network.shot(neighbor.shot).length;
            queue.push_back(next);
        }
    }

    distances
}
