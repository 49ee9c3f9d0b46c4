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

//! The adjustment capability.

use karst_core::math::vec3::Vector3D;
use karst_model::diag::Diagnostics;
use karst_net::network::SurveyNetwork;
use std::collections::BTreeMap;

/// Adjusted station positions, keyed by station name. A `BTreeMap` keeps
/// iteration deterministic.
pub type StationPositions = BTreeMap<String, Vector3D>;

/// A survey adjustment algorithm.
///
/// The contract:
///
/// * Input: a propagated [`SurveyNetwork`].
/// * Output: a fresh positions table. The network is not mutated.
/// * Anchor positions are returned bit-identical to their declarations.
/// * Stations never reached by propagation do not appear in the output.
pub trait SurveyAdjuster {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Computes adjusted positions for every positioned station.
    fn adjust(&self, network: &SurveyNetwork, diag: &mut Diagnostics) -> StationPositions;
}
