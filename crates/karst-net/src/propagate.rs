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

//! Multi-source breadth-first coordinate propagation.
//!
//! Every anchor is seeded into one FIFO queue (in sorted name order), so
//! all propagation fronts advance simultaneously; each station is claimed
//! by whichever front reaches it first and tagged with that front's anchor
//! as its origin. Position and origin are assigned exactly once per
//! station.
//!
//! A network without anchors is seated at the fallback origin (the project
//! base location, or zero): its first station plays the anchor role for
//! propagation without becoming fixed.

use crate::network::{StationIndex, SurveyNetwork};
use fixedbitset::FixedBitSet;
use karst_core::math::vec3::ZERO;
use karst_model::diag::{DiagnosticKind, Diagnostics};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Assigns initial positions and origin tags in place.
///
/// Stations unreachable from every anchor keep an undefined position and
/// are reported as `network.disconnected`.
pub fn propagate(network: &mut SurveyNetwork, diag: &mut Diagnostics) {
    let station_count = network.stations.len();
    let mut visited = FixedBitSet::with_capacity(station_count);
    let mut queue: VecDeque<StationIndex> = VecDeque::new();

    for &anchor in &network.anchors {
        visited.insert(anchor.get());
        queue.push_back(anchor);
    }

    if queue.is_empty() && station_count > 0 {
        // Anchorless network: seat the first station at the fallback
        // origin and treat it as the single propagation source.
        let seed = StationIndex::new(0);
        let origin = network.fallback_origin.unwrap_or(ZERO);
        let station = &mut network.stations[0];
        station.position = Some(origin);
        station.origin = Some(seed);
        visited.insert(0);
        queue.push_back(seed);
        debug!(station = %station.name, "no anchors; seated first station at fallback origin");
    }

    while let Some(current) = queue.pop_front() {
        let position = network.stations[current.get()]
            .position
            .expect("queued stations always carry a position");
        let origin = network.stations[current.get()].origin;

        for neighbor in &network.adjacency[current.get()] {
            let next = neighbor.station;
            if visited.contains(next.get()) {
                continue;
            }
            visited.insert(next.get());

            let delta = network.shots[neighbor.shot.get()].oriented_delta(neighbor.reversed);
            let station = &mut network.stations[next.get()];
            station.position = Some(position + delta);
            station.origin = origin;
            queue.push_back(next);
        }
    }

    let mut disconnected = 0usize;
    for (i, station) in network.stations.iter().enumerate() {
        if !visited.contains(i) {
            disconnected += 1;
            diag.warning(
                DiagnosticKind::NetworkDisconnected,
                format!("station '{}' is unreachable from every anchor", station.name),
                None,
            );
        }
    }

    info!(
        positioned = station_count - disconnected,
        disconnected,
        anchors = network.anchors.len(),
        "coordinates propagated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use karst_core::math::vec3::Vector3D;
    use karst_model::survey::ShotFlags;

    fn shot(builder: &mut NetworkBuilder, from: &str, to: &str, delta: Vector3D) {
        let from = builder.intern(from);
        let to = builder.intern(to);
        builder.add_shot(from, to, delta, delta.length(), ShotFlags::default());
    }

    #[test]
    fn test_single_anchor_chain() {
        let mut builder = NetworkBuilder::new();
        shot(&mut builder, "A", "B", Vector3D::new(0.0, 100.0, 0.0));
        shot(&mut builder, "B", "C", Vector3D::new(100.0, 0.0, 0.0));
        let a = builder.intern("A");
        builder.set_fixed(a, ZERO);

        let mut network = builder.build();
        let mut diag = Diagnostics::new();
        propagate(&mut network, &mut diag);

        let positions = network.positions();
        assert_eq!(positions["A"], ZERO);
        assert_eq!(positions["B"], Vector3D::new(0.0, 100.0, 0.0));
        assert_eq!(positions["C"], Vector3D::new(100.0, 100.0, 0.0));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_reverse_traversal_negates_delta() {
        // The shot is recorded C -> B but propagation walks B -> C.
        let mut builder = NetworkBuilder::new();
        shot(&mut builder, "C", "B", Vector3D::new(0.0, -50.0, 0.0));
        let b = builder.intern("B");
        builder.set_fixed(b, ZERO);

        let mut network = builder.build();
        propagate(&mut network, &mut Diagnostics::new());
        assert_eq!(network.positions()["C"], Vector3D::new(0.0, 50.0, 0.0));
    }

    #[test]
    fn test_origin_tags_split_between_fronts() {
        // A chain of four stations with anchors at both ends: each front
        // claims its half.
        let mut builder = NetworkBuilder::new();
        shot(&mut builder, "A", "B", Vector3D::new(0.0, 100.0, 0.0));
        shot(&mut builder, "B", "C", Vector3D::new(0.0, 100.0, 0.0));
        shot(&mut builder, "C", "D", Vector3D::new(0.0, 100.0, 0.0));
        let a = builder.intern("A");
        let d = builder.intern("D");
        builder.set_fixed(a, ZERO);
        builder.set_fixed(d, Vector3D::new(0.0, 300.0, 0.0));

        let mut network = builder.build();
        propagate(&mut network, &mut Diagnostics::new());

        let b = network.index_of("B").unwrap();
        let c = network.index_of("C").unwrap();
        assert_eq!(network.origin_name(b), Some("A"));
        assert_eq!(network.origin_name(c), Some("D"));
        assert_eq!(network.origin_name(a), Some("A"));

        // Every origin is an anchor or the station itself.
        for (i, station) in network.stations().iter().enumerate() {
            let origin = station.origin.unwrap();
            assert!(network.station(origin).fixed || origin.get() == i);
        }
    }

    #[test]
    fn test_disconnected_station_reported() {
        let mut builder = NetworkBuilder::new();
        shot(&mut builder, "A", "B", Vector3D::new(1.0, 0.0, 0.0));
        shot(&mut builder, "Q1", "Q2", Vector3D::new(2.0, 0.0, 0.0));
        let a = builder.intern("A");
        builder.set_fixed(a, ZERO);

        let mut network = builder.build();
        let mut diag = Diagnostics::new();
        propagate(&mut network, &mut diag);

        assert_eq!(diag.of_kind(DiagnosticKind::NetworkDisconnected).count(), 2);
        let q1 = network.index_of("Q1").unwrap();
        assert_eq!(network.station(q1).position, None);
        assert!(!network.positions().contains_key("Q1"));
    }

    #[test]
    fn test_anchorless_network_uses_fallback() {
        let mut builder = NetworkBuilder::new();
        shot(&mut builder, "A", "B", Vector3D::new(0.0, 10.0, 0.0));
        builder.set_fallback_origin(Vector3D::new(5.0, 5.0, 5.0));

        let mut network = builder.build();
        propagate(&mut network, &mut Diagnostics::new());

        assert_eq!(network.positions()["A"], Vector3D::new(5.0, 5.0, 5.0));
        assert_eq!(network.positions()["B"], Vector3D::new(5.0, 15.0, 5.0));
        let a = network.index_of("A").unwrap();
        assert!(!network.station(a).fixed);
        assert_eq!(network.origin_name(a), Some("A"));
    }
}
