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

//! The assembled survey network.
//!
//! Stations are interned to typed indices at assembly; shots and the
//! adjacency refer to stations by index only. String names survive as the
//! outward-facing identity (results are keyed by name), the indices keep
//! the hot paths allocation-free.

use karst_core::math::vec3::Vector3D;
use karst_core::utils::index::{TypedIndex, TypedIndexTag};
use karst_model::survey::ShotFlags;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};

/// A tag type for station indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StationIndexTag;

impl TypedIndexTag for StationIndexTag {
    const NAME: &'static str = "StationIndex";
}

/// A typed index for stations.
pub type StationIndex = TypedIndex<StationIndexTag>;

/// A tag type for shot indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ShotIndexTag;

impl TypedIndexTag for ShotIndexTag {
    const NAME: &'static str = "ShotIndex";
}

/// A typed index for network shots.
pub type ShotIndex = TypedIndex<ShotIndexTag>;

/// One station of the assembled network.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub name: String,
    /// Position in feet; `None` until propagation reaches the station.
    pub position: Option<Vector3D>,
    /// The anchor whose propagation front claimed this station. Anchors
    /// are their own origin.
    pub origin: Option<StationIndex>,
    /// True for anchors: the position is declared and never moves.
    pub fixed: bool,
}

/// A directed shot between two network stations.
///
/// `delta` is the measurement-based Cartesian displacement from `from` to
/// `to` in feet, with all corrections applied; `length` is the corrected
/// slope distance used for graph-distance weighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetworkShot {
    pub from: StationIndex,
    pub to: StationIndex,
    pub delta: Vector3D,
    pub length: f64,
    pub flags: ShotFlags,
}

impl NetworkShot {
    /// The delta oriented for traversal: negated when the edge is walked
    /// against its recorded direction.
    #[inline]
    pub fn oriented_delta(&self, reversed: bool) -> Vector3D {
        if reversed {
            -self.delta
        } else {
            self.delta
        }
    }
}

/// One undirected adjacency entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub station: StationIndex,
    pub shot: ShotIndex,
    /// True when the shot is recorded in the opposite direction.
    pub reversed: bool,
}

/// The unified station network: stations, shots, anchors, adjacency.
#[derive(Clone, Debug, Default)]
pub struct SurveyNetwork {
    pub(crate) stations: Vec<Station>,
    pub(crate) names: HashMap<String, StationIndex>,
    pub(crate) shots: Vec<NetworkShot>,
    /// Anchor indices in ascending station-name order.
    pub(crate) anchors: Vec<StationIndex>,
    pub(crate) adjacency: Vec<SmallVec<[Neighbor; 4]>>,
    /// Base position used to seat an anchorless network, feet.
    pub(crate) fallback_origin: Option<Vector3D>,
}

impl SurveyNetwork {
    /// Number of stations.
    #[inline]
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// The station behind an index.
    #[inline]
    pub fn station(&self, index: StationIndex) -> &Station {
        &self.stations[index.get()]
    }

    /// All stations in interning order.
    #[inline]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Resolves a station name.
    pub fn index_of(&self, name: &str) -> Option<StationIndex> {
        self.names.get(name).copied()
    }

    /// All shots in insertion order.
    #[inline]
    pub fn shots(&self) -> &[NetworkShot] {
        &self.shots
    }

    /// The shot behind an index.
    #[inline]
    pub fn shot(&self, index: ShotIndex) -> &NetworkShot {
        &self.shots[index.get()]
    }

    /// Anchor indices in ascending station-name order.
    #[inline]
    pub fn anchors(&self) -> &[StationIndex] {
        &self.anchors
    }

    /// Undirected neighbours of a station, in shot insertion order.
    #[inline]
    pub fn neighbors(&self, index: StationIndex) -> &[Neighbor] {
        &self.adjacency[index.get()]
    }

    /// Total surveyed length in feet, excluding length-excluded shots.
    pub fn surveyed_length(&self) -> f64 {
        self.shots
            .iter()
            .filter(|s| !s.flags.exclude_length)
            .map(|s| s.length)
            .sum()
    }

    /// Positions of every positioned station, keyed by name.
    pub fn positions(&self) -> BTreeMap<String, Vector3D> {
        self.stations
            .iter()
            .filter_map(|s| s.position.map(|p| (s.name.clone(), p)))
            .collect()
    }

    /// The origin tag of a station, as a name.
    pub fn origin_name(&self, index: StationIndex) -> Option<&str> {
        self.stations[index.get()]
            .origin
            .map(|o| self.stations[o.get()].name.as_str())
    }
}

/// Mutable construction side of [`SurveyNetwork`].
///
/// The builder interns stations on first sight, collects shots, and seals
/// the result with [`NetworkBuilder::build`], which derives the adjacency
/// and the sorted anchor list.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    stations: Vec<Station>,
    names: HashMap<String, StationIndex>,
    shots: Vec<NetworkShot>,
    fallback_origin: Option<Vector3D>,
}

impl NetworkBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a station of this name exists already.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Returns the station index for `name`, interning it on first sight.
    pub fn intern(&mut self, name: &str) -> StationIndex {
        if let Some(&index) = self.names.get(name) {
            return index;
        }
        let index = StationIndex::new(self.stations.len());
        self.stations.push(Station {
            name: name.to_string(),
            position: None,
            origin: None,
            fixed: false,
        });
        self.names.insert(name.to_string(), index);
        index
    }

    /// Appends a directed shot.
    pub fn add_shot(
        &mut self,
        from: StationIndex,
        to: StationIndex,
        delta: Vector3D,
        length: f64,
        flags: ShotFlags,
    ) -> ShotIndex {
        let index = ShotIndex::new(self.shots.len());
        self.shots.push(NetworkShot {
            from,
            to,
            delta,
            length,
            flags,
        });
        index
    }

    /// Declares a station as an anchor at a fixed position. Overrides any
    /// earlier declaration for the same station.
    pub fn set_fixed(&mut self, index: StationIndex, position: Vector3D) {
        let station = &mut self.stations[index.get()];
        station.position = Some(position);
        station.origin = Some(index);
        station.fixed = true;
    }

    /// Sets the position used to seat the network when no anchor exists.
    pub fn set_fallback_origin(&mut self, position: Vector3D) {
        self.fallback_origin = Some(position);
    }

    /// Seals the network: derives the undirected adjacency (neighbours in
    /// shot insertion order) and the anchor list (ascending name order).
    pub fn build(self) -> SurveyNetwork {
        let mut adjacency: Vec<SmallVec<[Neighbor; 4]>> =
            vec![SmallVec::new(); self.stations.len()];
        for (i, shot) in self.shots.iter().enumerate() {
            let shot_index = ShotIndex::new(i);
            adjacency[shot.from.get()].push(Neighbor {
                station: shot.to,
                shot: shot_index,
                reversed: false,
            });
            adjacency[shot.to.get()].push(Neighbor {
                station: shot.from,
                shot: shot_index,
                reversed: true,
            });
        }

        let mut anchors: Vec<StationIndex> = self
            .stations
            .iter()
            .enumerate()
            .filter(|(_, s)| s.fixed)
            .map(|(i, _)| StationIndex::new(i))
            .collect();
        anchors.sort_by(|a, b| self.stations[a.get()].name.cmp(&self.stations[b.get()].name));

        SurveyNetwork {
            stations: self.stations,
            names: self.names,
            shots: self.shots,
            anchors,
            adjacency,
            fallback_origin: self.fallback_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> SurveyNetwork {
        let mut builder = NetworkBuilder::new();
        let a = builder.intern("A");
        let b = builder.intern("B");
        let c = builder.intern("C");
        builder.set_fixed(a, Vector3D::new(0.0, 0.0, 0.0));
        builder.add_shot(a, b, Vector3D::new(0.0, 100.0, 0.0), 100.0, ShotFlags::default());
        builder.add_shot(
            b,
            c,
            Vector3D::new(50.0, 0.0, 0.0),
            50.0,
            ShotFlags {
                exclude_length: true,
                ..ShotFlags::default()
            },
        );
        builder.build()
    }

    #[test]
    fn test_interning_is_idempotent() {
        let mut builder = NetworkBuilder::new();
        let first = builder.intern("S1");
        let again = builder.intern("S1");
        assert_eq!(first, again);
        assert_eq!(builder.build().station_count(), 1);
    }

    #[test]
    fn test_adjacency_is_undirected() {
        let network = chain();
        let b = network.index_of("B").unwrap();
        let neighbors = network.neighbors(b);
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors[0].reversed);
        assert!(!neighbors[1].reversed);

        let shot = network.shot(neighbors[0].shot);
        assert_eq!(
            shot.oriented_delta(true),
            Vector3D::new(0.0, -100.0, 0.0)
        );
    }

    #[test]
    fn test_anchors_sorted_and_fixed() {
        let mut builder = NetworkBuilder::new();
        let z = builder.intern("Z");
        let a = builder.intern("A");
        builder.set_fixed(z, Vector3D::new(1.0, 1.0, 1.0));
        builder.set_fixed(a, Vector3D::new(2.0, 2.0, 2.0));
        let network = builder.build();

        let names: Vec<_> = network
            .anchors()
            .iter()
            .map(|&i| network.station(i).name.as_str())
            .collect();
        assert_eq!(names, ["A", "Z"]);
        assert_eq!(network.origin_name(z), Some("Z"));
    }

    #[test]
    fn test_surveyed_length_skips_excluded() {
        let network = chain();
        assert_eq!(network.surveyed_length(), 100.0);
    }
}
