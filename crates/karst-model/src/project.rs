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

//! The project descriptor.
//!
//! A project is an ordered list of survey-file entries plus the geographic
//! frame they share: base location, datum, zone, convergence, and the flag
//! set that gates shot-flag handling, declination policy, and LRUD
//! attachment.

use crate::format::{FormatDescriptor, LrudAttach};
use karst_core::math::vec3::Vector3D;
use karst_core::units::feet_from_meters;
use smallvec::SmallVec;

/// Unit a fixed station's coordinates are declared in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FixedUnit {
    #[default]
    Feet,
    Meters,
}

/// A station pinned to declared coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStation {
    pub name: String,
    pub unit: FixedUnit,
    pub east: f64,
    pub north: f64,
    pub vert: f64,
}

impl FixedStation {
    /// The declared position converted to feet.
    pub fn position_feet(&self) -> Vector3D {
        match self.unit {
            FixedUnit::Feet => Vector3D::new(self.east, self.north, self.vert),
            FixedUnit::Meters => Vector3D::new(
                feet_from_meters(self.east),
                feet_from_meters(self.north),
                feet_from_meters(self.vert),
            ),
        }
    }
}

/// One survey-file entry of the project.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileEntry {
    /// Path as written in the project file.
    pub path: String,
    /// Bare link-station names that bridge this file into the network.
    pub links: SmallVec<[String; 4]>,
    /// Link stations that additionally carry declared coordinates.
    pub fixed: Vec<FixedStation>,
    /// Enclosing folder names, outermost first.
    pub folder: Vec<String>,
}

impl FileEntry {
    /// File stem used to qualify renamed duplicate stations: the path with
    /// directories and the last extension stripped.
    pub fn stem(&self) -> &str {
        let name = self
            .path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str());
        match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        }
    }

    /// True when `name` is declared as a link (bare or fixed) of this entry.
    pub fn is_link(&self, name: &str) -> bool {
        self.links.iter().any(|l| l == name) || self.fixed.iter().any(|f| f.name == name)
    }
}

/// The project base location in UTM meters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BaseLocation {
    pub east: f64,
    pub north: f64,
    pub elevation: f64,
    pub zone: i32,
    /// Grid convergence at the base location, degrees.
    pub convergence: f64,
}

/// Declination policy selected by the `I`/`E`/`A` project flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeclinationMode {
    /// `I`: declination is ignored entirely.
    Ignore,
    /// `E`: the declination entered in each survey header is used.
    #[default]
    Entered,
    /// `A`: declination is computed from date and location via an external
    /// geomagnetic model.
    Auto,
}

/// The project flag set (`!` record). Uppercase enables, lowercase
/// disables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectFlags {
    /// `G`: project settings globally override file-level settings.
    ///
    /// Recorded for hosts; nothing inside the core consumes it. The record
    /// grammar carries no per-file settings blocks to override, and the
    /// file-level settings the core does model — the entered declination
    /// and the LRUD attachment side — are governed by the dedicated
    /// `I`/`E`/`A` and `O`/`T` flags.
    pub global_override: bool,
    /// `I`/`E`/`A` (one-of).
    pub declination: DeclinationMode,
    /// `V`: apply grid convergence.
    pub apply_convergence: bool,
    /// `O`: override the per-survey LRUD attachment.
    pub override_lrud: bool,
    /// `T`: attach LRUDs to the to-station (`t` = from-station).
    pub lrud_at_to: bool,
    /// `S`: honour shot flags at all.
    pub apply_shot_flags: bool,
    /// `X`: honour total-exclusion shot flags.
    pub apply_exclude_all: bool,
    /// `P`: honour plot-exclusion shot flags.
    pub apply_exclude_plot: bool,
    /// `L`: honour length-exclusion shot flags.
    pub apply_exclude_length: bool,
    /// `C`: honour closure-exclusion shot flags.
    pub apply_no_adjust: bool,
}

impl Default for ProjectFlags {
    /// Without a `!` record, shot flags are honoured and the entered
    /// declination is used; convergence and LRUD overrides are off.
    fn default() -> Self {
        Self {
            global_override: false,
            declination: DeclinationMode::Entered,
            apply_convergence: false,
            override_lrud: false,
            lrud_at_to: false,
            apply_shot_flags: true,
            apply_exclude_all: true,
            apply_exclude_plot: true,
            apply_exclude_length: true,
            apply_no_adjust: true,
        }
    }
}

impl ProjectFlags {
    /// Effective gate for a shot-flag class: the master switch `S` and the
    /// per-class flag must both be on.
    #[inline]
    pub fn honours_exclude_all(&self) -> bool {
        self.apply_shot_flags && self.apply_exclude_all
    }

    #[inline]
    pub fn honours_exclude_plot(&self) -> bool {
        self.apply_shot_flags && self.apply_exclude_plot
    }

    #[inline]
    pub fn honours_exclude_length(&self) -> bool {
        self.apply_shot_flags && self.apply_exclude_length
    }

    #[inline]
    pub fn honours_no_adjust(&self) -> bool {
        self.apply_shot_flags && self.apply_no_adjust
    }
}

/// A top-level `%`/`*` convergence record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceOverride {
    /// Convergence value in degrees. Retained even when disabled.
    pub value: f64,
    /// True for `%`, false for `*`.
    pub enabled: bool,
}

/// A parsed project.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Project {
    pub base: Option<BaseLocation>,
    /// Validated datum name, if any.
    pub datum: Option<String>,
    pub convergence_override: Option<ConvergenceOverride>,
    /// `$` zone override for fixed stations.
    pub zone_override: Option<i32>,
    pub flags: ProjectFlags,
    pub files: Vec<FileEntry>,
}

impl Project {
    /// The convergence to subtract from azimuths, or `None` when
    /// convergence is not applied.
    ///
    /// A `*` record disables application regardless of the `V` flag; a `%`
    /// record supplies the value directly; otherwise the `V` flag applies
    /// the base-location convergence.
    pub fn effective_convergence(&self) -> Option<f64> {
        match self.convergence_override {
            Some(ConvergenceOverride { enabled: false, .. }) => None,
            Some(ConvergenceOverride { enabled: true, value }) => Some(value),
            None => {
                if self.flags.apply_convergence {
                    self.base.map(|b| b.convergence)
                } else {
                    None
                }
            }
        }
    }

    /// The UTM zone governing fixed stations: the `$` override when
    /// present, the base-location zone otherwise.
    pub fn effective_zone(&self) -> Option<i32> {
        self.zone_override.or(self.base.map(|b| b.zone))
    }

    /// Which station a survey's LRUDs describe, after the project-level
    /// `O`/`T` override.
    pub fn effective_lrud_attach(&self, format: &FormatDescriptor) -> LrudAttach {
        if self.flags.override_lrud {
            if self.flags.lrud_at_to {
                LrudAttach::To
            } else {
                LrudAttach::From
            }
        } else {
            format.lrud_attach
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_station_units() {
        let fixed = FixedStation {
            name: "A1".into(),
            unit: FixedUnit::Meters,
            east: 1.0,
            north: 2.0,
            vert: 3.0,
        };
        let p = fixed.position_feet();
        assert!((p.east - 3.280_839_895).abs() < 1e-9);
        assert!((p.north - 6.561_679_79).abs() < 1e-8);
    }

    #[test]
    fn test_file_stem() {
        let mut entry = FileEntry::default();
        entry.path = "caves/north/FULFORD.DAT".into();
        assert_eq!(entry.stem(), "FULFORD");
        entry.path = "plain".into();
        assert_eq!(entry.stem(), "plain");
        entry.path = "dir\\other.v2.dat".into();
        assert_eq!(entry.stem(), "other.v2");
    }

    #[test]
    fn test_effective_convergence() {
        let mut project = Project::default();
        assert_eq!(project.effective_convergence(), None);

        project.base = Some(BaseLocation {
            east: 0.0,
            north: 0.0,
            elevation: 0.0,
            zone: 13,
            convergence: 1.5,
        });
        assert_eq!(project.effective_convergence(), None);

        project.flags.apply_convergence = true;
        assert_eq!(project.effective_convergence(), Some(1.5));

        project.convergence_override = Some(ConvergenceOverride {
            value: 0.75,
            enabled: true,
        });
        assert_eq!(project.effective_convergence(), Some(0.75));

        project.convergence_override = Some(ConvergenceOverride {
            value: 0.75,
            enabled: false,
        });
        assert_eq!(project.effective_convergence(), None);
    }

    #[test]
    fn test_lrud_attach_override() {
        let mut project = Project::default();
        let format = FormatDescriptor::default();
        assert_eq!(project.effective_lrud_attach(&format), LrudAttach::From);

        project.flags.override_lrud = true;
        project.flags.lrud_at_to = true;
        assert_eq!(project.effective_lrud_attach(&format), LrudAttach::To);
    }
}
