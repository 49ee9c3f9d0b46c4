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

//! The survey format descriptor.
//!
//! Each survey header carries an 11-, 12-, or 13-character descriptor that
//! governs how its shot rows are interpreted:
//!
//! | Position | Meaning |
//! |---|---|
//! | 1 | bearing unit: `D` degrees, `Q` quads, `R` grads |
//! | 2 | length unit: `D` decimal feet, `I` feet+inches, `M` meters |
//! | 3 | passage (LRUD) unit: same letters as length |
//! | 4 | inclination unit: `D` degrees, `G` percent grade, `M` deg+min, `R` grads, `W` depth gauge |
//! | 5–8 | LRUD column order, a permutation of `U D R L` |
//! | 9–11 | shot column order, a permutation of `L A D` |
//! | 12 | backsight mode: `B` redundant, `N` (or absent) none |
//! | 13 | LRUD attach: `F` from-station, `T` to-station |
//!
//! Redundant backsights and depth-gauge inclination are mutually exclusive.

use std::str::FromStr;

/// Unit of a compass bearing column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BearingUnit {
    #[default]
    Degrees,
    Quads,
    Grads,
}

impl BearingUnit {
    /// Converts a raw bearing in this unit to decimal degrees.
    ///
    /// Quads encode the quadrant in the hundreds digit (0 = N→E, 1 = S→E,
    /// 2 = S→W, 3 = N→W) and the in-quadrant angle in the remainder.
    pub fn to_degrees(self, value: f64) -> f64 {
        match self {
            BearingUnit::Degrees => value,
            BearingUnit::Grads => value * 0.9,
            BearingUnit::Quads => {
                let quadrant = (value / 100.0).floor();
                let t = value - quadrant * 100.0;
                match quadrant as i64 {
                    0 => t,
                    1 => 180.0 - t,
                    2 => 180.0 + t,
                    _ => 360.0 - t,
                }
            }
        }
    }
}

/// Unit of a length or passage column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthUnit {
    #[default]
    DecimalFeet,
    FeetAndInches,
    Meters,
}

impl LengthUnit {
    /// Converts a raw length in this unit to decimal feet.
    ///
    /// Feet+inches uses the integer+fraction convention: the integer part
    /// is whole feet and the fractional part times 100 is inches, so 5.06
    /// reads as 5 ft 6 in.
    pub fn to_feet(self, value: f64) -> f64 {
        match self {
            LengthUnit::DecimalFeet => value,
            LengthUnit::Meters => karst_core::units::feet_from_meters(value),
            LengthUnit::FeetAndInches => {
                let sign = if value < 0.0 { -1.0 } else { 1.0 };
                let v = value.abs();
                let feet = v.trunc();
                let inches = (v - feet) * 100.0;
                sign * (feet + inches / 12.0)
            }
        }
    }
}

/// Unit of an inclination column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InclinationUnit {
    #[default]
    Degrees,
    PercentGrade,
    DegreesAndMinutes,
    Grads,
    DepthGauge,
}

impl InclinationUnit {
    /// Converts a raw inclination in this unit to decimal degrees.
    ///
    /// Depth-gauge readings are not angles; they pass through unchanged and
    /// are converted by the geometric kernel, which knows the shot length.
    pub fn to_degrees(self, value: f64) -> f64 {
        match self {
            InclinationUnit::Degrees | InclinationUnit::DepthGauge => value,
            InclinationUnit::PercentGrade => (value / 100.0).atan().to_degrees(),
            InclinationUnit::Grads => value * 0.9,
            InclinationUnit::DegreesAndMinutes => {
                let sign = if value < 0.0 { -1.0 } else { 1.0 };
                let v = value.abs();
                let degrees = v.trunc();
                let minutes = (v - degrees) * 100.0;
                sign * (degrees + minutes / 60.0)
            }
        }
    }

    /// True for the depth-gauge pseudo-unit.
    #[inline]
    pub fn is_depth(self) -> bool {
        matches!(self, InclinationUnit::DepthGauge)
    }
}

/// One of the four passage-wall distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LrudItem {
    Left,
    Right,
    Up,
    Down,
}

/// One of the three shot measurement columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotItem {
    Length,
    Azimuth,
    Inclination,
}

/// Which station a shot's LRUD readings describe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LrudAttach {
    #[default]
    From,
    To,
}

/// The error type for format-descriptor parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The descriptor is not 11, 12, or 13 characters long.
    Length(usize),
    /// An unexpected character at the given zero-based position.
    UnknownCode { position: usize, found: char },
    /// Redundant backsights combined with depth-gauge inclination.
    BacksightDepthConflict,
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Length(len) => {
                write!(f, "format descriptor must be 11 to 13 characters, got {len}")
            }
            FormatError::UnknownCode { position, found } => {
                write!(f, "unexpected code '{found}' at descriptor position {position}")
            }
            FormatError::BacksightDepthConflict => {
                write!(f, "redundant backsights cannot be combined with a depth gauge")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// A parsed, validated format descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub bearing_unit: BearingUnit,
    pub length_unit: LengthUnit,
    pub passage_unit: LengthUnit,
    pub inclination_unit: InclinationUnit,
    pub lrud_order: [LrudItem; 4],
    pub shot_order: [ShotItem; 3],
    /// True when shot rows carry redundant backsight columns.
    pub backsights: bool,
    pub lrud_attach: LrudAttach,
}

impl Default for FormatDescriptor {
    /// The conventional descriptor: all degrees, decimal feet, `LUDR`
    /// passage order, `LAD` shot order, no backsights, from-station LRUDs.
    fn default() -> Self {
        Self {
            bearing_unit: BearingUnit::Degrees,
            length_unit: LengthUnit::DecimalFeet,
            passage_unit: LengthUnit::DecimalFeet,
            inclination_unit: InclinationUnit::Degrees,
            lrud_order: [LrudItem::Left, LrudItem::Up, LrudItem::Down, LrudItem::Right],
            shot_order: [ShotItem::Length, ShotItem::Azimuth, ShotItem::Inclination],
            backsights: false,
            lrud_attach: LrudAttach::From,
        }
    }
}

impl FormatDescriptor {
    /// Parses an 11-, 12-, or 13-character descriptor.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let chars: Vec<char> = text.trim().chars().collect();
        if !(11..=13).contains(&chars.len()) {
            return Err(FormatError::Length(chars.len()));
        }

        let bearing_unit = match chars[0] {
            'D' => BearingUnit::Degrees,
            'Q' => BearingUnit::Quads,
            'R' => BearingUnit::Grads,
            c => return Err(FormatError::UnknownCode { position: 0, found: c }),
        };
        let length_unit = Self::length_unit_at(chars[1], 1)?;
        let passage_unit = Self::length_unit_at(chars[2], 2)?;
        let inclination_unit = match chars[3] {
            'D' => InclinationUnit::Degrees,
            'G' => InclinationUnit::PercentGrade,
            'M' => InclinationUnit::DegreesAndMinutes,
            'R' => InclinationUnit::Grads,
            'W' => InclinationUnit::DepthGauge,
            c => return Err(FormatError::UnknownCode { position: 3, found: c }),
        };

        let mut lrud_order = [LrudItem::Left; 4];
        for (offset, slot) in lrud_order.iter_mut().enumerate() {
            let position = 4 + offset;
            *slot = match chars[position] {
                'L' => LrudItem::Left,
                'R' => LrudItem::Right,
                'U' => LrudItem::Up,
                'D' => LrudItem::Down,
                c => return Err(FormatError::UnknownCode { position, found: c }),
            };
        }

        let mut shot_order = [ShotItem::Length; 3];
        for (offset, slot) in shot_order.iter_mut().enumerate() {
            let position = 8 + offset;
            *slot = match chars[position] {
                'L' => ShotItem::Length,
                'A' => ShotItem::Azimuth,
                'D' => ShotItem::Inclination,
                c => return Err(FormatError::UnknownCode { position, found: c }),
            };
        }

        let backsights = match chars.get(11) {
            None | Some('N') => false,
            Some('B') => true,
            Some(&c) => return Err(FormatError::UnknownCode { position: 11, found: c }),
        };

        let lrud_attach = match chars.get(12) {
            None => LrudAttach::From,
            Some('F') => LrudAttach::From,
            Some('T') => LrudAttach::To,
            Some(&c) => return Err(FormatError::UnknownCode { position: 12, found: c }),
        };

        if backsights && inclination_unit.is_depth() {
            return Err(FormatError::BacksightDepthConflict);
        }

        Ok(Self {
            bearing_unit,
            length_unit,
            passage_unit,
            inclination_unit,
            lrud_order,
            shot_order,
            backsights,
            lrud_attach,
        })
    }

    fn length_unit_at(c: char, position: usize) -> Result<LengthUnit, FormatError> {
        match c {
            'D' => Ok(LengthUnit::DecimalFeet),
            'I' => Ok(LengthUnit::FeetAndInches),
            'M' => Ok(LengthUnit::Meters),
            _ => Err(FormatError::UnknownCode { position, found: c }),
        }
    }
}

impl FromStr for FormatDescriptor {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_descriptor() {
        let fmt = FormatDescriptor::parse("DDDDLUDRLAD").unwrap();
        assert_eq!(fmt, FormatDescriptor::default());
        assert!(!fmt.backsights);
    }

    #[test]
    fn test_parse_with_backsights_and_attach() {
        let fmt = FormatDescriptor::parse("DMMDLRUDADLBT").unwrap();
        assert_eq!(fmt.length_unit, LengthUnit::Meters);
        assert_eq!(fmt.passage_unit, LengthUnit::Meters);
        assert_eq!(
            fmt.lrud_order,
            [LrudItem::Left, LrudItem::Right, LrudItem::Up, LrudItem::Down]
        );
        assert_eq!(
            fmt.shot_order,
            [ShotItem::Azimuth, ShotItem::Inclination, ShotItem::Length]
        );
        assert!(fmt.backsights);
        assert_eq!(fmt.lrud_attach, LrudAttach::To);
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(FormatDescriptor::parse("DDDD"), Err(FormatError::Length(4)));
        assert_eq!(
            FormatDescriptor::parse("DDDDLUDRLADBFX"),
            Err(FormatError::Length(14))
        );
        assert!(FormatDescriptor::parse("DDDDLUDRLAD").is_ok());
        assert!(FormatDescriptor::parse("DDDDLUDRLADB").is_ok());
        assert!(FormatDescriptor::parse("DDDDLUDRLADBF").is_ok());
    }

    #[test]
    fn test_backsight_depth_conflict() {
        assert_eq!(
            FormatDescriptor::parse("DDDWLUDRLADB"),
            Err(FormatError::BacksightDepthConflict)
        );
        assert!(FormatDescriptor::parse("DDDWLUDRLADN").is_ok());
    }

    #[test]
    fn test_unknown_code_position() {
        assert_eq!(
            FormatDescriptor::parse("XDDDLUDRLAD"),
            Err(FormatError::UnknownCode { position: 0, found: 'X' })
        );
    }

    #[test]
    fn test_unit_conversions() {
        assert!((BearingUnit::Grads.to_degrees(400.0) - 360.0).abs() < 1e-12);
        assert!((BearingUnit::Quads.to_degrees(145.0) - 135.0).abs() < 1e-12);
        assert!((BearingUnit::Quads.to_degrees(330.0) - 330.0).abs() < 1e-12);
        assert!((LengthUnit::Meters.to_feet(1.0) - 3.280_839_895).abs() < 1e-9);
        assert!((LengthUnit::FeetAndInches.to_feet(5.06) - 5.5).abs() < 1e-9);
        assert!((LengthUnit::FeetAndInches.to_feet(-2.03) + 2.25).abs() < 1e-9);
        assert!((InclinationUnit::PercentGrade.to_degrees(100.0) - 45.0).abs() < 1e-9);
        assert!((InclinationUnit::DegreesAndMinutes.to_degrees(10.30) - 10.5).abs() < 1e-9);
        assert!((InclinationUnit::Grads.to_degrees(100.0) - 90.0).abs() < 1e-12);
    }
}
