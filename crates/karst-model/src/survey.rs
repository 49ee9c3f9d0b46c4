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

//! Surveys, shots, dates, and corrections.
//!
//! Everything here is a plain value emitted by the survey loader. Lengths
//! are decimal feet and angles decimal degrees; absent measurements are
//! `None`, which is distinct from a measured zero.

use crate::format::FormatDescriptor;

/// Upper length of a conventional station name; longer names are accepted
/// with a warning.
pub const STATION_NAME_LIMIT: usize = 12;

/// True when `name` is non-empty printable ASCII without blanks.
pub fn is_valid_station_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (0x21..=0x7f).contains(&b))
}

/// A survey date. Surveys without a date default to 1/1/1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SurveyDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Default for SurveyDate {
    fn default() -> Self {
        Self {
            year: 1,
            month: 1,
            day: 1,
        }
    }
}

impl SurveyDate {
    /// Creates a date after range validation (leap-year aware).
    pub fn new(month: u8, day: u8, year: u16) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if day < 1 || day > days_in_month(month, year) {
            return None;
        }
        Some(Self { year, month, day })
    }
}

impl std::fmt::Display for SurveyDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.month, self.day, self.year)
    }
}

/// Number of days in the given month, accounting for leap years.
pub fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Gregorian leap-year rule.
#[inline]
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Converts a depth-gauge reading into the equivalent inclination angle in
/// degrees.
///
/// The gauge records the depth change over the shot, positive meaning
/// descending, so a positive reading yields a negative inclination. A
/// reading may overshoot the tape by a small float tolerance and is
/// clamped; beyond that the measurement is geometrically impossible and
/// `None` is returned, as it is for a non-positive length.
pub fn depth_gauge_to_inclination(reading: f64, length: f64) -> Option<f64> {
    if length <= 0.0 {
        return None;
    }
    let ratio = -reading / length;
    if ratio.abs() > 1.0001 {
        return None;
    }
    Some(ratio.clamp(-1.0, 1.0).asin().to_degrees())
}

/// Inverse of [`depth_gauge_to_inclination`]: the gauge reading a shot of
/// the given length and inclination (degrees) would produce.
pub fn inclination_to_depth_gauge(inclination: f64, length: f64) -> f64 {
    -(length * inclination.to_radians().sin())
}

/// Per-shot flags from the `#|..#` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShotFlags {
    /// `L`: keep in the graph but exclude from length statistics.
    pub exclude_length: bool,
    /// `P`: keep in the graph but mark for plot omission.
    pub exclude_plot: bool,
    /// `X`: exclude from the network entirely.
    pub exclude_all: bool,
    /// `C`: the shot's delta is authoritative; the solver must not adjust it.
    pub no_adjust: bool,
}

impl ShotFlags {
    /// True when no flag is set.
    pub fn is_empty(&self) -> bool {
        *self == ShotFlags::default()
    }
}

/// A single raw shot between two stations.
///
/// `inclination` holds degrees for angle units; for depth-gauge surveys it
/// holds the raw gauge reading (feet, positive descending) and `is_depth`
/// is set so the geometric kernel can convert it against the shot length.
#[derive(Clone, Debug, PartialEq)]
pub struct Shot {
    pub from: String,
    pub to: String,
    /// Slope distance in feet.
    pub length: f64,
    /// Frontsight azimuth in degrees; `None` for the -999 sentinel.
    pub azimuth: Option<f64>,
    /// Frontsight inclination in degrees (or raw depth delta, see above).
    pub inclination: Option<f64>,
    pub is_depth: bool,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub up: Option<f64>,
    pub down: Option<f64>,
    /// Backsight azimuth, present only under redundant-backsight formats.
    pub azimuth2: Option<f64>,
    /// Backsight inclination, present only under redundant-backsight formats.
    pub inclination2: Option<f64>,
    pub flags: ShotFlags,
    pub comment: Option<String>,
}

impl Shot {
    /// Creates a bare shot with a length and frontsight reading; everything
    /// else empty. Convenient for tests and synthetic networks.
    pub fn of(
        from: impl Into<String>,
        to: impl Into<String>,
        length: f64,
        azimuth: f64,
        inclination: f64,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            length,
            azimuth: Some(azimuth),
            inclination: Some(inclination),
            is_depth: false,
            left: None,
            right: None,
            up: None,
            down: None,
            azimuth2: None,
            inclination2: None,
            flags: ShotFlags::default(),
            comment: None,
        }
    }
}

/// Frontsight instrument corrections, added to each reading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SightCorrections {
    pub azimuth: f64,
    pub inclination: f64,
    pub length: f64,
}

/// Backsight instrument corrections, added to each backsight reading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BacksightCorrections {
    pub azimuth: f64,
    pub inclination: f64,
}

/// One survey: a header and its ordered shots.
#[derive(Clone, Debug, PartialEq)]
pub struct Survey {
    pub cave_name: String,
    pub name: String,
    pub date: SurveyDate,
    pub comment: Option<String>,
    pub team: Option<String>,
    /// Declination in degrees, added to each azimuth.
    pub declination: f64,
    pub format: FormatDescriptor,
    pub corrections: SightCorrections,
    pub backsight_corrections: BacksightCorrections,
    pub shots: Vec<Shot>,
}

impl Survey {
    /// Creates an empty survey with default header values.
    pub fn named(cave_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cave_name: cave_name.into(),
            name: name.into(),
            date: SurveyDate::default(),
            comment: None,
            team: None,
            declination: 0.0,
            format: FormatDescriptor::default(),
            corrections: SightCorrections::default(),
            backsight_corrections: BacksightCorrections::default(),
            shots: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_names() {
        assert!(is_valid_station_name("A1"));
        assert!(is_valid_station_name("GR-17b"));
        assert!(!is_valid_station_name(""));
        assert!(!is_valid_station_name("A 1"));
        assert!(!is_valid_station_name("A\t1"));
    }

    #[test]
    fn test_date_validation() {
        assert!(SurveyDate::new(2, 29, 2024).is_some());
        assert!(SurveyDate::new(2, 29, 2023).is_none());
        assert!(SurveyDate::new(2, 29, 1900).is_none());
        assert!(SurveyDate::new(2, 29, 2000).is_some());
        assert!(SurveyDate::new(13, 1, 1999).is_none());
        assert!(SurveyDate::new(4, 31, 1999).is_none());
        assert_eq!(SurveyDate::default(), SurveyDate { year: 1, month: 1, day: 1 });
    }

    #[test]
    fn test_shot_of() {
        let shot = Shot::of("A", "B", 100.0, 45.0, -2.0);
        assert_eq!(shot.azimuth, Some(45.0));
        assert!(shot.flags.is_empty());
        assert!(!shot.is_depth);
    }

    #[test]
    fn test_depth_gauge_conversion() {
        // 5 ft deeper over a 10 ft tape is a 30 degree descent.
        let inclination = depth_gauge_to_inclination(5.0, 10.0).unwrap();
        assert!((inclination + 30.0).abs() < 1e-9);
        assert!((inclination_to_depth_gauge(inclination, 10.0) - 5.0).abs() < 1e-9);

        // Level and fully vertical shots.
        assert_eq!(depth_gauge_to_inclination(0.0, 10.0), Some(0.0));
        let down = depth_gauge_to_inclination(10.0, 10.0).unwrap();
        assert!((down + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_depth_gauge_limits() {
        // A hair over the tape is float noise; well past it is impossible.
        assert!(depth_gauge_to_inclination(10.0005, 10.0).is_some());
        assert_eq!(depth_gauge_to_inclination(15.0, 10.0), None);
        assert_eq!(depth_gauge_to_inclination(-15.0, 10.0), None);
        assert_eq!(depth_gauge_to_inclination(1.0, 0.0), None);
    }

    #[test]
    fn test_depth_gauge_round_trip() {
        for inclination in [-90.0, -33.25, 0.0, 12.5, 90.0] {
            let reading = inclination_to_depth_gauge(inclination, 42.0);
            let back = depth_gauge_to_inclination(reading, 42.0).unwrap();
            assert!((back - inclination).abs() < 1e-9);
        }
    }
}
