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

//! The shot-to-delta geometric kernel.
//!
//! Converts one raw shot into a Cartesian delta in feet:
//!
//! 1. Frontsight corrections are added to azimuth, inclination, and
//!    length; backsight corrections to the backsight readings.
//! 2. Under redundant-backsight formats, the reversed backsight
//!    (azimuth ± 180°, inclination negated) is averaged with the
//!    frontsight; a lone sight is used as-is.
//! 3. Declination is added to the azimuth; convergence, when applied,
//!    is subtracted.
//! 4. Depth-gauge readings (positive = descending) become an inclination
//!    via `asin`, clamped to ±length with a `geom.domain` diagnostic when
//!    the gauge exceeds the tape.
//! 5. The polar reading becomes a Cartesian delta. A missing azimuth means
//!    a vertical shot: the delta is purely vertical with the sign of the
//!    inclination.

use karst_core::math::polar::{mean_azimuth, normalize_azimuth, Polar};
use karst_core::math::vec3::Vector3D;
use karst_model::diag::{DiagnosticKind, Diagnostics, SourceLocation};
use karst_model::survey::{depth_gauge_to_inclination, Shot, Survey};

/// A shot reduced to Cartesian form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotVector {
    /// Displacement from the from-station to the to-station, feet.
    pub delta: Vector3D,
    /// Corrected slope distance, feet. Weights graph distances.
    pub length: f64,
}

/// Reduces one shot of `survey` to a Cartesian delta.
///
/// `declination` is the effective declination for the survey (the project's
/// declination policy is resolved by the caller); `convergence` is the grid
/// convergence to subtract, when applied. Returns `None` for shots the
/// kernel cannot reduce; a diagnostic explains why.
pub fn shot_delta(
    survey: &Survey,
    shot: &Shot,
    declination: f64,
    convergence: Option<f64>,
    source: &str,
    diag: &mut Diagnostics,
) -> Option<ShotVector> {
    let corrections = survey.corrections;
    let length = (shot.length + corrections.length).max(0.0);

    let front_azimuth = shot.azimuth.map(|a| a + corrections.azimuth);
    // Depth readings are lengths, not angles; angle corrections skip them.
    let front_inclination = if shot.is_depth {
        shot.inclination
    } else {
        shot.inclination.map(|i| i + corrections.inclination)
    };

    let (azimuth, inclination) = if survey.format.backsights {
        reconcile_backsight(survey, shot, front_azimuth, front_inclination)
    } else {
        (front_azimuth, front_inclination)
    };

    // Grid-referencing: declination shifts magnetic to true, convergence
    // shifts true to grid.
    let azimuth =
        azimuth.map(|a| normalize_azimuth(a + declination - convergence.unwrap_or(0.0)));

    let inclination_degrees = if shot.is_depth {
        depth_inclination(survey, shot, inclination, length, source, diag)?
    } else {
        inclination.unwrap_or(0.0)
    };

    let delta = match azimuth {
        Some(azimuth) => Polar::new(length, azimuth, inclination_degrees).to_delta(),
        // Vertical shot: no bearing applies.
        None => Vector3D::new(0.0, 0.0, length * inclination_degrees.to_radians().sin()),
    };

    Some(ShotVector { delta, length })
}

/// Averages the frontsight with the reversed, corrected backsight.
fn reconcile_backsight(
    survey: &Survey,
    shot: &Shot,
    front_azimuth: Option<f64>,
    front_inclination: Option<f64>,
) -> (Option<f64>, Option<f64>) {
    let corrections = survey.backsight_corrections;
    let reversed_azimuth = shot
        .azimuth2
        .map(|a| normalize_azimuth(a + corrections.azimuth + 180.0));
    let reversed_inclination = shot.inclination2.map(|i| -(i + corrections.inclination));

    let azimuth = match (front_azimuth, reversed_azimuth) {
        (Some(front), Some(back)) => Some(mean_azimuth(front, back)),
        (front, back) => front.or(back),
    };
    let inclination = match (front_inclination, reversed_inclination) {
        (Some(front), Some(back)) => Some((front + back) / 2.0),
        (front, back) => front.or(back),
    };
    (azimuth, inclination)
}

/// Converts a depth-gauge reading into an inclination angle.
///
/// The gauge reading is a depth change (positive = descending). A reading
/// beyond the tape length is geometrically impossible; it is clamped with
/// a diagnostic, and the shared conversion helper does the rest.
fn depth_inclination(
    survey: &Survey,
    shot: &Shot,
    reading: Option<f64>,
    length: f64,
    source: &str,
    diag: &mut Diagnostics,
) -> Option<f64> {
    let mut reading = reading.unwrap_or(0.0);

    if length <= 0.0 {
        if reading != 0.0 {
            diag.warning(
                DiagnosticKind::GeomDomain,
                format!(
                    "survey '{}' shot {}->{}: depth change {} on a zero-length shot",
                    survey.name, shot.from, shot.to, reading
                ),
                Some(SourceLocation::new(source, 0)),
            );
        }
        return Some(0.0);
    }

    if reading.abs() > length {
        diag.warning(
            DiagnosticKind::GeomDomain,
            format!(
                "survey '{}' shot {}->{}: depth change {} exceeds shot length {}; clamped",
                survey.name, shot.from, shot.to, reading, length
            ),
            Some(SourceLocation::new(source, 0)),
        );
        reading = reading.clamp(-length, length);
    }

    Some(depth_gauge_to_inclination(reading, length).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use karst_model::format::FormatDescriptor;
    use karst_model::survey::{BacksightCorrections, SightCorrections, Survey};

    const EPS: f64 = 1e-9;

    fn survey() -> Survey {
        Survey::named("CAVE", "T1")
    }

    fn delta_of(survey: &Survey, shot: &Shot) -> Vector3D {
        let mut diag = Diagnostics::new();
        shot_delta(survey, shot, 0.0, None, "test.dat", &mut diag)
            .unwrap()
            .delta
    }

    #[test]
    fn test_plain_frontsight() {
        let d = delta_of(&survey(), &Shot::of("A", "B", 100.0, 90.0, 0.0));
        assert!((d.east - 100.0).abs() < EPS);
        assert!(d.north.abs() < EPS);
        assert!(d.vert.abs() < EPS);
    }

    #[test]
    fn test_declination_and_convergence() {
        let survey = survey();
        let shot = Shot::of("A", "B", 100.0, 0.0, 0.0);
        let mut diag = Diagnostics::new();

        // +90 declination turns a north shot east; 90 of convergence turns
        // it back.
        let d = shot_delta(&survey, &shot, 90.0, None, "t", &mut diag)
            .unwrap()
            .delta;
        assert!((d.east - 100.0).abs() < EPS);

        let d = shot_delta(&survey, &shot, 90.0, Some(90.0), "t", &mut diag)
            .unwrap()
            .delta;
        assert!((d.north - 100.0).abs() < EPS);
    }

    #[test]
    fn test_frontsight_corrections() {
        let mut survey = survey();
        survey.corrections = SightCorrections {
            azimuth: 90.0,
            inclination: -10.0,
            length: 1.0,
        };
        let shot = Shot::of("A", "B", 99.0, 270.0, 10.0);
        let d = delta_of(&survey, &shot);
        // 270 + 90 = 360 -> north, inclination corrected back to level.
        assert!((d.north - 100.0).abs() < EPS);
        assert!(d.vert.abs() < EPS);
    }

    #[test]
    fn test_backsight_averaging() {
        let mut survey = survey();
        survey.format = FormatDescriptor::parse("DDDDLUDRLADB").unwrap();

        let mut shot = Shot::of("A", "B", 100.0, 10.0, 5.0);
        shot.azimuth2 = Some(190.0 + 4.0);
        shot.inclination2 = Some(-5.0 - 2.0);
        let d = delta_of(&survey, &shot);

        // Reversed backsight reads az 14, inc 7; averages are 12 and 6.
        let expected = Polar::new(100.0, 12.0, 6.0).to_delta();
        assert!((d.east - expected.east).abs() < EPS);
        assert!((d.north - expected.north).abs() < EPS);
        assert!((d.vert - expected.vert).abs() < EPS);
    }

    #[test]
    fn test_backsight_wraparound_average() {
        let mut survey = survey();
        survey.format = FormatDescriptor::parse("DDDDLUDRLADB").unwrap();

        let mut shot = Shot::of("A", "B", 10.0, 359.0, 0.0);
        shot.azimuth2 = Some(181.0);
        let d = delta_of(&survey, &shot);
        // 359 and reversed(181) = 1 average to due north, not south.
        assert!((d.north - 10.0).abs() < EPS);
    }

    #[test]
    fn test_backsight_corrections_applied() {
        let mut survey = survey();
        survey.format = FormatDescriptor::parse("DDDDLUDRLADB").unwrap();
        survey.backsight_corrections = BacksightCorrections {
            azimuth: 2.0,
            inclination: 1.0,
        };

        let mut shot = Shot::of("A", "B", 100.0, 0.0, 0.0);
        shot.azimuth = None;
        shot.inclination = None;
        shot.azimuth2 = Some(178.0);
        shot.inclination2 = Some(-1.0);
        let d = delta_of(&survey, &shot);

        // Only the backsight defines the shot: az (178+2)+180 = 0, inc 0.
        assert!((d.north - 100.0).abs() < EPS);
        assert!(d.vert.abs() < EPS);
    }

    #[test]
    fn test_vertical_sentinel_shot() {
        let mut down = Shot::of("A", "B", 25.0, 0.0, -90.0);
        down.azimuth = None;
        let d = delta_of(&survey(), &down);
        assert_eq!(d.east, 0.0);
        assert_eq!(d.north, 0.0);
        assert!((d.vert + 25.0).abs() < EPS);
    }

    #[test]
    fn test_zero_length_is_zero_vector() {
        let d = delta_of(&survey(), &Shot::of("A", "B", 0.0, 45.0, 45.0));
        assert_eq!(d, Vector3D::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_depth_gauge_descends() {
        let mut survey = survey();
        survey.format = FormatDescriptor::parse("DDDWLUDRLADN").unwrap();

        let mut shot = Shot::of("W1", "W2", 10.0, 0.0, 5.0);
        shot.is_depth = true;
        let mut diag = Diagnostics::new();
        let d = shot_delta(&survey, &shot, 0.0, None, "t", &mut diag)
            .unwrap()
            .delta;
        assert!(diag.is_empty());
        // Gauge +5 means 5 ft deeper over a 10 ft tape.
        assert!((d.vert + 5.0).abs() < EPS);
        assert!((d.horizontal_length() - (100.0 - 25.0f64).sqrt()).abs() < EPS);
    }

    #[test]
    fn test_depth_gauge_clamped_with_diagnostic() {
        let mut survey = survey();
        survey.format = FormatDescriptor::parse("DDDWLUDRLADN").unwrap();

        let mut shot = Shot::of("W1", "W2", 10.0, 0.0, 15.0);
        shot.is_depth = true;
        let mut diag = Diagnostics::new();
        let d = shot_delta(&survey, &shot, 0.0, None, "t", &mut diag)
            .unwrap()
            .delta;

        assert_eq!(diag.of_kind(DiagnosticKind::GeomDomain).count(), 1);
        assert!((d.vert + 10.0).abs() < EPS);
        assert!(d.horizontal_length() < 1e-6);
    }
}
