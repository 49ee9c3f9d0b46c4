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

//! Polar ↔ Cartesian conversion for survey shots.
//!
//! A polar reading is `(length, azimuth, inclination)`:
//!
//! * `length` is the positive slope distance in feet.
//! * `azimuth` is decimal degrees clockwise from grid north.
//! * `inclination` is the signed elevation angle in decimal degrees,
//!   positive upward, in `[-90, +90]`.
//!
//! The conversion into a [`Vector3D`] delta is
//!
//! ```text
//! east  = length · cos(inc) · sin(az)
//! north = length · cos(inc) · cos(az)
//! vert  = length · sin(inc)
//! ```
//!
//! which makes a zero azimuth point due grid north and a +90° inclination
//! point straight up.

use crate::math::vec3::Vector3D;

/// A shot reading in polar form (feet, degrees).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polar {
    pub length: f64,
    pub azimuth: f64,
    pub inclination: f64,
}

impl Polar {
    /// Creates a new polar reading.
    #[inline]
    pub const fn new(length: f64, azimuth: f64, inclination: f64) -> Self {
        Self {
            length,
            azimuth,
            inclination,
        }
    }

    /// Converts the reading into a Cartesian delta.
    #[inline]
    pub fn to_delta(self) -> Vector3D {
        let az = self.azimuth.to_radians();
        let inc = self.inclination.to_radians();
        let horizontal = self.length * inc.cos();
        Vector3D::new(
            horizontal * az.sin(),
            horizontal * az.cos(),
            self.length * inc.sin(),
        )
    }

    /// Decomposes a Cartesian delta back into a polar reading.
    ///
    /// The azimuth of a purely vertical (or zero) delta is 0; the
    /// inclination of a zero delta is 0.
    pub fn from_delta(delta: Vector3D) -> Self {
        let length = delta.length();
        if length == 0.0 {
            return Polar::new(0.0, 0.0, 0.0);
        }
        let horizontal = delta.horizontal_length();
        let azimuth = if horizontal == 0.0 {
            0.0
        } else {
            normalize_azimuth(delta.east.atan2(delta.north).to_degrees())
        };
        let inclination = (delta.vert / length).clamp(-1.0, 1.0).asin().to_degrees();
        Polar::new(length, azimuth, inclination)
    }
}

/// Normalises an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Smallest signed difference `b - a` between two azimuths, in `(-180, 180]`.
#[inline]
pub fn azimuth_difference(a: f64, b: f64) -> f64 {
    let mut diff = normalize_azimuth(b) - normalize_azimuth(a);
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

/// Circular mean of two azimuths in degrees.
///
/// Averages along the shorter arc so that 359° and 1° average to 0°, not
/// 180°.
#[inline]
pub fn mean_azimuth(a: f64, b: f64) -> f64 {
    normalize_azimuth(normalize_azimuth(a) + azimuth_difference(a, b) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    #[test]
    fn test_cardinal_directions() {
        let north = Polar::new(100.0, 0.0, 0.0).to_delta();
        assert_close(north.east, 0.0);
        assert_close(north.north, 100.0);
        assert_close(north.vert, 0.0);

        let east = Polar::new(100.0, 90.0, 0.0).to_delta();
        assert_close(east.east, 100.0);
        assert_close(east.north, 0.0);

        let up = Polar::new(50.0, 0.0, 90.0).to_delta();
        assert_close(up.vert, 50.0);
        assert_close(up.horizontal_length(), 0.0);
    }

    #[test]
    fn test_round_trip_identity() {
        // Finite readings with length > 0, inc in [-90, 90], az in [0, 360)
        // must survive a polar -> Cartesian -> polar round trip.
        for &(len, az, inc) in &[
            (1.0, 0.0, 0.0),
            (100.0, 359.5, -89.0),
            (42.5, 180.0, 45.0),
            (7.0, 90.0, -45.0),
            (12.0, 271.25, 12.5),
        ] {
            let p = Polar::new(len, az, inc);
            let q = Polar::from_delta(p.to_delta());
            assert_close(p.length, q.length);
            assert_close(p.azimuth, q.azimuth);
            assert_close(p.inclination, q.inclination);
        }
    }

    #[test]
    fn test_zero_and_vertical_decomposition() {
        let zero = Polar::from_delta(Vector3D::new(0.0, 0.0, 0.0));
        assert_eq!(zero, Polar::new(0.0, 0.0, 0.0));

        let down = Polar::from_delta(Vector3D::new(0.0, 0.0, -10.0));
        assert_close(down.length, 10.0);
        assert_close(down.azimuth, 0.0);
        assert_close(down.inclination, -90.0);
    }

    #[test]
    fn test_azimuth_helpers() {
        assert_close(normalize_azimuth(-90.0), 270.0);
        assert_close(normalize_azimuth(720.0), 0.0);
        assert_close(azimuth_difference(350.0, 10.0), 20.0);
        assert_close(azimuth_difference(10.0, 350.0), -20.0);
        assert_close(mean_azimuth(359.0, 1.0), 0.0);
        assert_close(mean_azimuth(90.0, 270.0), 180.0);
        assert_close(mean_azimuth(10.0, 20.0), 15.0);
    }
}
