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

//! Canonical length-unit constants.
//!
//! The toolkit stores every distance in decimal feet. Inputs declared in
//! meters are converted exactly once, at parse time, using the constants
//! below.

/// Feet per meter (international foot).
pub const METERS_TO_FEET: f64 = 3.280_839_895;

/// Meters per foot (international foot).
pub const FEET_TO_METERS: f64 = 0.3048;

/// Converts a value in meters to decimal feet.
#[inline]
pub fn feet_from_meters(meters: f64) -> f64 {
    meters * METERS_TO_FEET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_round_trip() {
        let feet = feet_from_meters(100.0);
        assert!((feet - 328.083_989_5).abs() < 1e-9);
        assert!((feet * FEET_TO_METERS - 100.0).abs() < 1e-6);
    }
}
