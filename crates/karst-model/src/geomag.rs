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

//! The geomagnetic-model capability.
//!
//! When the project selects automatic declination, the toolkit needs a
//! model that maps a location and date to a magnetic declination. The model
//! itself (IGRF, WMM, ...) is a host concern; the core only declares the
//! capability and falls back to the entered declination when none is
//! supplied.

use crate::survey::SurveyDate;

/// Maps a projected location and a date to a magnetic declination.
pub trait GeomagneticModel {
    /// Declination in degrees (positive east) at the given UTM location.
    ///
    /// * `east`/`north`/`elevation` are meters in the given zone.
    /// * `datum` is a name from the datum table.
    fn declination(
        &self,
        east: f64,
        north: f64,
        elevation: f64,
        datum: &str,
        zone: i32,
        date: SurveyDate,
    ) -> f64;
}

/// A model that always answers with a fixed declination. Useful for tests
/// and for hosts that pre-compute a single value per project.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantDeclination(pub f64);

impl GeomagneticModel for ConstantDeclination {
    fn declination(&self, _: f64, _: f64, _: f64, _: &str, _: i32, _: SurveyDate) -> f64 {
        self.0
    }
}
