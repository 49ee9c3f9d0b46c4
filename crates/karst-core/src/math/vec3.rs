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

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// An immutable 3-D displacement in survey coordinates.
///
/// Components are `(east, north, vert)` in decimal feet. `east` and `north`
/// are grid directions (not true/magnetic); `vert` is positive upward.
///
/// # Examples
///
/// ```rust
/// # use karst_core::math::vec3::Vector3D;
///
/// let a = Vector3D::new(3.0, 0.0, 4.0);
/// assert_eq!(a.length(), 5.0);
/// assert_eq!(a + a, a * 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3D {
    pub east: f64,
    pub north: f64,
    pub vert: f64,
}

/// The zero displacement.
pub const ZERO: Vector3D = Vector3D {
    east: 0.0,
    north: 0.0,
    vert: 0.0,
};

impl Vector3D {
    /// Creates a new vector from its components.
    #[inline]
    pub const fn new(east: f64, north: f64, vert: f64) -> Self {
        Self { east, north, vert }
    }

    /// Euclidean length of the vector in feet.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.east * self.east + self.north * self.north + self.vert * self.vert).sqrt()
    }

    /// Horizontal (east/north plane) length of the vector in feet.
    #[inline]
    pub fn horizontal_length(&self) -> f64 {
        (self.east * self.east + self.north * self.north).sqrt()
    }

    /// Returns true if every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.east.is_finite() && self.north.is_finite() && self.vert.is_finite()
    }

    /// Arithmetic mean of a non-empty slice of vectors.
    ///
    /// Returns [`ZERO`] for an empty slice.
    pub fn mean(vectors: &[Vector3D]) -> Vector3D {
        if vectors.is_empty() {
            return ZERO;
        }
        let mut sum = ZERO;
        for v in vectors {
            sum += *v;
        }
        sum * (1.0 / vectors.len() as f64)
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.east + rhs.east, self.north + rhs.north, self.vert + rhs.vert)
    }
}

impl AddAssign for Vector3D {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3D) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.east - rhs.east, self.north - rhs.north, self.vert - rhs.vert)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn neg(self) -> Vector3D {
        Vector3D::new(-self.east, -self.north, -self.vert)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn mul(self, scalar: f64) -> Vector3D {
        Vector3D::new(self.east * scalar, self.north * scalar, self.vert * scalar)
    }
}

impl std::fmt::Display for Vector3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.east, self.north, self.vert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sub_neg() {
        let a = Vector3D::new(1.0, 2.0, 3.0);
        let b = Vector3D::new(-4.0, 0.5, 1.0);
        assert_eq!(a + b, Vector3D::new(-3.0, 2.5, 4.0));
        assert_eq!(a - b, Vector3D::new(5.0, 1.5, 2.0));
        assert_eq!(-a, Vector3D::new(-1.0, -2.0, -3.0));
        assert_eq!(a + (-a), ZERO);
    }

    #[test]
    fn test_scalar_mul_and_length() {
        let v = Vector3D::new(2.0, 3.0, 6.0);
        assert_eq!(v.length(), 7.0);
        assert_eq!((v * 2.0).length(), 14.0);
        assert_eq!(ZERO.length(), 0.0);
    }

    #[test]
    fn test_mean() {
        let vs = [
            Vector3D::new(0.0, 0.0, 0.0),
            Vector3D::new(2.0, 4.0, -2.0),
        ];
        assert_eq!(Vector3D::mean(&vs), Vector3D::new(1.0, 2.0, -1.0));
        assert_eq!(Vector3D::mean(&[]), ZERO);
    }
}
