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

//! # Karst Core
//!
//! **Foundation primitives for the karst cave-survey processing toolkit.**
//!
//! This crate contains the dependency-free building blocks shared by the
//! model, network, and solver layers:
//!
//! * **`math`**: the 3-D displacement vector in survey coordinates and the
//!   polar ↔ Cartesian conversions that underpin every shot computation.
//! * **`units`**: the canonical length-unit constants. Everything inside the
//!   toolkit is decimal feet; conversion happens exactly once, at parse time.
//! * **`utils`**: strongly typed index wrappers so that station and shot
//!   indices cannot be confused at compile time.
//!
//! ## Design Philosophy
//!
//! 1. **Value semantics**: vectors and polar readings are small `Copy` types.
//! 2. **One canonical unit**: feet and decimal degrees internally; no unit
//!    state is threaded through the geometry.
//! 3. **Determinism**: all arithmetic is 64-bit IEEE-754 with a fixed
//!    evaluation order, so identical inputs produce bit-identical networks.

pub mod math;
pub mod units;
pub mod utils;
