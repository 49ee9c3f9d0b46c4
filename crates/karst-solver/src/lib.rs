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

//! # Karst Solver
//!
//! **Traverse adjustment for propagated survey networks.**
//!
//! A solver is a capability: a function from a [`karst_net::network::SurveyNetwork`]
//! to a table of adjusted station positions. Two implementations are
//! provided:
//!
//! * [`identity::IdentityAdjuster`] — returns propagated positions
//!   unchanged.
//! * [`proportional::ProportionalAdjuster`] — distributes every anchor
//!   pair's misclosure across the network in proportion to graph distance,
//!   clamping each shot's length, heading, and inclination to a tolerance
//!   of its survey reading.
//!
//! Statistics of a run are summarised by [`stats::AdjustmentStatistics`].

pub mod adjuster;
pub mod identity;
pub mod proportional;
pub mod stats;

pub use adjuster::{StationPositions, SurveyAdjuster};
pub use identity::IdentityAdjuster;
pub use proportional::ProportionalAdjuster;
