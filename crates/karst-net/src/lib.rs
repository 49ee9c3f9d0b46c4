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

//! # Karst Net
//!
//! **Network assembly and coordinate propagation.**
//!
//! This crate turns parsed project and survey data into a single station
//! network with initial coordinates:
//!
//! * **`delta`**: the geometric kernel that converts one shot's polar
//!   reading — honouring corrections, backsights, declination, and
//!   convergence — into a Cartesian delta in feet.
//! * **`network`**: the assembled [`network::SurveyNetwork`]: interned
//!   stations, directed shots, the anchor set, and the undirected adjacency
//!   built once at assembly.
//! * **`assemble`**: merges shots across files under link-station renaming
//!   and materialises fixed stations at their declared coordinates.
//! * **`propagate`**: the multi-source breadth-first walk that assigns an
//!   initial position and an origin tag to every reachable station.
//!
//! ## Ordering
//!
//! Everything downstream of the assembler is deterministic: adjacency
//! neighbour lists follow shot insertion order (which follows project file
//! order), the propagation queue seeds anchors in sorted name order, and
//! the walk itself is plain FIFO.

pub mod assemble;
pub mod delta;
pub mod network;
pub mod propagate;
