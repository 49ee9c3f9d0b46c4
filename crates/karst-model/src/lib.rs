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

//! # Karst Model
//!
//! **The Domain Model for the Karst Cave-Survey Processing Toolkit.**
//!
//! This crate defines the data structures that describe a cave-survey
//! project — surveys, shots, format descriptors, fixed stations, project
//! flags — and the loaders that turn raw project and survey byte streams
//! into validated model values.
//!
//! ## Architecture
//!
//! The crate is designed around a strict separation between **parsing** and
//! **computation**:
//!
//! * **`diag`**: severity-tagged diagnostics with source locations. Fatal
//!   problems are error types; everything else accumulates in a buffer.
//! * **`datum`**: the static table of recognised geodetic datum names.
//! * **`format`**: the format descriptor that governs unit interpretation
//!   and column order for a survey's shot rows.
//! * **`survey`**: surveys, shots, dates, corrections, shot flags.
//! * **`project`**: the project descriptor — file membership, folders, link
//!   and fixed stations, base location, flags.
//! * **`geomag`**: the capability consumed when declination is computed
//!   from date and location rather than taken from the survey header.
//! * **`loading`**: the project-file and survey-file loaders. Loaders
//!   accept byte slices; file I/O is the caller's responsibility.
//!
//! ## Design Philosophy
//!
//! 1. **Immutable values**: loaders emit plain value objects; nothing in
//!    this crate mutates after construction.
//! 2. **One canonical unit**: all lengths are decimal feet and all angles
//!    decimal degrees once parsing completes.
//! 3. **Fail soft**: a malformed shot row costs one row, not the file; a
//!    malformed header costs one survey, not the project.

pub mod datum;
pub mod diag;
pub mod format;
pub mod geomag;
pub mod loading;
pub mod project;
pub mod survey;
