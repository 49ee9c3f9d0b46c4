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

//! The static table of recognised geodetic datum names.
//!
//! Project files reference datums by exact string; the table below is the
//! authoritative list. [`is_known_datum`] performs the case-sensitive match
//! used during project parsing; [`normalize`] is a lenient helper for hosts
//! that accept user input.

/// Every datum name a project file may reference, in table order.
pub const DATUMS: &[&str] = &[
    "Adindan",
    "Arc 1950",
    "Arc 1960",
    "Australian 1966",
    "Australian 1984",
    "Camp Area Astro",
    "Cape",
    "European 1950",
    "European 1979",
    "Geodetic 1949",
    "Hong Kong 1963",
    "Hu Tzu Shan",
    "Indian",
    "North American 1927",
    "North American 1983",
    "Oman",
    "Ordnance Survey 1936",
    "Pulkovo 1942",
    "South American 1956",
    "South American 1969",
    "Tokyo",
    "WGS 1972",
    "WGS 1984",
];

/// Case-sensitive membership test against the datum table.
#[inline]
pub fn is_known_datum(name: &str) -> bool {
    DATUMS.contains(&name)
}

/// Lenient lookup: case-insensitive with whitespace collapsing.
///
/// Returns the canonical table entry when the input matches one, `None`
/// otherwise.
pub fn normalize(name: &str) -> Option<&'static str> {
    let folded = fold(name);
    DATUMS.iter().find(|d| fold(d) == folded).copied()
}

fn fold(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
