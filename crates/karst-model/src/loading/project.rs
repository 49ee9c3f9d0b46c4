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

//! Project-file loader.
//!
//! The project file is a stream of records, each terminated by `;`. The
//! leading character selects the record type:
//!
//! ```text
//! #path,link,name[F,e,n,v],...;   survey-file entry with links and fixed stations
//! [Folder;   ...   ];             folder open / close (nest freely)
//! @e,n,elev,zone,conv;            base location (UTM meters)
//! &Datum Name;                    datum, validated against the datum table
//! %conv;  *conv;                  convergence value, applied / retained-but-disabled
//! $zone;                          UTM zone override for fixed stations
//! !GEVtSXPLC;                     project flags (case = enable/disable)
//! / comment to the next / or end of line
//! ```
//!
//! Lines starting with any other character are comments. Parse errors are
//! fatal: the project frame must be trusted before any survey data is
//! assembled against it.

use crate::datum::is_known_datum;
use crate::project::{
    BaseLocation, ConvergenceOverride, DeclinationMode, FileEntry, FixedStation, FixedUnit,
    Project, ProjectFlags,
};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?(\d+(\.\d*)?|\.\d+)").unwrap());
static FILE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^,;/]+").unwrap());
static LINK_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^,;/\[\]]+").unwrap());
static DATUM_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^;/]+").unwrap());

/// The error type for project-file loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectParseError {
    /// A malformed record. Carries the zero-based line and column.
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    /// Unmatched folder brackets at end of input.
    Structure {
        line: usize,
        column: usize,
        message: String,
    },
}

impl ProjectParseError {
    /// Zero-based line the error was detected on.
    pub fn line(&self) -> usize {
        match self {
            ProjectParseError::Parse { line, .. } => *line,
            ProjectParseError::Structure { line, .. } => *line,
        }
    }

    /// Zero-based column (byte offset within the line).
    pub fn column(&self) -> usize {
        match self {
            ProjectParseError::Parse { column, .. } => *column,
            ProjectParseError::Structure { column, .. } => *column,
        }
    }
}

impl std::fmt::Display for ProjectParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectParseError::Parse { line, column, message } => {
                write!(f, "project parse error at line {line}, column {column}: {message}")
            }
            ProjectParseError::Structure { line, column, message } => {
                write!(f, "project structure error at line {line}, column {column}: {message}")
            }
        }
    }
}

impl std::error::Error for ProjectParseError {}

/// Parses a project descriptor from an 8-bit ASCII byte slice.
pub fn parse_project(bytes: &[u8]) -> Result<Project, ProjectParseError> {
    ProjectCursor::new(bytes).parse()
}

/// A cursor over the raw record stream.
struct ProjectCursor<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    /// Byte offset where the current line begins; `pos - line_start` is
    /// the column.
    line_start: usize,
}

impl<'a> ProjectCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 0,
            line_start: 0,
        }
    }

    fn parse(mut self) -> Result<Project, ProjectParseError> {
        let mut project = Project::default();
        let mut folders: Vec<String> = Vec::new();

        while self.pos < self.data.len() {
            self.skip_whitespace();
            let Some(c) = self.bump() else { break };

            match c {
                b'#' => {
                    let entry = self.parse_file_entry(&folders)?;
                    project.files.push(entry);
                }
                b'@' => project.base = Some(self.parse_base_location()?),
                b'&' => project.datum = Some(self.parse_datum()?),
                b'%' => {
                    project.convergence_override = Some(ConvergenceOverride {
                        value: self.parse_convergence()?,
                        enabled: true,
                    });
                }
                b'*' => {
                    project.convergence_override = Some(ConvergenceOverride {
                        value: self.parse_convergence()?,
                        enabled: false,
                    });
                }
                b'$' => project.zone_override = Some(self.parse_zone(false)?),
                b'!' => project.flags = self.parse_flags()?,
                b'[' => folders.push(self.parse_folder_open()?),
                b']' => {
                    self.skip_whitespace();
                    self.expect(b';')?;
                    if folders.pop().is_none() {
                        return Err(self.structure_error("folder close without a matching open"));
                    }
                }
                b'/' => self.skip_comment(),
                // Every other line is a comment.
                _ => self.skip_to_end_of_line(),
            }
        }

        if !folders.is_empty() {
            return Err(self.structure_error(format!(
                "{} folder(s) left open at end of input",
                folders.len()
            )));
        }

        Ok(project)
    }

    // -- record parsers ----------------------------------------------------

    fn parse_file_entry(&mut self, folders: &[String]) -> Result<FileEntry, ProjectParseError> {
        let path = self.expect_match("file name", &FILE_NAME)?;

        let mut entry = FileEntry {
            path,
            folder: folders.to_vec(),
            ..FileEntry::default()
        };

        loop {
            self.skip_ws_and_comments();
            match self.bump() {
                Some(b';') => return Ok(entry),
                Some(b',') => {
                    self.skip_ws_and_comments();
                    let name = self.expect_match("station name", &LINK_NAME)?;
                    self.skip_ws_and_comments();
                    if self.peek() == Some(b'[') {
                        self.pos += 1;
                        let fixed = self.parse_fixed_coordinates(name)?;
                        entry.fixed.push(fixed);
                    } else {
                        entry.links.push(name.into());
                    }
                }
                Some(c) => {
                    return Err(self.parse_error(format!(
                        "unexpected character '{}' in file entry",
                        c as char
                    )));
                }
                None => {
                    return Err(self.parse_error("unterminated file entry (missing ';')"));
                }
            }
        }
    }

    /// Parses `unit,east,north,vert]` after the opening bracket. Inside the
    /// brackets any byte that is not part of a number or the unit acts as a
    /// separator.
    fn parse_fixed_coordinates(&mut self, name: String) -> Result<FixedStation, ProjectParseError> {
        self.skip_ws_and_comments();
        let unit = match self.bump() {
            Some(b'F') | Some(b'f') => FixedUnit::Feet,
            Some(b'M') | Some(b'm') => FixedUnit::Meters,
            Some(c) => {
                return Err(self.parse_error(format!(
                    "invalid length unit '{}' for fixed station {name}",
                    c as char
                )));
            }
            None => return Err(self.parse_error("unterminated fixed station (missing ']')")),
        };

        let mut coordinates = [0.0; 3];
        for slot in coordinates.iter_mut() {
            self.skip_fixed_separators()?;
            *slot = self.expect_number("fixed-station coordinate")?;
        }

        // Tolerate trailing separators before the closing bracket.
        self.skip_fixed_separators()?;
        self.expect(b']')?;

        Ok(FixedStation {
            name,
            unit,
            east: coordinates[0],
            north: coordinates[1],
            vert: coordinates[2],
        })
    }

    /// Advances over bracket-list separator bytes up to the next number or
    /// the closing bracket.
    fn skip_fixed_separators(&mut self) -> Result<(), ProjectParseError> {
        while let Some(c) = self.peek() {
            match c {
                b']' => return Ok(()),
                b'0'..=b'9' | b'.' | b'-' | b'+' => return Ok(()),
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                    self.line_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }
        Err(self.parse_error("unterminated fixed station (missing ']')"))
    }

    fn parse_base_location(&mut self) -> Result<BaseLocation, ProjectParseError> {
        self.skip_whitespace();
        let east = self.expect_number("base easting")?;
        self.expect_separator()?;
        let north = self.expect_number("base northing")?;
        self.expect_separator()?;
        let elevation = self.expect_number("base elevation")?;
        self.expect_separator()?;
        let zone = self.parse_zone_value(true)?;
        self.expect_separator()?;
        let convergence = self.expect_number("base convergence")?;
        self.skip_whitespace();
        self.expect(b';')?;

        Ok(BaseLocation {
            east,
            north,
            elevation,
            zone,
            convergence,
        })
    }

    fn parse_datum(&mut self) -> Result<String, ProjectParseError> {
        let datum = self.expect_match("datum name", &DATUM_NAME)?;
        self.expect(b';')?;
        if !is_known_datum(&datum) {
            return Err(self.parse_error(format!("unknown datum '{datum}'")));
        }
        Ok(datum)
    }

    fn parse_convergence(&mut self) -> Result<f64, ProjectParseError> {
        self.skip_whitespace();
        let value = self.expect_number("convergence")?;
        self.skip_whitespace();
        self.expect(b';')?;
        Ok(value)
    }

    fn parse_zone(&mut self, allow_zero: bool) -> Result<i32, ProjectParseError> {
        self.skip_whitespace();
        let zone = self.parse_zone_value(allow_zero)?;
        self.skip_whitespace();
        self.expect(b';')?;
        Ok(zone)
    }

    fn parse_zone_value(&mut self, allow_zero: bool) -> Result<i32, ProjectParseError> {
        let value = self.expect_number("UTM zone")?;
        if value.fract() != 0.0 {
            return Err(self.parse_error("UTM zone must be an integer"));
        }
        let zone = value as i32;
        let min = if allow_zero { 0 } else { 1 };
        if zone < min || zone > 60 {
            return Err(self.parse_error(format!("UTM zone must be in {min}..=60, got {zone}")));
        }
        Ok(zone)
    }

    fn parse_flags(&mut self) -> Result<ProjectFlags, ProjectParseError> {
        let mut flags = ProjectFlags::default();
        loop {
            match self.bump() {
                Some(b';') => return Ok(flags),
                Some(b'G') => flags.global_override = true,
                Some(b'g') => flags.global_override = false,
                Some(b'I') => flags.declination = DeclinationMode::Ignore,
                Some(b'E') => flags.declination = DeclinationMode::Entered,
                Some(b'A') => flags.declination = DeclinationMode::Auto,
                Some(b'V') => flags.apply_convergence = true,
                Some(b'v') => flags.apply_convergence = false,
                Some(b'O') => flags.override_lrud = true,
                Some(b'o') => flags.override_lrud = false,
                Some(b'T') => flags.lrud_at_to = true,
                Some(b't') => flags.lrud_at_to = false,
                Some(b'S') => flags.apply_shot_flags = true,
                Some(b's') => flags.apply_shot_flags = false,
                Some(b'X') => flags.apply_exclude_all = true,
                Some(b'x') => flags.apply_exclude_all = false,
                Some(b'P') => flags.apply_exclude_plot = true,
                Some(b'p') => flags.apply_exclude_plot = false,
                Some(b'L') => flags.apply_exclude_length = true,
                Some(b'l') => flags.apply_exclude_length = false,
                Some(b'C') => flags.apply_no_adjust = true,
                Some(b'c') => flags.apply_no_adjust = false,
                // Unknown letters are tolerated.
                Some(_) => {}
                None => return Err(self.parse_error("unterminated flag record (missing ';')")),
            }
        }
    }

    fn parse_folder_open(&mut self) -> Result<String, ProjectParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b';' {
                let name = decode_trimmed(&self.data[start..self.pos]);
                self.pos += 1;
                return Ok(name);
            }
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
                self.line_start = self.pos;
            }
        }
        Err(self.parse_error("unterminated folder record (missing ';')"))
    }

    // -- low-level cursor helpers ------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == b'\n' {
                self.line += 1;
                self.pos += 1;
                self.line_start = self.pos;
            } else if c == b' ' || c == b'\t' || c == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Skips a comment after its leading `/`: everything up to and
    /// including the next `/` or end of line.
    fn skip_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == b'/' || c == b'\n' {
                break;
            }
        }
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'/') {
                self.pos += 1;
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    fn skip_to_end_of_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == b'\n' {
                break;
            }
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), ProjectParseError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.parse_error(format!(
                "expected '{}', got '{}'",
                expected as char, c as char
            ))),
            None => Err(self.parse_error(format!(
                "expected '{}', got end of input",
                expected as char
            ))),
        }
    }

    /// A `,` surrounded by optional whitespace.
    fn expect_separator(&mut self) -> Result<(), ProjectParseError> {
        self.skip_whitespace();
        self.expect(b',')?;
        self.skip_whitespace();
        Ok(())
    }

    fn expect_match(
        &mut self,
        what: &str,
        pattern: &Regex,
    ) -> Result<String, ProjectParseError> {
        let found = pattern.find(&self.data[self.pos..]);
        match found {
            Some(m) if m.start() == 0 => {
                let span = &self.data[self.pos..self.pos + m.end()];
                let text = decode_trimmed(span);
                self.line += span.iter().filter(|&&c| c == b'\n').count();
                if let Some(last) = span.iter().rposition(|&c| c == b'\n') {
                    self.line_start = self.pos + last + 1;
                }
                self.pos += m.end();
                Ok(text)
            }
            _ => Err(self.parse_error(format!("missing {what}"))),
        }
    }

    fn expect_number(&mut self, what: &str) -> Result<f64, ProjectParseError> {
        let found = NUMBER.find(&self.data[self.pos..]);
        match found {
            Some(m) if m.start() == 0 => {
                let text: String = self.data[self.pos..self.pos + m.end()]
                    .iter()
                    .map(|&b| b as char)
                    .collect();
                self.pos += m.end();
                text.parse::<f64>()
                    .map_err(|_| self.parse_error(format!("invalid {what} '{text}'")))
            }
            _ => Err(self.parse_error(format!("missing {what}"))),
        }
    }

    fn parse_error(&self, message: impl Into<String>) -> ProjectParseError {
        ProjectParseError::Parse {
            line: self.line,
            column: self.pos.saturating_sub(self.line_start),
            message: message.into(),
        }
    }

    fn structure_error(&self, message: impl Into<String>) -> ProjectParseError {
        ProjectParseError::Structure {
            line: self.line,
            column: self.pos.saturating_sub(self.line_start),
            message: message.into(),
        }
    }
}

fn decode_trimmed(bytes: &[u8]) -> String {
    let text: String = bytes.iter().map(|&b| b as char).collect();
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::FixedUnit;

    #[test]
    fn test_minimal_file_entry() {
        let project = parse_project(b"#CAVE.DAT;").unwrap();
        assert_eq!(project.files.len(), 1);
        assert_eq!(project.files[0].path, "CAVE.DAT");
        assert!(project.files[0].links.is_empty());
        assert!(project.files[0].fixed.is_empty());
    }

    #[test]
    fn test_links_and_fixed_stations() {
        let text = b"#FULFORD.DAT,A1,Z9[F, 1001.5 , -200.25, 350],B2;";
        let project = parse_project(text).unwrap();
        let entry = &project.files[0];
        assert_eq!(entry.links.as_slice(), ["A1".to_string(), "B2".to_string()]);
        assert_eq!(entry.fixed.len(), 1);
        let fixed = &entry.fixed[0];
        assert_eq!(fixed.name, "Z9");
        assert_eq!(fixed.unit, FixedUnit::Feet);
        assert_eq!((fixed.east, fixed.north, fixed.vert), (1001.5, -200.25, 350.0));
        assert!(entry.is_link("Z9"));
        assert!(entry.is_link("A1"));
        assert!(!entry.is_link("Q"));
    }

    #[test]
    fn test_lenient_bracket_separators() {
        let text = b"#C.DAT,P[m;10;20;30];";
        let project = parse_project(text).unwrap();
        let fixed = &project.files[0].fixed[0];
        assert_eq!(fixed.unit, FixedUnit::Meters);
        assert_eq!((fixed.east, fixed.north, fixed.vert), (10.0, 20.0, 30.0));
    }

    #[test]
    fn test_base_location_and_zone() {
        let text = b"@ 357715.7, 4372837.5, 3048.0, 13, 1.05;\n$14;";
        let project = parse_project(text).unwrap();
        let base = project.base.unwrap();
        assert_eq!(base.zone, 13);
        assert!((base.convergence - 1.05).abs() < 1e-12);
        assert_eq!(project.zone_override, Some(14));
        assert_eq!(project.effective_zone(), Some(14));
    }

    #[test]
    fn test_datum_validation() {
        let project = parse_project(b"&North American 1983;").unwrap();
        assert_eq!(project.datum.as_deref(), Some("North American 1983"));

        let err = parse_project(b"&Atlantis 1900;").unwrap_err();
        assert!(matches!(err, ProjectParseError::Parse { .. }));
    }

    #[test]
    fn test_convergence_records() {
        let enabled = parse_project(b"%1.25;").unwrap();
        assert_eq!(enabled.effective_convergence(), Some(1.25));

        let disabled = parse_project(b"*1.25;").unwrap();
        assert_eq!(disabled.effective_convergence(), None);
        assert_eq!(disabled.convergence_override.unwrap().value, 1.25);
    }

    #[test]
    fn test_flags_casing() {
        let project = parse_project(b"!GAVtsX;").unwrap();
        assert!(project.flags.global_override);
        assert_eq!(project.flags.declination, DeclinationMode::Auto);
        assert!(project.flags.apply_convergence);
        assert!(!project.flags.lrud_at_to);
        assert!(!project.flags.apply_shot_flags);
        // s turns the master switch off, so X is not honoured.
        assert!(!project.flags.honours_exclude_all());
    }

    #[test]
    fn test_folders_nest_and_balance() {
        let text = b"[North;#A.DAT;[Deep;#B.DAT;];];#C.DAT;";
        let project = parse_project(text).unwrap();
        assert_eq!(project.files[0].folder, ["North"]);
        assert_eq!(project.files[1].folder, ["North", "Deep"]);
        assert!(project.files[2].folder.is_empty());
    }

    #[test]
    fn test_unbalanced_folders() {
        assert!(matches!(
            parse_project(b"[Lost;#A.DAT;").unwrap_err(),
            ProjectParseError::Structure { .. }
        ));
        assert!(matches!(
            parse_project(b"];").unwrap_err(),
            ProjectParseError::Structure { .. }
        ));
    }

    #[test]
    fn test_unterminated_record_is_fatal() {
        let err = parse_project(b"#CAVE.DAT,A1").unwrap_err();
        assert!(matches!(err, ProjectParseError::Parse { .. }));
    }

    #[test]
    fn test_malformed_number_reports_line_and_column() {
        let err = parse_project(b"#A.DAT;\n@x,2,3,13,0;").unwrap_err();
        match err {
            ProjectParseError::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 1);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_and_unknown_lines() {
        let text = b"/ header comment\nsome stray note\n#A.DAT, / inline / B7;\n";
        let project = parse_project(text).unwrap();
        assert_eq!(project.files.len(), 1);
        assert_eq!(project.files[0].links.as_slice(), ["B7".to_string()]);
    }
}
