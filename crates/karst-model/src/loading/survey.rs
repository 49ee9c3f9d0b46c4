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

//! Survey-file loader.
//!
//! A survey file is a concatenation of surveys separated by form-feed
//! bytes (`0x0C`); a Ctrl-Z byte (`0x1A`) terminates the file. Each survey
//! is a header block (cave name on line one, labelled fields after it, a
//! `FROM TO ...` column-header line, a blank line) followed by
//! whitespace-separated shot rows whose column order and units are governed
//! by the header's format descriptor.
//!
//! Loading is fail-soft: a malformed shot row costs that row, a malformed
//! header costs that survey, and every rejection leaves a diagnostic
//! identifying the source, the survey, and the shot index.

use crate::diag::{DiagnosticKind, Diagnostics, SourceLocation};
use crate::format::{FormatDescriptor, LrudItem, ShotItem};
use crate::loading::decode_ascii;
use crate::survey::{
    is_valid_station_name, BacksightCorrections, Shot, ShotFlags, SightCorrections, Survey,
    SurveyDate, STATION_NAME_LIMIT,
};
use regex::Regex;

/// Values at or above this threshold mark a missing measurement.
const MISSING_VALUE_THRESHOLD: f64 = 990.0;

/// Angle values below this threshold (e.g. the -999 sentinel) mark a
/// missing bearing or inclination.
const MISSING_ANGLE_THRESHOLD: f64 = -900.0;

/// Parses every survey in an 8-bit ASCII byte slice.
///
/// `source` identifies the input in diagnostics (usually the file name).
/// Malformed surveys and rows are skipped with diagnostics; the returned
/// list holds everything that parsed.
pub fn parse_surveys(bytes: &[u8], source: &str, diag: &mut Diagnostics) -> Vec<Survey> {
    let scanner = SurveyScanner::new(source);
    let mut text = decode_ascii(bytes);

    // A Ctrl-Z terminates the file.
    if let Some(end) = text.find('\u{1a}') {
        text.truncate(end);
    }

    let mut surveys = Vec::new();
    let mut base_line = 0usize;
    for section in text.split('\u{0c}') {
        let lines_in_section = section.matches('\n').count();
        if !section.trim().is_empty() {
            if let Some(survey) = scanner.parse_survey(section, base_line, diag) {
                surveys.push(survey);
            }
        }
        base_line += lines_in_section;
    }
    surveys
}

struct SurveyScanner<'a> {
    source: &'a str,
    column_header: Regex,
    header_fields: Regex,
    shot_flags: Regex,
}

impl<'a> SurveyScanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            column_header: Regex::new(r"(?m)^[ \t]*FROM[ \t]+TO[^\r\n]*\r?\n[ \t]*\r?\n").unwrap(),
            header_fields: Regex::new(
                "SURVEY NAME:|SURVEY DATE:|SURVEY TEAM:|COMMENT:|DECLINATION:|FORMAT:|CORRECTIONS2:|CORRECTIONS:",
            )
            .unwrap(),
            shot_flags: Regex::new(r"#\|([^#]*)#").unwrap(),
        }
    }

    fn location(&self, line: usize, column: usize) -> Option<SourceLocation> {
        Some(SourceLocation::new(self.source, line).with_column(column))
    }

    fn parse_survey(
        &self,
        section: &str,
        base_line: usize,
        diag: &mut Diagnostics,
    ) -> Option<Survey> {
        let (header_text, data_text, data_line) = match self.column_header.find(section) {
            Some(m) => (
                &section[..m.start()],
                &section[m.end()..],
                base_line + section[..m.end()].matches('\n').count(),
            ),
            None => (section, "", base_line),
        };

        let mut survey = self.parse_header(header_text, base_line, diag)?;

        let mut row_line = data_line;
        let mut shot_index = 0usize;
        for line in data_text.lines() {
            if !line.trim().is_empty() {
                if let Some(shot) = self.parse_shot(line, &survey, shot_index, row_line, diag) {
                    survey.shots.push(shot);
                }
                shot_index += 1;
            }
            row_line += 1;
        }

        Some(survey)
    }

    fn parse_header(
        &self,
        text: &str,
        base_line: usize,
        diag: &mut Diagnostics,
    ) -> Option<Survey> {
        let text = text.trim_start_matches(['\r', '\n']);
        let Some((cave_line, rest)) = split_first_line(text) else {
            diag.error(
                DiagnosticKind::SurveyHeader,
                "survey block has no header fields",
                self.location(base_line, 0),
            );
            return None;
        };

        let mut survey = Survey::named(cave_line.trim(), "");

        let matches: Vec<_> = self.header_fields.find_iter(rest).collect();
        for (i, m) in matches.iter().enumerate() {
            let value_end = matches.get(i + 1).map_or(rest.len(), |n| n.start());
            let value = rest[m.end()..value_end].trim();

            match m.as_str() {
                "SURVEY NAME:" => {
                    if let Some(token) = value.split_whitespace().next() {
                        survey.name = token.to_string();
                    }
                }
                "SURVEY DATE:" => {
                    if let Some(date) = self.parse_date(value, base_line, diag) {
                        survey.date = date;
                    }
                }
                "COMMENT:" => {
                    if !value.is_empty() {
                        survey.comment = Some(value.to_string());
                    }
                }
                "SURVEY TEAM:" => {
                    if !value.is_empty() {
                        survey.team = Some(value.to_string());
                    }
                }
                "DECLINATION:" => {
                    if let Some(declination) = parse_measurement(value.split_whitespace().next()) {
                        survey.declination = declination;
                    }
                }
                "FORMAT:" => {
                    let token = value.split_whitespace().next().unwrap_or("");
                    match FormatDescriptor::parse(token) {
                        Ok(format) => survey.format = format,
                        Err(err) => {
                            diag.error(
                                DiagnosticKind::SurveyHeader,
                                format!("survey '{}': {err}", survey.name),
                                self.location(base_line, 0),
                            );
                            return None;
                        }
                    }
                }
                "CORRECTIONS:" => {
                    let parts: Vec<_> = value.split_whitespace().collect();
                    let mut corrections = SightCorrections::default();
                    if let Some(v) = parse_measurement(parts.first().copied()) {
                        corrections.azimuth = v;
                    }
                    if let Some(v) = parse_measurement(parts.get(1).copied()) {
                        corrections.inclination = v;
                    }
                    if let Some(v) = parse_measurement(parts.get(2).copied()) {
                        corrections.length = v;
                    }
                    survey.corrections = corrections;
                }
                "CORRECTIONS2:" => {
                    let parts: Vec<_> = value.split_whitespace().collect();
                    let mut corrections = BacksightCorrections::default();
                    if let Some(v) = parse_measurement(parts.first().copied()) {
                        corrections.azimuth = v;
                    }
                    if let Some(v) = parse_measurement(parts.get(1).copied()) {
                        corrections.inclination = v;
                    }
                    survey.backsight_corrections = corrections;
                }
                _ => {}
            }
        }

        Some(survey)
    }

    fn parse_date(
        &self,
        text: &str,
        base_line: usize,
        diag: &mut Diagnostics,
    ) -> Option<SurveyDate> {
        let parts: Vec<_> = text.split_whitespace().take(3).collect();
        if parts.len() < 3 {
            diag.warning(
                DiagnosticKind::SurveyHeader,
                format!("incomplete survey date '{}'", text.trim()),
                self.location(base_line, 0),
            );
            return None;
        }

        let numbers: Option<Vec<i64>> = parts.iter().map(|p| p.parse::<i64>().ok()).collect();
        let Some(numbers) = numbers else {
            diag.warning(
                DiagnosticKind::SurveyHeader,
                format!("invalid survey date '{}'", text.trim()),
                self.location(base_line, 0),
            );
            return None;
        };

        let (month, day, mut year) = (numbers[0], numbers[1], numbers[2]);
        // Two-digit years are 1900-relative.
        if (0..100).contains(&year) {
            year += 1900;
        }

        let date = (month >= 0 && day >= 0 && year >= 0)
            .then(|| SurveyDate::new(month as u8, day as u8, year as u16))
            .flatten();
        if date.is_none() {
            diag.warning(
                DiagnosticKind::SurveyHeader,
                format!("survey date out of range: {month}/{day}/{year}"),
                self.location(base_line, 0),
            );
        }
        date
    }

    fn parse_shot(
        &self,
        line: &str,
        survey: &Survey,
        shot_index: usize,
        row_line: usize,
        diag: &mut Diagnostics,
    ) -> Option<Shot> {
        let format = &survey.format;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let reject = |message: String, column: usize, diag: &mut Diagnostics| {
            diag.error(
                DiagnosticKind::SurveyRow,
                format!(
                    "survey '{}' shot {}: {}",
                    survey.name, shot_index, message
                ),
                self.location(row_line, column).map(|l| l.with_text(line.trim())),
            );
        };

        if tokens.len() < 2 {
            reject("missing station names".into(), 0, diag);
            return None;
        }

        for token in &tokens[..2] {
            if !is_valid_station_name(token) {
                reject(
                    format!("invalid station name '{token}'"),
                    column_in_line(line, token),
                    diag,
                );
                return None;
            }
            if token.len() > STATION_NAME_LIMIT {
                diag.warning(
                    DiagnosticKind::SurveyRow,
                    format!(
                        "survey '{}' shot {}: station name '{}' exceeds {} characters",
                        survey.name, shot_index, token, STATION_NAME_LIMIT
                    ),
                    self.location(row_line, column_in_line(line, token)),
                );
            }
        }
        let from = tokens[0].to_string();
        let to = tokens[1].to_string();

        let is_depth = format.inclination_unit.is_depth();
        let mut shot = Shot {
            from,
            to,
            length: 0.0,
            azimuth: None,
            inclination: None,
            is_depth,
            left: None,
            right: None,
            up: None,
            down: None,
            azimuth2: None,
            inclination2: None,
            flags: ShotFlags::default(),
            comment: None,
        };

        let mut cursor = 2usize;
        let mut length_seen = false;

        // The three shot columns, in the order the descriptor declares.
        for item in format.shot_order {
            let Some(&token) = tokens.get(cursor) else {
                reject(
                    format!("missing {} column", shot_item_name(item)),
                    line.trim_end().len(),
                    diag,
                );
                return None;
            };
            cursor += 1;
            let column = column_in_line(line, token);

            let Ok(raw) = token.parse::<f64>() else {
                reject(
                    format!("malformed {} '{token}'", shot_item_name(item)),
                    column,
                    diag,
                );
                return None;
            };

            match item {
                ShotItem::Length => {
                    if raw >= MISSING_VALUE_THRESHOLD {
                        reject("missing shot length".into(), column, diag);
                        return None;
                    }
                    let feet = format.length_unit.to_feet(raw);
                    if feet < 0.0 {
                        reject(format!("negative shot length {feet}"), column, diag);
                        return None;
                    }
                    shot.length = feet;
                    length_seen = true;
                }
                ShotItem::Azimuth => {
                    shot.azimuth = angle_value(raw).map(|v| {
                        let degrees = format.bearing_unit.to_degrees(v);
                        if !(0.0..360.0).contains(&degrees) {
                            diag.warning(
                                DiagnosticKind::SurveyRow,
                                format!(
                                    "survey '{}' shot {}: azimuth {degrees} outside [0, 360)",
                                    survey.name, shot_index
                                ),
                                self.location(row_line, column),
                            );
                        }
                        degrees
                    });
                }
                ShotItem::Inclination => {
                    shot.inclination = angle_value(raw).map(|v| {
                        let converted = format.inclination_unit.to_degrees(v);
                        if !is_depth && !(-90.0..=90.0).contains(&converted) {
                            diag.warning(
                                DiagnosticKind::SurveyRow,
                                format!(
                                    "survey '{}' shot {}: inclination {converted} outside [-90, 90]",
                                    survey.name, shot_index
                                ),
                                self.location(row_line, column),
                            );
                        }
                        converted
                    });
                }
            }
        }

        debug_assert!(length_seen, "shot order always contains a length column");

        // The four LRUD columns, in declared order. Missing trailing
        // columns are tolerated; a flag field ends the numeric columns.
        for item in format.lrud_order {
            let Some(&token) = tokens.get(cursor) else { break };
            if token.starts_with("#|") {
                break;
            }
            cursor += 1;
            let column = column_in_line(line, token);
            let value = parse_lrud(token, format, survey, shot_index, row_line, column, self, diag);
            match item {
                LrudItem::Left => shot.left = value,
                LrudItem::Right => shot.right = value,
                LrudItem::Up => shot.up = value,
                LrudItem::Down => shot.down = value,
            }
        }

        // Redundant backsights append two more columns.
        if format.backsights {
            for is_azimuth in [true, false] {
                let Some(&token) = tokens.get(cursor) else { break };
                if token.starts_with("#|") {
                    break;
                }
                cursor += 1;
                let Ok(raw) = token.parse::<f64>() else {
                    reject(
                        format!("malformed backsight '{token}'"),
                        column_in_line(line, token),
                        diag,
                    );
                    return None;
                };
                if is_azimuth {
                    shot.azimuth2 = angle_value(raw).map(|v| format.bearing_unit.to_degrees(v));
                } else {
                    shot.inclination2 =
                        angle_value(raw).map(|v| format.inclination_unit.to_degrees(v));
                }
            }
        }

        // Flags, then everything else is the comment.
        let remainder_column = tokens
            .get(cursor)
            .map_or(0, |token| column_in_line(line, token));
        let remainder = tokens[cursor..].join(" ");
        if let Some(captures) = self.shot_flags.captures(&remainder) {
            for flag in captures[1].chars() {
                match flag.to_ascii_uppercase() {
                    'L' => shot.flags.exclude_length = true,
                    'P' => shot.flags.exclude_plot = true,
                    'X' => shot.flags.exclude_all = true,
                    'C' => shot.flags.no_adjust = true,
                    ' ' => {}
                    other => diag.warning(
                        DiagnosticKind::SurveyRow,
                        format!(
                            "survey '{}' shot {}: unrecognized flag '{}'",
                            survey.name, shot_index, other
                        ),
                        self.location(row_line, remainder_column),
                    ),
                }
            }
            let flags_end = captures.get(0).map_or(remainder.len(), |m| m.end());
            let after = remainder[flags_end..].trim();
            if !after.is_empty() {
                shot.comment = Some(after.to_string());
            }
        } else if !remainder.trim().is_empty() {
            shot.comment = Some(remainder.trim().to_string());
        }

        Some(shot)
    }
}

/// Parses one LRUD token: `< -1` or `> 990` is missing/passage, values in
/// `(-1, 0)` warn but are kept, non-numeric tokens are treated as missing.
#[allow(clippy::too_many_arguments)]
fn parse_lrud(
    token: &str,
    format: &FormatDescriptor,
    survey: &Survey,
    shot_index: usize,
    row_line: usize,
    column: usize,
    scanner: &SurveyScanner<'_>,
    diag: &mut Diagnostics,
) -> Option<f64> {
    let raw = token.parse::<f64>().ok()?;
    if raw < -1.0 || raw > MISSING_VALUE_THRESHOLD {
        return None;
    }
    if raw < 0.0 {
        diag.warning(
            DiagnosticKind::SurveyRow,
            format!(
                "survey '{}' shot {}: negative passage dimension {raw}",
                survey.name, shot_index
            ),
            scanner.location(row_line, column),
        );
    }
    Some(format.passage_unit.to_feet(raw))
}

/// Byte column of a token within the row it was split from.
///
/// Tokens are subslices of the row, so the offset is pointer arithmetic.
fn column_in_line(line: &str, token: &str) -> usize {
    (token.as_ptr() as usize).saturating_sub(line.as_ptr() as usize)
}

/// Splits a header block into its first line and the rest.
fn split_first_line(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.splitn(2, '\n');
    let first = lines.next()?;
    let rest = lines.next()?;
    Some((first.trim_end_matches('\r'), rest))
}

/// Parses a header measurement; values at or above 990 are missing.
fn parse_measurement(token: Option<&str>) -> Option<f64> {
    let value = token?.parse::<f64>().ok()?;
    (value < MISSING_VALUE_THRESHOLD).then_some(value)
}

/// Maps a raw angle to `None` when it carries a missing-value sentinel.
fn angle_value(raw: f64) -> Option<f64> {
    (raw >= MISSING_ANGLE_THRESHOLD && raw < MISSING_VALUE_THRESHOLD).then_some(raw)
}

fn shot_item_name(item: ShotItem) -> &'static str {
    match item {
        ShotItem::Length => "length",
        ShotItem::Azimuth => "azimuth",
        ShotItem::Inclination => "inclination",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LrudAttach;

    const SIMPLE_DAT: &str = "SECRET CAVE\r\n\
SURVEY NAME: A\r\n\
SURVEY DATE: 7 10 79  COMMENT:Entrance Passage\r\n\
SURVEY TEAM:\r\n\
D.SMITH,R.BROWN,S.MURRAY\r\n\
DECLINATION: 1.00  FORMAT: DDDDLUDRLADN  CORRECTIONS: 2.00 3.00 4.00\r\n\
\r\n\
FROM         TO           LEN     BEAR    INC     LEFT    UP      DOWN    RIGHT   FLAGS COMMENTS\r\n\
\r\n\
 A1           A2            24.25    5.50  -25.00    6.00    2.50    1.00    3.00\r\n\
 A2           A3            12.70  190.00  -10.00    4.00    0.50    0.0     0.75  #|PC# Big Room\r\n";

    fn parse_one(text: &str) -> (Vec<Survey>, Diagnostics) {
        let mut diag = Diagnostics::new();
        let surveys = parse_surveys(text.as_bytes(), "test.dat", &mut diag);
        (surveys, diag)
    }

    #[test]
    fn test_parse_header_fields() {
        let (surveys, diag) = parse_one(SIMPLE_DAT);
        assert!(diag.is_empty(), "{:?}", diag.entries());
        assert_eq!(surveys.len(), 1);

        let survey = &surveys[0];
        assert_eq!(survey.cave_name, "SECRET CAVE");
        assert_eq!(survey.name, "A");
        assert_eq!(survey.date, SurveyDate { year: 1979, month: 7, day: 10 });
        assert_eq!(survey.comment.as_deref(), Some("Entrance Passage"));
        assert_eq!(survey.team.as_deref(), Some("D.SMITH,R.BROWN,S.MURRAY"));
        assert_eq!(survey.declination, 1.0);
        assert_eq!(survey.corrections.azimuth, 2.0);
        assert_eq!(survey.corrections.inclination, 3.0);
        assert_eq!(survey.corrections.length, 4.0);
        assert_eq!(survey.format.lrud_attach, LrudAttach::From);
        assert!(!survey.format.backsights);
    }

    #[test]
    fn test_parse_shot_rows_and_flags() {
        let (surveys, _) = parse_one(SIMPLE_DAT);
        let shots = &surveys[0].shots;
        assert_eq!(shots.len(), 2);

        let first = &shots[0];
        assert_eq!((first.from.as_str(), first.to.as_str()), ("A1", "A2"));
        assert_eq!(first.length, 24.25);
        assert_eq!(first.azimuth, Some(5.5));
        assert_eq!(first.inclination, Some(-25.0));
        assert_eq!(first.left, Some(6.0));
        assert_eq!(first.up, Some(2.5));
        assert_eq!(first.down, Some(1.0));
        assert_eq!(first.right, Some(3.0));
        assert!(first.flags.is_empty());
        assert_eq!(first.comment, None);

        let second = &shots[1];
        assert!(second.flags.exclude_plot);
        assert!(second.flags.no_adjust);
        assert!(!second.flags.exclude_all);
        assert_eq!(second.comment.as_deref(), Some("Big Room"));
    }

    #[test]
    fn test_form_feed_splits_surveys() {
        let two = format!("{SIMPLE_DAT}\u{c}\r\n{}", SIMPLE_DAT.replace("NAME: A", "NAME: B"));
        let (surveys, _) = parse_one(&two);
        assert_eq!(surveys.len(), 2);
        assert_eq!(surveys[0].name, "A");
        assert_eq!(surveys[1].name, "B");
    }

    #[test]
    fn test_ctrl_z_terminates() {
        let text = format!("{SIMPLE_DAT}\u{1a}\u{c}garbage after eof");
        let (surveys, diag) = parse_one(&text);
        assert_eq!(surveys.len(), 1);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_malformed_row_is_skipped_with_diagnostic() {
        let text = SIMPLE_DAT.replace("  24.25", "  oops!");
        let (surveys, diag) = parse_one(&text);
        assert_eq!(surveys[0].shots.len(), 1);
        let entry = diag.of_kind(DiagnosticKind::SurveyRow).next().unwrap();
        assert!(entry.message.contains("survey 'A'"));
        assert!(entry.message.contains("shot 0"));

        // The location points at the offending token, not just the row.
        let location = entry.location.as_ref().unwrap();
        assert_eq!(location.line, 9);
        assert!(location.column > 0);
        assert!(location.text.contains("oops!"));
    }

    #[test]
    fn test_bad_format_fails_survey_only() {
        let one_bad = format!(
            "{}\u{c}\r\n{}",
            SIMPLE_DAT.replace("FORMAT: DDDDLUDRLADN", "FORMAT: DDDD"),
            SIMPLE_DAT.replace("NAME: A", "NAME: C")
        );
        let (surveys, diag) = parse_one(&one_bad);
        assert_eq!(surveys.len(), 1);
        assert_eq!(surveys[0].name, "C");
        assert_eq!(diag.of_kind(DiagnosticKind::SurveyHeader).count(), 1);
    }

    #[test]
    fn test_sentinel_angles() {
        let text = SIMPLE_DAT.replace("   5.50  -25.00", "-999.00  -90.00");
        let (surveys, _) = parse_one(&text);
        let shot = &surveys[0].shots[0];
        assert_eq!(shot.azimuth, None);
        assert_eq!(shot.inclination, Some(-90.0));
    }

    #[test]
    fn test_negative_lrud_is_missing() {
        let text = SIMPLE_DAT.replace("    6.00    2.50", "   -9.90    2.50");
        let (surveys, diag) = parse_one(&text);
        assert_eq!(surveys[0].shots[0].left, None);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_backsight_columns() {
        let text = "CAVE\r\n\
SURVEY NAME: BS1\r\n\
SURVEY DATE: 1 2 2003\r\n\
SURVEY TEAM:\r\n\
\r\n\
DECLINATION: 0.00  FORMAT: DDDDLUDRLADBF\r\n\
\r\n\
FROM TO LEN BEAR INC LEFT UP DOWN RIGHT AZM2 INC2\r\n\
\r\n\
S1 S2 10.0 90.0 0.0 1.0 1.0 1.0 1.0 270.5 0.5\r\n";
        let (surveys, diag) = parse_one(text);
        assert!(diag.is_empty(), "{:?}", diag.entries());
        let shot = &surveys[0].shots[0];
        assert!(surveys[0].format.backsights);
        assert_eq!(shot.azimuth2, Some(270.5));
        assert_eq!(shot.inclination2, Some(0.5));
    }

    #[test]
    fn test_meters_and_shot_order() {
        // Meters for lengths and passages, azimuth-inclination-length order.
        let text = "CAVE\r\n\
SURVEY NAME: M1\r\n\
SURVEY TEAM:\r\n\
\r\n\
DECLINATION: 0.00  FORMAT: DMMDLUDRADLN\r\n\
\r\n\
FROM TO BEAR INC LEN LEFT UP DOWN RIGHT\r\n\
\r\n\
M1 M2 180.0 0.0 10.0 1.0 1.0 1.0 1.0\r\n";
        let (surveys, diag) = parse_one(text);
        assert!(diag.is_empty(), "{:?}", diag.entries());
        let shot = &surveys[0].shots[0];
        assert!((shot.length - 32.808_398_95).abs() < 1e-9);
        assert_eq!(shot.azimuth, Some(180.0));
        assert!((shot.left.unwrap() - 3.280_839_895).abs() < 1e-9);
    }

    #[test]
    fn test_depth_gauge_kept_raw() {
        let text = "CAVE\r\n\
SURVEY NAME: W1\r\n\
SURVEY TEAM:\r\n\
\r\n\
DECLINATION: 0.00  FORMAT: DDDWLUDRLADN\r\n\
\r\n\
FROM TO LEN BEAR INC LEFT UP DOWN RIGHT\r\n\
\r\n\
W1 W2 10.0 0.0 5.0\r\n";
        let (surveys, diag) = parse_one(text);
        assert!(diag.is_empty(), "{:?}", diag.entries());
        let shot = &surveys[0].shots[0];
        assert!(shot.is_depth);
        assert_eq!(shot.inclination, Some(5.0));
    }

    #[test]
    fn test_missing_date_defaults() {
        let text = "CAVE\r\n\
SURVEY NAME: ND\r\n\
SURVEY TEAM:\r\n\
\r\n\
DECLINATION: 0.00  FORMAT: DDDDLUDRLADN\r\n\
\r\n\
FROM TO LEN BEAR INC LEFT UP DOWN RIGHT\r\n\
\r\n\
N1 N2 1.0 0.0 0.0\r\n";
        let (surveys, _) = parse_one(text);
        assert_eq!(surveys[0].date, SurveyDate::default());
    }
}
