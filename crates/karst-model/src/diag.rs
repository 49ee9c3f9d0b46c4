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

//! Accumulated diagnostics.
//!
//! Non-fatal problems — skipped shot rows, auto-repaired depth gauges,
//! renamed duplicate stations, residual misclosures — are collected into a
//! [`Diagnostics`] buffer that travels alongside results. The core never
//! terminates the process; hosts inspect the buffer and decide.

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Data was repaired, renamed, or dropped; processing continued.
    Warning,
    /// A record was rejected; surrounding records proceeded.
    Error,
    /// Purely informational (e.g. a residual above the report threshold).
    Info,
}

/// The taxonomy of diagnostic kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Malformed project-file record.
    ProjectParse,
    /// Unmatched folder brackets in the project file.
    ProjectStructure,
    /// Missing or malformed survey header field.
    SurveyHeader,
    /// Malformed shot row.
    SurveyRow,
    /// Out-of-range depth gauge or unit conversion failure.
    GeomDomain,
    /// Station name collision resolved by renaming.
    NetworkDuplicate,
    /// Station unreachable from any anchor.
    NetworkDisconnected,
    /// Misclosure still above threshold after clamped adjustment.
    SolverResidual,
}

impl DiagnosticKind {
    /// Stable dotted name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::ProjectParse => "project.parse",
            DiagnosticKind::ProjectStructure => "project.structure",
            DiagnosticKind::SurveyHeader => "survey.header",
            DiagnosticKind::SurveyRow => "survey.row",
            DiagnosticKind::GeomDomain => "geom.domain",
            DiagnosticKind::NetworkDuplicate => "network.duplicate",
            DiagnosticKind::NetworkDisconnected => "network.disconnected",
            DiagnosticKind::SolverResidual => "solver.residual",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the input a diagnostic originated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source identifier (usually the file name).
    pub source: String,
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub column: usize,
    /// The offending text, when available.
    pub text: String,
}

impl SourceLocation {
    /// Creates a location at the start of a line.
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column: 0,
            text: String::new(),
        }
    }

    /// Pins the column within the line.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Attaches the offending text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)?;
        if !self.text.is_empty() {
            write!(f, " ({:?})", self.text)?;
        }
        Ok(())
    }
}

/// A single accumulated diagnostic.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// An append-only buffer of diagnostics.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Appends a warning with an optional location.
    pub fn warning(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        location: Option<SourceLocation>,
    ) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            location,
        });
    }

    /// Appends an error with an optional location.
    pub fn error(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        location: Option<SourceLocation>,
    ) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            kind,
            message: message.into(),
            location,
        });
    }

    /// Appends an informational entry.
    pub fn info(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            kind,
            message: message.into(),
            location: None,
        });
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no diagnostics were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any entry has [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    /// Entries of a given kind, in insertion order.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_query() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());

        diag.warning(DiagnosticKind::GeomDomain, "clamped depth", None);
        diag.error(
            DiagnosticKind::SurveyRow,
            "bad token",
            Some(SourceLocation::new("cave.dat", 12).with_column(7).with_text("abc")),
        );

        assert_eq!(diag.len(), 2);
        assert!(diag.has_errors());
        assert_eq!(diag.of_kind(DiagnosticKind::SurveyRow).count(), 1);
        assert_eq!(diag.of_kind(DiagnosticKind::SolverResidual).count(), 0);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic {
            severity: Severity::Error,
            kind: DiagnosticKind::SurveyRow,
            message: "bad token".into(),
            location: Some(SourceLocation::new("cave.dat", 3).with_column(14).with_text("xy")),
        };
        assert_eq!(
            format!("{}", d),
            "[survey.row] bad token at cave.dat:3:14 (\"xy\")"
        );
    }
}
