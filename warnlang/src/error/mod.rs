//! Error types and reporting

use std::fmt;

use crate::ast::{LineIndex, Position, Span, TAB_WIDTH, display_width};
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure of the scan → parse → evaluate pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Illegal Character: {message}")]
    IllegalChar { message: String, span: Span },

    /// Half of a two-character operator
    #[error("Expected char: {message}")]
    ExpectedChar { message: String, span: Span },

    #[error("Invalid Syntax: {message}")]
    InvalidSyntax { message: String, span: Span },

    #[error("Missing Semicolon Error: {message}")]
    MissingTerminator { message: String, span: Span },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn illegal_char(message: impl Into<String>, span: Span) -> Self {
        Self::IllegalChar {
            message: message.into(),
            span,
        }
    }

    pub fn expected_char(message: impl Into<String>, span: Span) -> Self {
        Self::ExpectedChar {
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::InvalidSyntax {
            message: message.into(),
            span,
        }
    }

    pub fn missing_terminator(span: Span) -> Self {
        Self::MissingTerminator {
            message: "Expected `;`".to_string(),
            span,
        }
    }

    /// Category heading shown before the message
    pub fn category(&self) -> &'static str {
        match self {
            Self::IllegalChar { .. } => "Illegal Character",
            Self::ExpectedChar { .. } => "Expected char",
            Self::InvalidSyntax { .. } => "Invalid Syntax",
            Self::MissingTerminator { .. } => "Missing Semicolon Error",
            Self::Runtime(e) => e.category(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::IllegalChar { span, .. }
            | Self::ExpectedChar { span, .. }
            | Self::InvalidSyntax { span, .. }
            | Self::MissingTerminator { span, .. } => *span,
            Self::Runtime(e) => e.span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::IllegalChar { message, .. }
            | Self::ExpectedChar { message, .. }
            | Self::InvalidSyntax { message, .. }
            | Self::MissingTerminator { message, .. } => message,
            Self::Runtime(e) => &e.message,
        }
    }
}

/// One rendered traceback line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub file: String,
    pub line: usize,
    pub context: String,
}

/// An [`Error`] resolved against the source it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub error: Error,
    pub file: String,
    pub start: Position,
    pub end: Position,
    pub traceback: Vec<TraceEntry>,
    excerpt: String,
}

impl Diagnostic {
    pub fn new(error: Error, file: &str, source: &str) -> Self {
        let index = LineIndex::new(source);
        let span = error.span();
        let start = index.position(span.start);
        let end = index.position(span.end.max(span.start));
        let traceback = match &error {
            Error::Runtime(e) => e
                .traceback
                .iter()
                .map(|frame| TraceEntry {
                    file: file.to_string(),
                    line: index.position(frame.span.start).line,
                    context: frame.context.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };
        let excerpt = excerpt(&index, start, end);
        Diagnostic {
            error,
            file: file.to_string(),
            start,
            end,
            traceback,
            excerpt,
        }
    }

    pub fn category(&self) -> &'static str {
        self.error.category()
    }

    pub fn message(&self) -> &str {
        self.error.message()
    }

    pub fn span(&self) -> Span {
        self.error.span()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.traceback.is_empty() {
            writeln!(f, "Traceback (most recent call last):")?;
            for entry in &self.traceback {
                writeln!(
                    f,
                    " File {}, line {}, in {}",
                    entry.file, entry.line, entry.context
                )?;
            }
        }
        writeln!(f, "{}: {}", self.category(), self.message())?;
        writeln!(
            f,
            "File {}, line {}, col {}",
            self.file, self.start.line, self.start.column
        )?;
        writeln!(f)?;
        f.write_str(&self.excerpt)
    }
}

impl std::error::Error for Diagnostic {}

/// Source lines covered by `start..end`, each followed by a caret underline
fn excerpt(index: &LineIndex<'_>, start: Position, end: Position) -> String {
    let mut out = String::new();
    for line in start.line..=end.line.max(start.line) {
        let text = index.line_text(line).replace('\t', &" ".repeat(TAB_WIDTH));
        let from = if line == start.line { start.column - 1 } else { 0 };
        let to = if line == end.line {
            end.column - 1
        } else {
            display_width(&text)
        };
        let carets = to.saturating_sub(from).max(1);
        out.push_str(&text);
        out.push('\n');
        out.push_str(&" ".repeat(from));
        out.push_str(&"^".repeat(carets));
        out.push('\n');
    }
    out
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, diagnostic: &Diagnostic) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = diagnostic.span();
    let range: std::ops::Range<usize> =
        Span::new(span.start.min(source.len()), span.end.min(source.len())).into();
    let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_message(diagnostic.category())
        .with_label(
            Label::new((filename, range))
                .with_message(diagnostic.message())
                .with_color(Color::Red),
        );
    for entry in &diagnostic.traceback {
        report = report.with_note(format!("in {} (line {})", entry.context, entry.line));
    }
    report.finish().eprint((filename, Source::from(source)))
}
