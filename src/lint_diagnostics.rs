//! Lint diagnostics parsing
//!
//! This module turns the linter's raw, line-oriented text output into
//! structured diagnostics and resolves them to offset ranges inside the
//! document snapshot that was linted.
//!
//! Each output line is tried against an ordered list of [`LineGrammar`]s;
//! the first grammar that matches produces the diagnostic. Lines that match
//! no grammar (banners, tracebacks, summaries) are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::ops::Range;

use crate::primitives::line_table::{LineLookup, LineTable};

/// Code token the linter uses for syntax errors
pub const SYNTAX_ERROR_CODE: &str = "SyntaxError";

/// Diagnostic severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Classify a rule code by its first letter.
    ///
    /// `E*` is an error and `W*` a warning; everything else, including
    /// `SyntaxError`, lands in `Info`. Callers that need to single out syntax
    /// errors use [`LintDiagnostic::is_syntax_error`].
    pub fn from_code(code: &str) -> Self {
        if code.starts_with('E') {
            Severity::Error
        } else if code.starts_with('W') {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic as reported by the linter, before position resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Exact code token, e.g. `E402` or `SyntaxError`
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl LintDiagnostic {
    pub fn is_syntax_error(&self) -> bool {
        self.code == SYNTAX_ERROR_CODE
    }

    /// Label shown in the diagnostics panel
    pub fn label(&self) -> String {
        format!(
            "{} (line {}, col {})",
            self.message, self.line, self.column
        )
    }
}

/// Recognized diagnostic line shapes, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineGrammar {
    /// `<anything>:<line>:<col>: <CODE> <message>`
    RuleCode,
    /// `<anything>:<line>:<col>: SyntaxError: <message>`
    SyntaxError,
}

static RULE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([0-9]+):([0-9]+):\s(\w+)\s(.+)").unwrap());

static SYNTAX_ERROR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([0-9]+):([0-9]+):\s(SyntaxError):\s(.+)").unwrap());

impl LineGrammar {
    pub const ORDERED: [LineGrammar; 2] = [LineGrammar::RuleCode, LineGrammar::SyntaxError];

    fn pattern(self) -> &'static Regex {
        match self {
            LineGrammar::RuleCode => &*RULE_CODE_RE,
            LineGrammar::SyntaxError => &*SYNTAX_ERROR_RE,
        }
    }

    /// Extract a diagnostic from one output line.
    ///
    /// Returns None when the line does not match, or when the line or column
    /// is not a positive integer.
    pub fn extract(self, line: &str) -> Option<LintDiagnostic> {
        let caps = self.pattern().captures(line)?;
        let line_no: usize = caps[1].parse().ok().filter(|n| *n > 0)?;
        let column: usize = caps[2].parse().ok().filter(|n| *n > 0)?;
        let code = caps[3].to_string();

        Some(LintDiagnostic {
            line: line_no,
            column,
            severity: Severity::from_code(&code),
            code,
            message: caps[4].to_string(),
        })
    }
}

/// Parse raw linter output, preserving input order
pub fn parse_lint_output(output: &str) -> Vec<LintDiagnostic> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim_end_matches('\r');
            let parsed = LineGrammar::ORDERED
                .iter()
                .find_map(|grammar| grammar.extract(line));
            if parsed.is_none() && !line.trim().is_empty() {
                tracing::trace!("Skipping non-diagnostic lint line: {:?}", line);
            }
            parsed
        })
        .collect()
}

/// A diagnostic positioned inside a specific document snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDiagnostic {
    pub diagnostic: LintDiagnostic,
    /// Half-open char offset range `[from, to)`
    pub range: Range<usize>,
}

impl ResolvedDiagnostic {
    pub fn severity(&self) -> Severity {
        self.diagnostic.severity
    }

    pub fn message(&self) -> &str {
        &self.diagnostic.message
    }

    pub fn label(&self) -> String {
        self.diagnostic.label()
    }
}

/// Resolve parsed diagnostics against a line index.
///
/// A diagnostic whose line does not exist is dropped on its own; the rest
/// are kept in order.
pub fn resolve_diagnostics(
    diagnostics: Vec<LintDiagnostic>,
    lines: &impl LineLookup,
) -> Vec<ResolvedDiagnostic> {
    diagnostics
        .into_iter()
        .filter_map(|diagnostic| match lines.resolve(diagnostic.line, diagnostic.column) {
            Ok(range) => Some(ResolvedDiagnostic { diagnostic, range }),
            Err(e) => {
                tracing::warn!("Dropping diagnostic {:?}: {}", diagnostic.code, e);
                None
            }
        })
        .collect()
}

/// Parse linter output and resolve it against the linted text
pub fn diagnostics_for_snapshot(output: &str, text: &str) -> Vec<ResolvedDiagnostic> {
    resolve_diagnostics(parse_lint_output(output), &LineTable::new(text))
}
