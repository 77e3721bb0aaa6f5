//! Line/column to offset resolution
//!
//! Converts the 1-based `(line, column)` positions reported by the linter into
//! half-open offset ranges inside a document. Offsets count Unicode scalar
//! values (chars), the unit the linter uses for columns.
//!
//! A diagnostic underlines from its reported column to the end of that
//! physical line. Line terminators (`\n`, and a `\r` before it) are not part
//! of the line.

use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("line {line} is out of range (document has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
}

/// Anything that can report line boundaries, e.g. an editor's line index.
pub trait LineLookup {
    fn line_count(&self) -> usize;

    /// Offset range of a 1-based line, excluding its terminator
    fn line_bounds(&self, line: usize) -> Option<Range<usize>>;

    /// Resolve a 1-based `(line, column)` pair to `[from, to)`
    fn resolve(&self, line: usize, column: usize) -> Result<Range<usize>, ResolveError> {
        let bounds = self
            .line_bounds(line)
            .ok_or(ResolveError::LineOutOfRange {
                line,
                line_count: self.line_count(),
            })?;
        let from = bounds
            .start
            .saturating_add(column.saturating_sub(1))
            .min(bounds.end);
        Ok(from..bounds.end)
    }
}

/// Precomputed line boundaries of a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    lines: Vec<Range<usize>>,
}

impl LineTable {
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut offset = 0;
        let mut prev_cr = false;

        for ch in text.chars() {
            if ch == '\n' {
                let end = if prev_cr { offset - 1 } else { offset };
                lines.push(line_start..end);
                line_start = offset + 1;
            }
            prev_cr = ch == '\r';
            offset += 1;
        }
        lines.push(line_start..offset);

        Self { lines }
    }
}

impl LineLookup for LineTable {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_bounds(&self, line: usize) -> Option<Range<usize>> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .cloned()
    }
}

/// Resolve a position directly against document text
pub fn resolve_position(
    text: &str,
    line: usize,
    column: usize,
) -> Result<Range<usize>, ResolveError> {
    LineTable::new(text).resolve(line, column)
}
