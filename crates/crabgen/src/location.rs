//! Source location tracking for diagnostics.
//!
//! The front-end hands this core already-parsed, already-bound entities; all
//! this crate needs to keep around is *where* each entity came from, so that
//! a failure during lowering can still be reported with a `file:line:col`
//! prefix. This is a lifetime-free analogue of a parser's span type: it owns
//! its file name and byte range rather than borrowing the original source
//! text, which keeps it cheap to stash on every arena entity.

use std::ops::Range;
use std::sync::Arc;

/// A source file identity as seen by the front-end.
///
/// Only the path and the raw text are kept; the core never edits source
/// text, it only ever reads back the range a [`SourceSpan`] points into for
/// diagnostic rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFileId {
    pub path: Arc<str>,
    pub text: Arc<str>,
}

impl SourceFileId {
    pub fn new(path: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Self {
        Self { path: path.into(), text: text.into() }
    }
}

impl std::fmt::Display for SourceFileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A byte-range location within a known source file.
///
/// Carried by every entity and expression/statement node that can be named
/// in a diagnostic. Cloning is cheap: the file text is reference counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub file: SourceFileId,
    pub range: Range<usize>,
}

impl SourceSpan {
    pub fn new(file: SourceFileId, range: Range<usize>) -> Self {
        Self { file, range }
    }

    /// 1-based (line, column) of the span's start, computed on demand.
    ///
    /// Diagnostics go through `miette`/`codespan-reporting`, which recompute
    /// line/column themselves from a byte offset; this is kept for the
    /// plain-text `file:line:col` prefix form required when diagnostics are
    /// not rendered through the rich reporter.
    pub fn line_col(&self) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for ch in self.file.text[..self.range.start.min(self.file.text.len())].chars() {
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

impl std::fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, col) = self.line_col();
        write!(f, "{}:{}:{}", self.file.path, line, col)
    }
}
