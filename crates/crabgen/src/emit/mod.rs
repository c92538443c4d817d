//! Lowering: turns a resolved [`Context`](crate::model::Context) into C
//! source text.
//!
//! Split into the four emitters the design calls out: expressions and
//! statements produce C syntax fragments; the Declaration Emitter wraps
//! them in the GObject boilerplate; the Dependency Resolver decides what
//! each emitted file needs to `#include` or forward-declare.

pub mod declaration;
pub mod dependency;
pub mod expression;
pub mod statement;
pub mod typename;

/// An indentation-aware string sink shared by the statement and expression
/// emitters, analogous to the simple `String` accumulator the teacher's
/// `CodeSpanReportGenerator` builds up one `with_label` at a time, but for
/// C source text instead of diagnostic structure.
#[derive(Debug, Default)]
pub struct CWriter {
    buffer: String,
    indent: usize,
}

impl CWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.buffer.push_str("    ");
        }
        self.buffer.push_str(text.as_ref());
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    pub fn raw(&mut self, text: impl AsRef<str>) {
        self.buffer.push_str(text.as_ref());
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
