//! Markup text writer

/// Indentation emitted per nesting level
pub const INDENT: &str = "  ";

/// Incremental markup writer
///
/// Depth is counted in nesting levels; each level indents by [`INDENT`].
/// Values holding line breaks or carriage returns are written as
/// continuation lines so the output always parses back to the same value.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    output: String,
}

impl Writer {
    /// Create empty writer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an element line without a value
    pub fn open(&mut self, depth: usize, name: &str) {
        self.indent(depth);
        self.output.push_str(name);
        self.output.push('\n');
    }

    /// Write an element line with a value
    pub fn line(&mut self, depth: usize, name: &str, value: &str) {
        if value.contains(|c: char| c == '\n' || c == '\r') {
            self.open(depth, name);
            for part in value.split('\n') {
                self.indent(depth + 1);
                self.output.push(':');
                if !part.is_empty() {
                    self.output.push(' ');
                    self.output.push_str(part);
                }
                self.output.push('\n');
            }
            return;
        }

        self.indent(depth);
        self.output.push_str(name);
        self.output.push_str(": ");
        self.output.push_str(value);
        self.output.push('\n');
    }

    /// Text written so far
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Consume the writer, returning the text
    #[inline]
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push_str(INDENT);
        }
    }
}
