//! Indent-aware string builder for the plain-text diagnostic report.
//!
//! Reports use 2-space indentation.

pub struct ReportWriter {
    buf: String,
    indent_level: usize,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(1024),
            indent_level: 0,
        }
    }

    /// Write a complete line (appends newline).
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buf.push_str("  ");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Write a `[Title]` section header and indent its body.
    pub fn section(&mut self, title: &str) {
        self.line(&format!("[{}]", title));
        self.indent();
    }

    /// Close a section opened with `section`, followed by a blank line.
    pub fn end_section(&mut self) {
        self.dedent();
        self.blank();
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
