//! Formatting options for the printer.

/// Options for printing.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Spaces per indentation level (default: 4). `0` means flat,
    /// single-line output.
    pub indent: usize,

    /// Write a comma after the last item of a non-empty indented
    /// container (default: true). Forced off by JSON mode.
    pub trailing_commas: bool,

    /// Escape code points at or above U+0080 in string output as
    /// `\uXXXX` sequences (default: false).
    pub ensure_ascii: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            trailing_commas: true,
            ensure_ascii: false,
        }
    }
}

impl PrintOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indent width.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Single-line output, equivalent to `indent(0)`.
    pub fn flatten(mut self) -> Self {
        self.indent = 0;
        self
    }

    /// Enable or disable trailing commas.
    pub fn trailing_commas(mut self, on: bool) -> Self {
        self.trailing_commas = on;
        self
    }

    /// Enable ASCII-only string output.
    pub fn ensure_ascii(mut self, on: bool) -> Self {
        self.ensure_ascii = on;
        self
    }

    /// The option set implied by JSON output mode: whatever else is
    /// configured, trailing commas are not JSON.
    pub fn for_json(mut self) -> Self {
        self.trailing_commas = false;
        self
    }
}
