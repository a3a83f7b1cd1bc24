//! XML output options.

/// Options for writing an element tree as XML text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Put each element on its own line, indented by depth
    pub pretty: bool,

    /// Spaces per nesting level in pretty mode
    pub indent: usize,

    /// Start the document with `<?xml version="1.0"?>`
    pub declaration: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            declaration: true,
        }
    }
}

impl XmlOptions {
    /// Create default options (pretty, two-space indent, with declaration).
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output without whitespace between elements.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Default::default()
        }
    }

    /// Enable or disable pretty printing.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enable or disable the XML declaration.
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }
}
