//! Parsing options and configuration.

/// Options for reconstructing OneNote sections.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode for batch operations
    pub error_mode: ErrorMode,

    /// Whether to keep image and attachment payloads
    pub extract_resources: bool,

    /// Whether to use parallel processing across pages and sections
    pub parallel: bool,

    /// Whether to drop repeated revision copies of content objects
    pub deduplicate: bool,

    /// Whether to restore outline reading order before extraction
    pub reorder_hierarchy: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip failing sections).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable resource extraction.
    pub fn with_resources(mut self, extract: bool) -> Self {
        self.extract_resources = extract;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable revision de-duplication.
    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate = enabled;
        self
    }

    /// Enable or disable outline reordering.
    pub fn with_hierarchy_reorder(mut self, enabled: bool) -> Self {
        self.reorder_hierarchy = enabled;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            extract_resources: true,
            parallel: true,
            deduplicate: true,
            reorder_hierarchy: true,
        }
    }
}

/// Error handling mode during batch parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first section error
    #[default]
    Strict,
    /// Log failing sections and continue
    Lenient,
}
