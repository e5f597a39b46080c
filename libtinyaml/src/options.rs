//! Parser configuration.

/// Default recursion limit for nested blocks.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling a single parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Name reported in error messages.
    pub filename: Option<String>,
    /// Maximum nesting depth before `NestingTooDeep` is raised.
    pub max_depth: usize,
    /// Fail with `TrailingContent` instead of ignoring lines left after the
    /// root value.
    pub reject_trailing_content: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filename: None,
            max_depth: DEFAULT_MAX_DEPTH,
            reject_trailing_content: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn reject_trailing_content(mut self, reject: bool) -> Self {
        self.reject_trailing_content = reject;
        self
    }
}
