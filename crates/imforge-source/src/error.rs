use std::fmt;

/// A lexical or statement-splitting error in a source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 1-based source column number where the error occurred.
    pub col: usize,
}

impl SourceError {
    pub(crate) fn new(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self { message: msg.into(), line, col }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source error at {}:{}: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for SourceError {}
