use std::fmt;

use imforge_source::{SourceError, Stmt};

use crate::property::ValueError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportErrorKind {
    /// Statements that do not follow the marker grammar, or a value that
    /// does not parse for its property.
    Malformed,
    /// A `@begin` marker naming no known widget kind.
    UnknownWidget(String),
}

/// A source unit that cannot be imported, anchored at a 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportError {
    pub kind: ImportErrorKind,
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl ImportError {
    pub(crate) fn malformed(message: impl Into<String>, at: Option<&Stmt>) -> Self {
        let (line, col) = at.map_or((0, 0), |s| (s.line, s.col));
        Self { kind: ImportErrorKind::Malformed, message: message.into(), line, col }
    }

    pub(crate) fn unknown_widget(type_name: &str, at: &Stmt) -> Self {
        Self {
            kind: ImportErrorKind::UnknownWidget(type_name.to_string()),
            message: format!("unknown widget type `{}`", type_name),
            line: at.line,
            col: at.col,
        }
    }

    pub(crate) fn value(err: ValueError, name: &str, at: &Stmt) -> Self {
        Self::malformed(format!("`{}`: {}", name, err.message), Some(at))
    }
}

impl From<SourceError> for ImportError {
    fn from(e: SourceError) -> Self {
        Self { kind: ImportErrorKind::Malformed, message: e.message, line: e.line, col: e.col }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import error at {}:{}: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for ImportError {}
