//! Statement-level tokenizer for designer source units.
//!
//! The designer exports a widget tree as a restricted set of host-language
//! statements and reads them back on load. This crate turns source text into
//! those statements; it knows nothing about widgets.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`lexer`] | `Lexer`, `Token`, `Spanned`, `quote` |
//! | [`stmt`] | `Stmt`, `StmtKind`, `split_statements`, verbatim blocks |
//! | [`cursor`] | `StmtIter`, a rewindable statement cursor |
//! | [`rhs`] | `Rhs` helpers for literals, paths and calls |
//! | [`error`] | `SourceError` |
//!
//! # Quick start
//!
//! ```rust
//! use imforge_source::{split_statements, StmtIter};
//!
//! let src = r#"
//!     /// @begin Button
//!     Button.label = "OK";
//!     /// @end Button
//! "#;
//!
//! let stmts = split_statements(src).unwrap();
//! let mut it = StmtIter::new(&stmts);
//! assert!(it.next().unwrap().is_marker("begin"));
//! let (path, rhs) = it.next().unwrap().assignment().unwrap();
//! assert_eq!(path, ["Button", "label"]);
//! assert_eq!(rhs.string(), Some("OK"));
//! ```

pub mod cursor;
pub mod error;
pub mod lexer;
pub mod rhs;
pub mod stmt;

pub use cursor::StmtIter;
pub use error::SourceError;
pub use lexer::{quote, Lexer, Spanned, Token};
pub use rhs::Rhs;
pub use stmt::{marker, split_statements, split_statements_with, Stmt, StmtKind, VerbatimRule};
