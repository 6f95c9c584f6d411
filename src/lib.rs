//! JavaScript front end and the `dot-location` lint rule.
//!
//! A lexer and parser producing an ESTree-shaped syntax tree, helpers
//! for walking it, and a rule that keeps the dot of a member access on
//! the same line as either its object or its property.
//!
//! # Quick start
//!
//! ## Lint and fix a source
//!
//! ```
//! use dotloc::{Config, fix_source, lint_source};
//!
//! let source = "foo\n.bar();\n";
//! let diagnostics = lint_source(source, &Config::default()).unwrap();
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].to_string(), "2:1: dot-location Expected dot to be on same line as object.");
//!
//! let report = fix_source(source, &Config::default()).unwrap();
//! assert_eq!(report.output, "foo.\nbar();\n");
//! ```
//!
//! ## Walk a tree
//!
//! ```
//! use dotloc::{Control, NodeKind, parse_str, walk};
//!
//! let program = parse_str("a.b.c;").unwrap();
//! let mut members = 0;
//! walk(&program, |node| {
//!     if node.is(NodeKind::MemberExpression) {
//!         members += 1;
//!     }
//!     Control::Continue
//! });
//! assert_eq!(members, 2);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod config;
pub mod cursor;
pub mod diagnostic;
pub mod dot_location;
pub mod lexer;
pub mod linter;
pub mod parser;
pub mod returns;
pub mod token;
pub mod walker;

pub use ast::{Field, Node, NodeKind};
pub use config::{Config, ConfigError, RulesConfig};
pub use cursor::TokenCursor;
pub use diagnostic::{Diagnostic, Edit, Fix, FixOutcome, MessageId, apply_fixes};
pub use dot_location::{DotLocation, DotPosition};
pub use lexer::{LexError, LexErrorKind, tokenize};
pub use linter::{FixReport, fix_source, lint_program, lint_source};
pub use parser::{ParseError, ParseErrorKind, parse};
pub use returns::{for_each_return, return_points};
pub use token::{Location, Position, Span, Spanned, Token, TokenKind};
pub use walker::{ChildKeys, Control, walk, walk_with};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Tokenize and parse a source string in one step.
pub fn parse_str(input: &str) -> Result<Node, Error> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens)?)
}
