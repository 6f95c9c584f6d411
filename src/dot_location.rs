//! `dot-location`: keep the member-access dot on the same line as either
//! the object or the property.
//!
//! ```text
//! // object (default)        // property
//! foo.                       foo
//!   bar()                      .bar()
//! ```

use serde::Deserialize;
use tracing::trace;

use crate::ast::{Node, NodeKind};
use crate::cursor::TokenCursor;
use crate::diagnostic::{Diagnostic, Edit, Fix, MessageId};
use crate::token::{Token, TokenKind};

pub const RULE_NAME: &str = "dot-location";

/// Which side of a line break the dot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotPosition {
    /// `foo.` / `bar`: the dot ends the object's line.
    #[default]
    Object,
    /// `foo` / `.bar`: the dot starts the property's line.
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DotLocation {
    position: DotPosition,
}

impl DotLocation {
    #[must_use]
    pub const fn new(position: DotPosition) -> Self {
        Self { position }
    }

    #[must_use]
    pub const fn position(&self) -> DotPosition {
        self.position
    }

    /// Check one node. Anything other than a non-computed member access
    /// is ignored.
    #[must_use]
    pub fn check(&self, node: &Node, cursor: &TokenCursor<'_>) -> Option<Diagnostic> {
        if !node.is(NodeKind::MemberExpression) || node.flag("computed") {
            return None;
        }
        let property = node.child("property")?;
        let dot = cursor
            .token_before(property)
            .filter(|t| t.is_punct(".") || t.is_punct("?."))?;

        let (message_id, fix) = match self.position {
            DotPosition::Object => {
                let before = cursor.token_before(dot)?;
                if TokenCursor::same_line(before, dot) {
                    return None;
                }
                let text = if dot.text.starts_with('.') && is_decimal_integer(before) {
                    format!(" {}", dot.text)
                } else {
                    dot.text.clone()
                };
                let fix = Fix::new(vec![
                    Edit::insert(before.span.end, text),
                    Edit::remove(dot.span),
                ]);
                (MessageId::ExpectedDotAfterObject, fix)
            }
            DotPosition::Property => {
                if TokenCursor::same_line(dot, property) {
                    return None;
                }
                let fix = Fix::new(vec![
                    Edit::remove(dot.span),
                    Edit::insert(property.span.start, dot.text.clone()),
                ]);
                (MessageId::ExpectedDotBeforeProperty, fix)
            }
        };

        trace!(
            line = dot.loc.start.line,
            column = dot.loc.start.column,
            message = message_id.as_str(),
            "dot-location violation"
        );

        Some(Diagnostic {
            rule: RULE_NAME,
            message_id,
            node: node.span,
            location: dot.loc,
            fix: Some(fix),
        })
    }
}

/// `1.` would lex as a number with a fraction, so a dot moved right after
/// a plain decimal integer needs a separating space. Other radixes,
/// BigInts, and literals that already carry a fraction or exponent are
/// safe.
fn is_decimal_integer(token: &Token) -> bool {
    token.kind == TokenKind::Numeric
        && token.text.starts_with(|c: char| c.is_ascii_digit())
        && token.text.chars().all(|c| c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn numeric(text: &str) -> Token {
        tokenize(text).expect("tokenize").remove(0)
    }

    #[test]
    fn decimal_integers_need_a_space() {
        for text in ["1", "10", "1_000", "010"] {
            assert!(is_decimal_integer(&numeric(text)), "{text}");
        }
    }

    #[test]
    fn other_numeric_forms_do_not() {
        for text in ["1.5", "1e3", "0x1F", "0b1", "0o7", "10n", ".5"] {
            assert!(!is_decimal_integer(&numeric(text)), "{text}");
        }
    }

    #[test]
    fn default_position_is_object() {
        assert_eq!(DotLocation::default().position(), DotPosition::Object);
    }
}
