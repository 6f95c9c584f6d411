//! Token lookups around nodes.

mod common;

use common::{first_of_kind, identifier, program};
use dotloc::{NodeKind, Span, TokenCursor, tokenize};

fn text(token: Option<&dotloc::Token>) -> Option<&str> {
    token.map(|t| t.text.as_str())
}

#[test]
fn neighbours_of_a_property() {
    let source = "foo\n  ?.bar()";
    let tokens = tokenize(source).expect("tokenize");
    let root = program(source);
    let cursor = TokenCursor::new(source, &tokens);

    let bar = identifier(&root, "bar");
    let dot = cursor.token_before(bar).expect("dot");
    assert_eq!(dot.text, "?.");
    assert_eq!(text(cursor.token_before(dot)), Some("foo"));
    assert_eq!(text(cursor.token_after(bar)), Some("("));
    assert!(!TokenCursor::same_line(cursor.token_before(dot).expect("foo"), dot));
    assert!(TokenCursor::same_line(dot, bar));
}

#[test]
fn comments_are_skipped() {
    let source = "a /* x */ . /* y */ b";
    let tokens = tokenize(source).expect("tokenize");
    let root = program(source);
    let cursor = TokenCursor::new(source, &tokens);

    let b = identifier(&root, "b");
    let dot = cursor.token_before(b).expect("dot");
    assert_eq!(dot.text, ".");
    assert_eq!(cursor.text(Span::new(dot.span.end, b.span.start)), " /* y */ ");
}

#[test]
fn first_and_last_tokens_of_a_node() {
    let source = "x = (a + b) * c;";
    let tokens = tokenize(source).expect("tokenize");
    let root = program(source);
    let cursor = TokenCursor::new(source, &tokens);

    let sum = first_of_kind(&root, NodeKind::BinaryExpression);
    // `*` is the outer node; the first in pre-order
    assert_eq!(sum.text("operator"), Some("*"));
    assert_eq!(text(cursor.first_token(sum)), Some("("));
    assert_eq!(text(cursor.last_token(sum)), Some("c"));
}

#[test]
fn parenthesized_operand() {
    let source = "x = (a + b) * c;";
    let tokens = tokenize(source).expect("tokenize");
    let root = program(source);
    let cursor = TokenCursor::new(source, &tokens);

    let product = first_of_kind(&root, NodeKind::BinaryExpression);
    let inner = product.child("left").expect("left");
    assert!(cursor.is_parenthesized(inner));
    assert!(!cursor.is_parenthesized(product));
    assert!(!cursor.is_parenthesized(identifier(&root, "a")));
}

#[test]
fn first_token_on_line_crosses_comments_not_newlines() {
    let source = "if (a) {\n  b /* c\n */ + d;\n}";
    let tokens = tokenize(source).expect("tokenize");
    let root = program(source);
    let cursor = TokenCursor::new(source, &tokens);

    // the comment contains a newline, so `+` starts its own line
    let d = identifier(&root, "d");
    assert_eq!(text(cursor.first_token_on_line(d)), Some("+"));

    let b = identifier(&root, "b");
    assert!(cursor.starts_line(b));
    assert_eq!(text(cursor.first_token_on_line(identifier(&root, "a"))), Some("if"));
}

#[test]
fn boundaries_degrade_to_none() {
    let source = "a";
    let tokens = tokenize(source).expect("tokenize");
    let cursor = TokenCursor::new(source, &tokens);

    assert!(cursor.token_before(&tokens[0]).is_none());
    assert!(cursor.token_after(&tokens[0]).is_none());
    assert_eq!(cursor.text(Span::new(5, 9)), "");

    let empty = TokenCursor::new("", &[]);
    assert!(empty.tokens().is_empty());
    assert!(empty.first_token(&tokens[0]).is_none());
}
