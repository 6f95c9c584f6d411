//! Parser shapes, statement termination, and error tests.

mod common;

use common::{all_of_kind, first_of_kind, program};
use dotloc::{Error, NodeKind, ParseErrorKind, Position, Span, parse, parse_str, tokenize};

// -----------------------------------------------------------
// Convenience entry point.
// -----------------------------------------------------------

#[test]
fn parse_str_convenience() {
    let root = parse_str("a.b;").expect("parse");
    assert!(root.is(NodeKind::Program));
    assert_eq!(root.list("body").len(), 1);
}

#[test]
fn parse_str_lex_error() {
    assert!(matches!(parse_str("'open"), Err(Error::Lex(_))));
}

#[test]
fn parse_str_parse_error() {
    assert!(matches!(parse_str("a.;"), Err(Error::Parse(_))));
}

#[test]
fn parse_empty_program() {
    let tokens = tokenize("// nothing\n").expect("tokenize");
    let root = parse(&tokens).expect("parse");
    assert!(root.list("body").is_empty());
    assert_eq!(root.span, Span::default());
}

// -----------------------------------------------------------
// Spans and locations.
// -----------------------------------------------------------

#[test]
fn member_location_spans_lines() {
    let root = program("foo\n  .bar");
    let member = first_of_kind(&root, NodeKind::MemberExpression);
    assert_eq!(member.span, Span::new(0, 10));
    assert_eq!(member.loc.start, Position { line: 1, column: 1 });
    assert_eq!(member.loc.end, Position { line: 2, column: 7 });
}

#[test]
fn statement_span_includes_semicolon() {
    let root = program("x = 1;");
    assert_eq!(root.list("body")[0].span, Span::new(0, 6));
}

// -----------------------------------------------------------
// Statement termination.
// -----------------------------------------------------------

#[test]
fn newline_ends_statement() {
    let root = program("a\nb\nc");
    assert_eq!(root.list("body").len(), 3);
}

#[test]
fn newline_does_not_end_member_chain() {
    let root = program("a\n.b\n.c");
    assert_eq!(root.list("body").len(), 1);
    assert_eq!(all_of_kind(&root, NodeKind::MemberExpression).len(), 2);
}

#[test]
fn postfix_update_is_restricted() {
    let root = program("a\n++b");
    let body = root.list("body");
    assert_eq!(body.len(), 2);
    let update = first_of_kind(&root, NodeKind::UpdateExpression);
    assert!(update.flag("prefix"));
}

#[test]
fn break_label_is_restricted() {
    let root = program("while (a) { break\nfoo }");
    let brk = first_of_kind(&root, NodeKind::BreakStatement);
    assert!(brk.child("label").is_none());
}

// -----------------------------------------------------------
// Expression shapes.
// -----------------------------------------------------------

#[test]
fn parse_new_with_member_callee() {
    let root = program("new a.B(1).c;");
    let outer = first_of_kind(&root, NodeKind::MemberExpression);
    let new = outer.child("object").expect("object");
    assert!(new.is(NodeKind::NewExpression));
    assert!(
        new.child("callee")
            .expect("callee")
            .is(NodeKind::MemberExpression)
    );
    assert_eq!(new.list("arguments").len(), 1);
}

#[test]
fn parse_optional_chain() {
    let root = program("a?.b?.[c]?.(d);");
    let call = first_of_kind(&root, NodeKind::CallExpression);
    assert!(call.flag("optional"));
    let computed = call.child("callee").expect("callee");
    assert!(computed.flag("computed"));
    assert!(computed.flag("optional"));
    let dotted = computed.child("object").expect("object");
    assert!(!dotted.flag("computed"));
    assert!(dotted.flag("optional"));
}

#[test]
fn parse_sequence_and_conditional() {
    let root = program("x = a ? b : c, y;");
    let sequence = first_of_kind(&root, NodeKind::SequenceExpression);
    assert_eq!(sequence.list("expressions").len(), 2);
    assert_eq!(all_of_kind(&root, NodeKind::ConditionalExpression).len(), 1);
}

#[test]
fn parse_logical_and_unary() {
    let root = program("!a && typeof b === 'x' || c;");
    assert!(!all_of_kind(&root, NodeKind::LogicalExpression).is_empty());
    let unary: Vec<_> = all_of_kind(&root, NodeKind::UnaryExpression)
        .into_iter()
        .filter_map(|n| n.text("operator"))
        .collect();
    assert_eq!(unary, ["!", "typeof"]);
}

#[test]
fn parse_exponent_is_right_associative() {
    let root = program("a ** b ** c;");
    let outer = first_of_kind(&root, NodeKind::BinaryExpression);
    assert!(outer.child("left").expect("left").is(NodeKind::Identifier));
    assert!(
        outer
            .child("right")
            .expect("right")
            .is(NodeKind::BinaryExpression)
    );
}

#[test]
fn parse_destructuring_defaults_and_rest() {
    let root = program("function f(a = 1, ...rest) {}");
    let f = first_of_kind(&root, NodeKind::FunctionDeclaration);
    let params = f.list("params");
    assert!(params[0].is(NodeKind::AssignmentPattern));
    assert!(params[1].is(NodeKind::RestElement));
}

#[test]
fn parse_object_accessors() {
    let root = program("o = { get x() { return 1 }, set x(v) {} };");
    let kinds: Vec<_> = all_of_kind(&root, NodeKind::Property)
        .into_iter()
        .filter_map(|p| p.text("kind"))
        .collect();
    assert_eq!(kinds, ["get", "set"]);
}

#[test]
fn parse_for_in_with_in_operator_in_body() {
    let root = program("for (const k in o) { if (k in p) {} }");
    let stmt = first_of_kind(&root, NodeKind::ForInStatement);
    assert!(
        stmt.child("left")
            .expect("left")
            .is(NodeKind::VariableDeclaration)
    );
}

#[test]
fn parse_switch_cases() {
    let root = program("switch (x) { case 1: a(); b(); case 2: default: c(); }");
    let cases = all_of_kind(&root, NodeKind::SwitchCase);
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0].list("consequent").len(), 2);
    assert!(cases[1].list("consequent").is_empty());
    assert!(cases[2].child("test").is_none());
}

// -----------------------------------------------------------
// Errors.
// -----------------------------------------------------------

#[test]
fn parse_error_missing_semicolon() {
    let err = parse_str("a b").unwrap_err();
    assert!(
        err.to_string().starts_with("expected ';', got 'b'"),
        "{err}"
    );
}

#[test]
fn parse_error_unexpected_eof() {
    let tokens = tokenize("a +").expect("tokenize");
    let err = parse(&tokens).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn parse_error_unclosed_paren() {
    let tokens = tokenize("f(a, b").expect("tokenize");
    let err = parse(&tokens).unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::Expected { found: None, .. }
    ));
}

#[test]
fn parse_error_deeply_nested_parens() {
    let input = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
    let err = parse_str(&input).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ref e) if e.kind == ParseErrorKind::NestingTooDeep
    ));
    assert!(err.to_string().starts_with("nesting too deep"), "{err}");
}

#[test]
fn parse_error_deeply_nested_blocks_and_calls() {
    let blocks = format!("{}{}", "{".repeat(10_000), "}".repeat(10_000));
    assert!(matches!(parse_str(&blocks), Err(Error::Parse(_))));
    let calls = format!("f{}", "(g".repeat(10_000)) + &")".repeat(10_000);
    assert!(matches!(parse_str(&calls), Err(Error::Parse(_))));
}

#[test]
fn parse_error_stray_close_brace() {
    let tokens = tokenize("}").expect("tokenize");
    let err = parse(&tokens).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken("}".to_string()));
    assert_eq!(err.position, Position { line: 1, column: 1 });
}
