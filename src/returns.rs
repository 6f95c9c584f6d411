//! Enumerate the return points of a function without entering nested scopes.

use std::ops::ControlFlow;

use crate::ast::{Node, NodeKind};
use crate::walker::{Control, walk};

/// Kinds whose return statements belong to the enclosing function.
const TRANSPARENT: &[NodeKind] = &[
    NodeKind::BlockStatement,
    NodeKind::IfStatement,
    NodeKind::ForStatement,
    NodeKind::ForInStatement,
    NodeKind::ForOfStatement,
    NodeKind::WhileStatement,
    NodeKind::DoWhileStatement,
    NodeKind::SwitchStatement,
    NodeKind::SwitchCase,
];

/// Call `on_return` with the value of every return point of `func`, in
/// source order.
///
/// * An expression-bodied arrow reports its body once.
/// * A `ReturnStatement` reports its own argument once.
/// * Functions and methods with a block body report the argument of each
///   reachable `return` (`None` for a bare `return;`), never looking inside
///   nested functions, classes or expressions.
///
/// Returning `ControlFlow::Break(())` from `on_return` stops the search.
/// Any other node kind is ignored.
pub fn for_each_return<'a, F>(func: &'a Node, mut on_return: F)
where
    F: FnMut(Option<&'a Node>) -> ControlFlow<()>,
{
    match func.kind {
        NodeKind::ArrowFunctionExpression if func.flag("expression") => {
            if let Some(body) = func.child("body") {
                // single report, nothing left to stop
                let _ = on_return(Some(body));
            }
        }
        NodeKind::ReturnStatement => {
            // single report, nothing left to stop
            let _ = on_return(func.child("argument"));
        }
        kind if kind.is_function() => {
            if let Some(body) = func.child("body") {
                walk_body(body, on_return);
            }
        }
        NodeKind::MethodDefinition | NodeKind::Property => {
            if let Some(value) = func.child("value").filter(|v| v.is(NodeKind::FunctionExpression))
            {
                for_each_return(value, on_return);
            }
        }
        _ => {}
    }
}

fn walk_body<'a, F>(body: &'a Node, mut on_return: F)
where
    F: FnMut(Option<&'a Node>) -> ControlFlow<()>,
{
    walk(body, |node| {
        if node.is(NodeKind::ReturnStatement) {
            return match on_return(node.child("argument")) {
                ControlFlow::Break(()) => Control::Break,
                ControlFlow::Continue(()) => Control::Skip,
            };
        }
        if TRANSPARENT.contains(&node.kind) {
            Control::Continue
        } else {
            Control::Skip
        }
    });
}

/// Collect every return value of `func`. See [`for_each_return`].
#[must_use]
pub fn return_points(func: &Node) -> Vec<Option<&Node>> {
    let mut points = Vec::new();
    for_each_return(func, |value| {
        points.push(value);
        ControlFlow::Continue(())
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    fn first(source: &str) -> Node {
        let program = parse_str(source).expect("parse failed");
        program.list("body")[0].clone()
    }

    fn raws<'a>(points: &[Option<&'a Node>]) -> Vec<Option<&'a str>> {
        points.iter().map(|p| p.and_then(Node::name)).collect()
    }

    #[test]
    fn reports_in_source_order() {
        let f = first("function f(x) { if (x) return 1; return 2; }");
        assert_eq!(raws(&return_points(&f)), [Some("1"), Some("2")]);
    }

    #[test]
    fn bare_return_reports_none() {
        let f = first("function f() { return; }");
        assert!(matches!(return_points(&f).as_slice(), [None]));
    }

    #[test]
    fn nested_function_is_opaque() {
        let f = first("function f() { function g() { return 1; } return 2; }");
        assert_eq!(raws(&return_points(&f)), [Some("2")]);
    }

    #[test]
    fn expression_arrow_reports_body() {
        let stmt = first("x => x + 1");
        let arrow = stmt.child("expression").expect("arrow");
        let points = return_points(arrow);
        assert_eq!(points.len(), 1);
        assert!(points[0].is_some_and(|body| body.is(NodeKind::BinaryExpression)));
    }

    #[test]
    fn stop_prevents_later_reports() {
        let f = first("function f(a) { if (a) { return 1; } while (a) return 2; return 3; }");
        let mut seen = Vec::new();
        for_each_return(&f, |value| {
            seen.push(value.and_then(Node::name));
            ControlFlow::Break(())
        });
        assert_eq!(seen, [Some("1")]);
    }

    #[test]
    fn single_report_kinds_ignore_stop() {
        let stmt = first("x => x;");
        let arrow = stmt.child("expression").expect("arrow");
        let f = first("function f() { return 7; }");
        let ret = &f.child("body").expect("body").list("body")[0];

        for node in [arrow, ret] {
            let mut calls = 0;
            for_each_return(node, |value| {
                assert!(value.is_some());
                calls += 1;
                ControlFlow::Break(())
            });
            assert_eq!(calls, 1);
        }
    }

    #[test]
    fn unsupported_kind_is_noop() {
        let stmt = first("a + b;");
        assert!(return_points(&stmt).is_empty());
    }
}
