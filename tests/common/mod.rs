#![allow(dead_code)]

use dotloc::{
    Config, Control, Diagnostic, DotPosition, Node, NodeKind, fix_source, lint_source, parse_str,
    walk,
};

pub fn config(position: DotPosition) -> Config {
    Config::default().with_dot_location(position)
}

pub fn program(source: &str) -> Node {
    parse_str(source).unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"))
}

pub fn lint(source: &str, position: DotPosition) -> Vec<Diagnostic> {
    lint_source(source, &config(position))
        .unwrap_or_else(|e| panic!("failed to lint {source:?}: {e}"))
}

/// Fix `source` and assert that nothing is left to report.
pub fn fix(source: &str, position: DotPosition) -> String {
    let report = fix_source(source, &config(position))
        .unwrap_or_else(|e| panic!("failed to fix {source:?}: {e}"));
    assert!(
        report.remaining.is_empty(),
        "diagnostics left after fixing:\n--- input ---\n{source}\n--- output ---\n{}",
        report.output
    );
    report.output
}

/// Every node of `kind` in pre-order.
pub fn all_of_kind(root: &Node, kind: NodeKind) -> Vec<&Node> {
    let mut found = Vec::new();
    walk(root, |node| {
        if node.is(kind) {
            found.push(node);
        }
        Control::Continue
    });
    found
}

/// First node of `kind` in pre-order.
pub fn first_of_kind(root: &Node, kind: NodeKind) -> &Node {
    all_of_kind(root, kind)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no {kind} node"))
}

/// First identifier named `name` in pre-order.
pub fn identifier<'a>(root: &'a Node, name: &str) -> &'a Node {
    all_of_kind(root, NodeKind::Identifier)
        .into_iter()
        .find(|node| node.name() == Some(name))
        .unwrap_or_else(|| panic!("no identifier {name}"))
}
