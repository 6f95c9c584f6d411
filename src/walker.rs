//! Generic pre-order traversal over a syntax tree.
//!
//! The visitor is any `FnMut(&Node) -> Control`. Returning
//! [`Control::Skip`] keeps the walker out of the current node's
//! children; [`Control::Break`] ends the traversal.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::{Node, NodeKind};

/// What the walker does after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Descend into the node's children.
    Continue,
    /// Leave the node's children unvisited and move on.
    Skip,
    /// Stop the whole traversal.
    Break,
}

/// Lookup table from node kind to the field names whose children are
/// traversed. Kinds without an entry traverse every node-valued field in
/// declaration order.
#[derive(Debug, Clone)]
pub struct ChildKeys {
    overrides: HashMap<NodeKind, &'static [&'static str]>,
}

impl Default for ChildKeys {
    /// Container literals only expose their element slot.
    fn default() -> Self {
        Self::empty()
            .with(NodeKind::ArrayExpression, &["elements"])
            .with(NodeKind::ObjectExpression, &["properties"])
    }
}

impl ChildKeys {
    /// Table with no overrides at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Register (or replace) the child keys for `kind`.
    #[must_use]
    pub fn with(mut self, kind: NodeKind, keys: &'static [&'static str]) -> Self {
        self.overrides.insert(kind, keys);
        self
    }

    #[must_use]
    pub fn keys(&self, kind: NodeKind) -> Option<&'static [&'static str]> {
        self.overrides.get(&kind).copied()
    }

    /// Children of `node` in traversal order. Missing fields contribute
    /// nothing.
    #[must_use]
    pub fn children<'a>(&self, node: &'a Node) -> Vec<&'a Node> {
        match self.keys(node.kind) {
            Some(keys) => keys
                .iter()
                .flat_map(|key| node.nodes_of(key))
                .collect(),
            None => node.children().collect(),
        }
    }
}

static DEFAULT_KEYS: LazyLock<ChildKeys> = LazyLock::new(ChildKeys::default);

/// Walk `root` in pre-order with the default child keys.
///
/// Returns [`Control::Break`] if the visitor stopped the traversal,
/// [`Control::Continue`] otherwise.
pub fn walk<'a, F>(root: &'a Node, enter: F) -> Control
where
    F: FnMut(&'a Node) -> Control,
{
    walk_with(root, &DEFAULT_KEYS, enter)
}

/// Walk `root` in pre-order using `keys` to enumerate children.
pub fn walk_with<'a, F>(root: &'a Node, keys: &ChildKeys, mut enter: F) -> Control
where
    F: FnMut(&'a Node) -> Control,
{
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match enter(node) {
            Control::Break => return Control::Break,
            Control::Skip => {}
            Control::Continue => {
                let start = stack.len();
                stack.extend(keys.children(node));
                // first child on top
                stack[start..].reverse();
            }
        }
    }

    Control::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    fn kinds_visited(source: &str, keys: &ChildKeys) -> Vec<NodeKind> {
        let program = parse_str(source).expect("parse failed");
        let mut seen = Vec::new();
        walk_with(&program, keys, |node| {
            seen.push(node.kind);
            Control::Continue
        });
        seen
    }

    #[test]
    fn pre_order() {
        let seen = kinds_visited("a.b(c);", &ChildKeys::default());
        assert_eq!(
            seen,
            [
                NodeKind::Program,
                NodeKind::ExpressionStatement,
                NodeKind::CallExpression,
                NodeKind::MemberExpression,
                NodeKind::Identifier,
                NodeKind::Identifier,
                NodeKind::Identifier,
            ]
        );
    }

    #[test]
    fn skip_leaves_siblings_visited() {
        let program = parse_str("f(a); g(b);").expect("parse failed");
        let mut names = Vec::new();
        walk(&program, |node| {
            if let Some(name) = node.name() {
                names.push(name);
            }
            if node.is(NodeKind::CallExpression) && node.child("callee").and_then(Node::name) == Some("f") {
                return Control::Skip;
            }
            Control::Continue
        });
        assert_eq!(names, ["g", "b"]);
    }

    #[test]
    fn break_stops_everything() {
        let program = parse_str("a; b; c;").expect("parse failed");
        let mut names = Vec::new();
        let result = walk(&program, |node| {
            if let Some(name) = node.name() {
                names.push(name);
                if name == "b" {
                    return Control::Break;
                }
            }
            Control::Continue
        });
        assert_eq!(result, Control::Break);
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn override_restricts_children() {
        let keys = ChildKeys::default().with(NodeKind::IfStatement, &["consequent"]);
        let seen = kinds_visited("if (x) y; else z;", &keys);
        let identifiers = seen.iter().filter(|k| **k == NodeKind::Identifier).count();
        assert_eq!(identifiers, 1);
    }

    #[test]
    fn walk_uses_default_keys() {
        let source = "x = [a, { b: c }]; f(...d);";
        let program = parse_str(source).expect("parse failed");
        let expected = kinds_visited(source, &ChildKeys::default());
        for _ in 0..2 {
            let mut seen = Vec::new();
            walk(&program, |node| {
                seen.push(node.kind);
                Control::Continue
            });
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn override_to_missing_field_yields_nothing() {
        let keys = ChildKeys::empty().with(NodeKind::ExpressionStatement, &["nope"]);
        let seen = kinds_visited("a + b;", &keys);
        assert_eq!(seen, [NodeKind::Program, NodeKind::ExpressionStatement]);
    }
}
