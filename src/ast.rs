use std::fmt;

use crate::token::{Location, Span, Spanned};

/// Type tag of a syntax node. Names follow the ESTree vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Program,
    // statements
    BlockStatement,
    EmptyStatement,
    ExpressionStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    ClassDeclaration,
    ClassBody,
    MethodDefinition,
    ReturnStatement,
    IfStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoWhileStatement,
    SwitchStatement,
    SwitchCase,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    // expressions
    Identifier,
    Literal,
    ThisExpression,
    ArrayExpression,
    ObjectExpression,
    Property,
    SpreadElement,
    FunctionExpression,
    ArrowFunctionExpression,
    MemberExpression,
    CallExpression,
    NewExpression,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    ConditionalExpression,
    AssignmentExpression,
    SequenceExpression,
    // patterns
    AssignmentPattern,
    RestElement,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::BlockStatement => "BlockStatement",
            Self::EmptyStatement => "EmptyStatement",
            Self::ExpressionStatement => "ExpressionStatement",
            Self::VariableDeclaration => "VariableDeclaration",
            Self::VariableDeclarator => "VariableDeclarator",
            Self::FunctionDeclaration => "FunctionDeclaration",
            Self::ClassDeclaration => "ClassDeclaration",
            Self::ClassBody => "ClassBody",
            Self::MethodDefinition => "MethodDefinition",
            Self::ReturnStatement => "ReturnStatement",
            Self::IfStatement => "IfStatement",
            Self::ForStatement => "ForStatement",
            Self::ForInStatement => "ForInStatement",
            Self::ForOfStatement => "ForOfStatement",
            Self::WhileStatement => "WhileStatement",
            Self::DoWhileStatement => "DoWhileStatement",
            Self::SwitchStatement => "SwitchStatement",
            Self::SwitchCase => "SwitchCase",
            Self::BreakStatement => "BreakStatement",
            Self::ContinueStatement => "ContinueStatement",
            Self::ThrowStatement => "ThrowStatement",
            Self::Identifier => "Identifier",
            Self::Literal => "Literal",
            Self::ThisExpression => "ThisExpression",
            Self::ArrayExpression => "ArrayExpression",
            Self::ObjectExpression => "ObjectExpression",
            Self::Property => "Property",
            Self::SpreadElement => "SpreadElement",
            Self::FunctionExpression => "FunctionExpression",
            Self::ArrowFunctionExpression => "ArrowFunctionExpression",
            Self::MemberExpression => "MemberExpression",
            Self::CallExpression => "CallExpression",
            Self::NewExpression => "NewExpression",
            Self::UnaryExpression => "UnaryExpression",
            Self::UpdateExpression => "UpdateExpression",
            Self::BinaryExpression => "BinaryExpression",
            Self::LogicalExpression => "LogicalExpression",
            Self::ConditionalExpression => "ConditionalExpression",
            Self::AssignmentExpression => "AssignmentExpression",
            Self::SequenceExpression => "SequenceExpression",
            Self::AssignmentPattern => "AssignmentPattern",
            Self::RestElement => "RestElement",
        }
    }

    /// Function-like kinds that own a parameter list and a body.
    #[must_use]
    pub const fn is_function(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration | Self::FunctionExpression | Self::ArrowFunctionExpression
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value stored under a field name of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Node(Box<Node>),
    List(Vec<Node>),
    /// Optional slot with nothing in it, e.g. a bare `return;`.
    Absent,
    Flag(bool),
    Text(String),
}

impl From<Node> for Field {
    fn from(node: Node) -> Self {
        Self::Node(Box::new(node))
    }
}

impl From<Option<Node>> for Field {
    fn from(node: Option<Node>) -> Self {
        node.map_or(Self::Absent, Self::from)
    }
}

impl From<Vec<Node>> for Field {
    fn from(nodes: Vec<Node>) -> Self {
        Self::List(nodes)
    }
}

impl From<bool> for Field {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for Field {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Syntax tree node: a kind tag, where it sits in the source, and its
/// fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub loc: Location,
    fields: Vec<(&'static str, Field)>,
}

impl Node {
    #[must_use]
    pub const fn new(kind: NodeKind, span: Span, loc: Location) -> Self {
        Self {
            kind,
            span,
            loc,
            fields: Vec::new(),
        }
    }

    /// Append a field. Lookups return the first field with a given name.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<Field>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(key, value)| (*key, value))
    }

    /// Single child stored under `name`, `None` when absent or not a node.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        match self.field(name) {
            Some(Field::Node(node)) => Some(&**node),
            _ => None,
        }
    }

    /// Child list stored under `name`, empty when absent.
    #[must_use]
    pub fn list(&self, name: &str) -> &[Self] {
        match self.field(name) {
            Some(Field::List(nodes)) => nodes,
            _ => &[],
        }
    }

    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.field(name), Some(Field::Flag(true)))
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.field(name) {
            Some(Field::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Nodes stored under `name`, whether the field holds one node or a list.
    #[must_use]
    pub fn nodes_of(&self, name: &str) -> &[Self] {
        self.field(name).map(field_nodes).unwrap_or_default()
    }

    /// Every node-valued field, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        self.fields.iter().flat_map(|(_, value)| field_nodes(value))
    }

    /// Identifier name, or the raw text of a literal.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.text("name").or_else(|| self.text("raw"))
    }
}

fn field_nodes(value: &Field) -> &[Node] {
    match value {
        Field::Node(node) => std::slice::from_ref(&**node),
        Field::List(nodes) => nodes,
        _ => &[],
    }
}

impl Spanned for Node {
    fn span(&self) -> Span {
        self.span
    }

    fn loc(&self) -> Location {
        self.loc
    }
}
