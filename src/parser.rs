use std::fmt;

use crate::ast::{Node, NodeKind};
use crate::token::{Location, Position, Span, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token was required, found something else or EOF.
    Expected {
        expected: &'static str,
        found: Option<String>,
    },
    /// Token that cannot appear here.
    UnexpectedToken(String),
    /// Input ended in the middle of a construct.
    UnexpectedEof,
    /// Left side of an assignment is not an identifier or member access.
    InvalidAssignmentTarget,
    /// Statements or expressions nested deeper than the parser allows.
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected {
                expected,
                found: None,
            } => {
                write!(f, "expected '{expected}'")
            }
            Self::Expected {
                expected,
                found: Some(t),
            } => {
                write!(f, "expected '{expected}', got '{t}'")
            }
            Self::UnexpectedToken(t) => {
                write!(f, "unexpected token '{t}'")
            }
            Self::UnexpectedEof => {
                write!(f, "unexpected end of input")
            }
            Self::InvalidAssignmentTarget => {
                write!(f, "invalid assignment target")
            }
            Self::NestingTooDeep => {
                write!(f, "nesting too deep")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", position.line, position.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "&&=", "||=", "??=",
];

/// Deepest statement/expression nesting accepted before giving up.
const MAX_DEPTH: usize = 200;

/// Parse a token stream into a `Program` node.
///
/// # Errors
///
/// Returns `ParseError` on tokens that do not form a supported
/// statement or expression.
pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Where a node begins: offset and position of its first token.
#[derive(Debug, Clone, Copy)]
struct Marker {
    offset: usize,
    position: Position,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Cleared while parsing a `for` head so `in` ends the init clause.
    allow_in: bool,
    depth: usize,
    /// Index of the matching close bracket for each open bracket.
    closers: Vec<Option<usize>>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            allow_in: true,
            depth: 0,
            closers: match_brackets(tokens),
        }
    }

    fn parse_program(mut self) -> Result<Node, ParseError> {
        let mut body = Vec::new();
        while self.peek().is_some() {
            body.push(self.parse_statement()?);
        }

        let (span, loc) = match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => (
                Span::new(first.span.start, last.span.end),
                Location {
                    start: first.loc.start,
                    end: last.loc.end,
                },
            ),
            _ => (Span::default(), Location::default()),
        };
        Ok(Node::new(NodeKind::Program, span, loc).with("body", body))
    }

    // -- statements --

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        self.nested(Self::statement)
    }

    fn statement(&mut self) -> Result<Node, ParseError> {
        let tok = self.peek().ok_or_else(|| self.unexpected())?;

        match (tok.kind, tok.text.as_str()) {
            (TokenKind::Punctuator, "{") => self.parse_block(),
            (TokenKind::Punctuator, ";") => {
                let m = self.marker();
                self.pos += 1;
                Ok(self.finish(NodeKind::EmptyStatement, m))
            }
            (TokenKind::Keyword, "var" | "let" | "const") => {
                let m = self.marker();
                let (kind, declarations) = self.parse_declarators()?;
                self.consume_semicolon()?;
                Ok(self
                    .finish(NodeKind::VariableDeclaration, m)
                    .with("kind", kind)
                    .with("declarations", declarations))
            }
            (TokenKind::Keyword, "function") => self.parse_function(NodeKind::FunctionDeclaration),
            (TokenKind::Keyword, "class") => self.parse_class(),
            (TokenKind::Keyword, "return") => self.parse_return(),
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            (TokenKind::Keyword, "while") => self.parse_while(),
            (TokenKind::Keyword, "do") => self.parse_do_while(),
            (TokenKind::Keyword, "switch") => self.parse_switch(),
            (TokenKind::Keyword, "break") => self.parse_jump(NodeKind::BreakStatement),
            (TokenKind::Keyword, "continue") => self.parse_jump(NodeKind::ContinueStatement),
            (TokenKind::Keyword, "throw") => {
                let m = self.marker();
                self.pos += 1;
                let argument = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self
                    .finish(NodeKind::ThrowStatement, m)
                    .with("argument", argument))
            }
            _ => {
                let m = self.marker();
                let expression = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self
                    .finish(NodeKind::ExpressionStatement, m)
                    .with("expression", expression))
            }
        }
    }

    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.expect_punct("{")?;
        let body = self.with_allow_in(true, |p| {
            let mut body = Vec::new();
            while !p.at_punct("}") {
                if p.peek().is_none() {
                    return Err(p.expected("}"));
                }
                body.push(p.parse_statement()?);
            }
            Ok(body)
        })?;
        self.expect_punct("}")?;
        Ok(self.finish(NodeKind::BlockStatement, m).with("body", body))
    }

    fn parse_declarators(&mut self) -> Result<(&'a str, Vec<Node>), ParseError> {
        let kind = self.bump()?.text.as_str();
        let mut declarations = Vec::new();
        loop {
            let m = self.marker();
            let id = self.parse_binding_identifier()?;
            let init = if self.eat_punct("=") {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarations.push(
                self.finish(NodeKind::VariableDeclarator, m)
                    .with("id", id)
                    .with("init", init),
            );
            if !self.eat_punct(",") {
                break;
            }
        }
        Ok((kind, declarations))
    }

    fn parse_return(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let argument = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(self
            .finish(NodeKind::ReturnStatement, m)
            .with("argument", argument))
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat_keyword("else") {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self
            .finish(NodeKind::IfStatement, m)
            .with("test", test)
            .with("consequent", consequent)
            .with("alternate", alternate))
    }

    fn parse_for(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        self.expect_punct("(")?;

        let init = if self.at_punct(";") {
            None
        } else if self.peek().is_some_and(|t| {
            t.kind == TokenKind::Keyword && matches!(t.text.as_str(), "var" | "let" | "const")
        }) {
            let dm = self.marker();
            let (kind, declarations) = self.with_allow_in(false, Self::parse_declarators)?;
            Some(
                self.finish(NodeKind::VariableDeclaration, dm)
                    .with("kind", kind)
                    .with("declarations", declarations),
            )
        } else {
            Some(self.with_allow_in(false, Self::parse_expression)?)
        };

        let each = if self.at_keyword("in") {
            Some(NodeKind::ForInStatement)
        } else if self.at_identifier("of") {
            Some(NodeKind::ForOfStatement)
        } else {
            None
        };

        let init = match (each, init) {
            (Some(kind), Some(left)) => return self.parse_for_each(m, kind, left),
            (_, init) => init,
        };

        self.expect_punct(";")?;
        let test = if self.at_punct(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(";")?;
        let update = if self.at_punct(")") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(")")?;
        let body = self.parse_statement()?;
        Ok(self
            .finish(NodeKind::ForStatement, m)
            .with("init", init)
            .with("test", test)
            .with("update", update)
            .with("body", body))
    }

    fn parse_for_each(&mut self, m: Marker, kind: NodeKind, left: Node) -> Result<Node, ParseError> {
        self.pos += 1;
        let right = if kind == NodeKind::ForInStatement {
            self.parse_expression()?
        } else {
            self.parse_assignment()?
        };
        self.expect_punct(")")?;
        let body = self.parse_statement()?;
        Ok(self
            .finish(kind, m)
            .with("left", left)
            .with("right", right)
            .with("body", body))
    }

    fn parse_while(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let test = self.parse_paren_expression()?;
        let body = self.parse_statement()?;
        Ok(self
            .finish(NodeKind::WhileStatement, m)
            .with("test", test)
            .with("body", body))
    }

    fn parse_do_while(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let body = self.parse_statement()?;
        self.expect_keyword("while")?;
        let test = self.parse_paren_expression()?;
        // the semicolon after do-while is always optional
        self.eat_punct(";");
        Ok(self
            .finish(NodeKind::DoWhileStatement, m)
            .with("body", body)
            .with("test", test))
    }

    fn parse_switch(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let discriminant = self.parse_paren_expression()?;
        self.expect_punct("{")?;

        let mut cases = Vec::new();
        while !self.at_punct("}") {
            let cm = self.marker();
            let test = if self.eat_keyword("case") {
                Some(self.parse_expression()?)
            } else if self.eat_keyword("default") {
                None
            } else {
                return Err(self.unexpected());
            };
            self.expect_punct(":")?;

            let mut consequent = Vec::new();
            while !(self.at_punct("}") || self.at_keyword("case") || self.at_keyword("default")) {
                if self.peek().is_none() {
                    return Err(self.expected("}"));
                }
                consequent.push(self.parse_statement()?);
            }
            cases.push(
                self.finish(NodeKind::SwitchCase, cm)
                    .with("test", test)
                    .with("consequent", consequent),
            );
        }
        self.expect_punct("}")?;

        Ok(self
            .finish(NodeKind::SwitchStatement, m)
            .with("discriminant", discriminant)
            .with("cases", cases))
    }

    fn parse_jump(&mut self, kind: NodeKind) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let label = match self.peek() {
            Some(t) if t.kind == TokenKind::Identifier && !self.newline_before() => {
                self.pos += 1;
                Some(Self::identifier(t))
            }
            _ => None,
        };
        self.consume_semicolon()?;
        Ok(self.finish(kind, m).with("label", label))
    }

    fn parse_function(&mut self, kind: NodeKind) -> Result<Node, ParseError> {
        let m = self.marker();
        self.expect_keyword("function")?;
        let id = match self.peek() {
            Some(t) if t.kind == TokenKind::Identifier => {
                self.pos += 1;
                Some(Self::identifier(t))
            }
            _ if kind == NodeKind::FunctionDeclaration => {
                return Err(self.expected("identifier"));
            }
            _ => None,
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self
            .finish(kind, m)
            .with("id", id)
            .with("params", params)
            .with("body", body))
    }

    /// `(params) { body }` of a method, as an anonymous function expression.
    fn parse_method_function(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self
            .finish(NodeKind::FunctionExpression, m)
            .with("id", None::<Node>)
            .with("params", params)
            .with("body", body))
    }

    fn parse_params(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.eat_punct(")") {
            let m = self.marker();
            let param = if self.eat_punct("...") {
                let argument = self.parse_binding_identifier()?;
                self.finish(NodeKind::RestElement, m)
                    .with("argument", argument)
            } else {
                let left = self.parse_binding_identifier()?;
                if self.eat_punct("=") {
                    let right = self.with_allow_in(true, Self::parse_assignment)?;
                    self.finish(NodeKind::AssignmentPattern, m)
                        .with("left", left)
                        .with("right", right)
                } else {
                    left
                }
            };
            params.push(param);
            if !self.at_punct(")") {
                self.expect_punct(",")?;
            }
        }
        Ok(params)
    }

    fn parse_class(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let id = self.parse_binding_identifier()?;
        let super_class = if self.eat_keyword("extends") {
            Some(self.parse_postfix()?)
        } else {
            None
        };

        let bm = self.marker();
        self.expect_punct("{")?;
        let mut members = Vec::new();
        loop {
            if self.eat_punct(";") {
                continue;
            }
            if self.eat_punct("}") {
                break;
            }
            members.push(self.parse_class_member()?);
        }
        let body = self
            .finish(NodeKind::ClassBody, bm)
            .with("body", members);

        Ok(self
            .finish(NodeKind::ClassDeclaration, m)
            .with("id", id)
            .with("superClass", super_class)
            .with("body", body))
    }

    fn parse_class_member(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        let is_static = self.at_identifier("static") && !self.peek_at_punct(1, "(");
        if is_static {
            self.pos += 1;
        }
        let accessor = self.parse_accessor_prefix();
        let (key, computed) = self.parse_property_key()?;
        let value = self.parse_method_function()?;

        let kind = match accessor {
            Some(kind) => kind,
            None if !is_static && !computed && key.name() == Some("constructor") => "constructor",
            None => "method",
        };
        Ok(self
            .finish(NodeKind::MethodDefinition, m)
            .with("key", key)
            .with("value", value)
            .with("kind", kind)
            .with("static", is_static)
            .with("computed", computed))
    }

    /// `get` or `set` when used as an accessor prefix rather than a name.
    fn parse_accessor_prefix(&mut self) -> Option<&'static str> {
        let kind = if self.at_identifier("get") {
            "get"
        } else if self.at_identifier("set") {
            "set"
        } else {
            return None;
        };
        let is_name = ["(", ":", ",", "}", "="]
            .iter()
            .any(|p| self.peek_at_punct(1, p));
        if is_name {
            return None;
        }
        self.pos += 1;
        Some(kind)
    }

    fn parse_property_key(&mut self) -> Result<(Node, bool), ParseError> {
        if self.eat_punct("[") {
            let key = self.with_allow_in(true, Self::parse_assignment)?;
            self.expect_punct("]")?;
            return Ok((key, true));
        }
        let tok = self.bump()?;
        match tok.kind {
            TokenKind::String | TokenKind::Numeric => Ok((Self::literal(tok), false)),
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Boolean | TokenKind::Null => {
                Ok((Self::identifier(tok), false))
            }
            TokenKind::Punctuator => {
                self.pos -= 1;
                Err(self.unexpected())
            }
        }
    }

    // -- expressions --

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        let first = self.parse_assignment()?;
        if !self.at_punct(",") {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat_punct(",") {
            expressions.push(self.parse_assignment()?);
        }
        Ok(self
            .finish(NodeKind::SequenceExpression, m)
            .with("expressions", expressions))
    }

    fn parse_paren_expression(&mut self) -> Result<Node, ParseError> {
        self.expect_punct("(")?;
        let expr = self.with_allow_in(true, Self::parse_expression)?;
        self.expect_punct(")")?;
        Ok(expr)
    }

    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> Result<Node, ParseError> {
        if self.is_arrow_start() {
            return self.parse_arrow();
        }

        let m = self.marker();
        let left = self.parse_conditional()?;

        let Some(tok) = self.peek() else {
            return Ok(left);
        };
        if tok.kind != TokenKind::Punctuator || !ASSIGNMENT_OPERATORS.contains(&tok.text.as_str())
        {
            return Ok(left);
        }
        if !matches!(left.kind, NodeKind::Identifier | NodeKind::MemberExpression) {
            return Err(ParseError {
                kind: ParseErrorKind::InvalidAssignmentTarget,
                position: tok.loc.start,
            });
        }
        self.pos += 1;
        let right = self.parse_assignment()?;
        Ok(self
            .finish(NodeKind::AssignmentExpression, m)
            .with("operator", tok.text.as_str())
            .with("left", left)
            .with("right", right))
    }

    fn is_arrow_start(&self) -> bool {
        let Some(tok) = self.peek() else {
            return false;
        };
        if tok.kind == TokenKind::Identifier {
            return self.peek_at_punct(1, "=>");
        }
        if !tok.is_punct("(") {
            return false;
        }
        self.closers
            .get(self.pos)
            .copied()
            .flatten()
            .is_some_and(|close| self.tokens.get(close + 1).is_some_and(|t| t.is_punct("=>")))
    }

    fn parse_arrow(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        let params = if self.at_punct("(") {
            self.parse_params()?
        } else {
            vec![self.parse_binding_identifier()?]
        };
        self.expect_punct("=>")?;

        let (body, expression) = if self.at_punct("{") {
            (self.parse_block()?, false)
        } else {
            (self.parse_assignment()?, true)
        };
        Ok(self
            .finish(NodeKind::ArrowFunctionExpression, m)
            .with("params", params)
            .with("body", body)
            .with("expression", expression))
    }

    fn parse_conditional(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        let test = self.parse_binary(1)?;
        if !self.eat_punct("?") {
            return Ok(test);
        }
        let consequent = self.with_allow_in(true, Self::parse_assignment)?;
        self.expect_punct(":")?;
        let alternate = self.parse_assignment()?;
        Ok(self
            .finish(NodeKind::ConditionalExpression, m)
            .with("test", test)
            .with("consequent", consequent)
            .with("alternate", alternate))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Node, ParseError> {
        let m = self.marker();
        let mut left = self.parse_unary()?;

        while let Some((op, prec)) = self.binary_operator() {
            if prec < min_prec {
                break;
            }
            self.pos += 1;
            // exponentiation is the only right-associative binary operator
            let next_min = if op == "**" { prec } else { prec + 1 };
            let right = self.parse_binary(next_min)?;
            let kind = if matches!(op, "||" | "&&" | "??") {
                NodeKind::LogicalExpression
            } else {
                NodeKind::BinaryExpression
            };
            left = self
                .finish(kind, m)
                .with("left", left)
                .with("operator", op)
                .with("right", right);
        }

        Ok(left)
    }

    fn binary_operator(&self) -> Option<(&'a str, u8)> {
        let tok = self.peek()?;
        let op = tok.text.as_str();
        let prec = match tok.kind {
            TokenKind::Punctuator => match op {
                "??" | "||" => 1,
                "&&" => 2,
                "|" => 3,
                "^" => 4,
                "&" => 5,
                "==" | "!=" | "===" | "!==" => 6,
                "<" | ">" | "<=" | ">=" => 7,
                "+" | "-" => 9,
                "*" | "/" | "%" => 10,
                "**" => 11,
                _ => return None,
            },
            TokenKind::Keyword if op == "instanceof" => 7,
            TokenKind::Keyword if op == "in" && self.allow_in => 7,
            _ => return None,
        };
        Some((op, prec))
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        self.nested(Self::unary)
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        let tok = self.peek().ok_or_else(|| self.unexpected())?;

        let is_unary = match tok.kind {
            TokenKind::Punctuator => matches!(tok.text.as_str(), "!" | "-" | "+" | "~"),
            TokenKind::Keyword => matches!(tok.text.as_str(), "typeof" | "void" | "delete"),
            _ => false,
        };
        if is_unary {
            self.pos += 1;
            let argument = self.parse_unary()?;
            return Ok(self
                .finish(NodeKind::UnaryExpression, m)
                .with("operator", tok.text.as_str())
                .with("prefix", true)
                .with("argument", argument));
        }

        if tok.is_punct("++") || tok.is_punct("--") {
            self.pos += 1;
            let argument = self.parse_unary()?;
            return Ok(self
                .finish(NodeKind::UpdateExpression, m)
                .with("operator", tok.text.as_str())
                .with("prefix", true)
                .with("argument", argument));
        }

        let expr = self.parse_postfix()?;
        match self.peek() {
            Some(t) if (t.is_punct("++") || t.is_punct("--")) && !self.newline_before() => {
                self.pos += 1;
                Ok(self
                    .finish(NodeKind::UpdateExpression, m)
                    .with("operator", t.text.as_str())
                    .with("prefix", false)
                    .with("argument", expr))
            }
            _ => Ok(expr),
        }
    }

    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        let expr = if self.at_keyword("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        self.parse_member_tail(m, expr, true)
    }

    fn parse_new(&mut self) -> Result<Node, ParseError> {
        self.nested(Self::new_expression)
    }

    fn new_expression(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.pos += 1;
        let cm = self.marker();
        let callee = if self.at_keyword("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        let callee = self.parse_member_tail(cm, callee, false)?;
        let arguments = if self.at_punct("(") {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(self
            .finish(NodeKind::NewExpression, m)
            .with("callee", callee)
            .with("arguments", arguments))
    }

    /// Member accesses and, when `allow_call` is set, calls chained onto `expr`.
    fn parse_member_tail(
        &mut self,
        m: Marker,
        mut expr: Node,
        allow_call: bool,
    ) -> Result<Node, ParseError> {
        loop {
            if self.eat_punct(".") {
                let property = self.parse_identifier_name()?;
                expr = self.member(m, expr, property, false, false);
            } else if self.at_punct("?.") {
                self.pos += 1;
                if self.at_punct("(") {
                    let arguments = self.parse_arguments()?;
                    expr = self
                        .finish(NodeKind::CallExpression, m)
                        .with("callee", expr)
                        .with("arguments", arguments)
                        .with("optional", true);
                } else if self.eat_punct("[") {
                    let property = self.with_allow_in(true, Self::parse_expression)?;
                    self.expect_punct("]")?;
                    expr = self.member(m, expr, property, true, true);
                } else {
                    let property = self.parse_identifier_name()?;
                    expr = self.member(m, expr, property, false, true);
                }
            } else if self.eat_punct("[") {
                let property = self.with_allow_in(true, Self::parse_expression)?;
                self.expect_punct("]")?;
                expr = self.member(m, expr, property, true, false);
            } else if allow_call && self.at_punct("(") {
                let arguments = self.parse_arguments()?;
                expr = self
                    .finish(NodeKind::CallExpression, m)
                    .with("callee", expr)
                    .with("arguments", arguments)
                    .with("optional", false);
            } else {
                return Ok(expr);
            }
        }
    }

    fn member(
        &self,
        m: Marker,
        object: Node,
        property: Node,
        computed: bool,
        optional: bool,
    ) -> Node {
        self.finish(NodeKind::MemberExpression, m)
            .with("object", object)
            .with("property", property)
            .with("computed", computed)
            .with("optional", optional)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct("(")?;
        let arguments = self.with_allow_in(true, |p| p.parse_element_list(")"))?;
        self.expect_punct(")")?;
        Ok(arguments)
    }

    /// Comma-separated assignment expressions or spreads, up to `close`.
    fn parse_element_list(&mut self, close: &str) -> Result<Vec<Node>, ParseError> {
        let mut elements = Vec::new();
        while !self.at_punct(close) {
            let m = self.marker();
            if self.eat_punct("...") {
                let argument = self.parse_assignment()?;
                elements.push(
                    self.finish(NodeKind::SpreadElement, m)
                        .with("argument", argument),
                );
            } else {
                elements.push(self.parse_assignment()?);
            }
            if !self.at_punct(close) {
                self.expect_punct(",")?;
            }
        }
        Ok(elements)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let tok = self.peek().ok_or_else(|| self.unexpected())?;

        match tok.kind {
            TokenKind::Identifier => {
                self.pos += 1;
                Ok(Self::identifier(tok))
            }
            TokenKind::Numeric | TokenKind::String | TokenKind::Boolean | TokenKind::Null => {
                self.pos += 1;
                Ok(Self::literal(tok))
            }
            TokenKind::Keyword if tok.text == "this" => {
                self.pos += 1;
                Ok(Node::new(NodeKind::ThisExpression, tok.span, tok.loc))
            }
            TokenKind::Keyword if tok.text == "function" => {
                self.parse_function(NodeKind::FunctionExpression)
            }
            TokenKind::Punctuator if tok.text == "(" => self.parse_paren_expression(),
            TokenKind::Punctuator if tok.text == "[" => {
                let m = self.marker();
                self.pos += 1;
                let elements = self.with_allow_in(true, |p| p.parse_element_list("]"))?;
                self.expect_punct("]")?;
                Ok(self
                    .finish(NodeKind::ArrayExpression, m)
                    .with("elements", elements))
            }
            TokenKind::Punctuator if tok.text == "{" => self.parse_object(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_object(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        self.expect_punct("{")?;
        let properties = self.with_allow_in(true, |p| {
            let mut properties = Vec::new();
            while !p.at_punct("}") {
                properties.push(p.parse_property()?);
                if !p.at_punct("}") {
                    p.expect_punct(",")?;
                }
            }
            Ok(properties)
        })?;
        self.expect_punct("}")?;
        Ok(self
            .finish(NodeKind::ObjectExpression, m)
            .with("properties", properties))
    }

    fn parse_property(&mut self) -> Result<Node, ParseError> {
        let m = self.marker();
        if self.eat_punct("...") {
            let argument = self.parse_assignment()?;
            return Ok(self
                .finish(NodeKind::SpreadElement, m)
                .with("argument", argument));
        }

        let accessor = self.parse_accessor_prefix();
        let (key, computed) = self.parse_property_key()?;

        let (value, kind, method, shorthand) = if let Some(kind) = accessor {
            (self.parse_method_function()?, kind, false, false)
        } else if self.at_punct("(") {
            (self.parse_method_function()?, "init", true, false)
        } else if self.eat_punct(":") {
            (self.parse_assignment()?, "init", false, false)
        } else if key.is(NodeKind::Identifier) && !computed {
            (key.clone(), "init", false, true)
        } else {
            return Err(self.expected(":"));
        };

        Ok(self
            .finish(NodeKind::Property, m)
            .with("key", key)
            .with("value", value)
            .with("kind", kind)
            .with("method", method)
            .with("shorthand", shorthand)
            .with("computed", computed))
    }

    fn parse_binding_identifier(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Identifier => {
                self.pos += 1;
                Ok(Self::identifier(t))
            }
            _ => Err(self.expected("identifier")),
        }
    }

    /// Property name after `.`: reserved words are allowed here.
    fn parse_identifier_name(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(t) if t.kind != TokenKind::Punctuator
                && t.kind != TokenKind::Numeric
                && t.kind != TokenKind::String =>
            {
                self.pos += 1;
                Ok(Self::identifier(t))
            }
            _ => Err(self.expected("identifier")),
        }
    }

    // -- helpers --

    fn identifier(tok: &Token) -> Node {
        Node::new(NodeKind::Identifier, tok.span, tok.loc).with("name", tok.text.as_str())
    }

    fn literal(tok: &Token) -> Node {
        Node::new(NodeKind::Literal, tok.span, tok.loc).with("raw", tok.text.as_str())
    }

    fn with_allow_in<T>(
        &mut self,
        allow_in: bool,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = std::mem::replace(&mut self.allow_in, allow_in);
        let result = f(self);
        self.allow_in = saved;
        result
    }

    /// Run `f` one nesting level deeper, failing past `MAX_DEPTH`.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError {
                kind: ParseErrorKind::NestingTooDeep,
                position: self.position(),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at_punct(&self, offset: usize, p: &str) -> bool {
        self.tokens
            .get(self.pos + offset)
            .is_some_and(|t| t.is_punct(p))
    }

    fn at_punct(&self, p: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn at_keyword(&self, kw: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(kw))
    }

    fn at_identifier(&self, name: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier && t.text == name)
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        let hit = self.at_punct(p);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        let hit = self.at_keyword(kw);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn bump(&mut self) -> Result<&'a Token, ParseError> {
        let tok = self.peek().ok_or_else(|| self.unexpected())?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect_punct(&mut self, p: &'static str) -> Result<(), ParseError> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(self.expected(p))
        }
    }

    fn expect_keyword(&mut self, kw: &'static str) -> Result<(), ParseError> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.expected(kw))
        }
    }

    /// True when the current token starts on a later line than the
    /// previous one ended.
    fn newline_before(&self) -> bool {
        match (self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)), self.peek()) {
            (Some(prev), Some(next)) => next.loc.start.line > prev.loc.end.line,
            _ => false,
        }
    }

    fn at_statement_end(&self) -> bool {
        self.peek().is_none() || self.at_punct(";") || self.at_punct("}") || self.newline_before()
    }

    /// Explicit `;`, or one inserted before `}`, EOF, or a line break.
    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat_punct(";") || self.at_statement_end() {
            Ok(())
        } else {
            Err(self.expected(";"))
        }
    }

    fn marker(&self) -> Marker {
        match self.peek() {
            Some(tok) => Marker {
                offset: tok.span.start,
                position: tok.loc.start,
            },
            None => {
                let (offset, position) = self.end_of_input();
                Marker { offset, position }
            }
        }
    }

    /// Close a node that began at `m` and ends with the last consumed token.
    fn finish(&self, kind: NodeKind, m: Marker) -> Node {
        let (end, end_position) = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or((m.offset, m.position), |t| (t.span.end, t.loc.end));
        Node::new(
            kind,
            Span::new(m.offset, end.max(m.offset)),
            Location {
                start: m.position,
                end: end_position.max(m.position),
            },
        )
    }

    fn end_of_input(&self) -> (usize, Position) {
        self.tokens
            .last()
            .map_or((0, Position::default()), |t| (t.span.end, t.loc.end))
    }

    fn position(&self) -> Position {
        self.peek()
            .map_or_else(|| self.end_of_input().1, |t| t.loc.start)
    }

    fn expected(&self, expected: &'static str) -> ParseError {
        ParseError {
            kind: ParseErrorKind::Expected {
                expected,
                found: self.peek().map(|t| t.text.clone()),
            },
            position: self.position(),
        }
    }

    fn unexpected(&self) -> ParseError {
        ParseError {
            kind: self.peek().map_or(ParseErrorKind::UnexpectedEof, |t| {
                ParseErrorKind::UnexpectedToken(t.text.clone())
            }),
            position: self.position(),
        }
    }
}

/// Pair every `(`, `[` and `{` with the index of the bracket closing it.
fn match_brackets(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut closers = vec![None; tokens.len()];
    let mut open = Vec::new();
    for (i, t) in tokens.iter().enumerate() {
        if t.is_punct("(") || t.is_punct("[") || t.is_punct("{") {
            open.push(i);
        } else if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") {
            if let Some(start) = open.pop() {
                closers[start] = Some(i);
            }
        }
    }
    closers
}
