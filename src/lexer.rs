use std::fmt;

use crate::token::{Location, Position, Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// String literal without its closing quote.
    UnterminatedString,
    /// `/*` without a matching `*/`.
    UnterminatedComment,
    /// Numeric literal directly followed by an identifier character,
    /// or a radix prefix without digits.
    MalformedNumber(String),
    /// Byte that cannot start any token.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::UnterminatedComment => {
                write!(f, "unterminated block comment")
            }
            Self::MalformedNumber(text) => {
                write!(f, "malformed numeric literal: {text}")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {ch}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", position.line, position.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

// Longest first so that a greedy scan picks `===` over `==` over `=`.
const PUNCTUATORS: &[&str] = &[
    "...", "===", "!==", "**=", "&&=", "||=", "??=", "=>", "==", "!=", "<=", ">=", "&&", "||",
    "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "**", "{", "}", "(", ")", "[", "]",
    ";", ",", ":", "?", ".", "=", "<", ">", "+", "-", "*", "/", "%", "!", "~", "&", "|", "^",
];

/// Tokenize source text into a sequence of tokens.
///
/// Whitespace and comments are incidental text and never become tokens;
/// they remain recoverable from the gaps between token spans.
///
/// # Errors
///
/// Returns `LexError` on unterminated strings or comments, malformed
/// numbers, or characters that cannot start a token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        let bytes = input.as_bytes();
        let start = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
            3
        } else {
            0
        };
        Self {
            source: input,
            input: bytes,
            pos: start,
            line: 1,
            col: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while self.pos < self.input.len() {
            let ch = self.input[self.pos];

            match ch {
                b'\n' | b'\r' | b' ' | b'\t' | 0x0B | 0x0C => {
                    self.advance();
                }
                b'/' if self.peek_at(1) == Some(b'/') => {
                    self.skip_line_comment();
                }
                b'/' if self.peek_at(1) == Some(b'*') => {
                    self.skip_block_comment()?;
                }
                b'"' | b'\'' => {
                    tokens.push(self.read_string(ch)?);
                }
                b'0'..=b'9' => {
                    tokens.push(self.read_number()?);
                }
                b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    tokens.push(self.read_number()?);
                }
                _ if is_ident_start(ch) => {
                    tokens.push(self.read_word());
                }
                _ => {
                    tokens.push(self.read_punctuator()?);
                }
            }
        }

        Ok(tokens)
    }

    const fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(&b) = self.input.get(self.pos) {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.col = 1;
                }
                // a lone \r is a line break too, \r\n counts once
                b'\r' if self.peek_at(1) != Some(b'\n') => {
                    self.line += 1;
                    self.col = 1;
                }
                b'\r' => {}
                // UTF-8 continuation bytes do not start a new column
                _ if b & 0xC0 == 0x80 => {}
                _ => self.col += 1,
            }
            self.pos += 1;
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize, start_pos: Position) -> Token {
        Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
            loc: Location {
                start: start_pos,
                end: self.position(),
            },
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_pos = self.position();
        self.advance(); // skip /
        self.advance(); // skip *

        loop {
            match self.peek() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedComment,
                        position: start_pos,
                    });
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_string(&mut self, quote: u8) -> Result<Token, LexError> {
        let start = self.pos;
        let start_pos = self.position();
        self.advance(); // skip opening quote

        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        position: start_pos,
                    });
                }
                Some(b'\\') => {
                    self.advance();
                    // escaped line terminators continue the string
                    if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
                        self.advance();
                    }
                    self.advance();
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }

        Ok(self.make_token(TokenKind::String, start, start_pos))
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let start_pos = self.position();

        let radix = match (self.peek(), self.peek_at(1).map(|c| c.to_ascii_lowercase())) {
            (Some(b'0'), Some(b'x')) => Some(16),
            (Some(b'0'), Some(b'o')) => Some(8),
            (Some(b'0'), Some(b'b')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.advance();
            self.advance();
            let digits_start = self.pos;
            self.eat_while(|c| char::from(c).is_digit(radix) || c == b'_');
            if self.pos == digits_start {
                return Err(self.malformed_number(start, start_pos));
            }
            if self.peek() == Some(b'n') {
                self.advance();
            }
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == b'_');
            let mut is_integer = true;
            if self.peek() == Some(b'.') {
                is_integer = false;
                self.advance();
                self.eat_while(|c| c.is_ascii_digit() || c == b'_');
            }
            if matches!(self.peek(), Some(b'e' | b'E')) {
                is_integer = false;
                self.advance();
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.advance();
                }
                let digits_start = self.pos;
                self.eat_while(|c| c.is_ascii_digit() || c == b'_');
                if self.pos == digits_start {
                    return Err(self.malformed_number(start, start_pos));
                }
            }
            if is_integer && self.peek() == Some(b'n') {
                self.advance();
            }
        }

        if self.peek().is_some_and(is_ident_part) {
            self.advance();
            return Err(self.malformed_number(start, start_pos));
        }

        Ok(self.make_token(TokenKind::Numeric, start, start_pos))
    }

    fn malformed_number(&self, start: usize, position: Position) -> LexError {
        LexError {
            kind: LexErrorKind::MalformedNumber(
                String::from_utf8_lossy(&self.input[start..self.pos]).into_owned(),
            ),
            position,
        }
    }

    fn read_word(&mut self) -> Token {
        let start = self.pos;
        let start_pos = self.position();
        self.eat_while(is_ident_part);

        let kind = match &self.source[start..self.pos] {
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            word if KEYWORDS.contains(&word) => TokenKind::Keyword,
            _ => TokenKind::Identifier,
        };
        self.make_token(kind, start, start_pos)
    }

    fn read_punctuator(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let start_pos = self.position();
        let rest = &self.input[self.pos..];

        let Some(punct) = PUNCTUATORS
            .iter()
            .find(|p| rest.starts_with(p.as_bytes()))
        else {
            let ch = self.source[self.pos..].chars().next().unwrap_or('\0');
            return Err(LexError {
                kind: LexErrorKind::UnexpectedCharacter(ch),
                position: start_pos,
            });
        };

        // `a?.5:b` is a conditional, not optional chaining
        let len = if *punct == "?." && rest.get(2).is_some_and(u8::is_ascii_digit) {
            1
        } else {
            punct.len()
        };
        for _ in 0..len {
            self.advance();
        }
        Ok(self.make_token(TokenKind::Punctuator, start, start_pos))
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }
}

const fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$' || c >= 0x80
}

const fn is_ident_part(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
