/// Half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Line and column of a source offset. Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Start and end positions of a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

/// Anything that occupies a range of the source and knows where it is.
pub trait Spanned {
    fn span(&self) -> Span;
    fn loc(&self) -> Location;
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier, including contextual words like `of`.
    Identifier,
    /// Reserved word (`function`, `return`, `if`, ...).
    Keyword,
    /// `true` / `false`.
    Boolean,
    /// `null`.
    Null,
    /// Numeric literal in any supported radix.
    Numeric,
    /// Single- or double-quoted string literal, quotes included.
    String,
    /// Operator or delimiter.
    Punctuator,
}

/// A single token with its kind, literal source text, and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub loc: Location,
}

impl Token {
    /// True when this is the punctuator `p`.
    #[must_use]
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == p
    }

    /// True when this is the keyword `kw`.
    #[must_use]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }

    fn loc(&self) -> Location {
        self.loc
    }
}

impl<T: Spanned + ?Sized> Spanned for &T {
    fn span(&self) -> Span {
        (**self).span()
    }

    fn loc(&self) -> Location {
        (**self).loc()
    }
}
