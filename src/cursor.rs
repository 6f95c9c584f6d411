use crate::token::{Span, Spanned, Token};

/// Read-only view over a token stream and the source it was lexed from.
///
/// Lookups are binary searches on token offsets, so the stream must be
/// sorted and non-overlapping, which is what the lexer produces.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a> {
    source: &'a str,
    tokens: &'a [Token],
}

impl<'a> TokenCursor<'a> {
    #[must_use]
    pub const fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self { source, tokens }
    }

    #[must_use]
    pub const fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    /// Source text covered by `span`, empty if the span is out of range.
    #[must_use]
    pub fn text(&self, span: Span) -> &'a str {
        self.source.get(span.start..span.end).unwrap_or_default()
    }

    /// Nearest token that ends at or before `item` starts.
    pub fn token_before(&self, item: &impl Spanned) -> Option<&'a Token> {
        let start = item.span().start;
        let index = self.tokens.partition_point(|t| t.span.end <= start);
        self.tokens.get(index.checked_sub(1)?)
    }

    /// Nearest token that starts at or after `item` ends.
    pub fn token_after(&self, item: &impl Spanned) -> Option<&'a Token> {
        let end = item.span().end;
        let index = self.tokens.partition_point(|t| t.span.start < end);
        self.tokens.get(index)
    }

    /// First token inside `item`.
    pub fn first_token(&self, item: &impl Spanned) -> Option<&'a Token> {
        let span = item.span();
        let index = self.tokens.partition_point(|t| t.span.start < span.start);
        self.tokens.get(index).filter(|t| t.span.end <= span.end)
    }

    /// Last token inside `item`.
    pub fn last_token(&self, item: &impl Spanned) -> Option<&'a Token> {
        let span = item.span();
        let index = self.tokens.partition_point(|t| t.span.end <= span.end);
        self.tokens
            .get(index.checked_sub(1)?)
            .filter(|t| t.span.start >= span.start)
    }

    /// True when `a` ends on the line `b` starts on.
    pub fn same_line(a: &impl Spanned, b: &impl Spanned) -> bool {
        a.loc().end.line == b.loc().start.line
    }

    /// First token of the source line on which `item` begins.
    ///
    /// Walks backward while the incidental text between two tokens holds
    /// no line break.
    pub fn first_token_on_line(&self, item: &impl Spanned) -> Option<&'a Token> {
        let start = item.span().start;
        let mut index = self.tokens.partition_point(|t| t.span.start < start);
        if index >= self.tokens.len() {
            return None;
        }

        while index > 0 {
            let prev = &self.tokens[index - 1];
            let current = &self.tokens[index];
            let gap = self.text(Span::new(prev.span.end, current.span.start));
            if gap.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
                break;
            }
            index -= 1;
        }

        self.tokens.get(index)
    }

    /// True when `item` is the first token on its line.
    pub fn starts_line(&self, item: &impl Spanned) -> bool {
        self.first_token_on_line(item)
            .is_some_and(|t| t.span.start == item.span().start)
    }

    /// True when `item` is directly wrapped by `(` and `)`.
    pub fn is_parenthesized(&self, item: &impl Spanned) -> bool {
        let span = item.span();
        let open = self
            .token_before(item)
            .is_some_and(|t| t.is_punct("(") && t.span.end <= span.start);
        let close = self
            .token_after(item)
            .is_some_and(|t| t.is_punct(")") && t.span.start >= span.end);
        open && close
    }
}
