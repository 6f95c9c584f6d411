use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::token::{Location, Span};

/// Message identifiers reported by rules, with their human text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageId {
    ExpectedDotAfterObject,
    ExpectedDotBeforeProperty,
}

impl MessageId {
    /// Stable identifier, as used in configuration and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExpectedDotAfterObject => "expectedDotAfterObject",
            Self::ExpectedDotBeforeProperty => "expectedDotBeforeProperty",
        }
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::ExpectedDotAfterObject => "Expected dot to be on same line as object.",
            Self::ExpectedDotBeforeProperty => "Expected dot to be on same line as property.",
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A single text mutation in byte offsets of the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { offset: usize, text: String },
    Remove { span: Span },
}

impl Edit {
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::Insert {
            offset,
            text: text.into(),
        }
    }

    #[must_use]
    pub const fn remove(span: Span) -> Self {
        Self::Remove { span }
    }

    /// Source range the edit touches. Inserts are empty ranges.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Insert { offset, .. } => Span::new(*offset, *offset),
            Self::Remove { span } => *span,
        }
    }
}

/// Ordered edits that together fix one violation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fix {
    pub edits: Vec<Edit>,
}

impl Fix {
    #[must_use]
    pub const fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    /// Smallest range covering every edit.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        self.edits.iter().map(Edit::span).reduce(Span::cover)
    }

    /// Apply this fix alone to `source`.
    #[must_use]
    pub fn apply(&self, source: &str) -> String {
        apply_edits(source, self.edits.iter())
    }
}

/// A rule violation, where it is, and how to fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub rule: &'static str,
    pub message_id: MessageId,
    /// The node the rule was checking.
    pub node: Span,
    /// Where the violation is reported.
    pub location: Location,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message_id.text()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}",
            self.location.start.line,
            self.location.start.column,
            self.rule,
            self.message()
        )
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.location
            .start
            .cmp(&other.location.start)
            .then_with(|| self.rule.cmp(other.rule))
            .then_with(|| self.message_id.cmp(&other.message_id))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of applying several diagnostics' fixes at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub output: String,
    pub applied: usize,
    /// Fixes left out because they overlap one applied earlier.
    pub skipped: usize,
}

/// Apply every fix in `diagnostics` whose range does not overlap an
/// earlier accepted fix. Diagnostics without a fix are ignored.
#[must_use]
pub fn apply_fixes(source: &str, diagnostics: &[Diagnostic]) -> FixOutcome {
    let mut fixes: Vec<(Span, &Fix)> = diagnostics
        .iter()
        .filter_map(|d| d.fix.as_ref())
        .filter_map(|fix| Some((fix.span()?, fix)))
        .collect();
    fixes.sort_by_key(|(span, _)| *span);

    let mut accepted = Vec::new();
    let mut last_end = None;
    let mut skipped = 0;
    for (span, fix) in fixes {
        if last_end.is_some_and(|end| span.start < end) {
            skipped += 1;
            continue;
        }
        last_end = Some(span.end);
        trace!(start = span.start, end = span.end, "applying fix");
        accepted.push(fix);
    }

    let applied = accepted.len();
    let output = apply_edits(source, accepted.iter().flat_map(|fix| fix.edits.iter()));
    FixOutcome {
        output,
        applied,
        skipped,
    }
}

/// Apply edits back to front so earlier offsets stay valid. At equal
/// offsets a removal goes before an insertion, so inserted text survives.
fn apply_edits<'a>(source: &str, edits: impl Iterator<Item = &'a Edit>) -> String {
    let mut edits: Vec<&Edit> = edits.collect();
    edits.sort_by(|a, b| {
        b.span()
            .start
            .cmp(&a.span().start)
            .then_with(|| matches!(a, Edit::Insert { .. }).cmp(&matches!(b, Edit::Insert { .. })))
    });

    let mut out = source.to_string();
    for edit in edits {
        match edit {
            Edit::Insert { offset, text } if *offset <= out.len() => {
                out.insert_str(*offset, text);
            }
            Edit::Remove { span } if span.end <= out.len() && span.start <= span.end => {
                out.replace_range(span.start..span.end, "");
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(fix: Fix) -> Diagnostic {
        Diagnostic {
            rule: "dot-location",
            message_id: MessageId::ExpectedDotAfterObject,
            node: Span::default(),
            location: Location::default(),
            fix: Some(fix),
        }
    }

    #[test]
    fn move_text_forward() {
        // "a.\nb" -> "a\n.b"
        let fix = Fix::new(vec![Edit::remove(Span::new(1, 2)), Edit::insert(3, ".")]);
        assert_eq!(fix.apply("a.\nb"), "a\n.b");
    }

    #[test]
    fn remove_and_insert_at_same_offset() {
        let fix = Fix::new(vec![Edit::insert(1, "X"), Edit::remove(Span::new(1, 2))]);
        assert_eq!(fix.apply("abc"), "aXc");
    }

    #[test]
    fn fix_span_covers_edits() {
        let fix = Fix::new(vec![Edit::insert(7, "."), Edit::remove(Span::new(2, 3))]);
        assert_eq!(fix.span(), Some(Span::new(2, 7)));
        assert_eq!(Fix::default().span(), None);
    }

    #[test]
    fn overlapping_fixes_are_skipped() {
        let first = diagnostic(Fix::new(vec![Edit::remove(Span::new(0, 2))]));
        let second = diagnostic(Fix::new(vec![Edit::remove(Span::new(1, 3))]));
        let third = diagnostic(Fix::new(vec![Edit::insert(4, "!")]));
        let outcome = apply_fixes("abcdef", &[second, first, third]);
        assert_eq!(outcome.output, "cd!ef");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn message_catalog() {
        assert_eq!(
            MessageId::ExpectedDotBeforeProperty.as_str(),
            "expectedDotBeforeProperty"
        );
        assert_eq!(
            MessageId::ExpectedDotAfterObject.to_string(),
            "Expected dot to be on same line as object."
        );
    }
}
