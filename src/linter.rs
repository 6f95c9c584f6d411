//! Drive the rule over whole sources.

use tracing::debug;

use crate::Error;
use crate::ast::{Node, NodeKind};
use crate::config::Config;
use crate::cursor::TokenCursor;
use crate::diagnostic::{Diagnostic, apply_fixes};
use crate::dot_location::DotLocation;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::token::Token;
use crate::walker::{Control, walk};

/// Upper bound on lint/fix rounds for one source.
const MAX_FIX_PASSES: usize = 10;

/// Lint an already tokenized and parsed source.
#[must_use]
pub fn lint_program(
    source: &str,
    tokens: &[Token],
    program: &Node,
    config: &Config,
) -> Vec<Diagnostic> {
    let cursor = TokenCursor::new(source, tokens);
    let rule = DotLocation::new(config.rules.dot_location);

    let mut diagnostics = Vec::new();
    walk(program, |node| {
        if node.is(NodeKind::MemberExpression) {
            diagnostics.extend(rule.check(node, &cursor));
        }
        Control::Continue
    });
    diagnostics.sort();

    debug!(
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        "linted source"
    );
    diagnostics
}

/// Tokenize, parse, and lint `source`.
///
/// # Errors
///
/// Returns an error when the source cannot be tokenized or parsed.
pub fn lint_source(source: &str, config: &Config) -> Result<Vec<Diagnostic>, Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    Ok(lint_program(source, &tokens, &program, config))
}

/// Result of fixing a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixReport {
    pub output: String,
    /// Number of fixes applied across all passes.
    pub fixed: usize,
    /// Diagnostics still present in `output`.
    pub remaining: Vec<Diagnostic>,
}

/// Lint and fix `source` until no fix applies or the pass limit is hit.
///
/// # Errors
///
/// Returns an error when the source, or an intermediate fixed version of
/// it, cannot be tokenized or parsed.
pub fn fix_source(source: &str, config: &Config) -> Result<FixReport, Error> {
    let mut output = source.to_string();
    let mut fixed = 0;
    let mut diagnostics = lint_source(&output, config)?;

    for pass in 1..=MAX_FIX_PASSES {
        let outcome = apply_fixes(&output, &diagnostics);
        if outcome.applied == 0 {
            break;
        }
        debug!(
            pass,
            applied = outcome.applied,
            skipped = outcome.skipped,
            "applied fixes"
        );
        fixed += outcome.applied;
        output = outcome.output;
        diagnostics = lint_source(&output, config)?;
    }

    Ok(FixReport {
        output,
        fixed,
        remaining: diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot_location::DotPosition;

    #[test]
    fn reports_each_member_access() {
        let diagnostics = lint_source("a\n.b\n.c;", &Config::default()).expect("lint failed");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].location.start < diagnostics[1].location.start);
    }

    #[test]
    fn fixes_whole_chain_in_one_pass() {
        let report = fix_source("a\n.b\n.c;", &Config::default()).expect("fix failed");
        assert_eq!(report.output, "a.\nb.\nc;");
        assert_eq!(report.fixed, 2);
        assert!(report.remaining.is_empty());
    }

    #[test]
    fn property_policy_from_config() {
        let config = Config::default().with_dot_location(DotPosition::Property);
        let report = fix_source("a.\nb;", &config).expect("fix failed");
        assert_eq!(report.output, "a\n.b;");
    }

    #[test]
    fn syntax_error_is_reported() {
        assert!(matches!(
            lint_source("a.;", &Config::default()),
            Err(Error::Parse(_))
        ));
    }
}
