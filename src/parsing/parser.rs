//! Language parser trait.
//!
//! One implementation per source language. A parser lifts a single
//! file's text into a [`ParsedFile`]; it holds its own grammar handle
//! and is stateless across files, so concurrent calls on distinct
//! instances are safe.

use crate::error::{Diagnostic, DiagnosticKind};
use crate::parsing::{Language, ParsedFile};
use tree_sitter::Node;

/// Outcome of parsing one file. A fatal CST error with a usable partial
/// tree still yields a `ParsedFile` plus a diagnostic; only a completely
/// unusable input produces `Failed`.
#[derive(Debug)]
pub enum ParseOutcome {
    Clean(ParsedFile),
    Partial(ParsedFile, Diagnostic),
    Failed(Diagnostic),
}

impl ParseOutcome {
    pub fn file(&self) -> Option<&ParsedFile> {
        match self {
            ParseOutcome::Clean(f) | ParseOutcome::Partial(f, _) => Some(f),
            ParseOutcome::Failed(_) => None,
        }
    }

    pub fn into_parts(self) -> (Option<ParsedFile>, Option<Diagnostic>) {
        match self {
            ParseOutcome::Clean(f) => (Some(f), None),
            ParseOutcome::Partial(f, d) => (Some(f), Some(d)),
            ParseOutcome::Failed(d) => (None, Some(d)),
        }
    }
}

/// Common interface for all language parsers.
pub trait LanguageParser: Send {
    /// Parse source text into the language-neutral model. Never panics
    /// past the pipeline boundary.
    fn parse(&mut self, code: &str, path: &str) -> ParseOutcome;

    /// The language this parser handles.
    fn language(&self) -> Language;
}

/// Maximum recursion depth for AST traversal to prevent stack overflow
/// on pathological inputs (huge initializers, deeply nested calls).
pub const MAX_AST_DEPTH: usize = 500;

/// Depth guard called at the top of every recursive extractor.
/// Returns `false` when the subtree should be skipped.
#[inline]
pub fn check_recursion_depth(depth: usize, node: Node) -> bool {
    if depth > MAX_AST_DEPTH {
        tracing::warn!(
            "max AST depth ({}) exceeded at {}:{}; skipping subtree",
            MAX_AST_DEPTH,
            node.start_position().row + 1,
            node.start_position().column + 1
        );
        return false;
    }
    true
}

/// Build the diagnostic recorded when a tree contains syntax errors but
/// extraction still produced a partial file.
pub fn partial_parse_diagnostic(path: &str, language: Language) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::PartialParse,
        path,
        format!("{language} file contains syntax errors; extracted best-effort partial result"),
    )
}

/// Build the diagnostic recorded when no tree was produced at all.
pub fn parse_failure_diagnostic(path: &str, language: Language) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::ParseFailure,
        path,
        format!("{language} grammar produced no syntax tree"),
    )
}
