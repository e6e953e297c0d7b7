//! Per-file, per-migration classification.
//!
//! Decides whether a file is worth rewriting before any phase runs. The
//! check order is load-bearing: already-migrated must be tested before the
//! complexity heuristics, because a fully migrated file may legitimately
//! contain multiple schema declarations that would otherwise look
//! "too complex". Ambiguous or structurally risky files are always skipped,
//! never partially transformed.

use crate::vocab;
use regex::Regex;
use std::sync::LazyLock;

/// How far a multi-line raise may span before it is considered unsafe.
const RAISE_WINDOW_LINES: usize = 8;

/// Raise of the generic class or a known error kind: the rewriteable idiom.
/// Raises of unknown classes are not a source construct — the engine leaves
/// them alone entirely.
static RE_RAISE: LazyLock<Regex> = LazyLock::new(|| {
    let kinds = vocab::KNOWN_ERROR_KINDS.join("|");
    Regex::new(&format!(r"\bthrow\s+new\s+(?:Error|{kinds})\s*\(")).unwrap()
});

/// Imperative option-builder call.
static RE_BUILDER_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(option|requiredOption|argument)\s*\(").unwrap());

/// Line that opens a loop or iteration-callback block.
static RE_LOOP_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:for|while|do)\b|\.(?:forEach|map)\s*\(").unwrap());

/// Chain continuation: a line that is just another chained method call.
static RE_CHAIN_CONT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\.").unwrap());

/// Classification outcome for one migration over one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No source construct present — skip silently.
    NoPattern,
    /// Destination idiom already present — counted as skipped.
    AlreadyMigrated,
    /// Safe to rewrite.
    Transformable,
    /// Structure exceeds what the engine can rewrite safely — skipped.
    TooComplex,
}

/// Net parenthesis balance of a line, counting every occurrence.
fn paren_delta(line: &str) -> i32 {
    line.matches('(').count() as i32 - line.matches(')').count() as i32
}

/// Classify a file for the error-result migration.
pub fn classify_errors(text: &str) -> Classification {
    let has_source = RE_RAISE.is_match(text);
    let has_dest = text.contains(&format!("{}(", vocab::RESULT_ERR));

    if has_dest && !has_source {
        return Classification::AlreadyMigrated;
    }
    if !has_source {
        return Classification::NoPattern;
    }
    if has_unterminated_raise(text) {
        return Classification::TooComplex;
    }
    Classification::Transformable
}

/// True if any raise spreads its argument list over more than
/// [`RAISE_WINDOW_LINES`] lines without balancing its parentheses.
fn has_unterminated_raise(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !RE_RAISE.is_match(line) {
            continue;
        }
        let mut balance = paren_delta(line);
        if balance <= 0 {
            continue; // closes on its own line
        }
        let mut closed = false;
        for follow in lines.iter().skip(i + 1).take(RAISE_WINDOW_LINES) {
            balance += paren_delta(follow);
            if balance <= 0 {
                closed = true;
                break;
            }
        }
        if !closed {
            return true;
        }
    }
    false
}

/// Classify a file for the option-schema migration.
pub fn classify_options(text: &str) -> Classification {
    let has_dest = text.contains(&format!("{}.object(", vocab::SCHEMA_NAMESPACE));
    if has_dest {
        return Classification::AlreadyMigrated;
    }
    if !RE_BUILDER_CALL.is_match(text) {
        return Classification::NoPattern;
    }
    if builder_call_spans_lines(text)
        || builder_chain_count(text) > 1
        || builder_call_inside_loop(text)
    {
        return Classification::TooComplex;
    }
    Classification::Transformable
}

/// A builder call whose parentheses do not close on its own line cannot be
/// parsed by the line-oriented descriptor reader.
fn builder_call_spans_lines(text: &str) -> bool {
    text.lines()
        .filter(|l| RE_BUILDER_CALL.is_match(l))
        .any(|l| paren_delta(l) != 0)
}

/// Number of independent builder chains: runs of builder-call lines are
/// grouped when every line between them is a chain continuation (`.call(...)`).
fn builder_chain_count(text: &str) -> usize {
    let lines: Vec<&str> = text.lines().collect();
    let mut chains = 0;
    let mut prev_call: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        if !RE_BUILDER_CALL.is_match(line) {
            continue;
        }
        let same_chain = prev_call.is_some_and(|p| {
            lines[p + 1..i].iter().all(|between| RE_CHAIN_CONT.is_match(between))
        });
        if !same_chain {
            chains += 1;
        }
        prev_call = Some(i);
    }
    chains
}

/// True if any builder call occurs inside a block opened by a loop or
/// iteration callback — a dynamic declaration the engine cannot reason about.
fn builder_call_inside_loop(text: &str) -> bool {
    let mut depth: i32 = 0;
    let mut loop_opens: Vec<i32> = Vec::new();
    for line in text.lines() {
        let opens = line.matches('{').count() as i32;
        let closes = line.matches('}').count() as i32;
        if RE_BUILDER_CALL.is_match(line)
            && (!loop_opens.is_empty() || (opens > 0 && RE_LOOP_OPEN.is_match(line)))
        {
            return true;
        }
        if opens > 0 && RE_LOOP_OPEN.is_match(line) {
            loop_opens.push(depth);
        }
        depth += opens - closes;
        while loop_opens.last().map_or(false, |&d| d >= depth) {
            loop_opens.pop();
        }
    }
    false
}
