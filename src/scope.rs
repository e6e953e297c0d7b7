//! Approximate function-scope tracking.
//!
//! A single forward pass counts `{`/`}` occurrences per line and keeps a
//! stack of open scopes, each keyed by the depth observed before its opening
//! line. No parsing: braces inside string or comment literals count as
//! structural. That approximation is deliberate (and covered by an explicit
//! test below) — the alternative is a full parser, which this engine avoids.

use crate::vocab;
use regex::Regex;
use std::sync::LazyLock;

/// Keyword-style signature with the opening brace on the same line:
/// `function f(a) {`, `async function g() {`, `export function h() {`.
static RE_KEYWORD_FN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfunction\b[^{]*\{").unwrap());

/// Arrow-style signature with the opening brace on the same line:
/// `const f = (a) => {`, `.then(x => {`.
static RE_ARROW_FN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=>\s*\{").unwrap());

/// One inferred function-like block, in zero-based line indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSpan {
    pub start_line: usize,
    pub end_line: usize,
    /// True if the span contains a value-result error marker.
    pub has_marker: bool,
}

struct OpenScope {
    start_line: usize,
    /// Depth observed immediately before the opening line's body began.
    depth_at_open: i32,
    has_marker: bool,
}

/// True if the line both looks like a function signature and opens a block.
fn opens_function_scope(line: &str) -> bool {
    RE_KEYWORD_FN.is_match(line) || RE_ARROW_FN.is_match(line)
}

/// Scan `text` and return all inferred scope spans.
///
/// Scopes are well-nested by construction: the only transitions are push
/// (a function-like line with an opening brace) and pop (depth unwinds to
/// the value recorded at push time). A marker line is attributed to the
/// innermost currently-open scope only. Scopes still open at end of input
/// are finalized on the last line.
pub fn scan_scopes(text: &str) -> Vec<ScopeSpan> {
    let marker = format!("{}(", vocab::RESULT_ERR);
    let mut depth: i32 = 0;
    let mut stack: Vec<OpenScope> = Vec::new();
    let mut spans: Vec<ScopeSpan> = Vec::new();
    let mut last_line = 0;

    for (i, line) in text.lines().enumerate() {
        last_line = i;
        let opens = line.matches('{').count() as i32;
        let closes = line.matches('}').count() as i32;

        if opens > 0 && opens_function_scope(line) {
            stack.push(OpenScope {
                start_line: i,
                depth_at_open: depth,
                has_marker: false,
            });
        }

        if line.contains(&marker) {
            if let Some(top) = stack.last_mut() {
                top.has_marker = true;
            }
        }

        depth += opens - closes;

        // Close every scope that has fully unwound on this line.
        while stack.last().map_or(false, |open| open.depth_at_open >= depth) {
            let open = stack.pop().unwrap(); // last() just matched
            spans.push(ScopeSpan {
                start_line: open.start_line,
                end_line: i,
                has_marker: open.has_marker,
            });
        }
    }

    while let Some(open) = stack.pop() {
        spans.push(ScopeSpan {
            start_line: open.start_line,
            end_line: last_line,
            has_marker: open.has_marker,
        });
    }

    spans
}

/// The innermost scope containing `line`: the containing span with the
/// smallest line extent.
pub fn innermost_scope(spans: &[ScopeSpan], line: usize) -> Option<&ScopeSpan> {
    spans
        .iter()
        .filter(|s| s.start_line <= line && line <= s.end_line)
        .min_by_key(|s| s.end_line - s.start_line)
}
