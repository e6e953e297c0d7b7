//! Error-result rewrite phases.
//!
//! Three ordered, independent passes over the whole file text:
//!
//! 1. **Collapse** — a raise whose argument list spans several lines is
//!    folded onto one line and rewritten to the destination form.
//! 2. **Substitute** — remaining single-line raises become destination-form
//!    returns; the specific (known error kind) rule runs before the generic
//!    fallback because it is strictly more specific.
//! 3. **Wrap** — plain value returns inside scopes that now carry an error
//!    marker are wrapped in the success constructor.
//!
//! Each phase only touches lines matching its own pattern; zero matches is
//! a no-op, not an error.

use crate::scope;
use crate::vocab;
use regex::Regex;
use std::sync::LazyLock;

/// Start of a rewriteable raise (generic class or known kind).
static RE_RAISE_START: LazyLock<Regex> = LazyLock::new(|| {
    let kinds = vocab::KNOWN_ERROR_KINDS.join("|");
    Regex::new(&format!(r"^\s*throw\s+new\s+(?:Error|{kinds})\s*\(")).unwrap()
});

/// Complete single-line raise of a known error kind.
static RE_RAISE_KNOWN: LazyLock<Regex> = LazyLock::new(|| {
    let kinds = vocab::KNOWN_ERROR_KINDS.join("|");
    Regex::new(&format!(
        r"^(?P<indent>\s*)throw\s+new\s+(?P<kind>{kinds})\s*\((?P<args>.*)\)\s*;?\s*$"
    ))
    .unwrap()
});

/// Complete single-line raise of the generic class.
static RE_RAISE_GENERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)throw\s+new\s+Error\s*\((?P<args>.*)\)\s*;?\s*$").unwrap()
});

/// Plain value return, expression and terminator on one line.
/// Bare `return;` has no expression and never matches.
static RE_RETURN_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<indent>\s*)return\s+(?P<expr>.+?)\s*;\s*$").unwrap());

/// Module-boundary lines are never wrapped, whatever they contain.
static RE_IMPORT_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:import|export)\b").unwrap());

/// Collapse cleanup: space after the opening paren.
static RE_OPEN_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s+").unwrap());
/// Collapse cleanup: space and a trailing argument comma before the close.
static RE_CLOSE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",?\s*\)").unwrap());

/// What the substitution phases observed, for import reconciliation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RaiseStats {
    /// Raise lines rewritten to destination form.
    pub rewrites: usize,
    /// True if any rewrite used the generic `InternalError` factory.
    pub generic_used: bool,
}

impl RaiseStats {
    fn absorb(&mut self, other: RaiseStats) {
        self.rewrites += other.rewrites;
        self.generic_used |= other.generic_used;
    }
}

/// Rewrite one single-line raise to destination form, if it matches.
fn substitute_raise_line(line: &str, stats: &mut RaiseStats) -> Option<String> {
    if let Some(caps) = RE_RAISE_KNOWN.captures(line) {
        stats.rewrites += 1;
        return Some(format!(
            "{}return {}(new {}({}));",
            &caps["indent"],
            vocab::RESULT_ERR,
            &caps["kind"],
            &caps["args"],
        ));
    }
    if let Some(caps) = RE_RAISE_GENERIC.captures(line) {
        stats.rewrites += 1;
        stats.generic_used = true;
        return Some(format!(
            "{}return {}({}({}));",
            &caps["indent"],
            vocab::RESULT_ERR,
            vocab::INTERNAL_ERROR_FACTORY,
            &caps["args"],
        ));
    }
    None
}

/// Phase 1: fold multi-line raises onto one line and rewrite them.
///
/// A raise that never balances its parentheses is left untouched — the
/// classifier bails out on those before this phase runs, so hitting one
/// here means the file is mid-edit and must not be half-rewritten.
pub fn collapse_multiline_raises(text: &str) -> (String, RaiseStats) {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut stats = RaiseStats::default();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let mut balance = paren_delta(line);
        if !RE_RAISE_START.is_match(line) || balance <= 0 {
            out.push(line.to_string());
            i += 1;
            continue;
        }

        // Accumulate continuation lines until the argument list closes.
        let mut end = None;
        for (j, follow) in lines.iter().enumerate().skip(i + 1) {
            balance += paren_delta(follow);
            if balance <= 0 {
                end = Some(j);
                break;
            }
        }
        let Some(end) = end else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let mut collapsed = line.trim_end().to_string();
        for follow in &lines[i + 1..=end] {
            collapsed.push(' ');
            collapsed.push_str(follow.trim());
        }
        collapsed = RE_OPEN_SPACE.replace_all(&collapsed, "(").to_string();
        collapsed = RE_CLOSE_SPACE.replace_all(&collapsed, ")").to_string();

        match substitute_raise_line(&collapsed, &mut stats) {
            Some(rewritten) => out.push(rewritten),
            None => out.push(collapsed),
        }
        i = end + 1;
    }

    (rejoin(out, text), stats)
}

/// Phase 2: rewrite remaining single-line raises. Specific kinds first —
/// the ordering is handled inside [`substitute_raise_line`].
pub fn substitute_raises(text: &str) -> (String, RaiseStats) {
    let mut stats = RaiseStats::default();
    let out: Vec<String> = text
        .lines()
        .map(|line| substitute_raise_line(line, &mut stats).unwrap_or_else(|| line.to_string()))
        .collect();
    (rejoin(out, text), stats)
}

/// Phase 3: wrap plain value returns in scopes that carry an error marker.
///
/// Only runs when the text already contains a destination-form error
/// construct. Untouched: bare `return;`, module-boundary lines, and
/// statements already in destination form.
pub fn wrap_returns(text: &str) -> String {
    if !text.contains(&format!("{}(", vocab::RESULT_ERR)) {
        return text.to_string();
    }

    let spans = scope::scan_scopes(text);
    let result_prefix = format!("return {}.", vocab::RESULT_SYMBOL);

    let out: Vec<String> = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if RE_IMPORT_EXPORT.is_match(line) || line.trim_start().starts_with(&result_prefix) {
                return line.to_string();
            }
            let Some(caps) = RE_RETURN_VALUE.captures(line) else {
                return line.to_string();
            };
            let marked = scope::innermost_scope(&spans, i).map_or(false, |s| s.has_marker);
            if !marked {
                return line.to_string();
            }
            format!(
                "{}return {}({});",
                &caps["indent"],
                vocab::RESULT_OK,
                &caps["expr"],
            )
        })
        .collect();

    rejoin(out, text)
}

/// Run all three phases in order.
pub fn rewrite_errors(text: &str) -> (String, RaiseStats) {
    let mut stats = RaiseStats::default();
    let (text, collapsed) = collapse_multiline_raises(text);
    stats.absorb(collapsed);
    let (text, substituted) = substitute_raises(&text);
    stats.absorb(substituted);
    (wrap_returns(&text), stats)
}

fn paren_delta(line: &str) -> i32 {
    line.matches('(').count() as i32 - line.matches(')').count() as i32
}

/// Join lines back, preserving the original trailing-newline state.
fn rejoin(lines: Vec<String>, original: &str) -> String {
    let mut joined = lines.join("\n");
    if original.ends_with('\n') {
        joined.push('\n');
    }
    joined
}
