//! Option-builder chain parsing.
//!
//! Locates the single imperative builder chain in a file and parses its
//! `.argument(...)` / `.option(...)` / `.requiredOption(...)` calls into
//! descriptors. Call arguments are split with a quote- and paren-aware
//! character walk — regex alone cannot split `"a, b", fn(x, y)` correctly.
//!
//! The classifier has already rejected files with multiple chains, chains
//! inside loops, and calls spanning lines, so everything here assumes one
//! static chain with one call per line.

use crate::vocab;
use regex::Regex;
use std::sync::LazyLock;

/// One descriptor call, possibly with a statement receiver
/// (`program.option(...)`) or as a chain continuation (`.option(...)`).
static RE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>\s*)(?P<recv>[\w$][\w$.]*)?\.(?P<method>option|requiredOption|argument)\s*\((?P<args>.*)\)\s*(?P<semi>;?)\s*$",
    )
    .unwrap()
});

/// Long-form flag inside a flag spec: `--force`, `--no-color`, `--dry-run`.
static RE_LONG_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--([A-Za-z][\w-]*)").unwrap());

/// Required value slot: `<value>`.
static RE_ANGLE_SLOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Optional value slot: `[value]`.
static RE_BRACKET_SLOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]").unwrap());

/// Known numeric-parser reference anywhere in a parser-slot piece.
static RE_NUMERIC_PARSER: LazyLock<Regex> = LazyLock::new(|| {
    let parsers = vocab::NUMERIC_PARSERS.join("|");
    Regex::new(&format!(r"\b(?:{parsers})\b")).unwrap()
});

/// Inferred field value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Boolean,
    Number,
}

/// One parsed flag declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub key: String,
    pub value_type: ValueType,
    /// Declared via `.requiredOption`.
    pub required: bool,
    pub has_default: bool,
    /// Default exactly as written in the source (`"fast"`, `10`).
    pub default_literal: Option<String>,
    pub description: String,
    pub is_negated: bool,
    /// Value slot used the optional bracket form.
    pub is_optional_value: bool,
}

/// One parsed positional-argument declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub description: String,
    /// Declared with the mandatory `<name>` marker.
    pub required: bool,
}

/// The located chain plus everything needed to splice the replacement in.
#[derive(Debug)]
pub struct BuilderChain {
    /// Line index of the statement that starts the chain.
    pub head_line: usize,
    /// Line indices of the descriptor calls, in order.
    pub call_lines: Vec<usize>,
    pub arguments: Vec<ArgumentDescriptor>,
    pub options: Vec<OptionDescriptor>,
}

/// Parse the file's builder chain. Returns `None` when no descriptor call
/// parses — the caller treats that as "nothing to do", not an error.
pub fn parse_chain(text: &str) -> Option<BuilderChain> {
    let lines: Vec<&str> = text.lines().collect();
    let mut call_lines = Vec::new();
    let mut arguments = Vec::new();
    let mut options = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = RE_CALL.captures(line) else {
            continue;
        };
        let args = split_call_args(&caps["args"]);
        match &caps["method"] {
            "argument" => {
                if let Some(arg) = parse_argument(&args) {
                    arguments.push(arg);
                    call_lines.push(i);
                }
            }
            method => {
                if let Some(opt) = parse_option(&args, method == "requiredOption") {
                    options.push(opt);
                    call_lines.push(i);
                }
            }
        }
    }

    let first = *call_lines.first()?;
    Some(BuilderChain {
        head_line: chain_head(&lines, first),
        call_lines,
        arguments,
        options,
    })
}

/// Walk upward from the first descriptor call to the statement head: the
/// nearest line that is not a chain continuation.
fn chain_head(lines: &[&str], first_call: usize) -> usize {
    let mut head = first_call;
    while head > 0 && lines[head].trim_start().starts_with('.') {
        head -= 1;
    }
    head
}

/// Split a call's argument text on top-level commas, respecting single,
/// double, and backtick quotes, escapes, and bracket nesting.
pub fn split_call_args(args: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth: i32 = 0;
    let mut escaped = false;

    for ch in args.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if quote.is_some() => {
                current.push(ch);
                escaped = true;
            }
            '\'' | '"' | '`' => {
                match quote {
                    Some(q) if q == ch => quote = None,
                    None => quote = Some(ch),
                    Some(_) => {}
                }
                current.push(ch);
            }
            '(' | '[' | '{' if quote.is_none() => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' if quote.is_none() => {
                depth -= 1;
                current.push(ch);
            }
            ',' if quote.is_none() && depth == 0 => {
                pieces.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let last = current.trim();
    if !last.is_empty() {
        pieces.push(last.to_string());
    }
    pieces
}

/// Strip a matching quote pair from a string-literal piece.
fn unquote(piece: &str) -> Option<&str> {
    let bytes = piece.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return Some(&piece[1..piece.len() - 1]);
        }
    }
    None
}

/// True if the piece references a known numeric parser (`parseInt`,
/// `(v) => parseInt(v, 10)`, ...).
fn is_numeric_parser(piece: &str) -> bool {
    RE_NUMERIC_PARSER.is_match(piece)
}

/// True if the piece is a literal value usable as a field default.
fn is_literal(piece: &str) -> bool {
    unquote(piece).is_some()
        || piece.parse::<f64>().is_ok()
        || piece == "true"
        || piece == "false"
}

fn parse_argument(args: &[String]) -> Option<ArgumentDescriptor> {
    let spec = unquote(args.first()?)?;
    let description = args
        .get(1)
        .and_then(|p| unquote(p))
        .unwrap_or_default()
        .to_string();
    let required = RE_ANGLE_SLOT.is_match(spec);
    if !required && !RE_BRACKET_SLOT.is_match(spec) {
        return None; // neither marker — not a positional spec
    }
    let name: String = spec
        .trim_matches(|c| c == '<' || c == '>' || c == '[' || c == ']')
        .trim_end_matches('.')
        .to_string();
    Some(ArgumentDescriptor {
        name: camel_case(&name),
        description,
        required,
    })
}

fn parse_option(args: &[String], required: bool) -> Option<OptionDescriptor> {
    let flags = unquote(args.first()?)?;
    let long = RE_LONG_FLAG.captures(flags)?[1].to_string();
    let is_negated = long.starts_with("no-");
    let key = camel_case(long.strip_prefix("no-").unwrap_or(&long));

    let description = args
        .get(1)
        .and_then(|p| unquote(p))
        .unwrap_or_default()
        .to_string();

    let has_angle = RE_ANGLE_SLOT.is_match(flags);
    let has_bracket = RE_BRACKET_SLOT.is_match(flags);
    if !has_angle && !has_bracket {
        // No value slot: a plain boolean flag. Negated flags default on.
        return Some(OptionDescriptor {
            key,
            value_type: ValueType::Boolean,
            required,
            has_default: true,
            default_literal: Some(if is_negated { "true" } else { "false" }.to_string()),
            description,
            is_negated,
            is_optional_value: false,
        });
    }

    // Value-taking flag: remaining args are `[parser,] [default]`.
    let mut value_type = ValueType::String;
    let mut default_literal = None;
    for extra in args.iter().skip(2) {
        if is_numeric_parser(extra) {
            value_type = ValueType::Number;
        } else if default_literal.is_none() && is_literal(extra) {
            default_literal = Some(extra.clone());
        }
    }

    Some(OptionDescriptor {
        key,
        value_type,
        required,
        has_default: default_literal.is_some(),
        default_literal,
        description,
        is_negated,
        is_optional_value: has_bracket,
    })
}

/// `dry-run` → `dryRun`, `force` → `force`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' || ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Splice metadata for one call line, re-derived at replacement time.
pub fn call_line_parts(line: &str) -> Option<(String, Option<String>, bool)> {
    let caps = RE_CALL.captures(line)?;
    Some((
        caps["indent"].to_string(),
        caps.name("recv").map(|m| m.as_str().to_string()),
        &caps["semi"] == ";",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_args() {
        assert_eq!(
            split_call_args(r#""-f, --force", "overwrite it""#),
            vec![r#""-f, --force""#, r#""overwrite it""#]
        );
    }

    #[test]
    fn split_respects_quoted_commas() {
        assert_eq!(
            split_call_args(r#""a, b", "c""#),
            vec![r#""a, b""#, r#""c""#]
        );
    }

    #[test]
    fn split_respects_nested_calls() {
        assert_eq!(
            split_call_args(r#""--count <n>", "count", (v) => parseInt(v, 10), 1"#),
            vec![r#""--count <n>""#, r#""count""#, "(v) => parseInt(v, 10)", "1"]
        );
    }

    #[test]
    fn split_respects_escapes() {
        assert_eq!(
            split_call_args(r#""say \"hi\", ok", 1"#),
            vec![r#""say \"hi\", ok""#, "1"]
        );
    }

    #[test]
    fn camel_cases_kebab() {
        assert_eq!(camel_case("dry-run"), "dryRun");
        assert_eq!(camel_case("force"), "force");
        assert_eq!(camel_case("max-old-space"), "maxOldSpace");
    }

    #[test]
    fn parses_boolean_flag() {
        let text = "program.option(\"-f, --force\", \"overwrite\");\n";
        let chain = parse_chain(text).unwrap();
        assert_eq!(chain.options.len(), 1);
        let opt = &chain.options[0];
        assert_eq!(opt.key, "force");
        assert_eq!(opt.value_type, ValueType::Boolean);
        assert_eq!(opt.default_literal.as_deref(), Some("false"));
        assert!(!opt.is_negated);
        assert_eq!(opt.description, "overwrite");
    }

    #[test]
    fn parses_negated_flag_defaults_on() {
        let text = "program.option(\"--no-color\", \"disable color\");\n";
        let opt = parse_chain(text).unwrap().options.remove(0);
        assert_eq!(opt.key, "color");
        assert!(opt.is_negated);
        assert_eq!(opt.default_literal.as_deref(), Some("true"));
    }

    #[test]
    fn parses_required_value_slot() {
        let text = "program.option(\"-p, --port <number>\", \"listen port\");\n";
        let opt = parse_chain(text).unwrap().options.remove(0);
        assert_eq!(opt.key, "port");
        assert_eq!(opt.value_type, ValueType::String);
        assert!(!opt.has_default);
        assert!(!opt.is_optional_value);
    }

    #[test]
    fn parses_optional_value_slot() {
        let text = "program.option(\"--name [value]\", \"optional name\");\n";
        let opt = parse_chain(text).unwrap().options.remove(0);
        assert!(opt.is_optional_value);
        assert!(!opt.has_default);
    }

    #[test]
    fn parses_numeric_parser_and_default() {
        let text = "program.option(\"-c, --count <n>\", \"how many\", parseInt, 10);\n";
        let opt = parse_chain(text).unwrap().options.remove(0);
        assert_eq!(opt.value_type, ValueType::Number);
        assert_eq!(opt.default_literal.as_deref(), Some("10"));
    }

    #[test]
    fn parses_string_default() {
        let text = "program.option(\"--mode [m]\", \"mode\", \"fast\");\n";
        let opt = parse_chain(text).unwrap().options.remove(0);
        assert_eq!(opt.value_type, ValueType::String);
        assert_eq!(opt.default_literal.as_deref(), Some("\"fast\""));
    }

    #[test]
    fn parses_required_option() {
        let text = "program.requiredOption(\"--token <t>\", \"api token\");\n";
        let opt = parse_chain(text).unwrap().options.remove(0);
        assert!(opt.required);
    }

    #[test]
    fn parses_arguments_required_and_optional() {
        let text = "\
program
  .argument(\"<src>\", \"source file\")
  .argument(\"[dest]\", \"target file\")
  .action(run);
";
        let chain = parse_chain(text).unwrap();
        assert_eq!(chain.arguments.len(), 2);
        assert!(chain.arguments[0].required);
        assert_eq!(chain.arguments[0].name, "src");
        assert!(!chain.arguments[1].required);
        assert_eq!(chain.arguments[1].name, "dest");
    }

    #[test]
    fn variadic_argument_name_is_trimmed() {
        let text = "program.argument(\"<files...>\", \"inputs\");\n";
        let chain = parse_chain(text).unwrap();
        assert_eq!(chain.arguments[0].name, "files");
    }

    #[test]
    fn chain_head_walks_past_continuations() {
        let text = "\
const cmd = new Command(\"copy\")
  .name(\"copy\")
  .argument(\"<src>\", \"source\")
  .option(\"-f, --force\", \"overwrite\");
";
        let chain = parse_chain(text).unwrap();
        assert_eq!(chain.head_line, 0);
        assert_eq!(chain.call_lines, vec![2, 3]);
    }

    #[test]
    fn statement_form_head_is_the_call_line() {
        let text = "program.option(\"-f, --force\", \"overwrite\");\n";
        let chain = parse_chain(text).unwrap();
        assert_eq!(chain.head_line, 0);
    }

    #[test]
    fn no_calls_yields_none() {
        assert!(parse_chain("const x = 1;\n").is_none());
    }

    #[test]
    fn call_line_parts_distinguish_forms() {
        let (indent, recv, semi) = call_line_parts("  .option(\"-f\", \"x\")").unwrap();
        assert_eq!(indent, "  ");
        assert_eq!(recv, None);
        assert!(!semi);

        let (_, recv, semi) = call_line_parts("program.option(\"-f\", \"x\");").unwrap();
        assert_eq!(recv.as_deref(), Some("program"));
        assert!(semi);
    }
}
