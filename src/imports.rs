//! Import reconciliation.
//!
//! Guarantees each required symbol is importable from its module exactly
//! once: merge into the existing named-import statement for that module if
//! one exists, otherwise insert a new statement at a deterministic position
//! (after the last import, or at the top of the file).

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Any import statement, for locating the insertion point.
static RE_ANY_IMPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*import\b").unwrap());

/// Named-import statement for one specific module. Compiled per call — the
/// module name is dynamic.
fn named_import_re(module: &str) -> Regex {
    Regex::new(&format!(
        r#"^(?P<indent>\s*)import\s*\{{(?P<specs>[^}}]*)\}}\s*from\s*(?P<quote>['"]){}['"]\s*;?\s*$"#,
        regex::escape(module)
    ))
    .unwrap()
}

/// Ensure `symbols` are importable from `module`, merging or inserting a
/// single named-import statement. Specifier lists come out deduplicated and
/// sorted.
pub fn reconcile_imports(text: &str, module: &str, symbols: &[&str]) -> String {
    if symbols.is_empty() {
        return text.to_string();
    }
    let re = named_import_re(module);
    let lines: Vec<&str> = text.lines().collect();

    if let Some((i, caps)) = lines
        .iter()
        .enumerate()
        .find_map(|(i, l)| re.captures(l).map(|c| (i, c)))
    {
        let mut specs: BTreeSet<String> = caps["specs"]
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        specs.extend(symbols.iter().map(|s| s.to_string()));
        let quote = &caps["quote"];
        let merged = format!(
            "{}import {{ {} }} from {quote}{module}{quote};",
            &caps["indent"],
            specs.into_iter().collect::<Vec<_>>().join(", "),
        );
        let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        out[i] = merged;
        return rejoin(out, text);
    }

    let specs: BTreeSet<&str> = symbols.iter().copied().collect();
    let statement = format!(
        "import {{ {} }} from \"{module}\";",
        specs.into_iter().collect::<Vec<_>>().join(", ")
    );

    let insert_at = lines
        .iter()
        .rposition(|l| RE_ANY_IMPORT.is_match(l))
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    out.insert(insert_at, statement);
    rejoin(out, text)
}

fn rejoin(lines: Vec<String>, original: &str) -> String {
    let mut joined = lines.join("\n");
    if original.ends_with('\n') {
        joined.push('\n');
    }
    joined
}
