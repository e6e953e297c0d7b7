//! Declarative schema synthesis.
//!
//! Turns parsed argument/option descriptors into one schema constant and
//! splices it into the file: the constant is inserted before the chain-head
//! statement, the first descriptor call becomes a single `.schema(...)`
//! call, and the remaining descriptor calls are dropped. Field synthesis is
//! 1:1 with descriptors — positional arguments first, then flags, with key
//! collisions resolved last-write-wins in place.

use crate::options::{self, ArgumentDescriptor, BuilderChain, OptionDescriptor, ValueType};
use crate::vocab;

/// One synthesized declarative validation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub key: String,
    /// Full combinator expression, e.g. `z.string().optional()`.
    pub expr: String,
}

/// Render a source string as a double-quoted JS string literal.
fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn type_combinator(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::String => "string",
        ValueType::Boolean => "boolean",
        ValueType::Number => "number",
    }
}

fn field_for_argument(arg: &ArgumentDescriptor) -> SchemaField {
    let z = vocab::SCHEMA_NAMESPACE;
    let mut expr = format!("{z}.string()");
    if !arg.required {
        expr.push_str(".optional()");
    }
    if !arg.description.is_empty() {
        expr.push_str(&format!(".describe({})", js_string(&arg.description)));
    }
    SchemaField { key: arg.name.clone(), expr }
}

fn field_for_option(opt: &OptionDescriptor) -> SchemaField {
    let z = vocab::SCHEMA_NAMESPACE;
    let mut expr = format!("{z}.{}()", type_combinator(opt.value_type));
    if let Some(ref default) = opt.default_literal {
        expr.push_str(&format!(".default({default})"));
    } else if opt.is_optional_value && !opt.required {
        expr.push_str(".optional()");
    }
    if !opt.description.is_empty() {
        expr.push_str(&format!(".describe({})", js_string(&opt.description)));
    }
    SchemaField { key: opt.key.clone(), expr }
}

/// Synthesize the field list: positional arguments precede flags; a later
/// descriptor with the same key overwrites the earlier field in place.
pub fn synthesize_fields(chain: &BuilderChain) -> Vec<SchemaField> {
    let mut fields: Vec<SchemaField> = Vec::new();
    let all = chain
        .arguments
        .iter()
        .map(field_for_argument)
        .chain(chain.options.iter().map(field_for_option));
    for field in all {
        match fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
    }
    fields
}

/// Render the schema constant block at the given indentation.
pub fn render_schema(fields: &[SchemaField], indent: &str) -> String {
    let z = vocab::SCHEMA_NAMESPACE;
    let mut out = format!("{indent}const {} = {z}.object({{\n", vocab::SCHEMA_CONST);
    for field in fields {
        out.push_str(&format!("{indent}  {}: {},\n", field.key, field.expr));
    }
    out.push_str(&format!("{indent}}});\n"));
    out
}

/// Replace the chain's descriptor calls with the synthesized schema.
///
/// Returns the input unchanged when the chain has no usable descriptor
/// lines (no-op, not an error).
pub fn splice_schema(text: &str, chain: &BuilderChain) -> String {
    let fields = synthesize_fields(chain);
    if fields.is_empty() {
        return text.to_string();
    }
    let lines: Vec<&str> = text.lines().collect();
    let first_call = chain.call_lines[0];
    let Some((indent, recv, semi)) = options::call_line_parts(lines[first_call]) else {
        return text.to_string();
    };

    let head_indent: String = lines[chain.head_line]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();
    let block = render_schema(&fields, &head_indent);

    let terminator = if semi { ";" } else { "" };
    let replacement = match recv {
        Some(r) => format!(
            "{indent}{r}.{}({}){terminator}",
            vocab::SCHEMA_METHOD,
            vocab::SCHEMA_CONST
        ),
        None => format!(
            "{indent}.{}({}){terminator}",
            vocab::SCHEMA_METHOD,
            vocab::SCHEMA_CONST
        ),
    };

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i == chain.head_line {
            out.push_str(&block);
            out.push('\n');
        }
        if i == first_call {
            out.push_str(&replacement);
            out.push('\n');
        } else if chain.call_lines.contains(&i) {
            // dropped descriptor call
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    if !text.ends_with('\n') {
        out.pop();
    }
    out
}
