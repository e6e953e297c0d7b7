//! Destination-form vocabulary.
//!
//! The rewrite phases emit these names verbatim; they are an external
//! contract with the target codebase's result/schema libraries, not
//! something the engine derives. Changing a name here changes every
//! emitted edit, so the whole table lives in one place.

/// Module that exports `Result` and the error-kind constructors.
pub const RESULT_MODULE: &str = "@toolkit/result";

/// Success constructor: `Result.ok(value)`.
pub const RESULT_OK: &str = "Result.ok";

/// Failure constructor: `Result.err(error)`.
pub const RESULT_ERR: &str = "Result.err";

/// Generic fallback factory for raises with no specific kind:
/// `InternalError.create(message)`.
pub const INTERNAL_ERROR_FACTORY: &str = "InternalError.create";

/// Symbol name of the generic factory's class, for import reconciliation.
pub const INTERNAL_ERROR_SYMBOL: &str = "InternalError";

/// Symbol name of the result wrapper, for import reconciliation.
pub const RESULT_SYMBOL: &str = "Result";

/// Error kinds the specific substitution pass recognizes. A raise of one of
/// these classes is kept as a constructor call (`new ValidationError(...)`)
/// inside `Result.err`; anything else goes through the generic factory.
/// Files that already throw these classes already import them, so the
/// specific pass never adds imports.
pub const KNOWN_ERROR_KINDS: &[&str] = &[
    "ValidationError",
    "NotFoundError",
    "PermissionError",
    "ConflictError",
    "TimeoutError",
    "ParseError",
];

/// Module that exports the schema combinator namespace.
pub const SCHEMA_MODULE: &str = "zod";

/// Imported combinator namespace (`z.object`, `z.string`, ...).
pub const SCHEMA_NAMESPACE: &str = "z";

/// Name of the synthesized schema constant.
pub const SCHEMA_CONST: &str = "optionsSchema";

/// Builder method that consumes the synthesized schema in place of the
/// removed `.option(...)`/`.argument(...)` calls.
pub const SCHEMA_METHOD: &str = "schema";

/// References recognized as numeric parsers in an option declaration's
/// parser slot; their presence types the field as a number.
pub const NUMERIC_PARSERS: &[&str] = &["parseInt", "parseFloat", "Number"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_exclude_the_generic_class() {
        assert!(!KNOWN_ERROR_KINDS.contains(&"Error"));
        assert!(!KNOWN_ERROR_KINDS.contains(&INTERNAL_ERROR_SYMBOL));
    }
}
