//! Idiom-level source migrations without a parser.
//!
//! Rewrites two idioms across a tree of source files:
//!
//! 1. **Errors** — exception raises become explicit value results
//!    (`throw new Error(...)` → `return Result.err(...)`), with sibling
//!    value returns wrapped in the success constructor.
//! 2. **Options** — imperative option-builder chains become declarative
//!    schema-field definitions (`.option(...)` → `z.object({...})`).
//!
//! Per file the pipeline is: classify → rewrite in phases → reconcile
//! imports → diff → write or report. Classification is conservative by
//! policy: ambiguous or structurally risky files are skipped, never
//! partially transformed, and re-running the transform on its own output
//! is a no-op.

pub mod classify;
pub mod imports;
pub mod options;
pub mod rewrite;
pub mod schema;
pub mod scope;
pub mod select;
pub mod vocab;

use anyhow::{Context, Result};
use classify::Classification;
use std::fs;
use std::path::{Path, PathBuf};

/// One engine invocation.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Root of the tree to migrate.
    pub target_dir: PathBuf,
    /// Compute and report, but write nothing.
    pub dry_run: bool,
}

/// Outcome for one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub changed: bool,
    pub output_text: String,
}

/// Aggregate result of one invocation — the only object returned to the
/// caller. Paths are relative to the target directory, in selection order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub changed_files: Vec<String>,
    pub skipped_files: Vec<String>,
    pub errors: Vec<String>,
}

/// Run both migrations over every candidate file under the target
/// directory.
///
/// An unreadable target directory is the only hard failure; every per-file
/// failure is recorded in [`RunResult::errors`] and the run continues.
pub fn transform(options: &TransformOptions) -> Result<RunResult> {
    let files = select::select_files(&options.target_dir)?;
    let mut result = RunResult::default();

    for rel in files {
        let display = rel.to_string_lossy().to_string();
        match transform_file(&options.target_dir.join(&rel), options.dry_run) {
            Ok(FileDisposition::Changed) => result.changed_files.push(display),
            Ok(FileDisposition::Skipped) => result.skipped_files.push(display),
            Ok(FileDisposition::Untouched) => {}
            Err(err) => result.errors.push(format!("{display}: {err:#}")),
        }
    }

    log::debug!(
        "run complete: {} changed, {} skipped, {} errors",
        result.changed_files.len(),
        result.skipped_files.len(),
        result.errors.len()
    );
    Ok(result)
}

enum FileDisposition {
    Changed,
    Skipped,
    /// No pattern at all — not reported.
    Untouched,
}

fn transform_file(path: &Path, dry_run: bool) -> Result<FileDisposition> {
    let original =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let (result, errors_class, options_class) = transform_text(&original);
    log::debug!(
        "{}: errors={errors_class:?} options={options_class:?} changed={}",
        path.display(),
        result.changed
    );

    if result.changed {
        if !dry_run {
            fs::write(path, &result.output_text)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        return Ok(FileDisposition::Changed);
    }

    let noteworthy = errors_class != Classification::NoPattern
        || options_class != Classification::NoPattern;
    if noteworthy {
        Ok(FileDisposition::Skipped)
    } else {
        Ok(FileDisposition::Untouched)
    }
}

/// Run both migrations over one file's text. Pure — no filesystem access —
/// so every pipeline property is testable on string fixtures.
///
/// Migration order is fixed: errors first, then options over the text the
/// error migration produced. Import reconciliation runs only for a
/// migration that actually edited the text.
pub fn transform_text(original: &str) -> (TransformResult, Classification, Classification) {
    let errors_class = classify::classify_errors(original);
    let mut working = original.to_string();

    if errors_class == Classification::Transformable {
        let (rewritten, stats) = rewrite::rewrite_errors(&working);
        if rewritten != working {
            working = rewritten;
            let mut symbols = vec![vocab::RESULT_SYMBOL];
            if stats.generic_used {
                symbols.push(vocab::INTERNAL_ERROR_SYMBOL);
            }
            working = imports::reconcile_imports(&working, vocab::RESULT_MODULE, &symbols);
        }
    }

    let options_class = classify::classify_options(&working);
    if options_class == Classification::Transformable {
        if let Some(chain) = options::parse_chain(&working) {
            let spliced = schema::splice_schema(&working, &chain);
            if spliced != working {
                working = spliced;
                working = imports::reconcile_imports(
                    &working,
                    vocab::SCHEMA_MODULE,
                    &[vocab::SCHEMA_NAMESPACE],
                );
            }
        }
    }

    let changed = working != original;
    (
        TransformResult { changed, output_text: working },
        errors_class,
        options_class,
    )
}
