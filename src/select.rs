//! Candidate-file selection.
//!
//! Walks the target tree and yields relative paths of files matching the
//! include globs. Ignored directories are pruned at descent time — some of
//! them (dependency caches, build output) can hold enormous generated trees.

use anyhow::{Context, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Directory names never descended into.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    "coverage",
    ".next",
    ".cache",
    "target",
    "vendor",
];

/// Include patterns — known text extensions only; the engine never reads
/// binary content.
pub const INCLUDE_GLOBS: &[&str] = &[
    "**/*.ts",
    "**/*.tsx",
    "**/*.js",
    "**/*.jsx",
    "**/*.mjs",
    "**/*.cjs",
];

static PATTERNS: LazyLock<Vec<Pattern>> =
    LazyLock::new(|| INCLUDE_GLOBS.iter().map(|g| Pattern::new(g).unwrap()).collect());

/// Collect candidate files under `root`, as paths relative to `root`,
/// sorted for deterministic processing order.
///
/// An unreadable root is a hard failure for the whole run; unreadable
/// entries further down are logged and skipped.
pub fn select_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(root).with_context(|| format!("failed to read target directory: {}", root.display()))?;
    walk(root, entries, root, &PATTERNS, &mut files);
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk(
    root: &Path,
    entries: fs::ReadDir,
    dir: &Path,
    patterns: &[Pattern],
    files: &mut Vec<PathBuf>,
) {
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                log::warn!("skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            if IGNORED_DIRS.iter().any(|d| name == *d) {
                continue;
            }
            match fs::read_dir(&path) {
                Ok(sub) => walk(root, sub, &path, patterns, files),
                Err(err) => log::warn!("skipping unreadable directory {}: {err}", path.display()),
            }
        } else if path.is_file() {
            let rel = match path.strip_prefix(root) {
                Ok(r) => r.to_path_buf(),
                Err(_) => continue,
            };
            if patterns.iter().any(|p| p.matches_path(&rel)) {
                files.push(rel);
            }
        }
    }
}
