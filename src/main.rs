//! Thin CLI over the transform engine: two flags, three result lists.

use anyhow::Result;
use clap::Parser;
use codemod::{transform, RunResult, TransformOptions};
use env_logger::Env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codemod",
    about = "Idiom-level source migrations: throw-based errors to Result values, option chains to schema fields"
)]
struct Cli {
    /// Root directory of the tree to migrate
    #[arg(long = "target-dir")]
    target_dir: PathBuf,

    /// Compute and report changes without writing any file
    #[arg(long = "dry-run")]
    dry_run: bool,
}

fn print_section(title: &str, entries: &[String]) {
    println!("{title} ({}):", entries.len());
    for entry in entries {
        println!("  {entry}");
    }
}

fn print_result(result: &RunResult) {
    print_section("changed", &result.changed_files);
    print_section("skipped", &result.skipped_files);
    print_section("errors", &result.errors);
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = transform(&TransformOptions {
        target_dir: cli.target_dir,
        dry_run: cli.dry_run,
    })?;
    print_result(&result);
    Ok(())
}
