use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_codemod")))
}

fn write(dir: &TempDir, rel: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, text).unwrap();
    path
}

const THROWING: &str = "\
function load(path) {
  if (!path) {
    throw new Error(\"missing path\");
  }
  return data;
}
";

const OPTION_CHAIN: &str = "\
program
  .argument(\"<file>\", \"input file\")
  .option(\"-f, --force\", \"overwrite\")
  .action(run);
";

#[test]
fn cli_error_migration_rewrites_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "src/load.ts", THROWING);

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (1):"))
        .stdout(predicate::str::contains("src/load.ts"));

    let out = std::fs::read_to_string(&path).unwrap();
    assert!(out.contains("import { InternalError, Result } from \"@toolkit/result\";"), "got: {out}");
    assert!(out.contains("return Result.err(InternalError.create(\"missing path\"));"));
    assert!(out.contains("return Result.ok(data);"));
}

#[test]
fn cli_option_migration_rewrites_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "cli.ts", OPTION_CHAIN);

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (1):"));

    let out = std::fs::read_to_string(&path).unwrap();
    assert!(out.contains("import { z } from \"zod\";"), "got: {out}");
    assert!(out.contains("const optionsSchema = z.object({"));
    assert!(out.contains("file: z.string().describe(\"input file\"),"));
    assert!(out.contains("force: z.boolean().default(false).describe(\"overwrite\"),"));
    assert!(out.contains(".schema(optionsSchema)"));
    assert!(!out.contains(".option("));
}

#[test]
fn cli_dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.ts", THROWING);

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (1):"))
        .stdout(predicate::str::contains("a.ts"));

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        THROWING,
        "dry run must leave on-disk bytes identical"
    );
}

#[test]
fn cli_second_run_is_a_noop() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.ts", THROWING);
    write(&dir, "b.ts", OPTION_CHAIN);

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (2):"));

    let snapshot_a = std::fs::read_to_string(dir.path().join("a.ts")).unwrap();

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (0):"))
        .stdout(predicate::str::contains("skipped (2):"));

    assert_eq!(std::fs::read_to_string(dir.path().join("a.ts")).unwrap(), snapshot_a);
}

#[test]
fn cli_skips_complex_and_ignores_plain_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "plain.ts", "const x = 1;\n");
    write(
        &dir,
        "dynamic.ts",
        "names.forEach((name) => {\n  program.option(name, \"dynamic\");\n});\n",
    );

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (0):"))
        .stdout(predicate::str::contains("skipped (1):"))
        .stdout(predicate::str::contains("dynamic.ts"))
        .stdout(predicate::str::contains("plain.ts").not());
}

#[test]
fn cli_does_not_touch_ignored_directories() {
    let dir = TempDir::new().unwrap();
    let vendored = write(&dir, "node_modules/pkg/index.js", THROWING);

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (0):"));

    assert_eq!(std::fs::read_to_string(&vendored).unwrap(), THROWING);
}

#[test]
fn cli_missing_target_dir_is_fatal() {
    cmd()
        .args(["--target-dir", "/nonexistent/codemod-cli-test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read target directory"));
}

#[test]
fn cli_per_file_error_does_not_abort_the_run() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.ts"), [0xFF, 0xFE, 0x00, 0x01]).unwrap();
    write(&dir, "good.ts", THROWING);

    cmd()
        .args(["--target-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("changed (1):"))
        .stdout(predicate::str::contains("good.ts"))
        .stdout(predicate::str::contains("errors (1):"))
        .stdout(predicate::str::contains("bad.ts"));
}
