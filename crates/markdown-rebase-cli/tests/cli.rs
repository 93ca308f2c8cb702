use std::fs;
use std::path::Path;

use assert_cmd::Command;
use markdown_rebase_core::ExitCode;
use predicates::prelude::*;
use tempfile::TempDir;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("markdown-rebase").expect("binary");
    cmd.env_remove("BASE_URL").env_remove("RUST_LOG");
    cmd
}

fn setup_file(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(path, contents).expect("write file");
}

fn docs_tree() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "README.md", "# Readme\n\n[Guide](guides/intro.md)\n");
    setup_file(
        temp.path(),
        "guides/intro.md",
        "# Intro\n\n[Back](../README.md) ![shot](img/shot.png)\n",
    );
    setup_file(temp.path(), "guides/done.md", "[abs](https://example.com)\n");
    temp
}

#[test]
fn converts_tree_into_sibling_files() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "https://x.com/docs/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ converted"))
        .stdout(predicate::str::contains("· no changes needed"))
        .stdout(predicate::str::contains(
            "Processed 3 file(s): 2 converted, 1 unchanged, 0 error(s)",
        ));

    let intro = fs::read_to_string(temp.path().join("guides/intro_converted.md")).unwrap();
    assert_eq!(
        intro,
        "# Intro\n\n[Back](https://x.com/docs/README.md) ![shot](https://x.com/docs/guides/img/shot.png)\n"
    );
    assert!(!temp.path().join("guides/done_converted.md").exists());
}

#[test]
fn dry_run_leaves_files_untouched() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "https://x.com/docs", "--dry-run", "--diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("→ would convert"))
        .stdout(predicate::str::contains("+[Guide](https://x.com/docs/guides/intro.md)"));

    assert!(!temp.path().join("README_converted.md").exists());
    assert_eq!(
        fs::read_to_string(temp.path().join("README.md")).unwrap(),
        "# Readme\n\n[Guide](guides/intro.md)\n"
    );
}

#[test]
fn overwrite_writes_in_place() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--repo", "hashicorp/vault", "--release", "main", "--overwrite"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("README.md")).unwrap(),
        "# Readme\n\n[Guide](https://github.com/hashicorp/vault/blob/main/guides/intro.md)\n"
    );
    assert!(!temp.path().join("README_converted.md").exists());
}

#[test]
fn base_url_falls_back_to_environment() {
    let temp = docs_tree();

    cargo_bin()
        .env("BASE_URL", "https://env.example/docs")
        .arg(temp.path().join("README.md"))
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("README_converted.md")).unwrap(),
        "# Readme\n\n[Guide](https://env.example/docs/guides/intro.md)\n"
    );
}

#[test]
fn invalid_repository_is_a_usage_error() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--repo", "invalidrepo", "--release", "main"])
        .assert()
        .failure()
        .code(ExitCode::Usage as i32)
        .stderr(predicate::str::contains("invalid repository format"));

    assert!(!temp.path().join("README_converted.md").exists());
}

#[test]
fn missing_base_url_is_a_usage_error() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .assert()
        .failure()
        .code(ExitCode::Usage as i32)
        .stderr(predicate::str::contains("no base URL available"));
}

#[test]
fn repo_requires_release() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--repo", "hashicorp/vault"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--release"));
}

#[test]
fn release_alone_is_ignored_in_favour_of_base_url() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path().join("README.md"))
        .args(["--release", "v1.0", "--base-url", "https://x.com/docs"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("README_converted.md")).unwrap(),
        "# Readme\n\n[Guide](https://x.com/docs/guides/intro.md)\n"
    );
}

#[test]
fn run_header_names_base_url_and_mode() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "https://x.com/docs/", "--overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processing files with base URL: https://x.com/docs\n",
        ))
        .stdout(predicate::str::contains("Root directory: "))
        .stdout(predicate::str::contains("Mode: Overwrite"))
        .stdout(predicate::str::contains("-".repeat(60)));
}

#[test]
fn overwrite_with_dry_run_warns_and_writes_nothing() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "https://x.com", "--dry-run", "--overwrite"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "--overwrite has no effect with --dry-run",
        ))
        .stdout(predicate::str::contains("DRY RUN - Root directory: "))
        .stdout(predicate::str::contains("Mode: Create new files"));

    assert_eq!(
        fs::read_to_string(temp.path().join("README.md")).unwrap(),
        "# Readme\n\n[Guide](guides/intro.md)\n"
    );
}

#[test]
fn path_prefix_base_url_is_accepted() {
    let temp = docs_tree();

    cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "/docs"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("guides/intro_converted.md")).unwrap(),
        "# Intro\n\n[Back](/docs/README.md) ![shot](/docs/guides/img/shot.png)\n"
    );
}

#[test]
fn missing_path_exits_with_not_found() {
    let temp = TempDir::new().expect("tempdir");

    cargo_bin()
        .arg(temp.path().join("nowhere"))
        .args(["--base-url", "https://x.com"])
        .assert()
        .failure()
        .code(ExitCode::NotFound as i32)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn empty_directory_reports_no_markdown() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "notes.txt", "[a](b.md)\n");

    cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "https://x.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No Markdown files found"));
}

#[test]
fn per_file_errors_are_counted_but_not_fatal() {
    let temp = docs_tree();
    fs::write(temp.path().join("guides/latin1.md"), [0x63, 0x61, 0x66, 0xe9]).unwrap();

    cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "https://x.com", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("✗ error processing"))
        .stdout(predicate::str::contains("1 error(s)"));
}

#[test]
fn json_summary_lists_each_file() {
    let temp = docs_tree();

    let output = cargo_bin()
        .arg(temp.path())
        .args(["--base-url", "https://x.com", "--json", "--dry-run"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout is a JSON document");
    assert_eq!(payload["dry_run"], true);
    assert_eq!(payload["processed"], 3);
    assert_eq!(payload["changed"], 2);
    let statuses: Vec<_> = payload["files"]
        .as_array()
        .expect("files array")
        .iter()
        .map(|file| file["status"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(statuses, vec!["rewritten", "unchanged", "rewritten"]);
}
