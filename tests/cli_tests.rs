use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn versioned_files() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp = TempDir::new().expect("failed to create temp dir");

    let old = temp.child("old.c");
    old.write_str("int x=5;\nfoo(a,b)\nreturn x;\n")
        .expect("failed to write old file");
    let new = temp.child("new.c");
    new.write_str("int x = 5 ;\nfoo(a, b, c)\nreturn x;\n")
        .expect("failed to write new file");

    let old_path = old.path().to_path_buf();
    let new_path = new.path().to_path_buf();
    (temp, old_path, new_path)
}

fn linediff() -> Command {
    Command::cargo_bin("linediff").expect("binary should build")
}

#[rstest]
fn diff_reports_similarity_match(
    versioned_files: (TempDir, std::path::PathBuf, std::path::PathBuf),
) {
    let (_temp, old, new) = versioned_files;

    linediff()
        .args(["diff", "--plain"])
        .arg(&old)
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::eq("0:0\n1~1\n2:2\n"));
}

#[rstest]
fn diff_without_similarity_splits_modified_line(
    versioned_files: (TempDir, std::path::PathBuf, std::path::PathBuf),
) {
    let (_temp, old, new) = versioned_files;

    linediff()
        .args(["diff", "--plain", "--no-similarity"])
        .arg(&old)
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::eq("0:0\n1-\n1+\n2:2\n"));
}

#[rstest]
fn diff_without_normalization_sees_spacing_changes(
    versioned_files: (TempDir, std::path::PathBuf, std::path::PathBuf),
) {
    let (_temp, old, new) = versioned_files;

    // Raw keys differ on line 0 too, but the lines stay similar enough
    // for the fuzzy pass.
    linediff()
        .args(["diff", "--plain", "--no-normalize"])
        .arg(&old)
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::eq("0~0\n1~1\n2:2\n"));
}

#[rstest]
fn diff_appends_hash_when_requested(
    versioned_files: (TempDir, std::path::PathBuf, std::path::PathBuf),
) {
    let (_temp, old, new) = versioned_files;

    let first = linediff()
        .args(["diff", "--plain", "--hash"])
        .arg(&old)
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?m)^[0-9a-f]{40}$").unwrap());

    let first_output = first.get_output().stdout.clone();

    // Same inputs, same digest.
    linediff()
        .args(["diff", "--plain", "--hash"])
        .arg(&old)
        .arg(&new)
        .assert()
        .success()
        .stdout(predicate::eq(String::from_utf8(first_output).unwrap()));
}

#[rstest]
fn diff_rejects_out_of_range_threshold(
    versioned_files: (TempDir, std::path::PathBuf, std::path::PathBuf),
) {
    let (_temp, old, new) = versioned_files;

    linediff()
        .args(["diff", "--plain", "--threshold=1.5"])
        .arg(&old)
        .arg(&new)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[rstest]
fn diff_rejects_weights_not_summing_to_one(
    versioned_files: (TempDir, std::path::PathBuf, std::path::PathBuf),
) {
    let (_temp, old, new) = versioned_files;

    linediff()
        .args(["diff", "--plain", "--content-weight=0.9", "--context-weight=0.9"])
        .arg(&old)
        .arg(&new)
        .assert()
        .failure()
        .stderr(predicate::str::contains("weights must sum to 1"));
}

#[rstest]
fn diff_fails_on_missing_input() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let present = temp.child("present.txt");
    present.write_str("a\n").expect("failed to write file");

    linediff()
        .args(["diff", "--plain"])
        .arg(temp.path().join("missing.txt"))
        .arg(present.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[rstest]
fn diff_of_empty_files_prints_nothing() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let old = temp.child("old.txt");
    old.touch().expect("failed to create empty file");
    let new = temp.child("new.txt");
    new.touch().expect("failed to create empty file");

    linediff()
        .args(["diff", "--plain"])
        .arg(old.path())
        .arg(new.path())
        .assert()
        .success()
        .stdout(predicate::eq(""));
}
