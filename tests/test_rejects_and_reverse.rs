//! Integration test: reject files, exit statuses, and the reversed-patch
//! heuristic.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn rpatch(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rpatch"));
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_unplaceable_hunk_is_rejected_with_status_1() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("f.txt"), "real\ncontent\n").unwrap();
    fs::write(
        dir.path().join("bad.patch"),
        "--- f.txt\n+++ f.txt\n@@ -1,2 +1,2 @@\n nowhere\n-to be seen\n+at all\n",
    )
    .unwrap();

    rpatch(dir.path())
        .args(["-f", "f.txt", "bad.patch"])
        .assert()
        .code(1);
    // Target untouched, reject carries the hunk verbatim in context form.
    assert_eq!(
        fs::read_to_string(dir.path().join("f.txt")).unwrap(),
        "real\ncontent\n"
    );
    let rej = fs::read_to_string(dir.path().join("f.txt.rej")).unwrap();
    assert!(rej.starts_with("***************\n"), "{rej}");
    assert!(rej.contains("*** 1,2 ****"));
    assert!(rej.contains("  nowhere"));
    assert!(rej.contains("- to be seen"));
    assert!(rej.contains("+ at all"));
}

#[test]
fn test_partial_failure_keeps_good_hunks() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("p.txt"), "one\ntwo\nthree\n").unwrap();
    fs::write(
        dir.path().join("mix.patch"),
        "--- p.txt\n+++ p.txt\n@@ -1,1 +1,1 @@\n-one\n+ONE\n\
         @@ -9,1 +9,1 @@\n-missing\n+hunk\n",
    )
    .unwrap();

    rpatch(dir.path())
        .args(["-f", "p.txt", "mix.patch"])
        .assert()
        .code(1);
    assert_eq!(
        fs::read_to_string(dir.path().join("p.txt")).unwrap(),
        "ONE\ntwo\nthree\n"
    );
    assert!(dir.path().join("p.txt.rej").exists());
}

#[test]
fn test_reject_path_override() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("f.txt"), "x\n").unwrap();
    fs::write(
        dir.path().join("bad.patch"),
        "--- f.txt\n+++ f.txt\n@@ -1,1 +1,1 @@\n-zzz\n+yyy\n",
    )
    .unwrap();

    rpatch(dir.path())
        .args(["-f", "-r", "custom.rej", "f.txt", "bad.patch"])
        .assert()
        .code(1);
    assert!(dir.path().join("custom.rej").exists());
    assert!(!dir.path().join("f.txt.rej").exists());
}

#[test]
fn test_explicit_reverse_restores_original() {
    let dir = tempdir().unwrap();
    let patch = "--- r.txt\n+++ r.txt\n@@ -1,3 +1,3 @@\n keep\n-old\n+new\n keep2\n";
    fs::write(dir.path().join("r.patch"), patch).unwrap();

    fs::write(dir.path().join("r.txt"), "keep\nold\nkeep2\n").unwrap();
    rpatch(dir.path()).args(["r.txt", "r.patch"]).assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("r.txt")).unwrap(),
        "keep\nnew\nkeep2\n"
    );

    rpatch(dir.path())
        .args(["-R", "r.txt", "r.patch"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("r.txt")).unwrap(),
        "keep\nold\nkeep2\n"
    );
}

#[test]
fn test_reversed_patch_detected_and_confirmed() {
    // The target already carries the patch. Answering the -R question with
    // "y" un-applies it, and the second hunk follows the flipped
    // orientation without another question.
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("d.txt"), "NEW1\nmid\nmid2\nNEW2\n").unwrap();
    fs::write(
        dir.path().join("fwd.patch"),
        "--- d.txt\n+++ d.txt\n@@ -1,2 +1,2 @@\n-old1\n+NEW1\n mid\n\
         @@ -3,2 +3,2 @@\n mid2\n-old2\n+NEW2\n",
    )
    .unwrap();

    rpatch(dir.path())
        .args(["d.txt", "fwd.patch"])
        .write_stdin("y\n")
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("d.txt")).unwrap(),
        "old1\nmid\nmid2\nold2\n"
    );
}

#[test]
fn test_reversed_patch_rejected_under_force() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("d.txt"), "NEW\nmid\n").unwrap();
    fs::write(
        dir.path().join("fwd.patch"),
        "--- d.txt\n+++ d.txt\n@@ -1,2 +1,2 @@\n-old\n+NEW\n mid\n",
    )
    .unwrap();

    rpatch(dir.path())
        .args(["-f", "d.txt", "fwd.patch"])
        .assert()
        .code(1);
    assert_eq!(
        fs::read_to_string(dir.path().join("d.txt")).unwrap(),
        "NEW\nmid\n"
    );
    let rej = fs::read_to_string(dir.path().join("d.txt.rej")).unwrap();
    assert!(rej.contains("- old"), "{rej}");
}

#[test]
fn test_malformed_patch_exits_2() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("f.txt"), "a\n").unwrap();
    // Change hunk without its '---' separator.
    fs::write(dir.path().join("bad.patch"), "Index: f.txt\n1c1\n< a\n> b\n").unwrap();

    rpatch(dir.path()).args(["f.txt", "bad.patch"]).assert().code(2);
}

#[test]
fn test_no_patch_found_exits_2() {
    let dir = tempdir().unwrap();

    rpatch(dir.path())
        .write_stdin("hi,\nplease apply the attached\nthanks\n")
        .assert()
        .code(2);
}
