use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Content root with one draft, one public page and a non-content file.
fn create_content() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("blog")).unwrap();

    fs::write(
        root.join("blog").join("hello.md"),
        "---\ntitle: Hello World\npublished: false\n---\n\nHello\n",
    )
    .unwrap();
    fs::write(
        root.join("about.md"),
        "---\ntitle: About\npublished: true\nslug: about\n---\n\nAbout us\n",
    )
    .unwrap();
    fs::write(root.join("notes.txt"), "not content").unwrap();

    temp_dir
}

fn prepublish(source: &Path) -> Command {
    let mut cmd = Command::cargo_bin("prepublish").unwrap();
    cmd.arg("--source").arg(source).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("prepublish").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("gen-config"));
}

#[test]
fn test_gen_config_prints_stock_file() {
    let mut cmd = Command::cargo_bin("prepublish").unwrap();
    cmd.arg("gen-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[slugs]"))
        .stdout(predicate::str::contains("unpublished_prefix = \"___UNPUBLISHED___\""))
        .stdout(predicate::str::contains("extensions = [\"md\", \"markdown\"]"));
}

#[test]
fn test_resolve_rewrites_draft() {
    let content = create_content();

    prepublish(content.path())
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("001 About"))
        .stdout(predicate::str::contains("002 Hello World"))
        .stdout(predicate::str::contains("State: pre-published, rewritten"))
        .stdout(predicate::str::contains(
            "Resolved 2 documents: 1 pre-published, 1 rewritten",
        ));

    let draft = fs::read_to_string(content.path().join("blog/hello.md")).unwrap();
    assert!(
        predicate::str::is_match(r"slugs:\n- ___UNPUBLISHED___[0-9a-z]+_[A-Za-z0-9]{32}\n")
            .unwrap()
            .eval(&draft)
    );
    assert!(draft.ends_with("---\n\nHello\n"));
}

#[test]
fn test_resolve_twice_is_stable() {
    let content = create_content();

    prepublish(content.path()).arg("resolve").assert().success();
    let after_first = fs::read_to_string(content.path().join("blog/hello.md")).unwrap();

    prepublish(content.path())
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 pre-published, 0 rewritten"));
    let after_second = fs::read_to_string(content.path().join("blog/hello.md")).unwrap();
    assert_eq!(after_first, after_second);
}

#[test]
fn test_check_does_not_modify_files() {
    let content = create_content();
    let draft_path = content.path().join("blog/hello.md");
    let before = fs::read_to_string(&draft_path).unwrap();

    prepublish(content.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("State: pre-published, would rewrite"))
        .stdout(predicate::str::contains(
            "Checked 2 documents: 1 pre-published, 1 to rewrite",
        ));

    assert_eq!(fs::read_to_string(&draft_path).unwrap(), before);
}

#[test]
fn test_resolve_single_file() {
    let content = create_content();

    prepublish(content.path())
        .arg("resolve")
        .arg(content.path().join("about.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Slug: about"))
        .stdout(predicate::str::contains("Resolved 1 document: 0 pre-published"));
}

#[test]
fn test_json_output() {
    let content = create_content();

    let assert = prepublish(content.path())
        .arg("--json")
        .arg("check")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["summary"]["documents"], 2);
    assert_eq!(json["summary"]["pre_published"], 1);
    assert_eq!(json["documents"][0]["title"], "About");
    assert_eq!(json["documents"][1]["published"], false);
}

#[test]
fn test_config_prefix_is_used() {
    let content = create_content();
    fs::write(
        content.path().join("prepublish.toml"),
        "[slugs]\nunpublished_prefix = \"draft-\"\nrandom_length = 8\n",
    )
    .unwrap();

    prepublish(content.path())
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Slug: draft-[0-9a-z]+_[A-Za-z0-9]{8}\n").unwrap());
}

#[test]
fn test_invalid_config_fails() {
    let content = create_content();
    fs::write(
        content.path().join("prepublish.toml"),
        "[slugs]\nrandom_length = 0\n",
    )
    .unwrap();

    prepublish(content.path())
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("random_length"));
}

#[test]
fn test_missing_target_fails() {
    let content = create_content();

    prepublish(content.path())
        .arg("resolve")
        .arg(content.path().join("missing.md"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.md"));
}

#[test]
fn test_malformed_header_fails() {
    let content = create_content();
    fs::write(content.path().join("broken.md"), "---\n- just\n- a list\n---\nBody").unwrap();

    prepublish(content.path())
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.md"));
}
