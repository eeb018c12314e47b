use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn kbase(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kbase").unwrap();
    cmd.env("KBASE_CONFIG", dir.path().join("config.toml"))
        .env("KBASE_DATA_DIR", dir.path().join("data"))
        .arg("--no-color");
    cmd
}

fn write_doc(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("doc.md");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn render_html_excludes_copy_controls() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, "# Title\n\n```js\nconst x=1;\n```\n");

    kbase(&dir)
        .arg("render")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Title</h1>"))
        .stdout(predicate::str::contains("language-js"))
        .stdout(predicate::str::contains("copy-button").not());

    kbase(&dir)
        .args(["render", "--with-controls"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("copy-button"));
}

#[test]
fn copy_print_plain_strips_fences() {
    let dir = TempDir::new().unwrap();
    let doc = write_doc(&dir, "Intro **bold**\n\n```sh\nrm -rf /\n```\nOutro\n");

    kbase(&dir)
        .args(["copy", "--mode", "plain", "--print"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("rm -rf").not())
        .stdout(predicate::str::contains("Outro"));
}

#[test]
fn copy_print_original_is_verbatim() {
    let dir = TempDir::new().unwrap();
    let source = "# A\n\n* b  \n* c\n";
    let doc = write_doc(&dir, source);

    kbase(&dir)
        .args(["copy", "--print"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(source);
}

#[test]
fn layout_prints_media_queries() {
    let dir = TempDir::new().unwrap();
    kbase(&dir)
        .args(["layout", "--direction", "column,row", "--gap", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flex-direction: column;"))
        .stdout(predicate::str::contains("@media (min-width: 576px)"))
        .stdout(predicate::str::contains("gap: 8px;"));
}

#[test]
fn layout_rejects_unknown_keyword() {
    let dir = TempDir::new().unwrap();
    kbase(&dir)
        .args(["layout", "--justify", "middle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn theme_set_and_show() {
    let dir = TempDir::new().unwrap();
    kbase(&dir).args(["theme", "set", "dark"]).assert().success();
    kbase(&dir)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dark"));
    kbase(&dir).args(["theme", "toggle"]).assert().success();
    kbase(&dir)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("light"));
}

#[test]
fn docs_json_lists_categories() {
    let dir = TempDir::new().unwrap();
    kbase(&dir)
        .args(["docs", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"documents\""));
}

#[test]
fn tools_lists_showcase_and_links_layout() {
    let dir = TempDir::new().unwrap();
    kbase(&dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("/tools/layout/flex"))
        .stdout(predicate::str::contains("kbase layout"));

    kbase(&dir)
        .args(["tools", "/tools/layout/flex", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\": \"layout\""));

    kbase(&dir)
        .args(["tools", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown component"));
}

#[test]
fn config_reset_and_show() {
    let dir = TempDir::new().unwrap();
    kbase(&dir)
        .args(["config", "reset", "--force"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    kbase(&dir)
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"plain_text_policy\""));
}
