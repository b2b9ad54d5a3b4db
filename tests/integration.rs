use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_classdoc")));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- docs --

#[test]
fn docs_widget_matches_expected() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "-o", dir.path().to_str().unwrap()])
        .args(["-m", &fixture_path("widget_metadata.json")])
        .args(["--import-prefix", "pkg"])
        .arg(fixture_path("widget.py"))
        .assert()
        .success()
        .stderr(predicate::str::contains("uncategorized").not());

    let output = std::fs::read_to_string(dir.path().join("widget.md")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("widget.expected.md")).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn docs_without_metadata_keeps_source_order() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("widget.py"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("widget.md")).unwrap();
    let init = output.find("#### \\_\\_init\\_\\_").unwrap();
    let resize = output.find("#### resize").unwrap();
    let create = output.find("#### create").unwrap();
    assert!(init < resize && resize < create);
    assert!(!output.contains("### Sizing"));
    assert!(!output.contains("_layout"));
    assert!(!output.contains("import Widget"));
}

#[test]
fn docs_warns_on_uncategorized_function() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.json");
    std::fs::write(
        &metadata,
        r#"{"Widget": {"Constructor": {"functions": ["__init__"]}, "Sizing": {"functions": ["resize"]}}}"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    cmd()
        .args(["docs", "-o", out.to_str().unwrap()])
        .args(["-m", metadata.to_str().unwrap()])
        .arg(fixture_path("widget.py"))
        .assert()
        .success()
        .stderr(predicate::str::contains("uncategorized function Widget.create()"));

    let output = std::fs::read_to_string(out.join("widget.md")).unwrap();
    assert!(!output.contains("#### create"));
    assert!(output.contains("### Sizing"));
}

#[test]
fn docs_continues_past_missing_and_broken_inputs() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("broken.py"))
        .arg(fixture_path("does_not_exist.py"))
        .arg(fixture_path("widget.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("never closed"))
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("2 input(s) failed"));

    assert!(dir.path().join("widget.md").exists());
    assert!(!dir.path().join("broken.md").exists());
}

#[test]
fn docs_strict_rejects_second_class() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("two.py");
    std::fs::write(&src, "class A:\n    pass\n\n\nclass B:\n    pass\n").unwrap();
    let out = dir.path().join("out");

    cmd()
        .args(["docs", "--strict", "-o", out.to_str().unwrap()])
        .arg(src.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("second class `B`"));

    cmd()
        .args(["docs", "-o", out.to_str().unwrap()])
        .arg(src.to_str().unwrap())
        .assert()
        .success();
    let output = std::fs::read_to_string(out.join("two.md")).unwrap();
    assert!(output.contains("# A") && output.contains("# B"));
}

#[test]
fn docs_enum_table() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("color.py"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("color.md")).unwrap();
    assert!(output.contains("| Name | Value | Description |"));
    assert!(output.contains("| `RED` | `1` | Warm. |"));
    assert!(output.contains("| `BLUE` | `2` | Cold. |"));
}

#[test]
fn docs_json_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "-f", "json", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("widget.py"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("widget.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["classes"][0]["name"], "Widget");
    assert_eq!(value["classes"][0]["fields"][0]["name"], "id");
    assert_eq!(value["classes"][0]["functions"].as_array().unwrap().len(), 3);
}

#[test]
fn docs_package_reexports_import_from_package() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("gizmos"))
        .assert()
        .success();

    let gadget = std::fs::read_to_string(dir.path().join("gadget.md")).unwrap();
    assert!(gadget.contains("`from gizmos import Gadget`"));
    let helper = std::fs::read_to_string(dir.path().join("helper.md")).unwrap();
    assert!(helper.contains("`from gizmos.helper import Helper`"));
    assert!(!dir.path().join("__init__.md").exists());
}

#[test]
fn docs_explicit_prefix_wins_over_package_name() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "--import-prefix", "acme.gizmos", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("gizmos/gadget.py"))
        .assert()
        .success();

    let gadget = std::fs::read_to_string(dir.path().join("gadget.md")).unwrap();
    assert!(gadget.contains("`from acme.gizmos import Gadget`"));
}

#[test]
fn invalid_format_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["docs", "-f", "html", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("widget.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn invalid_metadata_fails() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.json");
    std::fs::write(
        &metadata,
        r#"{"Widget": {"One": {"functions": ["resize"]}, "Two": {"functions": ["resize"]}}}"#,
    )
    .unwrap();

    cmd()
        .args(["docs", "-o", dir.path().to_str().unwrap()])
        .args(["-m", metadata.to_str().unwrap()])
        .arg(fixture_path("widget.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("listed in both"));
}

// -- toc --

#[test]
fn toc_directory_with_override() {
    let assert = cmd()
        .args(["toc", "--link-prefix", "api", "--import-prefix", "pkg"])
        .args(["--override", "HttpClient=HTTPClient"])
        .arg(fixture_path("http_client.py"))
        .arg(fixture_path("widget.py"))
        .assert()
        .success()
        .stderr(predicate::str::contains("add an override").not());

    assert_eq!(
        stdout_of(&assert),
        "- [HTTPClient](api/http_client.md#httpclient) — `from pkg.http_client import HTTPClient`\n\
         - [Widget](api/widget.md#widget) — `from pkg.widget import Widget`\n"
    );
}

#[test]
fn toc_directory_warns_without_override() {
    cmd()
        .args(["toc"])
        .arg(fixture_path("http_client.py"))
        .assert()
        .success()
        .stdout(predicate::str::contains("- [HttpClient](http_client.md#httpclient)"))
        .stderr(predicate::str::contains("expected class HttpClient but found HTTPClient"));
}

#[test]
fn toc_single_document() {
    let assert = cmd()
        .args(["toc", "--doc", &fixture_path("widget.expected.md")])
        .assert()
        .success();

    let toc = stdout_of(&assert);
    assert!(toc.starts_with("- [Widget](#widget)\n  - [Class Variables](#class-variables)\n"));
    assert!(toc.contains("      - [__init__](#__init__)\n"));
    assert!(toc.contains("    - [Sizing](#sizing)\n"));
}

#[test]
fn toc_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("toc.md");

    cmd()
        .args(["toc", "-o", out.to_str().unwrap()])
        .arg(fixture_path("widget.py"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        std::fs::read_to_string(out).unwrap(),
        "- [Widget](widget.md#widget)\n"
    );
}

// -- inherit --

#[test]
fn inherit_merges_base_into_child() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["inherit", "-o", dir.path().to_str().unwrap()])
        .args(["--base", &fixture_path("shape.py")])
        .args(["--child", &fixture_path("circle.py")])
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("circle.md")).unwrap();
    assert!(output.starts_with("# Circle\n"));
    assert_eq!(output.matches("#### area").count(), 1);
    assert!(output.contains("Area of the circle."));
    assert!(!output.contains("Area of the shape."));
    assert!(output.contains("#### describe"));
    assert!(output.contains("- `radius` — Radius of the circle.\n- `name` — Display name."));
    assert!(output.contains("**`Circle.unit()`**"));
    assert!(!output.contains("Shape"));
}

#[test]
fn inherit_applies_child_metadata() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.json");
    std::fs::write(
        &metadata,
        r#"{"Circle": {"Constructor": {"functions": ["__init__"]}, "Info": {"functions": ["describe", "area"]}, "Ignore": {"functions": ["unit"]}}}"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    cmd()
        .args(["inherit", "-o", out.to_str().unwrap()])
        .args(["-m", metadata.to_str().unwrap()])
        .args(["--base", &fixture_path("shape.py")])
        .args(["--child", &fixture_path("circle.py")])
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN").not());

    let output = std::fs::read_to_string(out.join("circle.md")).unwrap();
    let info = output.find("### Info").unwrap();
    let describe = output.find("#### describe").unwrap();
    let area = output.find("#### area").unwrap();
    assert!(info < describe && describe < area);
    assert!(!output.contains("#### unit"));
}

#[test]
fn inherit_reports_broken_child_and_continues() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["inherit", "-o", dir.path().to_str().unwrap()])
        .args(["--base", &fixture_path("shape.py")])
        .args(["--child", &fixture_path("broken.py"), &fixture_path("circle.py")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("never closed"));

    assert!(dir.path().join("circle.md").exists());
}

// -- vars --

#[test]
fn vars_table() {
    let assert = cmd()
        .args(["vars", &fixture_path("settings.py")])
        .assert()
        .success();

    assert_eq!(
        stdout_of(&assert),
        "| Variable | Type | Value | Description |\n\
         | --- | --- | --- | --- |\n\
         | `RETRIES` | int | 3 | Number of retries before giving up. |\n\
         | `BASE_URL` |  | os.environ.get(\"BASE_URL\", \"http://localhost\") | Base URL of the service. |\n"
    );
}

#[test]
fn vars_missing_file_fails() {
    cmd()
        .args(["vars", &fixture_path("nope.py")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
