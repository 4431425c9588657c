use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const CATALOG_YAML: &str = r#"flags:
  - name: help
    spellings: [-h, --help]
    help: print help
  - name: verbose
    spellings: [-v, --verbose]
    help: be verbose
  - name: output
    spellings: [-o, --output]
    help: output filename
    arity: one
  - name: number
    spellings: [-n, --number]
    help: numbers to sum
    arity: zero_or_more
"#;

fn write_catalog(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write catalog");
    path
}

fn argtally(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argtally"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run argtally")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_json_result() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, "flags.yaml", CATALOG_YAML);

    let output = argtally(&[
        "parse",
        "--catalog",
        path_str(&catalog),
        "--",
        "/usr/bin/tool",
        "-v",
        "--output=out.txt",
        "-n",
        "1",
        "2",
        "--",
        "-h",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["program"], "/usr/bin/tool");
    assert_eq!(value["flags"][0]["all"].as_array().unwrap().len(), 0);
    assert_eq!(value["flags"][1]["all"].as_array().unwrap().len(), 1);
    assert_eq!(value["flags"][2]["all"][0]["values"][0], "out.txt");
    assert_eq!(value["flags"][3]["all"][0]["values"], serde_json::json!(["1", "2"]));
    assert_eq!(value["positionals"], serde_json::json!(["-h"]));
}

#[test]
fn parse_prints_text_result() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, "flags.yml", CATALOG_YAML);

    let output = argtally(&[
        "parse",
        "--catalog",
        path_str(&catalog),
        "--format",
        "text",
        "prog",
        "-vo",
        "a.txt",
        "rest",
    ]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "program: prog\nverbose: 1\noutput: 1\n  [0] \"a.txt\"\npositionals:\n  \"rest\"\n"
    );
}

#[test]
fn parse_rejects_unknown_flag_with_status_2() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, "flags.yaml", CATALOG_YAML);

    let output = argtally(&["parse", "--catalog", path_str(&catalog), "--", "prog", "-x"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("found unexpected flag: -x"), "stderr: {stderr}");
}

#[test]
fn parse_reports_missing_argument() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, "flags.yaml", CATALOG_YAML);

    let output = argtally(&["parse", "--catalog", path_str(&catalog), "--", "prog", "-o"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("last option \"-o\" expects an argument"),
        "stderr: {stderr}"
    );
}

#[test]
fn parse_rejects_invalid_catalog_with_status_1() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(
        &dir,
        "bad.json",
        r#"{"flags": [{"name": "verbose", "spellings": ["verbose"]}]}"#,
    );

    let output = argtally(&["parse", "--catalog", path_str(&catalog), "--", "prog"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.json"));
}

#[test]
fn parse_logs_to_stderr_when_verbose() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, "flags.yaml", CATALOG_YAML);

    let output = argtally(&[
        "-v",
        "parse",
        "--catalog",
        path_str(&catalog),
        "--",
        "prog",
        "-v",
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Scanning argument vector"));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["flags"][1]["all"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_catalogs() {
    let dir = TempDir::new().unwrap();
    let yaml = write_catalog(&dir, "flags.yaml", CATALOG_YAML);
    let json = write_catalog(
        &dir,
        "pair.json",
        r#"{"flags": [{"name": "pair", "spellings": ["-p"], "arity": {"exactly": 2}}]}"#,
    );

    let output = argtally(&["validate", path_str(&yaml), path_str(&json)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4 flag(s) ok"));
    assert!(stdout.contains("Validated 2 catalog file(s)."));
}

#[test]
fn validate_reports_duplicate_spelling() {
    let dir = TempDir::new().unwrap();
    let good = write_catalog(&dir, "flags.yaml", CATALOG_YAML);
    let bad = write_catalog(
        &dir,
        "dup.yaml",
        "flags:\n  - name: verbose\n    spellings: [-v]\n  - name: version\n    spellings: [-v]\n",
    );

    let output = argtally(&["validate", path_str(&good), path_str(&bad)]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dup.yaml"), "stderr: {stderr}");
    assert!(stderr.contains("verbose") && stderr.contains("version"));
    assert!(stderr.contains("1 of 2 catalog file(s) failed validation"));
}

#[test]
fn validate_reports_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.yaml");

    let output = argtally(&["validate", path_str(&missing)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

#[test]
fn help_renders_catalog() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, "flags.yaml", CATALOG_YAML);

    let output = argtally(&[
        "help",
        "--catalog",
        path_str(&catalog),
        "--usage",
        "Usage: tool [options] ARG",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage: tool [options] ARG\n\n    -h, --help\n        print help\n"));
    assert!(stdout.ends_with("    -n, --number\n        numbers to sum\n"));
}
