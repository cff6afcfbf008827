//! Integration tests for svq CLI.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn svq_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_svq"))
}

fn init_config(dir: &Path) -> PathBuf {
    let path = dir.join("sieve.toml");
    let output = svq_cmd()
        .args(["init"])
        .arg(&path)
        .output()
        .expect("failed to run svq init");
    assert!(output.status.success(), "svq init failed: {:?}", output);
    path
}

#[test]
fn test_parse_query_string() {
    let output = svq_cmd()
        .args(["parse", "page=2&pageSize=50"])
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Page:      2"));
    assert!(stdout.contains("Page size: 50"));
    assert!(stdout.contains("Sorts:     (none)"));
    assert!(stdout.contains("Filters:   (none)"));
}

#[test]
fn test_parse_url_input() {
    let output = svq_cmd()
        .args(["parse", "/items?page=3&sorts=-createdAt,price"])
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Page:      3"));
    assert!(stdout.contains("createdAt desc"));
    assert!(stdout.contains("price asc"));
}

#[test]
fn test_parse_shows_filters() {
    let output = svq_cmd()
        .args(["parse", "filters=name@=widget,price>=10"])
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name @= widget"));
    assert!(stdout.contains("(case-insensitive)"));
    assert!(stdout.contains("price >= 10"));
}

#[test]
fn test_parse_reports_errors_in_text() {
    let output = svq_cmd()
        .args(["parse", "page=0"])
        .output()
        .expect("failed to run parse");

    // parse always exits 0; errors are part of the report
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Page:      1"), "Should fall back to default page: {}", stdout);
    assert!(stdout.contains("Errors:"));
    assert!(stdout.contains("Invalid page value '0'. Pages are numbered from 1."));
}

#[test]
fn test_parse_json_format() {
    let output = svq_cmd()
        .args(["parse", "page=2&filters=name@=te", "--format", "json"])
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(v["query"]["page"], 2);
    assert_eq!(v["query"]["pageSize"], 20);
    assert_eq!(v["query"]["filters"][0]["field"], "name");
    assert_eq!(v["query"]["filters"][0]["operator"], "@=");
    assert_eq!(v["query"]["filters"][0]["value"], "te");
    assert_eq!(v["errors"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_parse_json_reports_errors() {
    let output = svq_cmd()
        .args(["parse", "pageSize=abc", "-f", "json"])
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(v["errors"][0]["kind"], "invalidPagination");
    assert_eq!(v["errors"][0]["field"], "pageSize");
    assert_eq!(v["query"]["pageSize"], 20);
}

#[test]
fn test_check_valid_query() {
    let output = svq_cmd()
        .args(["check", "page=2"])
        .output()
        .expect("failed to run check");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("OK: page 2 (size 20), 0 sort(s), 0 filter(s)"));
}

#[test]
fn test_check_invalid_query_exit_code() {
    let output = svq_cmd()
        .args(["check", "page=0"])
        .output()
        .expect("failed to run check");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "Should report error: {}", stderr);
    assert!(stderr.contains("Invalid page value '0'"));
}

#[test]
fn test_check_quiet_suppresses_ok_line() {
    let output = svq_cmd()
        .args(["check", "-q", "page=2"])
        .output()
        .expect("failed to run check");

    assert!(output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stdout).is_empty(),
        "Quiet mode should not produce output"
    );
}

#[test]
fn test_update_rewrites_page() {
    let output = svq_cmd()
        .args(["update", "/items?color=red&page=2", "--page", "3"])
        .output()
        .expect("failed to run update");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "/items?color=red&page=3"
    );
}

#[test]
fn test_update_encodes_filters() {
    let output = svq_cmd()
        .args(["update", "/items", "--filters", "price<=100"])
        .output()
        .expect("failed to run update");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "/items?filters=price%3C%3D100"
    );
}

#[test]
fn test_update_replaces_sorts() {
    let output = svq_cmd()
        .args(["update", "/items?page=2&sorts=price", "--sorts", "-createdAt"])
        .output()
        .expect("failed to run update");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "/items?page=2&sorts=-createdAt"
    );
}

#[test]
fn test_update_accepts_descending_only_sorts() {
    let output = svq_cmd()
        .args(["update", "/items", "--sorts", "-price,-createdAt"])
        .output()
        .expect("failed to run update");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "/items?sorts=-price,-createdAt"
    );
}

#[test]
fn test_init_writes_config() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("sieve.toml");

    let output = svq_cmd()
        .args(["init"])
        .arg(&path)
        .output()
        .expect("failed to run init");

    assert!(output.status.success());
    assert!(path.exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote starter configuration"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("default_page_size"), "Config body: {}", content);
    assert!(content.contains("sortable_fields"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    let path = init_config(tmp.path());

    let output = svq_cmd()
        .args(["init"])
        .arg(&path)
        .output()
        .expect("failed to run init");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"), "Should refuse overwrite: {}", stderr);
}

#[test]
fn test_init_force_overwrites() {
    let tmp = TempDir::new().unwrap();
    let path = init_config(tmp.path());

    let output = svq_cmd()
        .args(["init", "--force"])
        .arg(&path)
        .output()
        .expect("failed to run init with --force");

    assert!(output.status.success());
}

#[test]
fn test_config_drops_unsortable_field_with_warning() {
    let tmp = TempDir::new().unwrap();
    let path = init_config(tmp.path());

    let output = svq_cmd()
        .args(["parse", "sorts=color,-createdAt", "-c"])
        .arg(&path)
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Warnings:"));
    assert!(stdout.contains("Field 'color' is not sortable. Ignored."));
    // createdAt survives and comes out under its mapped name
    assert!(stdout.contains("created_at desc"), "Mapped sort missing: {}", stdout);
}

#[test]
fn test_config_applies_default_sort() {
    let tmp = TempDir::new().unwrap();
    let path = init_config(tmp.path());

    let output = svq_cmd()
        .args(["parse", "page=2", "-c"])
        .arg(&path)
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("created_at desc"), "Default sort missing: {}", stdout);
}

#[test]
fn test_config_rejects_disallowed_operator() {
    let tmp = TempDir::new().unwrap();
    let path = init_config(tmp.path());

    let output = svq_cmd()
        .args(["check", "filters=status>=5", "-c"])
        .arg(&path)
        .output()
        .expect("failed to run check");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Operator '>=' is not allowed for filter field 'status'."),
        "Unexpected stderr: {}", stderr
    );
}

#[test]
fn test_config_coerces_numeric_values() {
    let tmp = TempDir::new().unwrap();
    let path = init_config(tmp.path());

    let output = svq_cmd()
        .args(["parse", "filters=price>=10", "-f", "json", "-c"])
        .arg(&path)
        .output()
        .expect("failed to run parse");

    assert!(output.status.success());
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(v["query"]["filters"][0]["value"], 10.0);
}

#[test]
fn test_missing_config_file_errors() {
    let output = svq_cmd()
        .args(["parse", "page=2", "-c", "/nonexistent/sieve.toml"])
        .output()
        .expect("failed to run parse");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "Should report error: {}", stderr);
}

#[test]
fn test_operators_listing() {
    let output = svq_cmd()
        .args(["operators"])
        .output()
        .expect("failed to run operators");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TOKEN"));
    assert!(stdout.contains("=="));
    assert!(stdout.contains("!=null"));
    assert!(stdout.contains("case-insensitive"));
    assert!(stdout.contains("negated"));
}
