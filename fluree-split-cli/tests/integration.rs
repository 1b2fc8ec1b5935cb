use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{Builder, NamedTempFile, TempDir};

fn split_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("fluree-split");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("FLUREE_SPLIT_CONFIG");
    cmd
}

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut f = Builder::new().suffix(suffix).tempfile().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn turtle(n: usize) -> String {
    let mut s = String::from(
        "@prefix ex: <http://ex.org/> .\n@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\n",
    );
    for i in 0..n {
        s.push_str(&format!(
            "ex:p{i} foaf:name \"Name. {i}\" ;\n    foaf:knows [ foaf:name \"Friend {i}\" ] .\n"
        ));
    }
    s
}

const TRIG: &str = "\
PREFIX ex: <http://ex.org/>

ex:g1 { ex:a ex:p ex:b . ex:c ex:p ex:d }
ex:g2 { ex:e ex:p ex:f }
";

// ============================================================================
// Happy path tests
// ============================================================================

#[test]
fn version_flag() {
    split_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fluree-split"));
}

#[test]
fn help_flag() {
    split_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("independently parseable"))
        .stdout(predicate::str::contains("prefixes"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn prefixes_table() {
    let f = write_temp(".ttl", &turtle(3));
    split_cmd()
        .arg("prefixes")
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("foaf:"))
        .stdout(predicate::str::contains("<http://ex.org/>"))
        .stdout(predicate::str::contains("data starts at byte"));
}

#[test]
fn prefixes_json() {
    let f = write_temp(".ttl", &turtle(3));
    let out = split_cmd()
        .args(["prefixes", "--output", "json"])
        .arg(f.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["prefixes"]["ex"], "http://ex.org/");
    assert_eq!(json["truncated"], false);
}

#[test]
fn plan_is_contiguous() {
    let f = write_temp(".ttl", &turtle(200));
    let out = split_cmd()
        .args(["plan", "-n", "5", "--output", "json"])
        .arg(f.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let fragments = json["fragments"].as_array().unwrap();
    assert_eq!(fragments.len(), 5);
    for pair in fragments.windows(2) {
        assert_eq!(pair[0]["adjusted"]["end"], pair[1]["adjusted"]["start"]);
    }
}

#[test]
fn read_range_as_nquads() {
    let f = write_temp(".ttl", &turtle(4));
    split_cmd()
        .arg("read")
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<http://ex.org/p0> <http://xmlns.com/foaf/0.1/name> \"Name. 0\" .",
        ));
}

#[test]
fn read_trig_datasets_as_json() {
    let f = write_temp(".trig", TRIG);
    let out = split_cmd()
        .args(["read", "--record", "dataset", "--output", "json"])
        .arg(f.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["kind"], "dataset");
    assert_eq!(lines[0]["statements"].as_array().unwrap().len(), 2);
}

#[test]
fn run_matches_single_read() {
    let f = write_temp(".ttl", &turtle(300));

    let whole = split_cmd()
        .arg("read")
        .arg(f.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let split = split_cmd()
        .args(["run", "-n", "7", "-j", "3", "--output", "nquads"])
        .arg(f.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(whole, split);
    assert_eq!(String::from_utf8(split).unwrap().lines().count(), 1200);
}

#[test]
fn run_summary_totals() {
    let f = write_temp(".ttl", &turtle(50));
    split_cmd()
        .args(["run", "-n", "4"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 200 records, 200 statements"));
}

#[test]
fn full_file_prefixes_follow_redeclaration() {
    let mut text = String::from("@prefix ex: <http://one.org/> .\n");
    for i in 0..50 {
        text.push_str(&format!("ex:a{i} ex:p ex:b{i} .\n"));
    }
    text.push_str("@prefix ex: <http://two.org/> .\n");
    for i in 0..50 {
        text.push_str(&format!("ex:c{i} ex:p ex:d{i} .\n"));
    }
    let f = write_temp(".ttl", &text);

    let out = split_cmd()
        .args(["run", "-n", "5", "--full-file-prefixes", "--output", "nquads"])
        .arg(f.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.lines().count(), 100);
    assert!(out.lines().take(50).all(|l| l.starts_with("<http://one.org/a")));
    assert!(out.lines().skip(50).all(|l| l.starts_with("<http://two.org/c")));
}

#[test]
fn config_file_is_applied() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("split.toml");
    std::fs::write(&config, "probe_statements = 3\n\n[turtle]\nmax_prefix_scan_bytes = 4096\n")
        .unwrap();

    split_cmd()
        .arg("--config")
        .arg(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("probe_statements = 3"))
        .stdout(predicate::str::contains("max_prefix_scan_bytes = 4096"));
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn verbose_quiet_conflict() {
    split_cmd()
        .args(["--verbose", "--quiet", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_file() {
    split_cmd()
        .args(["prefixes", "/nonexistent/data.ttl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn unknown_extension_is_usage_error() {
    let f = write_temp(".nt", "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .\n");
    split_cmd()
        .arg("plan")
        .arg(f.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--format"));
}

#[test]
fn unsupported_record_is_usage_error() {
    let f = write_temp(".ttl", &turtle(2));
    split_cmd()
        .args(["read", "--record", "quad"])
        .arg(f.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("do not produce quad records"));
}

#[test]
fn degraded_window_fails_the_run() {
    let mut text = String::from("@prefix ex: <http://ex.org/> .\n@prefix ex2: <http://ex2.org/> .\n");
    for i in 0..100 {
        text.push_str(&format!("ex:a{i} ex:p ex:b{i} .\n"));
    }
    for i in 0..100 {
        text.push_str(&format!("ex2:a{i} ex2:p ex2:b{i} .\n"));
    }
    let f = write_temp(".ttl", &text);

    split_cmd()
        .args(["run", "-n", "4", "--prefix-scan-bytes", "40"])
        .arg(f.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("fragment"))
        .stderr(predicate::str::contains("Undefined prefix 'ex2:'"));

    split_cmd()
        .args(["run", "-n", "4", "--prefix-scan-bytes", "40", "--full-file-prefixes"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 200 records"));
}

#[test]
fn invalid_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("bad.toml");
    std::fs::write(&config, "read_buffer_bytes = 0\n").unwrap();
    let f = write_temp(".ttl", &turtle(1));

    split_cmd()
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg(f.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read_buffer_bytes"));
}
