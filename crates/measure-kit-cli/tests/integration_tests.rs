//! Integration tests for the measure-kit CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("measure-kit").unwrap()
}

fn library_entry(name: &str, elm: Option<&str>, cql: Option<&str>) -> serde_json::Value {
    let mut content = Vec::new();
    if let Some(elm) = elm {
        content.push(serde_json::json!({
            "contentType": "application/elm+json",
            "data": BASE64.encode(elm),
        }));
    }
    if let Some(cql) = cql {
        content.push(serde_json::json!({
            "contentType": "text/cql",
            "data": BASE64.encode(cql),
        }));
    }
    serde_json::json!({
        "resource": {
            "resourceType": "Library",
            "url": format!("http://example.org/Library/{name}"),
            "name": name,
            "content": content,
        }
    })
}

fn measure_bundle(libraries: Vec<serde_json::Value>) -> serde_json::Value {
    let mut entry = vec![
        serde_json::json!({
            "resource": {
                "resourceType": "Measure",
                "name": "DiabetesMeasure",
                "library": ["http://example.org/Library/Main"],
            }
        }),
        serde_json::json!({
            "resource": {
                "resourceType": "ValueSet",
                "url": "http://example.org/ValueSet/diabetes",
                "version": "N/A",
                "expansion": {
                    "contains": [{
                        "system": "http://snomed.info/sct",
                        "code": "73211009",
                        "abstract": true,
                        "contains": [
                            { "system": "http://snomed.info/sct", "code": "44054006" },
                            { "system": "http://snomed.info/sct", "code": "46635009" }
                        ]
                    }]
                }
            }
        }),
    ];
    entry.extend(libraries);
    serde_json::json!({ "resourceType": "Bundle", "type": "collection", "entry": entry })
}

/// Write a measure and patient bundle into a fresh directory
fn create_test_inputs(bundle: serde_json::Value) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let measure = temp_dir.path().join("measure-bundle-in.json");
    let patient = temp_dir.path().join("patient-bundle-in.json");
    fs::write(&measure, bundle.to_string()).unwrap();
    fs::write(&patient, r#"{"resourceType":"Bundle","type":"collection"}"#).unwrap();
    (temp_dir, measure, patient)
}

fn default_bundle() -> serde_json::Value {
    measure_bundle(vec![
        library_entry("Main", Some("{\"main\":true}"), Some("define X: 1")),
        library_entry("Helper", Some("{}"), None),
    ])
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("measure-kit converts a FHIR measure bundle"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("measure-kit {VERSION}")))
        .stdout(predicate::str::contains("Build information:"));
}

#[test]
fn test_generate_writes_project() {
    let (temp_dir, measure, patient) = create_test_inputs(default_bundle());
    let output = temp_dir.path().join("cms-run");

    cli()
        .current_dir(temp_dir.path())
        .args(["--no-color", "generate", "-m"])
        .arg(&measure)
        .arg("-p")
        .arg(&patient)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution project generated"))
        .stdout(predicate::str::contains("Main.json"));

    assert!(output.join("elm/Main.json").exists());
    assert!(output.join("elm/Helper.json").exists());
    assert!(output.join("cql/Main.cql").exists());
    assert!(output.join("index.js").exists());
    assert!(output.join("patient-bundle.json").exists());
    assert!(output.join("measure-bundle.json").exists());

    let package: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("package.json")).unwrap()).unwrap();
    assert_eq!(package["name"], "cms-run");
    assert_eq!(package["dependencies"]["cql-execution"], "^2.4.4");

    let vs_map: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("vsmap.json")).unwrap()).unwrap();
    let codes = vs_map["http://example.org/ValueSet/diabetes"][""]
        .as_array()
        .unwrap();
    assert_eq!(codes.len(), 2);
    assert_eq!(codes[0]["code"], "44054006");
}

#[test]
fn test_generate_engine_version_flag() {
    let (temp_dir, measure, patient) = create_test_inputs(default_bundle());
    let output = temp_dir.path().join("beta");

    cli()
        .current_dir(temp_dir.path())
        .args(["generate", "--engine-version", "3.0.0-beta.x", "-m"])
        .arg(&measure)
        .arg("-p")
        .arg(&patient)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let package = fs::read_to_string(output.join("package.json")).unwrap();
    assert!(package.contains("^3.0.0-beta.3"));
}

#[test]
fn test_generate_uses_config_file() {
    let (temp_dir, measure, patient) = create_test_inputs(default_bundle());
    fs::write(
        temp_dir.path().join("measure-kit.json"),
        r#"{"output": "configured", "measurementPeriod": {"start": "2024-01-01", "end": "2024-12-31"}}"#,
    )
    .unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["generate", "-m"])
        .arg(&measure)
        .arg("-p")
        .arg(&patient)
        .assert()
        .success();

    let index_js = fs::read_to_string(temp_dir.path().join("configured/index.js")).unwrap();
    assert!(index_js.contains("2024-01-01"));
}

#[test]
fn test_generate_missing_elm_fails_without_output() {
    let bundle = measure_bundle(vec![
        library_entry("Main", Some("{}"), None),
        library_entry("NoElm", None, Some("define X: 1")),
    ]);
    let (temp_dir, measure, patient) = create_test_inputs(bundle);
    let output = temp_dir.path().join("out");

    cli()
        .current_dir(temp_dir.path())
        .args(["generate", "-m"])
        .arg(&measure)
        .arg("-p")
        .arg(&patient)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "ELM JSON not found on http://example.org/Library/NoElm",
        ));

    assert!(!output.exists());
}

#[test]
fn test_generate_empty_bundle_fails() {
    let (temp_dir, measure, patient) =
        create_test_inputs(serde_json::json!({ "resourceType": "Bundle", "entry": [] }));

    cli()
        .current_dir(temp_dir.path())
        .args(["generate", "-m"])
        .arg(&measure)
        .arg("-p")
        .arg(&patient)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Measure Bundle cannot be empty"));
}

#[test]
fn test_generate_requires_both_period_bounds() {
    cli()
        .args([
            "generate",
            "-m",
            "measure.json",
            "-p",
            "patient.json",
            "--period-start",
            "2023-01-01",
        ])
        .assert()
        .failure();
}

#[test]
fn test_valuesets_prints_index() {
    let (temp_dir, measure, _) = create_test_inputs(default_bundle());

    let assert = cli()
        .current_dir(temp_dir.path())
        .arg("valuesets")
        .arg(&measure)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let index: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let codes = index["http://example.org/ValueSet/diabetes"][""]
        .as_array()
        .unwrap();
    assert_eq!(codes.len(), 2);
    assert_eq!(codes[1]["code"], "46635009");
}

#[test]
fn test_inspect_summarizes_bundle() {
    let (temp_dir, measure, _) = create_test_inputs(default_bundle());

    cli()
        .current_dir(temp_dir.path())
        .args(["--no-color", "inspect"])
        .arg(&measure)
        .assert()
        .success()
        .stdout(predicate::str::contains("DiabetesMeasure"))
        .stdout(predicate::str::contains("Main"))
        .stdout(predicate::str::contains("Helper"))
        .stdout(predicate::str::contains("http://example.org/ValueSet/diabetes"))
        .stdout(predicate::str::contains("2 codes"));
}

#[test]
fn test_generate_completion() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("measure-kit"));
}
