use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use super::*;
use crate::cli::{ExtractArgs, FillArgs, FillTuningArgs, TextBackend};
use crate::form::{FillConfig, FormAgent, HtmlDocument, LocatorTier, ordered_mappings};
use crate::model::FieldKey;

const FORM_PAGE: &str = r#"<html><body><form>
    <input id="name" type="text">
    <input id="gender" type="text">
    <input id="caste" type="text">
    <select id="religion"><option>Hindu</option><option>Other</option></select>
</form></body></html>"#;

fn quick_tuning() -> FillTuningArgs {
    FillTuningArgs {
        max_attempts: 1,
        retry_backoff_ms: 0,
        ready_poll_ms: 1,
        ready_timeout_ms: 5,
        email_domain: "nitresearchcenter.com".to_string(),
    }
}

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("fixture writes");
    path
}

#[test]
fn fill_writes_a_report_with_outcome_and_snapshot() {
    let dir = TempDir::new().expect("temp dir");
    let form = write_fixture(&dir, "form.html", FORM_PAGE);
    let record = write_fixture(
        &dir,
        "record.json",
        r#"{"name":"Meera Iyer","gender":"Female","religion":"hindu","complexion":"Fair"}"#,
    );
    let outcome_path = dir.path().join("reports").join("run.json");

    fill::run(FillArgs {
        form,
        record: Some(record),
        pdf: None,
        backend: TextBackend::Lopdf,
        output_root: dir.path().join("cache"),
        outcome_path: Some(outcome_path.clone()),
        tuning: quick_tuning(),
    })
    .expect("fill command succeeds on partial fills");

    let raw = fs::read(&outcome_path).expect("report exists");
    let report: serde_json::Value = serde_json::from_slice(&raw).expect("report is json");

    assert_eq!(report["status"], "partial");
    let filled = report["outcome"]["filled"]
        .as_array()
        .expect("filled is an array");
    assert!(filled.iter().any(|entry| entry["field"] == "name"));
    assert!(filled.iter().any(|entry| entry["field"] == "religion"));

    let controls = report["controls"].as_array().expect("controls is an array");
    assert!(
        controls
            .iter()
            .any(|control| control["id"] == "religion" && control["value"] == "Hindu")
    );
}

#[test]
fn fill_rejects_an_unreadable_record() {
    let dir = TempDir::new().expect("temp dir");
    let form = write_fixture(&dir, "form.html", FORM_PAGE);
    let record = write_fixture(&dir, "record.json", "not json");

    let result = fill::run(FillArgs {
        form,
        record: Some(record),
        pdf: None,
        backend: TextBackend::Lopdf,
        output_root: dir.path().join("cache"),
        outcome_path: None,
        tuning: quick_tuning(),
    });

    assert!(result.is_err());
}

#[test]
fn extract_reports_malformed_pdfs_with_context() {
    let dir = TempDir::new().expect("temp dir");
    let pdf = write_fixture(&dir, "broken.pdf", "plain text, not a pdf");

    let error = extract::run(ExtractArgs {
        pdf,
        output_root: dir.path().join("cache"),
        record_path: None,
        manifest_path: None,
        backend: TextBackend::Lopdf,
    })
    .expect_err("malformed input fails");

    assert!(error.to_string().contains("failed to extract profile"));
    assert!(!dir.path().join("cache").join("records").exists());
}

#[test]
fn probe_report_lists_every_mapping_with_its_tier() {
    let mut agent = FormAgent::new(FillConfig::default());
    agent.attach(HtmlDocument::parse(FORM_PAGE).expect("form parses"));

    let report = probe::build_report(&agent, "form.html");
    assert!(report.ready);
    assert_eq!(report.control_count, 4);
    assert_eq!(report.fields.len(), ordered_mappings().len());

    let name = report
        .fields
        .iter()
        .find(|entry| entry.field == FieldKey::Name)
        .expect("name is probed");
    assert_eq!(name.tier, Some(LocatorTier::ExactId));
    assert_eq!(name.element_id.as_deref(), Some("name"));

    let religion = report
        .fields
        .iter()
        .find(|entry| entry.field == FieldKey::Religion)
        .expect("religion is probed");
    assert_eq!(religion.tier, Some(LocatorTier::Selector));
}

#[test]
fn probe_report_without_document_is_not_ready() {
    let agent = FormAgent::new(FillConfig::default());

    let report = probe::build_report(&agent, "missing.html");
    assert!(!report.ready);
    assert!(report.fields.is_empty());
}
