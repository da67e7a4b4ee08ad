//! Report rendering: masking, status text and JSON records

use ccswitch::core::health::{
    BackendTarget, HealthVerdict, ProbeError, ProbeOutcome, ProbeSpec, TargetReport,
};
use ccswitch::ui::health_table::{failure_detail, latency_text, status_text, status_tone};
use ccswitch::ui::utils::{mask_token, Tone};
use ccswitch::ui::HealthTableRenderer;

fn target() -> BackendTarget {
    BackendTarget::new("primary", "https://api.example.com", "sk-ant-secret-value")
}

fn verdict(outcome: ProbeOutcome) -> HealthVerdict {
    HealthVerdict {
        target: target(),
        healthy: outcome.ok(),
        tried_specs: vec![outcome.spec.clone()],
        chosen_outcome: Some(outcome),
    }
}

fn models_spec() -> ProbeSpec {
    ProbeSpec::get("/v1/models", "Claude Models API")
}

#[test]
fn test_mask_token() {
    assert_eq!(mask_token(""), "N/A");
    assert_eq!(mask_token("abc"), "****");
    assert_eq!(mask_token("sk-ant-"), "sk-ant-****");
    assert_eq!(mask_token("sk-ant-secret-value"), "sk-ant-****");
}

#[test]
fn test_status_text_and_tone() {
    let healthy = verdict(ProbeOutcome::from_status(models_spec(), 200, 42));
    assert_eq!(status_text(&healthy), "Healthy (status: 200)");

    let failed = verdict(ProbeOutcome::from_error(
        models_spec(),
        ProbeError::Timeout,
        Some(30_000),
    ));
    assert_eq!(status_text(&failed), "Unhealthy (status: N/A)");

    assert_eq!(status_tone(Some(204)), Tone::Green);
    assert_eq!(status_tone(Some(404)), Tone::Red);
    assert_eq!(status_tone(Some(503)), Tone::Red);
    assert_eq!(status_tone(Some(301)), Tone::Yellow);
    assert_eq!(status_tone(None), Tone::Yellow);

    assert_eq!(latency_text(Some(42)), "42ms");
    assert_eq!(latency_text(None), "N/A");
}

#[test]
fn test_render_healthy_row() {
    let renderer = HealthTableRenderer::new(false);
    let report = TargetReport::Completed(verdict(ProbeOutcome::from_status(models_spec(), 200, 42)));

    let out = renderer.render_report(&report);

    assert!(out.contains("primary"));
    assert!(out.contains("sk-ant-****"));
    assert!(!out.contains("secret"));
    assert!(out.contains("Healthy (status: 200)"));
    assert!(out.contains("42ms"));
    assert!(out.contains("Endpoint: /v1/models (Claude Models API)"));
    assert!(!out.contains("Error:"));
}

#[test]
fn test_render_unhealthy_row_shows_error() {
    let renderer = HealthTableRenderer::new(false);
    let report = TargetReport::Completed(verdict(ProbeOutcome::from_error(
        models_spec(),
        ProbeError::Network("connection refused".to_string()),
        Some(3),
    )));

    let out = renderer.render_report(&report);

    assert!(out.contains("Unhealthy (status: N/A)"));
    assert!(out.contains("  Error: connection refused"));
}

#[test]
fn test_render_server_fault_row_keeps_status() {
    let renderer = HealthTableRenderer::new(false);
    let report = TargetReport::Completed(verdict(ProbeOutcome::from_status(models_spec(), 503, 10)));

    let out = renderer.render_report(&report);

    assert!(out.contains("Unhealthy (status: 503)"), "row: {}", out);
    assert!(out.contains("  Error: server error (HTTP 503)"));
    assert!(out.contains("10ms"));
}

#[test]
fn test_status_column_stays_aligned() {
    let renderer = HealthTableRenderer::new(false);
    let healthy = TargetReport::Completed(verdict(ProbeOutcome::from_status(models_spec(), 200, 5)));
    let faulty = TargetReport::Completed(verdict(ProbeOutcome::from_status(models_spec(), 503, 5)));

    let header = renderer.header();
    let healthy_row = renderer.render_report(&healthy);
    let faulty_row = renderer.render_report(&faulty);

    let width = |s: &str| s.lines().next().unwrap().chars().count();
    assert_eq!(width(&header), width(&healthy_row));
    assert_eq!(width(&header), width(&faulty_row));
}

#[test]
fn test_failure_detail() {
    let healthy = verdict(ProbeOutcome::from_status(models_spec(), 404, 5));
    assert_eq!(failure_detail(&healthy), None);

    let faulty = verdict(ProbeOutcome::from_status(models_spec(), 500, 5));
    assert_eq!(
        failure_detail(&faulty).as_deref(),
        Some("server error (HTTP 500)")
    );

    let timed_out = verdict(ProbeOutcome::from_error(models_spec(), ProbeError::Timeout, Some(30_000)));
    assert_eq!(failure_detail(&timed_out).as_deref(), Some("timeout"));

    let empty = HealthVerdict {
        target: target(),
        healthy: false,
        chosen_outcome: None,
        tried_specs: Vec::new(),
    };
    assert_eq!(failure_detail(&empty), None);
}

#[test]
fn test_render_cancelled_row() {
    let renderer = HealthTableRenderer::new(false);
    let report = TargetReport::Cancelled { target: target() };

    let out = renderer.render_report(&report);

    assert!(out.contains("Cancelled"));
    assert!(!out.contains("Endpoint:"));
}

#[test]
fn test_long_values_are_truncated() {
    let renderer = HealthTableRenderer::new(false);
    let long = BackendTarget::new(
        "a-very-long-configuration-name",
        "https://a-very-long-hostname.example.com/some/prefix",
        "",
    );
    let report = TargetReport::Cancelled { target: long };

    let row = renderer.render_report(&report);

    assert!(row.contains("a-very-long-con..."));
    assert!(row.contains("https://a-very-long-hostnam..."));
    assert!(row.contains("N/A"));
}

#[test]
fn test_render_all_includes_header() {
    let renderer = HealthTableRenderer::new(false);
    let reports = vec![TargetReport::Cancelled { target: target() }];

    let out = renderer.render_all(&reports);
    let mut lines = out.lines();

    let header = lines.next().unwrap();
    assert!(header.contains("Name"));
    assert!(header.contains("Base URL"));
    assert!(lines.next().unwrap().starts_with("|---"));
}

#[test]
fn test_json_records_mask_token() {
    let reports = vec![
        TargetReport::Completed(verdict(ProbeOutcome::from_status(models_spec(), 503, 10))),
        TargetReport::Cancelled { target: target() },
    ];

    let json = HealthTableRenderer::render_json(&reports).unwrap();
    assert!(!json.contains("secret"));

    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(records[0]["status"], "unhealthy");
    assert_eq!(records[0]["status_code"], 503);
    assert_eq!(records[0]["token"], "sk-ant-****");
    assert_eq!(records[0]["tried"][0], "/v1/models (Claude Models API)");
    assert_eq!(records[1]["status"], "cancelled");
    assert!(records[1]["status_code"].is_null());
}
