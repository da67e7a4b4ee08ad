// Health report rendering: fixed-width table or JSON records
use crate::core::health::types::{HealthVerdict, TargetReport};
use crate::ui::utils::{fit_column, mask_token, pad_column, paint, Tone};
use serde::Serialize;

const NAME_WIDTH: usize = 18;
const URL_WIDTH: usize = 30;
const TOKEN_WIDTH: usize = 12;
const STATUS_WIDTH: usize = 23;
const LATENCY_WIDTH: usize = 8;

/// Serializable per-target record for `--json`; the token is masked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthRecord {
    pub name: String,
    pub base_url: String,
    pub token: String,
    /// "healthy" | "unhealthy" | "cancelled"
    pub status: String,
    pub status_code: Option<u16>,
    pub latency_ms: Option<u64>,
    pub endpoint: Option<String>,
    pub error: Option<String>,
    pub tried: Vec<String>,
}

impl From<&TargetReport> for HealthRecord {
    fn from(report: &TargetReport) -> Self {
        let target = report.target();
        let base = HealthRecord {
            name: target.name.clone(),
            base_url: target.base_url.clone(),
            token: mask_token(&target.auth_token),
            status: "cancelled".to_string(),
            status_code: None,
            latency_ms: None,
            endpoint: None,
            error: None,
            tried: Vec::new(),
        };

        match report.verdict() {
            None => base,
            Some(verdict) => HealthRecord {
                status: if verdict.healthy { "healthy" } else { "unhealthy" }.to_string(),
                status_code: verdict.status_code(),
                latency_ms: verdict.latency_ms(),
                endpoint: Some(verdict.endpoint_label()),
                error: verdict.error().map(|e| e.to_string()),
                tried: verdict.tried_specs.iter().map(|s| s.label()).collect(),
                ..base
            },
        }
    }
}

/// Renders health reports for the terminal
pub struct HealthTableRenderer {
    color: bool,
}

impl HealthTableRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn header(&self) -> String {
        let title = format!(
            "| {} | {} | {} | {} | {} |",
            fit_column("Name", NAME_WIDTH),
            fit_column("Base URL", URL_WIDTH),
            fit_column("Token", TOKEN_WIDTH),
            fit_column("Status", STATUS_WIDTH),
            fit_column("Latency", LATENCY_WIDTH),
        );
        let rule = format!(
            "|{}|{}|{}|{}|{}|",
            "-".repeat(NAME_WIDTH + 2),
            "-".repeat(URL_WIDTH + 2),
            "-".repeat(TOKEN_WIDTH + 2),
            "-".repeat(STATUS_WIDTH + 2),
            "-".repeat(LATENCY_WIDTH + 2),
        );
        format!("{}\n{}", paint(Tone::Bold, &title, self.color), rule)
    }

    /// Table row plus detail lines (chosen endpoint, error) for one report
    pub fn render_report(&self, report: &TargetReport) -> String {
        let target = report.target();
        let (status_text, tone, latency) = match report.verdict() {
            Some(verdict) => (
                status_text(verdict),
                status_tone(verdict.status_code()),
                latency_text(verdict.latency_ms()),
            ),
            None => ("Cancelled".to_string(), Tone::Yellow, "N/A".to_string()),
        };

        let mut out = format!(
            "| {} | {} | {} | {} | {} |",
            fit_column(&target.name, NAME_WIDTH),
            fit_column(&target.base_url, URL_WIDTH),
            fit_column(&mask_token(&target.auth_token), TOKEN_WIDTH),
            paint(tone, &pad_column(&status_text, STATUS_WIDTH), self.color),
            fit_column(&latency, LATENCY_WIDTH),
        );

        if let Some(verdict) = report.verdict() {
            out.push('\n');
            out.push_str(&paint(
                Tone::Cyan,
                &format!("  Endpoint: {}", verdict.endpoint_label()),
                self.color,
            ));
            if let Some(detail) = failure_detail(verdict) {
                out.push('\n');
                out.push_str(&paint(Tone::Gray, &format!("  Error: {}", detail), self.color));
            }
        }
        out
    }

    pub fn render_all(&self, reports: &[TargetReport]) -> String {
        let mut lines = vec![self.header()];
        lines.extend(reports.iter().map(|r| self.render_report(r)));
        lines.join("\n")
    }

    pub fn render_json(reports: &[TargetReport]) -> Result<String, serde_json::Error> {
        let records: Vec<HealthRecord> = reports.iter().map(HealthRecord::from).collect();
        serde_json::to_string_pretty(&records)
    }
}

impl Default for HealthTableRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// "Healthy (status: 200)" / "Unhealthy (status: N/A)"
pub fn status_text(verdict: &HealthVerdict) -> String {
    let code = verdict
        .status_code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let health = if verdict.healthy { "Healthy" } else { "Unhealthy" };
    format!("{} (status: {})", health, code)
}

/// Why an unhealthy verdict failed: the probe error, or the server fault status
pub fn failure_detail(verdict: &HealthVerdict) -> Option<String> {
    if verdict.healthy {
        return None;
    }
    let outcome = verdict.chosen_outcome.as_ref()?;
    match &outcome.error {
        Some(error) => Some(error.to_string()),
        None if outcome.is_server_fault() => {
            Some(format!("server error (HTTP {})", outcome.status_code?))
        }
        None => None,
    }
}

/// Green for 2xx, red for 4xx/5xx, yellow otherwise (including no status)
pub fn status_tone(status_code: Option<u16>) -> Tone {
    match status_code {
        Some(200..=299) => Tone::Green,
        Some(code) if code >= 400 => Tone::Red,
        _ => Tone::Yellow,
    }
}

pub fn latency_text(latency_ms: Option<u64>) -> String {
    latency_ms
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "N/A".to_string())
}
