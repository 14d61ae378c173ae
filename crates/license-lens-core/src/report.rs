use std::fmt::Write;

use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::pipeline::DocumentAnalysis;
use crate::score::RiskBand;

/// Format styles supported in default reporter implementations.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Produce a report string from a `DocumentAnalysis` using the desired format.
pub fn render_report(outcome: &DocumentAnalysis, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => render_human(outcome),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport::from(outcome))?),
    }
}

fn render_human(outcome: &DocumentAnalysis) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "Risk Score: {:.1} ({:?})",
        outcome.score.total, outcome.score.band
    )?;

    if outcome.is_degraded() {
        let notice = outcome
            .notice
            .as_deref()
            .unwrap_or("model response could not be parsed");
        writeln!(out, "WARNING: analysis degraded ({notice})")?;
        writeln!(out, "The score above is computed from the fallback result and is not meaningful.")?;
    }

    writeln!(out)?;
    writeln!(out, "Score Breakdown:")?;
    writeln!(
        out,
        "  - Privacy Issues  : {:>5.1} ({} found)",
        outcome.score.privacy_score,
        outcome.analysis.privacy_issues().len()
    )?;
    writeln!(
        out,
        "  - Major Concerns  : {:>5.1} ({} found)",
        outcome.score.concerns_score,
        outcome.analysis.major_concern_count()
    )?;
    writeln!(
        out,
        "  - Data Misuse     : {:>5.1} ({} found)",
        outcome.score.misuse_score,
        outcome.analysis.data_misuse().len()
    )?;
    writeln!(
        out,
        "Total issues across scored categories: {}",
        outcome.analysis.total_issue_count()
    )?;

    write_section(&mut out, "Key Points", outcome.analysis.key_points())?;
    write_section(&mut out, "Privacy Issues", outcome.analysis.privacy_issues())?;
    write_section(&mut out, "Major Concerns", outcome.analysis.major_concerns())?;
    write_section(&mut out, "Data Misuse Risks", outcome.analysis.data_misuse())?;
    write_section(&mut out, "Advantages", outcome.analysis.advantages())?;
    write_section(&mut out, "Disadvantages", outcome.analysis.disadvantages())?;

    Ok(out)
}

fn write_section(out: &mut String, title: &str, entries: &[String]) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}:")?;
    if entries.is_empty() {
        writeln!(out, "  (none identified)")?;
    }
    for entry in entries {
        writeln!(out, "  - {}", sanitize_entry(entry))?;
    }
    Ok(())
}

fn sanitize_entry(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\n' | '\r' => ' ',
            _ => c,
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    risk_score: f32,
    risk_band: RiskBand,
    privacy_score: f32,
    concerns_score: f32,
    misuse_score: f32,
    total_issues: usize,
    major_concerns: usize,
    degraded: bool,
    notice: Option<&'a str>,
    analysis: &'a AnalysisResult,
}

impl<'a> From<&'a DocumentAnalysis> for JsonReport<'a> {
    fn from(outcome: &'a DocumentAnalysis) -> Self {
        Self {
            risk_score: outcome.score.total,
            risk_band: outcome.score.band,
            privacy_score: outcome.score.privacy_score,
            concerns_score: outcome.score.concerns_score,
            misuse_score: outcome.score.misuse_score,
            total_issues: outcome.analysis.total_issue_count(),
            major_concerns: outcome.analysis.major_concern_count(),
            degraded: outcome.is_degraded(),
            notice: outcome.notice.as_deref(),
            analysis: &outcome.analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalize;
    use crate::score;
    use serde_json::json;

    fn sample_outcome() -> DocumentAnalysis {
        let analysis = normalize(
            &json!({
                "key_points": ["Five year term"],
                "privacy_issues": ["Telemetry collection", "Data resale"],
                "major_concerns": ["Unilateral amendment"],
                "data_misuse": [],
                "advantages": ["Free updates"],
                "disadvantages": ["No warranty"]
            })
            .to_string(),
        );
        let score = score::score(&analysis);
        DocumentAnalysis {
            analysis,
            score,
            notice: None,
        }
    }

    fn degraded_outcome() -> DocumentAnalysis {
        let analysis = crate::analysis::AnalysisResult::sentinel();
        let score = score::score(&analysis);
        DocumentAnalysis {
            analysis,
            score,
            notice: Some("model invocation failed: connection refused".into()),
        }
    }

    #[test]
    fn human_report_contains_score_counts_and_sections() {
        let output = render_report(&sample_outcome(), OutputFormat::Human).unwrap();
        assert!(output.contains("Risk Score: 20.5 (Low)"));
        assert!(output.contains("Privacy Issues  :  40.0 (2 found)"));
        assert!(output.contains("Total issues across scored categories: 3"));
        assert!(output.contains("Telemetry collection"));
        assert!(output.contains("Data Misuse Risks:"));
        assert!(output.contains("(none identified)"));
        assert!(!output.contains("WARNING"));
    }

    #[test]
    fn degraded_report_flags_the_score() {
        let output = render_report(&degraded_outcome(), OutputFormat::Human).unwrap();
        assert!(output.contains("WARNING: analysis degraded"));
        assert!(output.contains("connection refused"));
        assert!(output.contains("not meaningful"));
    }

    #[test]
    fn json_report_serializes_score_and_counts() {
        let output = render_report(&sample_outcome(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["risk_score"], json!(20.5));
        assert_eq!(value["risk_band"], json!("low"));
        assert_eq!(value["total_issues"], json!(3));
        assert_eq!(value["major_concerns"], json!(1));
        assert_eq!(value["degraded"], json!(false));
        assert!(value["analysis"]["privacy_issues"].is_array());
    }

    #[test]
    fn json_report_carries_the_degradation_notice() {
        let output = render_report(&degraded_outcome(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["degraded"], json!(true));
        assert!(value["notice"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[test]
    fn multiline_entries_are_flattened_in_human_output() {
        let analysis = normalize(r#"{"key_points": ["line one\nline two"]}"#);
        let score = score::score(&analysis);
        let outcome = DocumentAnalysis {
            analysis,
            score,
            notice: None,
        };
        let output = render_report(&outcome, OutputFormat::Human).unwrap();
        assert!(output.contains("line one line two"));
    }
}
