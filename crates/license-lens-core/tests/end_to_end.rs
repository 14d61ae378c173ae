use httpmock::prelude::*;
use license_lens_core::{
    normalize, render_report, score, CannedModelClient, GeminiClient, ModelSettings, OutputFormat,
    Pipeline, RiskBand,
};
use serde_json::json;

fn fenced_response() -> String {
    format!(
        "```json\n{}\n```",
        json!({
            "key_points": ["Subscription auto-renews annually"],
            "privacy_issues": ["Collects location data", "Shares data with partners",
                               "Retains data indefinitely", "Tracks usage patterns",
                               "Profiles users for advertising"],
            "major_concerns": ["Binding arbitration", "Class action waiver",
                               "Unilateral term changes", "No liability cap",
                               "Governing law unfavorable"],
            "data_misuse": ["Data sold to brokers", "Training on user content",
                            "Cross-service profiling", "No deletion guarantee"],
            "advantages": ["Cancellation allowed"],
            "disadvantages": ["No offline use"]
        })
    )
}

#[tokio::test]
async fn fenced_high_risk_response_flows_through_pipeline() {
    let pipeline = Pipeline::new(CannedModelClient::new(fenced_response()));
    let outcome = pipeline.analyze_text("lengthy agreement text").await;

    assert!(!outcome.is_degraded());
    assert_eq!(outcome.analysis.privacy_issues().len(), 5);
    assert!((outcome.score.total - 92.5).abs() < f32::EPSILON);
    assert_eq!(outcome.score.band, RiskBand::High);

    let report = render_report(&outcome, OutputFormat::Human).unwrap();
    assert!(report.contains("Risk Score: 92.5 (High)"));
    assert!(report.contains("Binding arbitration"));
}

#[test]
fn normalize_then_score_matches_direct_counts() {
    let analysis = normalize(&fenced_response());
    let risk = score(&analysis);
    assert!((risk.privacy_score - 100.0).abs() < f32::EPSILON);
    assert!((risk.concerns_score - 75.0).abs() < f32::EPSILON);
    assert!((risk.misuse_score - 100.0).abs() < f32::EPSILON);
}

#[tokio::test]
#[ignore = "requires loopback networking"]
async fn gemini_backed_pipeline_parses_a_mocked_analysis() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-test:generateContent")
            .query_param("key", "test-key");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": fenced_response()}]
                    }
                }]
            }));
    });

    let settings = ModelSettings {
        provider: "gemini".into(),
        api_key: "test-key".into(),
        endpoint: Some(server.base_url()),
        model: Some("gemini-test".into()),
        timeout_secs: Some(5),
    };
    let pipeline = Pipeline::new(GeminiClient::new(&settings).unwrap());
    let outcome = pipeline.analyze_text("agreement text").await;
    assert!((outcome.score.total - 92.5).abs() < f32::EPSILON);
}

#[tokio::test]
#[ignore = "requires loopback networking"]
async fn gemini_backend_failure_degrades_to_sentinel_score() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-test:generateContent");
        then.status(503).body("backend unavailable");
    });

    let settings = ModelSettings {
        provider: "gemini".into(),
        api_key: "test-key".into(),
        endpoint: Some(server.base_url()),
        model: Some("gemini-test".into()),
        timeout_secs: Some(5),
    };
    let pipeline = Pipeline::new(GeminiClient::new(&settings).unwrap());
    let outcome = pipeline.analyze_text("agreement text").await;

    assert!(outcome.analysis.is_sentinel());
    assert!(outcome.notice.as_deref().unwrap().contains("503"));
    assert!((outcome.score.total - 20.0).abs() < f32::EPSILON);
}
