use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::analysis::{self, AnalysisResult};
use crate::extract::{self, ExtractionError};
use crate::llm::ModelClient;
use crate::prompt;
use crate::score::{self, RiskScore};

/// Everything the presentation layer needs for one document: the structured
/// analysis, its risk score, and the degradation notice when the model call
/// failed and the sentinel result was substituted.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub analysis: AnalysisResult,
    pub score: RiskScore,
    /// Underlying invocation-failure message, surfaced as a visible user
    /// notice rather than silently swallowed. `None` when the response was
    /// normalized (even if into the sentinel via a parse failure).
    pub notice: Option<String>,
}

impl DocumentAnalysis {
    /// True when the result is the fallback sentinel and the score computed
    /// from it should be suppressed or flagged rather than trusted.
    pub fn is_degraded(&self) -> bool {
        self.notice.is_some() || self.analysis.is_sentinel()
    }
}

/// Strictly sequential per-document pipeline: extraction, prompt
/// construction, model call, normalization, scoring. Stateless aside from
/// the configured client, so concurrent documents are independent runs.
pub struct Pipeline<C: ModelClient> {
    client: C,
}

impl<C: ModelClient> Pipeline<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Run the full pipeline on a PDF byte stream.
    ///
    /// Extraction failures abort: there is no sensible fallback without
    /// text. Everything downstream of extraction always completes.
    #[instrument(skip(self, pdf_bytes), fields(byte_len = pdf_bytes.len()))]
    pub async fn analyze_pdf(&self, pdf_bytes: &[u8]) -> Result<DocumentAnalysis, ExtractionError> {
        let text = extract::extract_text(pdf_bytes)?;
        Ok(self.analyze_text(&text).await)
    }

    /// Run the pipeline on already-extracted text. Infallible: invocation
    /// and parse failures degrade to the sentinel result, and a score is
    /// still produced from it. The model call is attempted even for empty
    /// text; the model is expected to report it cannot analyze such input.
    #[instrument(skip(self, document_text), fields(chars = document_text.len()))]
    pub async fn analyze_text(&self, document_text: &str) -> DocumentAnalysis {
        let prompt_text = prompt::build_prompt(document_text);

        let (analysis, notice) = match self.client.generate(&prompt_text).await {
            Ok(raw_response) => (analysis::normalize(&raw_response), None),
            Err(err) => {
                warn!(%err, "model invocation failed; degrading to sentinel analysis");
                (AnalysisResult::sentinel(), Some(err.to_string()))
            }
        };

        let score = score::score(&analysis);
        debug!(
            total = %score.total,
            band = ?score.band,
            degraded = notice.is_some(),
            "document analysis completed"
        );

        DocumentAnalysis {
            analysis,
            score,
            notice,
        }
    }
}
