pub mod analysis;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod score;

pub use analysis::{normalize, AnalysisResult};
pub use extract::{extract_text, ExtractionError};
pub use llm::{client_from_settings, CannedModelClient, GeminiClient, ModelClient,
    ModelInvocationError, ModelSettings};
pub use pipeline::{DocumentAnalysis, Pipeline};
pub use prompt::{build_prompt, SCHEMA_VERSION};
pub use report::{render_report, OutputFormat};
pub use score::{score, score_with_thresholds, RiskBand, RiskScore, RiskThresholds};
