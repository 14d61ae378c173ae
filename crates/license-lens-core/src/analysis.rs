use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Entry used for every field of the sentinel result. Downstream layers must
/// treat a sentinel as "analysis failed", never as "nothing found".
pub const SENTINEL_ENTRY: &str = "Error analyzing document";

/// Structured analysis of a single license agreement.
///
/// All six categories are always present; an empty sequence means "none
/// identified". Entries keep the insertion order of the model response and
/// the value is immutable once constructed: every field is reachable only
/// through read accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    key_points: Vec<String>,
    privacy_issues: Vec<String>,
    major_concerns: Vec<String>,
    data_misuse: Vec<String>,
    advantages: Vec<String>,
    disadvantages: Vec<String>,
}

impl AnalysisResult {
    /// Construct a result, trimming entries and dropping any that are empty
    /// after trimming. Order of the surviving entries is preserved.
    pub fn new(
        key_points: Vec<String>,
        privacy_issues: Vec<String>,
        major_concerns: Vec<String>,
        data_misuse: Vec<String>,
        advantages: Vec<String>,
        disadvantages: Vec<String>,
    ) -> Self {
        Self {
            key_points: clean_entries(key_points),
            privacy_issues: clean_entries(privacy_issues),
            major_concerns: clean_entries(major_concerns),
            data_misuse: clean_entries(data_misuse),
            advantages: clean_entries(advantages),
            disadvantages: clean_entries(disadvantages),
        }
    }

    /// Fixed fallback signalling that no analysis could be produced.
    pub fn sentinel() -> Self {
        let marker = || vec![SENTINEL_ENTRY.to_string()];
        Self {
            key_points: marker(),
            privacy_issues: marker(),
            major_concerns: marker(),
            data_misuse: marker(),
            advantages: marker(),
            disadvantages: marker(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }

    pub fn key_points(&self) -> &[String] {
        &self.key_points
    }

    pub fn privacy_issues(&self) -> &[String] {
        &self.privacy_issues
    }

    pub fn major_concerns(&self) -> &[String] {
        &self.major_concerns
    }

    pub fn data_misuse(&self) -> &[String] {
        &self.data_misuse
    }

    pub fn advantages(&self) -> &[String] {
        &self.advantages
    }

    pub fn disadvantages(&self) -> &[String] {
        &self.disadvantages
    }

    /// Issues across the three count-bearing categories.
    pub fn total_issue_count(&self) -> usize {
        self.privacy_issues.len() + self.major_concerns.len() + self.data_misuse.len()
    }

    pub fn major_concern_count(&self) -> usize {
        self.major_concerns.len()
    }
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_-]*\s*").expect("fence pattern compiles"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*$").expect("fence pattern compiles"));

/// Reasons a model response failed normalization. Internal only: callers of
/// [`normalize`] always receive a result, and these reasons surface purely
/// as diagnostics.
#[derive(Debug, Error)]
enum NormalizeError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("field `{0}` is not an array")]
    FieldNotAnArray(&'static str),
    #[error("field `{0}` contains a non-string element")]
    NonStringElement(&'static str),
}

/// Turn a raw model response into an [`AnalysisResult`]. Total: never fails.
///
/// A leading/trailing code fence is stripped even though the prompt forbids
/// one, the payload is parsed as a JSON object (retried with JSON5 for
/// almost-JSON output), and each of the six fields is validated
/// independently. Absent fields are empty sequences; any structural failure
/// degrades to the fixed sentinel result.
pub fn normalize(raw_response: &str) -> AnalysisResult {
    match parse_payload(raw_response) {
        Ok(result) => result,
        Err(err) => {
            warn!(%err, "model response failed normalization; falling back to sentinel result");
            AnalysisResult::sentinel()
        }
    }
}

fn parse_payload(raw_response: &str) -> Result<AnalysisResult, NormalizeError> {
    let payload = strip_fences(raw_response);
    let value: Value = match serde_json::from_str(&payload) {
        Ok(value) => value,
        Err(strict_err) => json5::from_str(&payload)
            .map_err(|_| NormalizeError::InvalidJson(strict_err.to_string()))?,
    };
    let object = value.as_object().ok_or(NormalizeError::NotAnObject)?;

    Ok(AnalysisResult::new(
        field_entries(object, "key_points")?,
        field_entries(object, "privacy_issues")?,
        field_entries(object, "major_concerns")?,
        field_entries(object, "data_misuse")?,
        field_entries(object, "advantages")?,
        field_entries(object, "disadvantages")?,
    ))
}

/// Strip a wrapping code fence (` ```json ... ``` `) if present, returning
/// the bare payload. Text without fences passes through with only outer
/// whitespace trimmed.
fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}

/// A field absent from the payload means the model judged the category
/// inapplicable and counts as empty; a field with the wrong shape is a
/// normalization failure.
fn field_entries(
    object: &Map<String, Value>,
    name: &'static str,
) -> Result<Vec<String>, NormalizeError> {
    let Some(value) = object.get(name) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or(NormalizeError::FieldNotAnArray(name))?;
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let text = item
            .as_str()
            .ok_or(NormalizeError::NonStringElement(name))?;
        entries.push(text.to_string());
    }
    Ok(entries)
}
