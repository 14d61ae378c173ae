use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::AnalysisResult;

/// Points contributed per finding before saturation. Data misuse is the most
/// severe per occurrence, privacy issues accumulate fastest toward the cap,
/// and major concerns are the gentlest signal.
const PRIVACY_POINTS: f32 = 20.0;
const CONCERNS_POINTS: f32 = 15.0;
const MISUSE_POINTS: f32 = 25.0;

/// Aggregate weights. Privacy dominates; concerns and misuse contribute
/// equally.
const PRIVACY_WEIGHT: f32 = 0.4;
const CONCERNS_WEIGHT: f32 = 0.3;
const MISUSE_WEIGHT: f32 = 0.3;

const CATEGORY_CAP: f32 = 100.0;

/// Thresholds that map numeric scores into qualitative risk bands. Intervals
/// are half-open: a boundary value belongs to the higher band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub medium: f32,
    pub high: f32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 30.0,
            high: 70.0,
        }
    }
}

/// Classification buckets for the aggregate risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Map a numeric risk score (0–100) into a risk band.
    pub fn from_score(score: f32) -> Self {
        Self::from_score_with_thresholds(score, &RiskThresholds::default())
    }

    /// Map a numeric risk score using caller-provided thresholds.
    pub fn from_score_with_thresholds(score: f32, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.high {
            Self::High
        } else if score >= thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// The normalized risk score derived from one analysis, with the component
/// sub-scores that produced it. Recomputed fresh on every analysis, never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Weighted aggregate in 0–100, rounded to one decimal place.
    pub total: f32,
    pub privacy_score: f32,
    pub concerns_score: f32,
    pub misuse_score: f32,
    pub band: RiskBand,
}

/// Score an analysis with the default band thresholds.
pub fn score(analysis: &AnalysisResult) -> RiskScore {
    score_with_thresholds(analysis, &RiskThresholds::default())
}

/// Pure, deterministic scoring over the three count-bearing categories.
/// `key_points`, `advantages`, and `disadvantages` are informational only
/// and never feed the score. Each sub-score saturates at 100 independently
/// so one pathological category cannot push the aggregate past its weight.
pub fn score_with_thresholds(
    analysis: &AnalysisResult,
    thresholds: &RiskThresholds,
) -> RiskScore {
    let privacy_score = saturating_points(analysis.privacy_issues().len(), PRIVACY_POINTS);
    let concerns_score = saturating_points(analysis.major_concerns().len(), CONCERNS_POINTS);
    let misuse_score = saturating_points(analysis.data_misuse().len(), MISUSE_POINTS);

    let total = round_one_decimal(
        privacy_score * PRIVACY_WEIGHT
            + concerns_score * CONCERNS_WEIGHT
            + misuse_score * MISUSE_WEIGHT,
    );
    let band = RiskBand::from_score_with_thresholds(total, thresholds);
    debug!(%total, ?band, "risk score computed");

    RiskScore {
        total,
        privacy_score,
        concerns_score,
        misuse_score,
        band,
    }
}

fn saturating_points(count: usize, points_per_item: f32) -> f32 {
    (count as f32 * points_per_item).min(CATEGORY_CAP)
}

fn round_one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
