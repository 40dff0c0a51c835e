//! Derived metric calculation
//!
//! Maps the raw emotion vector (plus the attention score, for confidence) to
//! engagement, confidence, and stress through fixed linear combinations.
//! These formulas only run on frames with a detected face; frames without one
//! carry the "unknown" scores instead.

use crate::types::{clamp_trunc, DerivedScores, RawEmotionScores};

/// Weight policy for the derived-metric formulas.
///
/// Policy values, not derived constants. The defaults match the published
/// scoring behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricWeights {
    /// Scale applied to neutral before it joins the negative engagement term.
    pub engagement_neutral_damping: f64,
    /// Scale applied to the whole negative engagement term.
    pub engagement_negative_scale: f64,
    pub confidence_happy_weight: f64,
    pub confidence_attention_weight: f64,
    pub confidence_negative_scale: f64,
    pub stress_fear_weight: f64,
    pub stress_anger_weight: f64,
    pub stress_disgust_weight: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            engagement_neutral_damping: 0.5,
            engagement_negative_scale: 0.5,
            confidence_happy_weight: 0.6,
            confidence_attention_weight: 0.4,
            confidence_negative_scale: 0.5,
            stress_fear_weight: 0.5,
            stress_anger_weight: 0.3,
            stress_disgust_weight: 0.2,
        }
    }
}

/// Calculator for the emotion-derived scores.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute all three derived scores for a frame with a detected face.
    pub fn derive(
        emotions: &RawEmotionScores,
        attention_score: u8,
        weights: &MetricWeights,
    ) -> DerivedScores {
        DerivedScores {
            engagement: compute_engagement(emotions, weights),
            confidence: compute_confidence(emotions, attention_score, weights),
            stress: compute_stress(emotions, weights),
        }
    }
}

/// Engagement: positive affect (happy, surprised) minus damped sad/neutral.
fn compute_engagement(emotions: &RawEmotionScores, weights: &MetricWeights) -> u8 {
    let positive = emotions.happy + emotions.surprised;
    let negative = emotions.sad + emotions.neutral * weights.engagement_neutral_damping;
    clamp_trunc(positive - negative * weights.engagement_negative_scale)
}

/// Confidence: happy and attention against fearful/sad.
fn compute_confidence(
    emotions: &RawEmotionScores,
    attention_score: u8,
    weights: &MetricWeights,
) -> u8 {
    let positive = emotions.happy * weights.confidence_happy_weight
        + f64::from(attention_score) * weights.confidence_attention_weight;
    let negative = (emotions.fearful + emotions.sad) * weights.confidence_negative_scale;
    clamp_trunc(positive - negative)
}

/// Stress: weighted fear, anger, and disgust.
fn compute_stress(emotions: &RawEmotionScores, weights: &MetricWeights) -> u8 {
    clamp_trunc(
        emotions.fearful * weights.stress_fear_weight
            + emotions.angry * weights.stress_anger_weight
            + emotions.disgusted * weights.stress_disgust_weight,
    )
}
