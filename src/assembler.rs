//! Frame record assembly
//!
//! Merges the classifier estimate, attention metrics, and derived scores into
//! one immutable record per sampled frame.

use crate::types::{
    AttentionMetrics, BodyLanguage, DerivedScores, EmotionEstimate, EmotionScores, FrameRecord,
};

/// Assembler producing the per-frame output record.
pub struct FrameRecordAssembler;

impl FrameRecordAssembler {
    /// Build the record for one successfully analyzed frame.
    ///
    /// Raw classifier scores are clamped to [0,100] and rounded here; the
    /// record is never mutated after this point.
    pub fn assemble(
        timestamp_ms: u64,
        estimate: &EmotionEstimate,
        attention: AttentionMetrics,
        derived: DerivedScores,
    ) -> FrameRecord {
        FrameRecord {
            timestamp_ms,
            emotions: EmotionScores::from_raw(&estimate.scores),
            dominant_emotion: estimate.dominant,
            attention_score: attention.attention_score,
            eye_contact: attention.eye_contact,
            head_pose: attention.head_pose,
            body_language: BodyLanguage::default(),
            engagement: derived.engagement,
            confidence: derived.confidence,
            stress: derived.stress,
        }
    }
}
