//! Report encoding
//!
//! Wraps an analysis result in a report envelope with producer and provenance
//! metadata, and serializes the bare frame sequence for consumers of the
//! frames-only compatibility format.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::types::{AffectReport, AnalysisResult, FrameRecord, ReportProducer, ReportProvenance};
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder producing report envelopes.
///
/// Only the envelope carries wall-clock metadata; the frame sequence inside
/// it is byte-identical to the frames-only serialization for the same run.
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create an encoder with a unique instance ID.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID.
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Wrap a result in the report envelope.
    pub fn encode(&self, result: &AnalysisResult, source: &str) -> AffectReport {
        AffectReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: ReportProvenance {
                source: source.to_string(),
                computed_at_utc: Utc::now().to_rfc3339(),
            },
            summary: result.summary,
            frames: result.frames.clone(),
        }
    }

    /// Encode a result to report JSON.
    pub fn encode_to_json(
        &self,
        result: &AnalysisResult,
        source: &str,
    ) -> Result<String, AnalysisError> {
        serde_json::to_string(&self.encode(result, source))
            .map_err(|e| AnalysisError::Encoding(e.to_string()))
    }
}

/// Serialize the bare frame sequence, the primary output format.
pub fn frames_to_json(frames: &[FrameRecord]) -> Result<String, AnalysisError> {
    serde_json::to_string(frames).map_err(|e| AnalysisError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AttentionMetrics, BodyLanguage, DerivedScores, EmotionLabel, EmotionScores, HeadPose,
        RunSummary,
    };
    use pretty_assertions::assert_eq;

    fn sample_result() -> AnalysisResult {
        let record = FrameRecord {
            timestamp_ms: 0,
            emotions: EmotionScores {
                happy: 5,
                sad: 0,
                angry: 0,
                surprised: 0,
                fearful: 0,
                disgusted: 0,
                neutral: 92,
            },
            dominant_emotion: EmotionLabel::Neutral,
            attention_score: AttentionMetrics::UNKNOWN.attention_score,
            eye_contact: false,
            head_pose: HeadPose::Forward,
            body_language: BodyLanguage::default(),
            engagement: DerivedScores::UNKNOWN.engagement,
            confidence: DerivedScores::UNKNOWN.confidence,
            stress: DerivedScores::UNKNOWN.stress,
        };

        AnalysisResult {
            frames: vec![record],
            summary: RunSummary {
                frames_read: 30,
                frames_sampled: 1,
                frames_processed: 1,
            },
        }
    }

    #[test]
    fn test_report_envelope_fields() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(&sample_result(), "interview.mp4");

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, ENGINE_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.provenance.source, "interview.mp4");
        assert_eq!(report.frames.len(), 1);
        assert_eq!(report.summary.frames_processed, 1);
    }

    #[test]
    fn test_frames_inside_report_match_bare_serialization() {
        let result = sample_result();
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());

        let report_json = encoder.encode_to_json(&result, "clip").unwrap();
        let report: serde_json::Value = serde_json::from_str(&report_json).unwrap();

        let bare_json = frames_to_json(&result.frames).unwrap();
        let bare: serde_json::Value = serde_json::from_str(&bare_json).unwrap();

        assert_eq!(report["frames"], bare);
    }

    #[test]
    fn test_frames_to_json_is_an_ordered_array() {
        let mut result = sample_result();
        let mut second = result.frames[0].clone();
        second.timestamp_ms = 1000;
        result.frames.push(second);

        let json = frames_to_json(&result.frames).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let frames = value.as_array().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["timestamp"], 0);
        assert_eq!(frames[1]["timestamp"], 1000);
    }
}
