//! Core types for the emoscan pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: classifier estimates, landmark sets, attention metrics, derived
//! scores, and the per-frame output records.

use serde::{Deserialize, Serialize};

/// The seven affect classes scored by the emotion classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    /// Accepts the short vendor spelling "surprise" on input.
    #[serde(alias = "surprise")]
    Surprised,
    #[serde(alias = "fear")]
    Fearful,
    #[serde(alias = "disgust")]
    Disgusted,
    #[default]
    Neutral,
}

impl EmotionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Surprised => "surprised",
            EmotionLabel::Fearful => "fearful",
            EmotionLabel::Disgusted => "disgusted",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

/// Raw per-class scores from the classifier, on a 0-100 scale.
///
/// The classifier is not required to return a normalized distribution; values
/// are clamped and rounded independently when the frame record is assembled.
/// Classes missing from serialized input deserialize to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEmotionScores {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub surprised: f64,
    pub fearful: f64,
    pub disgusted: f64,
    pub neutral: f64,
}

/// Full classifier output for one frame.
///
/// `dominant` is the label the classifier names as most likely. It is
/// supplied independently of the scores; no argmax relationship is assumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionEstimate {
    pub scores: RawEmotionScores,
    pub dominant: EmotionLabel,
}

/// Integer per-class scores as they appear in a frame record, each in [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub happy: u8,
    pub sad: u8,
    pub angry: u8,
    pub surprised: u8,
    pub fearful: u8,
    pub disgusted: u8,
    pub neutral: u8,
}

impl EmotionScores {
    /// Clamp raw classifier scores to [0,100] and round to integers.
    pub fn from_raw(raw: &RawEmotionScores) -> Self {
        Self {
            happy: clamp_round(raw.happy),
            sad: clamp_round(raw.sad),
            angry: clamp_round(raw.angry),
            surprised: clamp_round(raw.surprised),
            fearful: clamp_round(raw.fearful),
            disgusted: clamp_round(raw.disgusted),
            neutral: clamp_round(raw.neutral),
        }
    }
}

/// A normalized 3-D facial landmark, x and y in [0,1] of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Ordered landmark positions for one detected face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Landmark at `index`, or `None` if the set is too short.
    pub fn point(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Head-pose classification derived from the nose-tip position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadPose {
    #[default]
    Forward,
    Left,
    Right,
    Up,
    Down,
}

impl HeadPose {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadPose::Forward => "forward",
            HeadPose::Left => "left",
            HeadPose::Right => "right",
            HeadPose::Up => "up",
            HeadPose::Down => "down",
        }
    }
}

/// Pixel dimensions of the frames a source yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Gaze/pose metrics for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionMetrics {
    pub attention_score: u8,
    pub eye_contact: bool,
    pub head_pose: HeadPose,
}

impl AttentionMetrics {
    /// Metrics reported when no face is detected: "unknown", not "low".
    pub const UNKNOWN: AttentionMetrics = AttentionMetrics {
        attention_score: 50,
        eye_contact: false,
        head_pose: HeadPose::Forward,
    };
}

/// Emotion-derived scores for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedScores {
    pub engagement: u8,
    pub confidence: u8,
    pub stress: u8,
}

impl DerivedScores {
    /// Scores reported when no face is detected and the formulas do not run.
    pub const UNKNOWN: DerivedScores = DerivedScores {
        engagement: 50,
        confidence: 50,
        stress: 30,
    };
}

/// Posture and gesture placeholder carried on every record.
///
/// Body-language estimation is not wired up; the fixed value keeps the output
/// shape stable for consumers that already read these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLanguage {
    pub posture: String,
    pub gestures: Vec<String>,
}

impl Default for BodyLanguage {
    fn default() -> Self {
        Self {
            posture: "upright".to_string(),
            gestures: Vec::new(),
        }
    }
}

/// One fully assembled output record for a sampled frame.
///
/// Assembled exactly once per successfully analyzed frame and never mutated
/// afterwards. Wire field names are fixed for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    /// Offset of the frame within the recording, in milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
    pub emotions: EmotionScores,
    pub dominant_emotion: EmotionLabel,
    pub attention_score: u8,
    pub eye_contact: bool,
    pub head_pose: HeadPose,
    pub body_language: BodyLanguage,
    pub engagement: u8,
    pub confidence: u8,
    pub stress: u8,
}

/// Counters accumulated over one analysis run.
///
/// `frames_processed <= frames_sampled <= frames_read` always holds; the gap
/// between processed and sampled is the number of skipped frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames_read: u64,
    pub frames_sampled: u64,
    pub frames_processed: u64,
}

/// Ordered frame records plus the run counters.
///
/// `frames` is ordered by increasing timestamp; frames whose analysis failed
/// are absent rather than represented by placeholder records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub frames: Vec<FrameRecord>,
    pub summary: RunSummary,
}

/// Report producer metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Report provenance information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProvenance {
    pub source: String,
    pub computed_at_utc: String,
}

/// Complete report envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub summary: RunSummary,
    pub frames: Vec<FrameRecord>,
}

/// Clamp a raw score to [0,100] and truncate to an integer.
pub(crate) fn clamp_trunc(value: f64) -> u8 {
    value.clamp(0.0, 100.0) as u8
}

/// Clamp a raw score to [0,100] and round to the nearest integer.
pub(crate) fn clamp_round(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clamp_trunc_bounds() {
        assert_eq!(clamp_trunc(-15.0), 0);
        assert_eq!(clamp_trunc(0.0), 0);
        assert_eq!(clamp_trunc(87.5), 87);
        assert_eq!(clamp_trunc(100.0), 100);
        assert_eq!(clamp_trunc(240.0), 100);
    }

    #[test]
    fn test_clamp_round_bounds() {
        assert_eq!(clamp_round(-1.0), 0);
        assert_eq!(clamp_round(41.6), 42);
        assert_eq!(clamp_round(99.4), 99);
        assert_eq!(clamp_round(150.0), 100);
    }

    #[test]
    fn test_emotion_scores_from_raw() {
        let raw = RawEmotionScores {
            happy: 80.6,
            sad: -3.0,
            angry: 0.2,
            surprised: 120.0,
            fearful: 0.0,
            disgusted: 49.5,
            neutral: 12.3,
        };

        let scores = EmotionScores::from_raw(&raw);
        assert_eq!(scores.happy, 81);
        assert_eq!(scores.sad, 0);
        assert_eq!(scores.angry, 0);
        assert_eq!(scores.surprised, 100);
        assert_eq!(scores.fearful, 0);
        assert_eq!(scores.disgusted, 50);
        assert_eq!(scores.neutral, 12);
    }

    #[test]
    fn test_raw_scores_missing_classes_default_to_zero() {
        let raw: RawEmotionScores = serde_json::from_str(r#"{"happy": 55.0}"#).unwrap();
        assert_eq!(raw.happy, 55.0);
        assert_eq!(raw.sad, 0.0);
        assert_eq!(raw.neutral, 0.0);
    }

    #[test]
    fn test_emotion_label_wire_names() {
        assert_eq!(
            serde_json::to_string(&EmotionLabel::Surprised).unwrap(),
            r#""surprised""#
        );
        // Vendor spellings are accepted on input.
        let label: EmotionLabel = serde_json::from_str(r#""surprise""#).unwrap();
        assert_eq!(label, EmotionLabel::Surprised);
        let label: EmotionLabel = serde_json::from_str(r#""fear""#).unwrap();
        assert_eq!(label, EmotionLabel::Fearful);
    }

    #[test]
    fn test_unknown_values() {
        assert_eq!(AttentionMetrics::UNKNOWN.attention_score, 50);
        assert!(!AttentionMetrics::UNKNOWN.eye_contact);
        assert_eq!(AttentionMetrics::UNKNOWN.head_pose, HeadPose::Forward);

        assert_eq!(DerivedScores::UNKNOWN.engagement, 50);
        assert_eq!(DerivedScores::UNKNOWN.confidence, 50);
        assert_eq!(DerivedScores::UNKNOWN.stress, 30);
    }

    #[test]
    fn test_body_language_placeholder() {
        let body = BodyLanguage::default();
        assert_eq!(body.posture, "upright");
        assert!(body.gestures.is_empty());
    }
}
