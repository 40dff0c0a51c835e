//! Capture replay
//!
//! A capture recording holds what the external collaborators produced for one
//! decoded video: the stream's frame rate and dimensions plus, per decoded
//! frame, the classifier scores and any landmark estimate. Replaying a
//! recording drives the full pipeline deterministically with no model runtime
//! attached.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::pipeline::analyze_video;
use crate::ports::{EmotionClassifier, LandmarkEstimator};
use crate::sampler::VideoSource;
use crate::types::{
    AnalysisResult, EmotionEstimate, EmotionLabel, FaceLandmarks, FrameSize, Landmark,
    RawEmotionScores,
};

/// Current capture schema version
pub const CAPTURE_SCHEMA_VERSION: &str = "affect.capture.v1";

/// Model observations recorded for one decoded frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureFrame {
    /// Raw classifier scores; classes missing from the file read as 0.
    #[serde(default)]
    pub emotions: RawEmotionScores,
    /// Classifier-supplied dominant label; missing reads as neutral.
    #[serde(default)]
    pub dominant_emotion: EmotionLabel,
    /// Landmark estimate, absent when no face was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<Landmark>>,
}

/// A recorded capture of one video's model observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecording {
    pub schema_version: String,
    /// Label of the video this capture was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    /// One entry per decoded frame, in stream order.
    pub frames: Vec<CaptureFrame>,
}

impl CaptureRecording {
    /// Parse and validate a recording from JSON.
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let recording: Self = serde_json::from_str(json)?;
        recording.validate()?;
        Ok(recording)
    }

    /// Check the schema version and stream parameters.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.schema_version != CAPTURE_SCHEMA_VERSION {
            return Err(AnalysisError::InvalidRecording(format!(
                "unsupported schema version '{}', expected '{}'",
                self.schema_version, CAPTURE_SCHEMA_VERSION
            )));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(AnalysisError::InvalidRecording(format!(
                "frame rate must be positive, got {}",
                self.fps
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(AnalysisError::InvalidRecording(format!(
                "frame dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Label used for provenance, falling back to a placeholder.
    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or("<capture>")
    }
}

/// Video source replaying the decoded-frame sequence of a recording.
pub struct ReplaySource {
    fps: f64,
    size: FrameSize,
    frames: std::vec::IntoIter<CaptureFrame>,
}

impl ReplaySource {
    pub fn new(recording: CaptureRecording) -> Self {
        Self {
            fps: recording.fps,
            size: FrameSize {
                width: recording.width,
                height: recording.height,
            },
            frames: recording.frames.into_iter(),
        }
    }
}

impl VideoSource for ReplaySource {
    type Frame = CaptureFrame;

    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn next_frame(&mut self) -> Result<Option<CaptureFrame>, AnalysisError> {
        Ok(self.frames.next())
    }
}

/// Classifier port reading the recorded scores off each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayClassifier;

impl EmotionClassifier<CaptureFrame> for ReplayClassifier {
    fn classify(&mut self, frame: &CaptureFrame) -> Result<EmotionEstimate, AnalysisError> {
        Ok(EmotionEstimate {
            scores: frame.emotions,
            dominant: frame.dominant_emotion,
        })
    }
}

/// Landmark port reading the recorded estimate off each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayLandmarks;

impl LandmarkEstimator<CaptureFrame> for ReplayLandmarks {
    fn estimate(&mut self, frame: &CaptureFrame) -> Result<Option<FaceLandmarks>, AnalysisError> {
        Ok(frame.landmarks.clone().map(FaceLandmarks::new))
    }
}

/// Analyze a capture recording in one shot.
///
/// # Example
/// ```ignore
/// let recording = CaptureRecording::from_json(&fs::read_to_string(path)?)?;
/// let result = analyze_recording(recording, 1000)?;
/// ```
pub fn analyze_recording(
    recording: CaptureRecording,
    sample_interval_ms: u64,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_video(
        ReplaySource::new(recording),
        ReplayClassifier,
        ReplayLandmarks,
        sample_interval_ms,
    )
}
