//! Attention analysis
//!
//! Derives head pose, eye contact, and an attention score from the normalized
//! position of the nose-tip landmark. A deliberately coarse single-landmark
//! proxy, not a gaze-estimation algorithm; consumers depend on the exact
//! threshold values.

use tracing::trace;

use crate::error::AnalysisError;
use crate::types::{AttentionMetrics, FaceLandmarks, FrameSize, HeadPose};

/// Face-mesh index of the nose tip.
pub const NOSE_TIP: usize = 1;
/// Face-mesh index of the left eye center.
pub const LEFT_EYE_CENTER: usize = 33;
/// Face-mesh index of the right eye center.
pub const RIGHT_EYE_CENTER: usize = 263;

/// Threshold policy for pose and eye-contact classification.
///
/// These are policy values, not derived constants. The defaults match the
/// published scoring behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttentionThresholds {
    /// Nose position below this on either axis reads as turned away.
    pub pose_low: f64,
    /// Nose position above this on either axis reads as turned away.
    pub pose_high: f64,
    /// Lower bound of the eye-contact window, exclusive, both axes.
    pub eye_contact_low: f64,
    /// Upper bound of the eye-contact window, exclusive, both axes.
    pub eye_contact_high: f64,
    /// Attention base when the nose is dead-center.
    pub eye_contact_base: i32,
    /// Attention base when it is not.
    pub averted_base: i32,
    /// Deduction applied when the head pose is off forward.
    pub off_forward_penalty: i32,
}

impl Default for AttentionThresholds {
    fn default() -> Self {
        Self {
            pose_low: 0.4,
            pose_high: 0.6,
            eye_contact_low: 0.45,
            eye_contact_high: 0.55,
            eye_contact_base: 100,
            averted_base: 60,
            off_forward_penalty: 20,
        }
    }
}

/// Analyzer mapping a landmark set to attention metrics.
#[derive(Debug, Clone, Default)]
pub struct AttentionAnalyzer {
    thresholds: AttentionThresholds,
}

impl AttentionAnalyzer {
    pub fn new(thresholds: AttentionThresholds) -> Self {
        Self { thresholds }
    }

    /// Compute attention metrics for one frame.
    ///
    /// An absent landmark set yields the fixed "unknown" metrics. A landmark
    /// set too short to contain the nose tip or eye centers is a malformed
    /// estimate and reported as an error (recovered per frame by the driver).
    pub fn analyze(
        &self,
        landmarks: Option<&FaceLandmarks>,
        frame_size: FrameSize,
    ) -> Result<AttentionMetrics, AnalysisError> {
        let Some(face) = landmarks else {
            return Ok(AttentionMetrics::UNKNOWN);
        };

        // The eye centers must be present in a well-formed estimate even
        // though the pose proxy only reads the nose tip.
        face.point(LEFT_EYE_CENTER)
            .ok_or_else(|| missing_landmark(LEFT_EYE_CENTER, face.len()))?;
        face.point(RIGHT_EYE_CENTER)
            .ok_or_else(|| missing_landmark(RIGHT_EYE_CENTER, face.len()))?;
        let nose = face
            .point(NOSE_TIP)
            .ok_or_else(|| missing_landmark(NOSE_TIP, face.len()))?;

        trace!(
            "nose at ({:.3}, {:.3}) in a {}x{} frame",
            nose.x,
            nose.y,
            frame_size.width,
            frame_size.height
        );

        let t = &self.thresholds;

        let mut head_pose = HeadPose::Forward;
        if nose.x < t.pose_low {
            head_pose = HeadPose::Right;
        } else if nose.x > t.pose_high {
            head_pose = HeadPose::Left;
        }
        // Vertical checks run last; up/down overrides a left/right reading.
        if nose.y < t.pose_low {
            head_pose = HeadPose::Up;
        } else if nose.y > t.pose_high {
            head_pose = HeadPose::Down;
        }

        let eye_contact = t.eye_contact_low < nose.x
            && nose.x < t.eye_contact_high
            && t.eye_contact_low < nose.y
            && nose.y < t.eye_contact_high;

        let mut score = if eye_contact {
            t.eye_contact_base
        } else {
            t.averted_base
        };
        if head_pose != HeadPose::Forward {
            score -= t.off_forward_penalty;
        }

        Ok(AttentionMetrics {
            attention_score: score.clamp(0, 100) as u8,
            eye_contact,
            head_pose,
        })
    }
}

fn missing_landmark(index: usize, len: usize) -> AnalysisError {
    AnalysisError::Landmarks(format!(
        "landmark set has {len} points, missing index {index}"
    ))
}
