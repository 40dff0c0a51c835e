//! Model ports
//!
//! The emotion classifier and the landmark estimator are external
//! collaborators behind narrow capability traits. Any concrete model backend
//! satisfying these contracts is substitutable, including the recorded
//! capture replay used for deterministic runs and the fixed-output doubles
//! used in tests.
//!
//! The ports impose no timeouts; if a backend blocks, the pipeline blocks
//! with it. Backend construction and teardown happen outside the pipeline,
//! scoped to one run by whoever owns the port values.

use crate::error::AnalysisError;
use crate::types::{EmotionEstimate, FaceLandmarks};

/// Facial-emotion classifier over decoded frames.
///
/// Implementations are expected to tolerate frames without a visible face by
/// returning a best-effort, neutral-leaning estimate rather than an error.
/// An `Err` is treated as a per-frame failure and skips the frame.
pub trait EmotionClassifier<F> {
    fn classify(&mut self, frame: &F) -> Result<EmotionEstimate, AnalysisError>;
}

/// Facial-landmark estimator over decoded frames.
///
/// Returns normalized landmark positions for at most one face, or `None`
/// when no face is found. `None` is a normal outcome, not an error.
pub trait LandmarkEstimator<F> {
    fn estimate(&mut self, frame: &F) -> Result<Option<FaceLandmarks>, AnalysisError>;
}
