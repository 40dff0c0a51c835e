//! Error types for emoscan

use thiserror::Error;

/// Errors that can occur during analysis.
///
/// Only [`Classification`](AnalysisError::Classification) and
/// [`Landmarks`](AnalysisError::Landmarks) are recoverable: the pipeline
/// skips the offending frame and continues. Everything else aborts the run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Cannot open video source: {0}")]
    SourceOpen(String),

    #[error("Failed to read from video source: {0}")]
    SourceRead(String),

    #[error("Emotion classification failed: {0}")]
    Classification(String),

    #[error("Landmark estimation failed: {0}")]
    Landmarks(String),

    #[error("Invalid capture recording: {0}")]
    InvalidRecording(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),
}
