//! Emoscan - Frame-sampling engine for facial affect and attention signals
//!
//! Emoscan samples a recorded video at a fixed wall-clock cadence, hands each
//! sampled frame to an external facial-emotion classifier and facial-landmark
//! estimator, and converts their raw outputs into interpretable behavioral
//! scores per frame: attention, engagement, confidence, stress, eye contact,
//! and head pose.
//!
//! ## Pipeline
//!
//! frame sampling → {emotion classification, landmark estimation} →
//! attention analysis / derived metrics → record assembly → ordered result
//!
//! The model backends sit behind the [`ports`] traits; the [`replay`] module
//! drives the pipeline from a recorded capture file with no model runtime
//! attached. Per-frame analysis failures skip the frame and never abort a
//! run; source failures are fatal.

pub mod assembler;
pub mod attention;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod ports;
pub mod replay;
pub mod sampler;
pub mod types;

pub use error::AnalysisError;
pub use pipeline::{analyze_video, AnalyzerConfig, VideoAnalyzer, DEFAULT_SAMPLE_INTERVAL_MS};
pub use ports::{EmotionClassifier, LandmarkEstimator};
pub use replay::{analyze_recording, CaptureRecording};
pub use sampler::{FrameSampler, SampledFrame, VideoSource};
pub use types::{AnalysisResult, FrameRecord, RunSummary};

/// Engine version embedded in report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "emoscan";
