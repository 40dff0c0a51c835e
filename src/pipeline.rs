//! Pipeline orchestration
//!
//! This module provides the public API for emoscan. It owns the sampling
//! loop, invokes the model ports per sampled frame, isolates per-frame
//! failures, and accumulates the ordered result.

use tracing::{info, warn};

use crate::assembler::FrameRecordAssembler;
use crate::attention::{AttentionAnalyzer, AttentionThresholds};
use crate::error::AnalysisError;
use crate::metrics::{MetricWeights, MetricsCalculator};
use crate::ports::{EmotionClassifier, LandmarkEstimator};
use crate::sampler::{FrameSampler, SampledFrame, VideoSource};
use crate::types::{AnalysisResult, DerivedScores, FrameRecord, FrameSize, RunSummary};

/// Default wall-clock sampling cadence in milliseconds.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;

/// Tunable policy for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Wall-clock spacing between sampled frames, in milliseconds.
    pub sample_interval_ms: u64,
    /// Pose and eye-contact thresholds.
    pub attention: AttentionThresholds,
    /// Derived-metric formula weights.
    pub weights: MetricWeights,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            attention: AttentionThresholds::default(),
            weights: MetricWeights::default(),
        }
    }
}

/// Driver running the full per-frame analysis over a video source.
///
/// Owns the two model ports for the duration of a run; dropping the analyzer
/// tears their state down with it. Strictly sequential: one frame is sampled
/// and analyzed at a time, in source order.
pub struct VideoAnalyzer<C, L> {
    classifier: C,
    landmarks: L,
    attention: AttentionAnalyzer,
    config: AnalyzerConfig,
}

impl<C, L> VideoAnalyzer<C, L> {
    /// Create an analyzer with default thresholds and cadence.
    pub fn new(classifier: C, landmarks: L) -> Self {
        Self::with_config(classifier, landmarks, AnalyzerConfig::default())
    }

    /// Create an analyzer with explicit policy.
    pub fn with_config(classifier: C, landmarks: L, config: AnalyzerConfig) -> Self {
        Self {
            classifier,
            landmarks,
            attention: AttentionAnalyzer::new(config.attention),
            config,
        }
    }

    /// Analyze a video source, consuming it.
    ///
    /// Per-frame analysis failures are logged to the diagnostics channel and
    /// the frame is skipped; failures to open or read the source abort the
    /// run. The source handle is released on every exit path.
    pub fn analyze<S>(&mut self, source: S) -> Result<AnalysisResult, AnalysisError>
    where
        S: VideoSource,
        C: EmotionClassifier<S::Frame>,
        L: LandmarkEstimator<S::Frame>,
    {
        let mut sampler = FrameSampler::new(source, self.config.sample_interval_ms)?;
        let frame_size = sampler.frame_size();

        let mut frames: Vec<FrameRecord> = Vec::new();
        let mut frames_processed: u64 = 0;

        while let Some(item) = sampler.next() {
            let sampled = item?;
            match self.analyze_frame(&sampled, frame_size) {
                Ok(record) => {
                    frames.push(record);
                    frames_processed += 1;
                }
                Err(e) => {
                    warn!("Failed to analyze frame {}: {}", sampled.index, e);
                }
            }
        }

        let summary = RunSummary {
            frames_read: sampler.frames_read(),
            frames_sampled: sampler.frames_sampled(),
            frames_processed,
        };
        info!(
            "Processed {} of {} sampled frames ({} frames read)",
            summary.frames_processed, summary.frames_sampled, summary.frames_read
        );

        Ok(AnalysisResult { frames, summary })
    }

    fn analyze_frame<F>(
        &mut self,
        sampled: &SampledFrame<F>,
        frame_size: FrameSize,
    ) -> Result<FrameRecord, AnalysisError>
    where
        C: EmotionClassifier<F>,
        L: LandmarkEstimator<F>,
    {
        let estimate = self.classifier.classify(&sampled.frame)?;
        let landmarks = self.landmarks.estimate(&sampled.frame)?;

        let attention = self.attention.analyze(landmarks.as_ref(), frame_size)?;
        // Derived scores fall back to their "unknown" values on frames with
        // no detected face, even when the classifier produced usable scores.
        let derived = if landmarks.is_some() {
            MetricsCalculator::derive(
                &estimate.scores,
                attention.attention_score,
                &self.config.weights,
            )
        } else {
            DerivedScores::UNKNOWN
        };

        Ok(FrameRecordAssembler::assemble(
            sampled.timestamp_ms,
            &estimate,
            attention,
            derived,
        ))
    }
}

/// Analyze a video source in one shot with default thresholds.
///
/// # Example
/// ```ignore
/// let result = analyze_video(source, classifier, landmarks, 1000)?;
/// for record in &result.frames {
///     println!("{} -> attention {}", record.timestamp_ms, record.attention_score);
/// }
/// ```
pub fn analyze_video<S, C, L>(
    source: S,
    classifier: C,
    landmarks: L,
    sample_interval_ms: u64,
) -> Result<AnalysisResult, AnalysisError>
where
    S: VideoSource,
    C: EmotionClassifier<S::Frame>,
    L: LandmarkEstimator<S::Frame>,
{
    let config = AnalyzerConfig {
        sample_interval_ms,
        ..AnalyzerConfig::default()
    };
    VideoAnalyzer::with_config(classifier, landmarks, config).analyze(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        EmotionEstimate, EmotionLabel, FaceLandmarks, HeadPose, Landmark, RawEmotionScores,
    };
    use pretty_assertions::assert_eq;

    /// Observations one fake frame hands to the fake ports.
    #[derive(Debug, Clone, Default)]
    struct FakeFrame {
        emotions: RawEmotionScores,
        dominant: EmotionLabel,
        nose: Option<(f64, f64)>,
        fail_classify: bool,
    }

    impl FakeFrame {
        fn happy_centered() -> Self {
            Self {
                emotions: RawEmotionScores {
                    happy: 80.0,
                    surprised: 10.0,
                    neutral: 10.0,
                    ..RawEmotionScores::default()
                },
                dominant: EmotionLabel::Happy,
                nose: Some((0.5, 0.5)),
                fail_classify: false,
            }
        }

        fn faceless() -> Self {
            Self {
                emotions: RawEmotionScores {
                    neutral: 90.0,
                    ..RawEmotionScores::default()
                },
                dominant: EmotionLabel::Neutral,
                nose: None,
                fail_classify: false,
            }
        }
    }

    struct FakeSource {
        fps: f64,
        frames: std::vec::IntoIter<FakeFrame>,
    }

    impl FakeSource {
        fn new(fps: f64, frames: Vec<FakeFrame>) -> Self {
            Self {
                fps,
                frames: frames.into_iter(),
            }
        }
    }

    impl VideoSource for FakeSource {
        type Frame = FakeFrame;

        fn frame_rate(&self) -> f64 {
            self.fps
        }

        fn frame_size(&self) -> FrameSize {
            FrameSize {
                width: 1280,
                height: 720,
            }
        }

        fn next_frame(&mut self) -> Result<Option<FakeFrame>, AnalysisError> {
            Ok(self.frames.next())
        }
    }

    struct FakeClassifier;

    impl EmotionClassifier<FakeFrame> for FakeClassifier {
        fn classify(&mut self, frame: &FakeFrame) -> Result<EmotionEstimate, AnalysisError> {
            if frame.fail_classify {
                return Err(AnalysisError::Classification("model exploded".to_string()));
            }
            Ok(EmotionEstimate {
                scores: frame.emotions,
                dominant: frame.dominant,
            })
        }
    }

    struct FakeLandmarks;

    impl LandmarkEstimator<FakeFrame> for FakeLandmarks {
        fn estimate(&mut self, frame: &FakeFrame) -> Result<Option<FaceLandmarks>, AnalysisError> {
            Ok(frame.nose.map(|(x, y)| {
                let mut points = vec![
                    Landmark {
                        x: 0.5,
                        y: 0.5,
                        z: 0.0
                    };
                    264
                ];
                points[crate::attention::NOSE_TIP] = Landmark { x, y, z: 0.0 };
                FaceLandmarks::new(points)
            }))
        }
    }

    /// 90 frames at 30 fps; frame templates repeat per second of video.
    fn one_frame_per_second(templates: &[FakeFrame]) -> FakeSource {
        let mut frames = Vec::new();
        for template in templates {
            for _ in 0..30 {
                frames.push(template.clone());
            }
        }
        FakeSource::new(30.0, frames)
    }

    #[test]
    fn test_happy_path_produces_one_record_per_sampled_frame() {
        let source = one_frame_per_second(&[
            FakeFrame::happy_centered(),
            FakeFrame::happy_centered(),
            FakeFrame::happy_centered(),
        ]);

        let result = analyze_video(source, FakeClassifier, FakeLandmarks, 1000).unwrap();

        assert_eq!(result.frames.len(), 3);
        let timestamps: Vec<u64> = result.frames.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(timestamps, vec![0, 1000, 2000]);

        let record = &result.frames[0];
        assert_eq!(record.emotions.happy, 80);
        assert_eq!(record.dominant_emotion, EmotionLabel::Happy);
        assert_eq!(record.attention_score, 100);
        assert!(record.eye_contact);
        assert_eq!(record.head_pose, HeadPose::Forward);
        assert_eq!(record.engagement, 87);
        assert_eq!(record.confidence, 88);
        assert_eq!(record.stress, 0);

        assert_eq!(
            result.summary,
            RunSummary {
                frames_read: 90,
                frames_sampled: 3,
                frames_processed: 3,
            }
        );
    }

    #[test]
    fn test_classifier_failure_skips_only_that_frame() {
        let mut failing = FakeFrame::happy_centered();
        failing.fail_classify = true;

        let source = one_frame_per_second(&[
            FakeFrame::happy_centered(),
            failing,
            FakeFrame::happy_centered(),
        ]);

        let result = analyze_video(source, FakeClassifier, FakeLandmarks, 1000).unwrap();

        // The failing second is absent; the run continued past it.
        let timestamps: Vec<u64> = result.frames.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(timestamps, vec![0, 2000]);
        assert_eq!(result.summary.frames_sampled, 3);
        assert_eq!(result.summary.frames_processed, 2);
    }

    #[test]
    fn test_faceless_frame_gets_unknown_scores_but_keeps_emotions() {
        let source = one_frame_per_second(&[FakeFrame::faceless()]);

        let result = analyze_video(source, FakeClassifier, FakeLandmarks, 1000).unwrap();

        let record = &result.frames[0];
        // Classifier output still flows into the record.
        assert_eq!(record.emotions.neutral, 90);
        assert_eq!(record.dominant_emotion, EmotionLabel::Neutral);
        // Attention and derived scores are the fixed unknowns.
        assert_eq!(record.attention_score, 50);
        assert!(!record.eye_contact);
        assert_eq!(record.head_pose, HeadPose::Forward);
        assert_eq!(record.engagement, 50);
        assert_eq!(record.confidence, 50);
        assert_eq!(record.stress, 30);
    }

    #[test]
    fn test_averted_gaze_scores_forty() {
        let mut averted = FakeFrame::happy_centered();
        averted.nose = Some((0.3, 0.5));

        let source = one_frame_per_second(&[averted]);
        let result = analyze_video(source, FakeClassifier, FakeLandmarks, 1000).unwrap();

        let record = &result.frames[0];
        assert_eq!(record.head_pose, HeadPose::Right);
        assert!(!record.eye_contact);
        assert_eq!(record.attention_score, 40);
    }

    #[test]
    fn test_malformed_landmarks_skip_the_frame() {
        struct ShortLandmarks;
        impl LandmarkEstimator<FakeFrame> for ShortLandmarks {
            fn estimate(
                &mut self,
                _frame: &FakeFrame,
            ) -> Result<Option<FaceLandmarks>, AnalysisError> {
                Ok(Some(FaceLandmarks::new(vec![Landmark {
                    x: 0.5,
                    y: 0.5,
                    z: 0.0,
                }])))
            }
        }

        let source = one_frame_per_second(&[FakeFrame::happy_centered()]);
        let result = analyze_video(source, FakeClassifier, ShortLandmarks, 1000).unwrap();

        assert!(result.frames.is_empty());
        assert_eq!(result.summary.frames_sampled, 1);
        assert_eq!(result.summary.frames_processed, 0);
    }

    #[test]
    fn test_identical_inputs_yield_identical_output() {
        let run = || {
            let source = one_frame_per_second(&[
                FakeFrame::happy_centered(),
                FakeFrame::faceless(),
            ]);
            let result = analyze_video(source, FakeClassifier, FakeLandmarks, 1000).unwrap();
            serde_json::to_string(&result.frames).unwrap()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_unreadable_source_is_fatal() {
        struct BrokenSource;
        impl VideoSource for BrokenSource {
            type Frame = FakeFrame;

            fn frame_rate(&self) -> f64 {
                30.0
            }

            fn frame_size(&self) -> FrameSize {
                FrameSize {
                    width: 1280,
                    height: 720,
                }
            }

            fn next_frame(&mut self) -> Result<Option<FakeFrame>, AnalysisError> {
                Err(AnalysisError::SourceRead("container truncated".to_string()))
            }
        }

        let result = analyze_video(BrokenSource, FakeClassifier, FakeLandmarks, 1000);
        assert!(matches!(result, Err(AnalysisError::SourceRead(_))));
    }
}
