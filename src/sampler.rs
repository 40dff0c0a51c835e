//! Frame sampling
//!
//! Walks a video source exactly once and yields a strided subsequence of
//! frames with derived timestamps. The source handle lives inside the sampler
//! and is released when the sampler drops, on success and error paths alike.

use tracing::debug;

use crate::error::AnalysisError;
use crate::types::FrameSize;

/// A readable, non-restartable stream of decoded video frames.
///
/// Decoding itself happens outside this crate; any decoder backend (or a
/// recorded capture replay) that can report its frame rate and yield frames
/// in order satisfies this contract. Exhaustion is `Ok(None)`, a read
/// failure is `Err`.
pub trait VideoSource {
    /// Decoded frame payload handed to the model ports.
    type Frame;

    /// Frame rate reported by the source, in frames per second.
    fn frame_rate(&self) -> f64;

    /// Pixel dimensions of the frames this source yields.
    fn frame_size(&self) -> FrameSize;

    /// Read the next frame, advancing the stream.
    fn next_frame(&mut self) -> Result<Option<Self::Frame>, AnalysisError>;
}

/// One selected frame together with its derived timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame<F> {
    /// Zero-based index of the frame in the source stream.
    pub index: u64,
    /// Offset of the frame within the recording, in milliseconds.
    pub timestamp_ms: u64,
    pub frame: F,
}

/// Iterator selecting every `stride`-th frame of a source.
///
/// The stride is derived once from the sample interval and the source frame
/// rate; frame `i` is selected when `i % stride == 0`, and its timestamp is
/// `round((i / fps) * 1000)` milliseconds.
pub struct FrameSampler<S: VideoSource> {
    source: S,
    fps: f64,
    stride: u64,
    cursor: u64,
    frames_read: u64,
    frames_sampled: u64,
    exhausted: bool,
}

impl<S: VideoSource> FrameSampler<S> {
    /// Wrap a source, deriving the frame stride from the sample interval.
    ///
    /// The stride is `floor(interval_sec * fps)`, clamped to a minimum of 1:
    /// an interval shorter than one frame period samples every frame rather
    /// than leaving a zero modulus. A non-positive or non-finite frame rate
    /// is rejected because timestamps are derived from it.
    pub fn new(source: S, sample_interval_ms: u64) -> Result<Self, AnalysisError> {
        let fps = source.frame_rate();
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnalysisError::SourceOpen(format!(
                "source reports unusable frame rate {fps}"
            )));
        }

        let stride = (((sample_interval_ms as f64) / 1000.0) * fps).floor() as u64;
        let stride = stride.max(1);
        debug!("sampling every {stride} frames at {fps} fps ({sample_interval_ms} ms interval)");

        Ok(Self {
            source,
            fps,
            stride,
            cursor: 0,
            frames_read: 0,
            frames_sampled: 0,
            exhausted: false,
        })
    }

    /// Pixel dimensions of the underlying source.
    pub fn frame_size(&self) -> FrameSize {
        self.source.frame_size()
    }

    /// Frame stride in effect for this run.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Frames read from the source so far, sampled or not.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Frames selected by the stride so far.
    pub fn frames_sampled(&self) -> u64 {
        self.frames_sampled
    }

    fn timestamp_ms(&self, index: u64) -> u64 {
        ((index as f64 / self.fps) * 1000.0).round() as u64
    }
}

impl<S: VideoSource> Iterator for FrameSampler<S> {
    type Item = Result<SampledFrame<S::Frame>, AnalysisError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        loop {
            match self.source.next_frame() {
                Ok(Some(frame)) => {
                    let index = self.cursor;
                    self.cursor += 1;
                    self.frames_read += 1;

                    if index % self.stride == 0 {
                        self.frames_sampled += 1;
                        return Some(Ok(SampledFrame {
                            index,
                            timestamp_ms: self.timestamp_ms(index),
                            frame,
                        }));
                    }
                }
                Ok(None) => {
                    self.exhausted = true;
                    return None;
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
