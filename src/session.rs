//! Session-level analysis: frame sampling, the per-frame pipeline, and
//! aggregation into one report.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use opencv::core::Mat;
use serde::Serialize;

use crate::config::{CameraConfig, SamplingConfig};
use crate::frame_source::FrameSource;
use crate::pose_detector::PoseDetector;
use crate::scoring::{self, FrameAnalysis};
use crate::{Error, Result};

/// Aggregate assessment of one recording or uploaded video.
///
/// Immutable once returned; serializes to the JSON shape the application
/// layer exposes (`formScore`, `observations`, `recommendations`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalysis {
    /// Rounded mean of the surviving per-frame scores
    pub form_score: u8,
    /// First-occurrence-ordered union of per-frame observations
    pub observations: Vec<String>,
    /// First-occurrence-ordered union of per-frame recommendations
    pub recommendations: Vec<String>,
}

/// Cooperative cancellation flag, checked between frames.
///
/// Clones share the flag, so one clone can be handed to another thread (or
/// a signal handler) while the session loop polls the original.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the session using this token
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Drives the full pipeline for one session at a time.
///
/// The detector is owned by the analyzer and `detect` takes `&mut self`, so
/// one analyzer never runs two frames concurrently. Run several analyzers
/// with their own detectors for parallel sessions.
pub struct SessionAnalyzer {
    detector: PoseDetector,
    sampling: SamplingConfig,
}

impl SessionAnalyzer {
    /// Create an analyzer with default sampling settings
    #[must_use]
    pub fn new(detector: PoseDetector) -> Self {
        Self {
            detector,
            sampling: SamplingConfig::default(),
        }
    }

    /// Replace the sampling settings
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Analyze an uploaded or recorded video file end to end.
    ///
    /// # Errors
    ///
    /// `InvalidFileType` for non-video paths, `NoValidPosesDetected` when
    /// nothing usable was found, `Cancelled` on cancellation, or any capture
    /// or inference failure.
    pub fn analyze_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        cancel: &CancelToken,
    ) -> Result<SessionAnalysis> {
        let mut source = FrameSource::open_file(path)?
            .with_seek_timeout(self.sampling.seek_timeout())
            .with_live_interval(self.sampling.live_interval());
        let result = self.analyze(&mut source, cancel);
        if let Err(e) = source.release() {
            warn!("Failed to release video source: {e}");
        }
        result
    }

    /// Analyze a live camera session of the configured duration.
    ///
    /// # Errors
    ///
    /// `CameraUnavailable`/`PermissionDenied`/`CameraError` when the camera
    /// cannot be acquired, plus the same session errors as `analyze_file`.
    pub fn analyze_camera(
        &mut self,
        camera: &CameraConfig,
        cancel: &CancelToken,
    ) -> Result<SessionAnalysis> {
        let mut source = FrameSource::open_camera(camera)?
            .with_seek_timeout(self.sampling.seek_timeout())
            .with_live_interval(self.sampling.live_interval());
        let result = self.analyze(&mut source, cancel);
        if let Err(e) = source.release() {
            warn!("Failed to release camera: {e}");
        }
        result
    }

    /// Analyze every sampled frame of an already-opened source and fold the
    /// results into one report. Frames are processed in sampling order.
    ///
    /// # Errors
    ///
    /// See `analyze_file`; the source itself stays owned by the caller.
    pub fn analyze(
        &mut self,
        source: &mut FrameSource,
        cancel: &CancelToken,
    ) -> Result<SessionAnalysis> {
        let count = if source.is_live() {
            self.live_sample_count()?
        } else {
            self.sampling.target_frames
        };
        info!(
            "Analyzing up to {count} frames from {}",
            if source.is_live() { "live camera" } else { "video file" }
        );

        let mut analyses = Vec::new();
        let mut skipped = 0usize;
        for item in source.sample_frames(count) {
            if cancel.is_cancelled() {
                info!("Session cancelled after {} frames", analyses.len());
                return Err(Error::Cancelled);
            }
            let frame = match item {
                Ok(frame) => frame,
                Err(Error::FrameTimeout { timestamp_secs, timeout_ms }) => {
                    warn!("Skipping frame at {timestamp_secs:.1}s: not decoded within {timeout_ms}ms");
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let analysis = self.analyze_frame(&frame.image)?;
            debug!(
                "Frame at {:.1}s scored {} ({})",
                frame.timestamp_secs,
                analysis.form_score,
                analysis.observations.join("; ")
            );
            analyses.push(analysis);
        }

        let usable = analyses.iter().filter(|a| a.form_score > 0).count();
        info!(
            "Sampled {} frames: {} usable, {} discarded, {} timed out",
            analyses.len(),
            usable,
            analyses.len() - usable,
            skipped
        );
        aggregate(&analyses)
    }

    /// Run the detector-metrics-scorer pipeline on a single frame.
    ///
    /// # Errors
    ///
    /// Inference or preprocessing failure; a frame with nobody in it is not
    /// an error, it yields the "No pose detected" sentinel analysis.
    pub fn analyze_frame(&mut self, frame: &Mat) -> Result<FrameAnalysis> {
        let pose = self.detector.detect(frame)?;
        Ok(scoring::analyze_pose(pose.as_ref()))
    }

    fn live_sample_count(&self) -> Result<usize> {
        let interval_ms = self.sampling.live_interval_ms.max(1);
        let count = (self.sampling.live_duration_secs * 1000) / interval_ms;
        usize::try_from(count.max(1))
            .map_err(|_| Error::InvalidInput(format!("live sample count {count} too large")))
    }
}

/// Fold per-frame analyses into one session report.
///
/// Frames that scored 0 carry no usable signal (no pose, or confidence below
/// the gates) and are discarded before averaging, so they never drag a real
/// score toward zero.
///
/// # Errors
///
/// `NoValidPosesDetected` when no frame survives the discard.
pub fn aggregate(analyses: &[FrameAnalysis]) -> Result<SessionAnalysis> {
    let valid: Vec<&FrameAnalysis> = analyses.iter().filter(|a| a.form_score > 0).collect();
    if valid.is_empty() {
        return Err(Error::NoValidPosesDetected);
    }

    let mean = valid.iter().map(|a| f32::from(a.form_score)).sum::<f32>() / valid.len() as f32;
    let observations = dedup_preserving_order(valid.iter().flat_map(|a| a.observations.iter()));
    let recommendations =
        dedup_preserving_order(valid.iter().flat_map(|a| a.recommendations.iter()));

    Ok(SessionAnalysis {
        form_score: mean.round() as u8,
        observations,
        recommendations,
    })
}

fn dedup_preserving_order<'a, I>(items: I) -> Vec<String>
where
    I: Iterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for item in items {
        if seen.insert(item.as_str()) {
            ordered.push(item.clone());
        }
    }
    ordered
}
