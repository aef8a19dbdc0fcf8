//! Policy constants for pose detection and form scoring.
//!
//! The three confidence cutoffs answer different questions and must stay
//! distinct: `MIN_POSE_SCORE` decides whether the detector saw a person at
//! all, `MIN_USABLE_POSE_CONFIDENCE` decides whether a detected pose is
//! trustworthy enough to measure, and `MIN_PART_CONFIDENCE` decides whether
//! a single metric may trigger feedback. The scoring thresholds and weights
//! are empirically chosen against reference recordings; changing any of them
//! changes scores for identical input.

/// Number of keypoints in the single-pose COCO layout
pub const NUM_KEYPOINTS: usize = 17;

/// MoveNet Thunder input resolution (pixels, square)
pub const MOVENET_INPUT_SIZE: i32 = 256;

/// Poses whose mean keypoint score falls below this are reported as "no pose"
pub const MIN_POSE_SCORE: f32 = 0.15;

/// Poses below this overall confidence are unusable for measurement
pub const MIN_USABLE_POSE_CONFIDENCE: f32 = 0.25;

/// Metrics whose body-part confidence falls below this never trigger feedback
pub const MIN_PART_CONFIDENCE: f32 = 0.15;

/// Arm platform angles below this trigger the flat-platform check (degrees)
pub const PLATFORM_ANGLE_THRESHOLD: f32 = 160.0;

/// Hip/shoulder alignment deltas above this trigger the level checks
pub const ALIGNMENT_TOLERANCE: f32 = 0.1;

/// Mean knee flexion below this triggers the knee-bend check (degrees)
pub const KNEE_FLEXION_THRESHOLD: f32 = 20.0;

/// Foot spacing ratios below this trigger the stance-width check
pub const FOOT_SPACING_THRESHOLD: f32 = 1.0;

/// Platform angle that earns a full platform sub-score (degrees)
pub const PLATFORM_ANGLE_FULL: f32 = 180.0;

/// Alignment delta multiplier in the hip/shoulder sub-scores
pub const ALIGNMENT_PENALTY_SCALE: f32 = 10.0;

/// Mean knee flexion that earns a full knee sub-score (degrees)
pub const KNEE_FLEXION_FULL: f32 = 90.0;

/// Sub-score weights; together they sum to 1.0
pub const PLATFORM_WEIGHT: f32 = 0.3;
pub const HIP_WEIGHT: f32 = 0.2;
pub const SHOULDER_WEIGHT: f32 = 0.2;
pub const KNEE_WEIGHT: f32 = 0.2;
pub const FOOT_WEIGHT: f32 = 0.1;

/// Default number of frames sampled per session
pub const DEFAULT_TARGET_FRAMES: usize = 10;

/// Minimum spacing between sampled frames of a file source (seconds)
pub const MIN_SAMPLE_SPACING_SECS: f64 = 1.0;

/// Default interval between live-camera samples (milliseconds)
pub const DEFAULT_LIVE_INTERVAL_MS: u64 = 1000;

/// Default live recording length (seconds)
pub const DEFAULT_LIVE_DURATION_SECS: u64 = 10;

/// Longest wait for one frame to seek/decode before skipping it (milliseconds)
pub const DEFAULT_SEEK_TIMEOUT_MS: u64 = 2000;
