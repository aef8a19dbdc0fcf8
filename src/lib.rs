//! Volleyball technique analysis from body pose.
//!
//! This library scores underhand passing form from video using:
//! - ONNX Runtime for `MoveNet` Thunder pose inference
//! - `OpenCV` for camera capture and video decoding
//! - Fixed biomechanical heuristics for feedback and scoring
//!
//! The analysis pipeline consists of:
//! 1. Frame sampling from a live camera or an uploaded video file
//! 2. Pose detection producing 17 `COCO` keypoints per frame
//! 3. Metric extraction (joint angles, alignments, stance width)
//! 4. Per-frame form scoring with observations and recommendations
//! 5. Aggregation of scored frames into a single session report
//!
//! # Examples
//!
//! ## Analyzing an Uploaded Video
//!
//! ```no_run
//! use volleyball_technique_analysis::pose_detector::PoseDetector;
//! use volleyball_technique_analysis::session::{CancelToken, SessionAnalyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = PoseDetector::new("assets/movenet_thunder.onnx")?;
//! let mut analyzer = SessionAnalyzer::new(detector);
//!
//! let token = CancelToken::new();
//! let report = analyzer.analyze_file("serve_practice.mp4", &token)?;
//!
//! println!("Form score: {}/10", report.form_score);
//! for observation in &report.observations {
//!     println!("- {observation}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Scoring a Single Frame
//!
//! ```no_run
//! use volleyball_technique_analysis::{metrics, scoring};
//! use volleyball_technique_analysis::pose_detector::PoseDetector;
//! use opencv::imgcodecs;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut detector = PoseDetector::new("assets/movenet_thunder.onnx")?;
//! let image = imgcodecs::imread("stance.jpg", imgcodecs::IMREAD_COLOR)?;
//!
//! if let Some(pose) = detector.detect(&image)? {
//!     let frame_metrics = metrics::measure(&pose);
//!     let analysis = scoring::analyze_form(frame_metrics);
//!     println!("Score: {}/10", analysis.form_score);
//!     for tip in &analysis.recommendations {
//!         println!("Tip: {tip}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Live Camera Session
//!
//! ```no_run
//! use volleyball_technique_analysis::config::Config;
//! use volleyball_technique_analysis::pose_detector::PoseDetector;
//! use volleyball_technique_analysis::session::{CancelToken, SessionAnalyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let detector = PoseDetector::new(&config.model.path)?;
//! let mut analyzer = SessionAnalyzer::new(detector).with_sampling(config.sampling.clone());
//!
//! // Clones share cancellation state, so another thread can stop the session
//! let token = CancelToken::new();
//! let report = analyzer.analyze_camera(&config.camera, &token)?;
//!
//! println!("Session score: {}/10", report.form_score);
//! # Ok(())
//! # }
//! ```

/// Keypoint and pose types for the 17 point `COCO` skeleton
pub mod keypoint;

/// Pose detection with the `MoveNet` Thunder ONNX model
pub mod pose_detector;

/// Frame acquisition from live cameras and uploaded video files
pub mod frame_source;

/// Joint angle and alignment metrics computed from a pose
pub mod metrics;

/// Per-frame form scoring and technique feedback
pub mod scoring;

/// Session orchestration, cancellation, and report aggregation
pub mod session;

/// Error types and result handling
pub mod error;

/// Constants used throughout the pipeline
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
