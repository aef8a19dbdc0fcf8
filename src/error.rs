//! Error types for the technique analysis library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No capture device is present at the requested index
    #[error("No camera detected on your device. Please upload a video instead.")]
    CameraUnavailable,

    /// A capture device exists but access to it was refused
    #[error("Camera access was denied. Please check your permissions or upload a video instead.")]
    PermissionDenied,

    /// Any other live-capture failure
    #[error("Unable to access camera. Please try uploading a video instead. ({0})")]
    CameraError(String),

    /// The given path is not a recognized video file
    #[error("Please upload a video file ({0} is not a supported video type)")]
    InvalidFileType(String),

    /// The pose model could not be read or parsed
    #[error("Failed to load pose model from {path}: {source}")]
    ModelLoadError {
        /// Path the load was attempted from
        path: String,
        /// Underlying runtime error
        #[source]
        source: ort::Error,
    },

    /// Every sampled frame was discarded as unusable
    #[error("No valid poses detected in the video")]
    NoValidPosesDetected,

    /// A single frame could not be seeked/decoded within the timeout.
    /// Recoverable: the session aggregator skips the frame and continues.
    #[error("Frame at {timestamp_secs:.1}s did not load within {timeout_ms}ms")]
    FrameTimeout {
        /// Position of the frame that was requested
        timestamp_secs: f64,
        /// Timeout that was exceeded
        timeout_ms: u64,
    },

    /// The analysis session was cancelled between frames
    #[error("Analysis session cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
