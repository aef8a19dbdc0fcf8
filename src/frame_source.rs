//! Frame acquisition from live cameras and uploaded video files.
//!
//! Both origins sit behind one `FrameSource` handle so the session layer can
//! sample timestamped frames without caring where they come from. The handle
//! owns the OS capture resource exclusively and releases it on drop as well
//! as through `release`, so repeated start/stop cycles never leak a camera.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::config::CameraConfig;
use crate::constants::{DEFAULT_LIVE_INTERVAL_MS, DEFAULT_SEEK_TIMEOUT_MS, MIN_SAMPLE_SPACING_SECS};
use crate::{Error, Result};

/// File extensions accepted as video uploads
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v", "mpg", "mpeg"];

#[derive(Debug, Clone)]
enum SourceKind {
    Camera { device_id: i32 },
    File { path: PathBuf, duration_secs: f64 },
}

/// Exclusive handle on a camera stream or an opened video file
pub struct FrameSource {
    capture: VideoCapture,
    kind: SourceKind,
    live_interval: Duration,
    seek_timeout: Duration,
    released: bool,
}

/// One timestamped frame yielded by the sampler
pub struct SampledFrame {
    /// Seconds from the start of the source
    pub timestamp_secs: f64,
    /// Raw BGR image
    pub image: Mat,
}

impl FrameSource {
    /// Open the camera at `config.device_id` for live capture.
    ///
    /// # Errors
    ///
    /// `CameraUnavailable` if no such device exists, `PermissionDenied` if
    /// the device exists but cannot be accessed, `CameraError` for any other
    /// acquisition failure.
    pub fn open_camera(config: &CameraConfig) -> Result<Self> {
        probe_camera_device(config.device_id)?;

        let mut capture = VideoCapture::new(config.device_id, videoio::CAP_ANY)
            .map_err(|e| Error::CameraError(e.to_string()))?;
        let opened = capture
            .is_opened()
            .map_err(|e| Error::CameraError(e.to_string()))?;
        if !opened {
            return Err(Error::CameraError(format!(
                "camera {} failed to open",
                config.device_id
            )));
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, f64::from(config.width))?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, f64::from(config.height))?;
        if config.fps > 0 {
            capture.set(videoio::CAP_PROP_FPS, f64::from(config.fps))?;
        }
        // Keep only the freshest frame so sampled frames are current
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        info!("Opened camera {} for live capture", config.device_id);
        Ok(Self {
            capture,
            kind: SourceKind::Camera {
                device_id: config.device_id,
            },
            live_interval: Duration::from_millis(DEFAULT_LIVE_INTERVAL_MS),
            seek_timeout: Duration::from_millis(DEFAULT_SEEK_TIMEOUT_MS),
            released: false,
        })
    }

    /// Open an uploaded or recorded video file.
    ///
    /// # Errors
    ///
    /// `InvalidFileType` if the extension is not a recognized video
    /// container, `Io` if the file does not exist, `InvalidInput` if the
    /// container cannot be decoded.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !has_video_extension(path) {
            return Err(Error::InvalidFileType(path.display().to_string()));
        }
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("video file not found: {}", path.display()),
            )));
        }

        let capture = VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::InvalidInput(format!(
                "could not decode video: {}",
                path.display()
            )));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let duration_secs = if fps > 0.0 && frame_count > 0.0 {
            frame_count / fps
        } else {
            0.0
        };
        info!("Opened video file {} ({duration_secs:.1}s)", path.display());

        Ok(Self {
            capture,
            kind: SourceKind::File {
                path: path.to_path_buf(),
                duration_secs,
            },
            live_interval: Duration::from_millis(DEFAULT_LIVE_INTERVAL_MS),
            seek_timeout: Duration::from_millis(DEFAULT_SEEK_TIMEOUT_MS),
            released: false,
        })
    }

    /// Override the interval between live samples (defaults to one second)
    #[must_use]
    pub fn with_live_interval(mut self, interval: Duration) -> Self {
        self.live_interval = interval;
        self
    }

    /// Override the per-frame seek/decode timeout
    #[must_use]
    pub fn with_seek_timeout(mut self, timeout: Duration) -> Self {
        self.seek_timeout = timeout;
        self
    }

    /// True when reading from a live camera
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.kind, SourceKind::Camera { .. })
    }

    /// Recorded duration in seconds; zero when unknown or live
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        match &self.kind {
            SourceKind::File { duration_secs, .. } => *duration_secs,
            SourceKind::Camera { .. } => 0.0,
        }
    }

    /// Lazily sample up to `count` frames evenly spaced across the source.
    ///
    /// File sources seek to precomputed timestamps; a file without a
    /// readable duration falls back to consecutive frames from the start.
    /// Live sources yield one frame per interval. The iterator is finite and
    /// not restartable; a `FrameTimeout` item stands for one skippable slot,
    /// any other error ends the sequence.
    pub fn sample_frames(&mut self, count: usize) -> FrameSampler<'_> {
        let plan = match &self.kind {
            SourceKind::File { duration_secs, .. } if *duration_secs > 0.0 => {
                SamplePlan::Seek(sample_timestamps(*duration_secs, count))
            }
            SourceKind::File { .. } => SamplePlan::Sequential,
            SourceKind::Camera { .. } => SamplePlan::Live,
        };
        FrameSampler {
            source: self,
            plan,
            count,
            yielded: 0,
            next_slot: 0,
            started: None,
            finished: false,
        }
    }

    /// Release the underlying capture handle. Idempotent; also runs on drop.
    ///
    /// # Errors
    ///
    /// Backend failure while closing the stream.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.capture.release()?;
        match &self.kind {
            SourceKind::Camera { device_id } => debug!("Released camera {device_id}"),
            SourceKind::File { path, .. } => debug!("Released video file {}", path.display()),
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Mat>> {
        let mut image = Mat::default();
        let ok = self.capture.read(&mut image)?;
        if !ok || image.empty() {
            return Ok(None);
        }
        Ok(Some(image))
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to release capture handle: {e}");
        }
    }
}

enum SamplePlan {
    /// Seek to each timestamp in turn (file with known duration)
    Seek(Vec<f64>),
    /// Consecutive frames from the start (file with unreadable duration)
    Sequential,
    /// One frame per interval from a camera
    Live,
}

/// Iterator over sampled frames; see `FrameSource::sample_frames`
pub struct FrameSampler<'a> {
    source: &'a mut FrameSource,
    plan: SamplePlan,
    count: usize,
    yielded: usize,
    next_slot: usize,
    started: Option<Instant>,
    finished: bool,
}

impl FrameSampler<'_> {
    fn next_seek(&mut self, timestamp_secs: f64) -> Result<SampledFrame> {
        let timeout_ms = self.source.seek_timeout.as_millis() as u64;
        let begun = Instant::now();
        self.source
            .capture
            .set(videoio::CAP_PROP_POS_MSEC, timestamp_secs * 1000.0)?;
        match self.source.read_frame()? {
            Some(image) if begun.elapsed() <= self.source.seek_timeout => Ok(SampledFrame {
                timestamp_secs,
                image,
            }),
            _ => Err(Error::FrameTimeout {
                timestamp_secs,
                timeout_ms,
            }),
        }
    }

    fn next_sequential(&mut self) -> Result<Option<SampledFrame>> {
        let Some(image) = self.source.read_frame()? else {
            return Ok(None);
        };
        let timestamp_secs = self.source.capture.get(videoio::CAP_PROP_POS_MSEC)? / 1000.0;
        Ok(Some(SampledFrame {
            timestamp_secs,
            image,
        }))
    }

    fn next_live(&mut self) -> Result<SampledFrame> {
        let session_start = *self.started.get_or_insert_with(Instant::now);
        let due = self.source.live_interval * (self.yielded as u32 + 1);
        loop {
            let Some(image) = self
                .source
                .read_frame()
                .map_err(|e| Error::CameraError(e.to_string()))?
            else {
                return Err(Error::CameraError("camera stream ended".to_string()));
            };
            // Discard in-between frames so each sample is current when due
            if session_start.elapsed() >= due {
                return Ok(SampledFrame {
                    timestamp_secs: session_start.elapsed().as_secs_f64(),
                    image,
                });
            }
        }
    }
}

impl Iterator for FrameSampler<'_> {
    type Item = Result<SampledFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.yielded >= self.count || self.source.released {
            return None;
        }

        let item = match &self.plan {
            SamplePlan::Seek(schedule) => {
                let Some(&timestamp_secs) = schedule.get(self.next_slot) else {
                    self.finished = true;
                    return None;
                };
                self.next_slot += 1;
                self.next_seek(timestamp_secs)
            }
            SamplePlan::Sequential => match self.next_sequential() {
                Ok(Some(frame)) => Ok(frame),
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => Err(e),
            },
            SamplePlan::Live => self.next_live(),
        };

        match &item {
            Ok(_) => self.yielded += 1,
            // A timed-out slot is skippable; anything else ends the sequence
            Err(Error::FrameTimeout { .. }) => {}
            Err(_) => self.finished = true,
        }
        Some(item)
    }
}

/// Evenly spaced sample timestamps across a recording: `0, i, 2i, ...`
/// strictly below `duration_secs`, where `i` is `duration_secs / count` but
/// never closer together than the minimum spacing. Short clips therefore
/// yield fewer than `count` samples.
#[must_use]
pub fn sample_timestamps(duration_secs: f64, count: usize) -> Vec<f64> {
    if count == 0 || duration_secs <= 0.0 || !duration_secs.is_finite() {
        return Vec::new();
    }
    let interval = (duration_secs / count as f64).max(MIN_SAMPLE_SPACING_SECS);
    let mut timestamps = Vec::with_capacity(count);
    let mut t = 0.0;
    while t < duration_secs && timestamps.len() < count {
        timestamps.push(t);
        t += interval;
    }
    timestamps
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(target_os = "linux")]
fn probe_camera_device(device_id: i32) -> Result<()> {
    use std::io::ErrorKind;

    let node = PathBuf::from(format!("/dev/video{device_id}"));
    if !node.exists() {
        return Err(Error::CameraUnavailable);
    }
    match std::fs::File::open(&node) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(Error::PermissionDenied),
        Err(e) => Err(Error::CameraError(e.to_string())),
    }
}

#[cfg(not(target_os = "linux"))]
fn probe_camera_device(_device_id: i32) -> Result<()> {
    // No portable pre-open probe; open_camera reports CameraError on failure
    Ok(())
}
