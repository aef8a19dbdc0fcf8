//! Tests for video upload validation and frame sampling

use std::fs;
use std::process::Command;

use opencv::prelude::*;
use volleyball_technique_analysis::config::CameraConfig;
use volleyball_technique_analysis::frame_source::FrameSource;
use volleyball_technique_analysis::Error;

/// Generate a short test clip with ffmpeg
fn generate_test_video(output_path: &str, duration_seconds: u32) -> Result<(), String> {
    let output = Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "lavfi",
            "-i",
            &format!("testsrc=duration={duration_seconds}:size=320x240:rate=30"),
            "-vf",
            "format=yuv420p",
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            output_path,
        ])
        .output()
        .map_err(|e| format!("Failed to execute ffmpeg: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("ffmpeg failed: {stderr}"));
    }

    Ok(())
}

#[test]
fn test_rejects_non_video_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.txt");
    fs::write(&path, "serve, set, spike").unwrap();

    let Err(err) = FrameSource::open_file(&path) else {
        panic!("Expected a rejection for a non-video extension");
    };
    assert!(matches!(err, Error::InvalidFileType(_)));
    assert_eq!(
        err.to_string(),
        format!(
            "Please upload a video file ({} is not a supported video type)",
            path.display()
        )
    );
}

#[test]
fn test_missing_video_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.mp4");

    match FrameSource::open_file(&path) {
        Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        Err(other) => panic!("Expected Io error, got: {other}"),
        Ok(_) => panic!("Opening a missing file should fail"),
    }
}

#[test]
fn test_uppercase_extension_passes_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.MP4");
    fs::write(&path, b"not a real container").unwrap();

    // The garbage payload fails later at decode, never at extension checking
    let Err(err) = FrameSource::open_file(&path) else {
        panic!("Expected a decode failure for a garbage payload");
    };
    assert!(!matches!(err, Error::InvalidFileType(_)));
    assert!(!matches!(err, Error::Io(_)));
}

#[cfg(target_os = "linux")]
#[test]
fn test_missing_camera_device() {
    if std::path::Path::new("/dev/video99").exists() {
        return; // a real device occupies this index
    }

    let config = CameraConfig {
        device_id: 99,
        ..CameraConfig::default()
    };
    let Err(err) = FrameSource::open_camera(&config) else {
        panic!("Expected no camera at device index 99");
    };
    assert!(matches!(err, Error::CameraUnavailable));
    assert_eq!(
        err.to_string(),
        "No camera detected on your device. Please upload a video instead."
    );
}

#[test]
fn test_camera_fallback_messages() {
    assert_eq!(
        Error::PermissionDenied.to_string(),
        "Camera access was denied. Please check your permissions or upload a video instead."
    );
    assert_eq!(
        Error::CameraError("device busy".to_string()).to_string(),
        "Unable to access camera. Please try uploading a video instead. (device busy)"
    );
}

#[test]
#[ignore = "Requires ffmpeg"]
fn test_sampling_from_generated_clip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rally.mp4");
    let path_str = path.to_string_lossy().to_string();

    if let Err(e) = generate_test_video(&path_str, 3) {
        eprintln!("Skipping test: {e}");
        return;
    }

    let mut source = FrameSource::open_file(&path).unwrap();
    assert!(!source.is_live());
    assert!((source.duration_secs() - 3.0).abs() < 0.2);

    // A 3s clip at one-second spacing fills only three or so of the five
    // requested slots
    let frames: Vec<_> = source
        .sample_frames(5)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert!((3..=4).contains(&frames.len()), "got {} frames", frames.len());
    assert_eq!(frames[0].timestamp_secs, 0.0);
    for pair in frames.windows(2) {
        assert!(pair[1].timestamp_secs > pair[0].timestamp_secs);
    }
    for frame in &frames {
        assert!(!frame.image.empty());
    }

    source.release().unwrap();
    source.release().unwrap();
    assert!(source.sample_frames(5).next().is_none());
}
