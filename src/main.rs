//! Volleyball technique analysis application for scoring underhand passing form.

use anyhow::Result;
use clap::Parser;
use log::info;
use volleyball_technique_analysis::config::Config;
use volleyball_technique_analysis::pose_detector::PoseDetector;
use volleyball_technique_analysis::session::{CancelToken, SessionAnalysis, SessionAnalyzer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use (default: 0)
    #[arg(long)]
    cam: Option<i32>,

    /// Video file to analyze instead of the camera
    #[arg(short, long)]
    video: Option<String>,

    /// Path to the MoveNet Thunder ONNX model
    #[arg(short, long)]
    model: Option<String>,

    /// Number of frames to sample from a video file
    #[arg(short, long)]
    frames: Option<usize>,

    /// Live session length in seconds
    #[arg(long)]
    duration: Option<u64>,

    /// Print the session report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Volleyball Technique Analysis");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line flags override the file
    if let Some(cam) = args.cam {
        config.camera.device_id = cam;
    }
    if let Some(model) = args.model {
        config.model.path = model.into();
    }
    if let Some(frames) = args.frames {
        config.sampling.target_frames = frames;
    }
    if let Some(duration) = args.duration {
        config.sampling.live_duration_secs = duration;
    }
    config.validate()?;

    let detector = PoseDetector::new(&config.model.path)?;
    let mut analyzer = SessionAnalyzer::new(detector).with_sampling(config.sampling.clone());

    let token = CancelToken::new();
    let report = match &args.video {
        Some(path) => analyzer.analyze_file(path, &token)?,
        None => analyzer.analyze_camera(&config.camera, &token)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &SessionAnalysis) {
    println!("Form score: {}/10", report.form_score);
    if !report.observations.is_empty() {
        println!();
        println!("Observations:");
        for observation in &report.observations {
            println!("  - {observation}");
        }
    }
    if !report.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for recommendation in &report.recommendations {
            println!("  - {recommendation}");
        }
    }
}
