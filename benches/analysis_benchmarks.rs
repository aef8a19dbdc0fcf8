//! Benchmarks for the pose analysis pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use volleyball_technique_analysis::frame_source::sample_timestamps;
use volleyball_technique_analysis::keypoint::{Keypoint, KeypointKind, Pose};
use volleyball_technique_analysis::metrics::{joint_angle, measure};
use volleyball_technique_analysis::scoring::{self, FrameAnalysis};
use volleyball_technique_analysis::session;

/// A ready-position pose with a flat platform and bent knees
fn athletic_pose() -> Pose {
    let placements = [
        (KeypointKind::LeftShoulder, 0.40, 0.30),
        (KeypointKind::RightShoulder, 0.60, 0.30),
        (KeypointKind::LeftElbow, 0.40, 0.50),
        (KeypointKind::RightElbow, 0.60, 0.50),
        (KeypointKind::LeftWrist, 0.20, 0.50),
        (KeypointKind::RightWrist, 0.80, 0.50),
        (KeypointKind::LeftHip, 0.42, 0.55),
        (KeypointKind::RightHip, 0.58, 0.55),
        (KeypointKind::LeftKnee, 0.42, 0.75),
        (KeypointKind::RightKnee, 0.58, 0.75),
        (KeypointKind::LeftAnkle, 0.38, 0.95),
        (KeypointKind::RightAnkle, 0.62, 0.95),
    ];
    let mut keypoints = [Keypoint::default(); KeypointKind::COUNT];
    for (kind, x, y) in placements {
        keypoints[kind.index()] = Keypoint::new(x, y, 0.9);
    }
    Pose::new(keypoints)
}

fn benchmark_joint_angle(c: &mut Criterion) {
    let wrist = Keypoint::new(0.20, 0.50, 1.0);
    let elbow = Keypoint::new(0.40, 0.50, 1.0);
    let shoulder = Keypoint::new(0.40, 0.30, 1.0);

    c.bench_function("joint_angle", |b| {
        b.iter(|| black_box(joint_angle(black_box(wrist), black_box(elbow), black_box(shoulder))));
    });
}

fn benchmark_pose_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_metrics");
    let pose = athletic_pose();
    let metrics = measure(&pose);

    group.bench_function("measure", |b| {
        b.iter(|| black_box(measure(black_box(&pose))));
    });

    group.bench_function("analyze_form", |b| {
        b.iter(|| black_box(scoring::analyze_form(black_box(metrics.clone()))));
    });

    group.bench_function("analyze_pose", |b| {
        b.iter(|| black_box(scoring::analyze_pose(black_box(Some(&pose)))));
    });

    group.finish();
}

fn benchmark_session_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_aggregation");

    for frame_count in [10, 100] {
        let frames: Vec<FrameAnalysis> = (0..frame_count)
            .map(|i| FrameAnalysis {
                form_score: (i % 11) as u8,
                observations: vec![
                    "Hips not level".to_string(),
                    "Need more knee bend".to_string(),
                ],
                recommendations: vec![
                    "Keep your hips level and square to the target".to_string(),
                    "Bend your knees more to maintain an athletic position".to_string(),
                ],
                metrics: None,
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("aggregate", frame_count),
            &frames,
            |b, frames| {
                b.iter(|| black_box(session::aggregate(black_box(frames)).unwrap()));
            },
        );
    }

    group.finish();
}

fn benchmark_sample_timestamps(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_timestamps");

    for duration_secs in [30.0, 600.0, 3600.0] {
        group.bench_with_input(
            BenchmarkId::new("duration", duration_secs as u64),
            &duration_secs,
            |b, &duration_secs| {
                b.iter(|| black_box(sample_timestamps(black_box(duration_secs), black_box(10))));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_joint_angle,
    benchmark_pose_metrics,
    benchmark_session_aggregation,
    benchmark_sample_timestamps
);
criterion_main!(benches);
