//! Geometric form metrics derived from a detected pose.
//!
//! Everything here is a pure function of the input pose: the same keypoints
//! always produce the same metrics.

use serde::Serialize;

use crate::keypoint::{Keypoint, KeypointKind, Pose};

/// Detection confidence per tracked body part, each the mean of its left and
/// right keypoint confidences
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartConfidences {
    pub shoulders: f32,
    pub elbows: f32,
    pub wrists: f32,
    pub hips: f32,
    pub knees: f32,
    pub ankles: f32,
}

impl PartConfidences {
    /// Mean confidence across all tracked parts
    #[must_use]
    pub fn average(&self) -> f32 {
        (self.shoulders + self.elbows + self.wrists + self.hips + self.knees + self.ankles) / 6.0
    }
}

/// Per-frame measurement bundle computed from one pose.
///
/// Angles are degrees in [0, 180]; alignment deltas and the height ratio are
/// in normalized image coordinates; confidences are in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseMetrics {
    /// Wrist-elbow-elbow angle approximating forearm platform flatness
    pub arm_platform_angle: f32,
    /// Shoulder-elbow-wrist angle, left arm
    pub left_elbow_angle: f32,
    /// Shoulder-elbow-wrist angle, right arm
    pub right_elbow_angle: f32,
    /// Hip-knee-ankle angle, left leg
    pub left_knee_flexion: f32,
    /// Hip-knee-ankle angle, right leg
    pub right_knee_flexion: f32,
    /// Absolute vertical offset between the hips
    pub hip_alignment: f32,
    /// Absolute vertical offset between the shoulders
    pub shoulder_alignment: f32,
    /// Mean hip height, kept for drill-specific analysis
    pub height_ratio: f32,
    /// Ankle separation over shoulder separation
    pub foot_spacing: f32,
    /// Per-part detection confidences
    pub confidences: PartConfidences,
    /// Mean confidence across the tracked parts
    pub avg_confidence: f32,
}

impl PoseMetrics {
    /// Mean of left and right knee flexion (degrees)
    #[must_use]
    pub fn mean_knee_flexion(&self) -> f32 {
        (self.left_knee_flexion + self.right_knee_flexion) / 2.0
    }
}

/// Angle at vertex `b` formed by the rays toward `a` and `c`, in degrees.
///
/// Computed as the absolute difference of the two ray headings, reflected
/// into [0, 180]. Degenerate input (coincident points) yields 0 rather than
/// an error; the confidence gates downstream suppress such frames anyway.
#[must_use]
pub fn joint_angle(a: Keypoint, b: Keypoint, c: Keypoint) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        // a raw difference of exactly 2 pi rounds a hair above 360 degrees
        angle = (360.0 - angle).max(0.0);
    }
    angle
}

/// Compute the full metric set for one pose.
#[must_use]
pub fn measure(pose: &Pose) -> PoseMetrics {
    use KeypointKind::{
        LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle, RightElbow,
        RightHip, RightKnee, RightShoulder, RightWrist,
    };

    let left_shoulder = pose.keypoint(LeftShoulder);
    let right_shoulder = pose.keypoint(RightShoulder);
    let left_hip = pose.keypoint(LeftHip);
    let right_hip = pose.keypoint(RightHip);
    let left_ankle = pose.keypoint(LeftAnkle);
    let right_ankle = pose.keypoint(RightAnkle);

    let confidences = PartConfidences {
        shoulders: part_confidence(pose, LeftShoulder, RightShoulder),
        elbows: part_confidence(pose, LeftElbow, RightElbow),
        wrists: part_confidence(pose, LeftWrist, RightWrist),
        hips: part_confidence(pose, LeftHip, RightHip),
        knees: part_confidence(pose, LeftKnee, RightKnee),
        ankles: part_confidence(pose, LeftAnkle, RightAnkle),
    };

    PoseMetrics {
        arm_platform_angle: joint_angle(
            pose.keypoint(LeftWrist),
            pose.keypoint(LeftElbow),
            pose.keypoint(RightElbow),
        ),
        left_elbow_angle: joint_angle(left_shoulder, pose.keypoint(LeftElbow), pose.keypoint(LeftWrist)),
        right_elbow_angle: joint_angle(
            right_shoulder,
            pose.keypoint(RightElbow),
            pose.keypoint(RightWrist),
        ),
        left_knee_flexion: joint_angle(left_hip, pose.keypoint(LeftKnee), left_ankle),
        right_knee_flexion: joint_angle(right_hip, pose.keypoint(RightKnee), right_ankle),
        hip_alignment: (left_hip.y - right_hip.y).abs(),
        shoulder_alignment: (left_shoulder.y - right_shoulder.y).abs(),
        height_ratio: (left_hip.y + right_hip.y) / 2.0,
        foot_spacing: (left_ankle.x - right_ankle.x).abs() / (left_shoulder.x - right_shoulder.x).abs(),
        avg_confidence: confidences.average(),
        confidences,
    }
}

fn part_confidence(pose: &Pose, left: KeypointKind, right: KeypointKind) -> f32 {
    (pose.keypoint(left).confidence + pose.keypoint(right).confidence) / 2.0
}
