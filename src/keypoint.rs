//! Keypoint and pose types for the single-pose COCO landmark layout.

use crate::constants::NUM_KEYPOINTS;

/// Named anatomical landmarks in MoveNet output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointKind {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointKind {
    /// Number of landmarks in the layout
    pub const COUNT: usize = NUM_KEYPOINTS;

    /// All kinds in model output order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Row index of this landmark in the model output
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case landmark name as used in pose datasets
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

/// A single landmark's estimated position and detection confidence.
///
/// Coordinates are normalized to the frame: x grows rightward, y grows
/// downward, both in [0, 1] for points inside the image. The default value
/// is a zero-coordinate, zero-confidence point, which is how an undetected
/// landmark is represented so downstream geometry degenerates to zero
/// instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Keypoint {
    /// Normalized horizontal position
    pub x: f32,
    /// Normalized vertical position
    pub y: f32,
    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

impl Keypoint {
    /// Create a keypoint from model output values
    #[must_use]
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }
}

/// The full set of keypoints for one detected person in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    keypoints: [Keypoint; KeypointKind::COUNT],
}

impl Pose {
    /// Build a pose from the 17 keypoints in model output order
    #[must_use]
    pub fn new(keypoints: [Keypoint; KeypointKind::COUNT]) -> Self {
        Self { keypoints }
    }

    /// Landmark lookup by kind
    #[must_use]
    pub fn keypoint(&self, kind: KeypointKind) -> Keypoint {
        self.keypoints[kind.index()]
    }

    /// All keypoints in model output order
    #[must_use]
    pub fn keypoints(&self) -> &[Keypoint; KeypointKind::COUNT] {
        &self.keypoints
    }

    /// Overall pose score: the mean of all keypoint confidences, following
    /// the convention the upstream MoveNet runtime uses
    #[must_use]
    pub fn score(&self) -> f32 {
        let total: f32 = self.keypoints.iter().map(|kp| kp.confidence).sum();
        total / KeypointKind::COUNT as f32
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new([Keypoint::default(); KeypointKind::COUNT])
    }
}
