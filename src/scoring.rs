//! Heuristic form scoring from pose metrics.
//!
//! The rule checks and the weighted score are a fixed policy, evaluated
//! fresh per frame with no state in between. A check only fires when its
//! body part was detected confidently enough; a low-confidence metric must
//! never trigger feedback.

use serde::Serialize;

use crate::constants::{
    ALIGNMENT_PENALTY_SCALE, ALIGNMENT_TOLERANCE, FOOT_SPACING_THRESHOLD, FOOT_WEIGHT, HIP_WEIGHT,
    KNEE_FLEXION_FULL, KNEE_FLEXION_THRESHOLD, KNEE_WEIGHT, MIN_PART_CONFIDENCE,
    MIN_USABLE_POSE_CONFIDENCE, PLATFORM_ANGLE_FULL, PLATFORM_ANGLE_THRESHOLD, PLATFORM_WEIGHT,
    SHOULDER_WEIGHT,
};
use crate::keypoint::Pose;
use crate::metrics::{measure, PoseMetrics};

/// Result of analyzing a single frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalysis {
    /// Form quality on a 0-10 scale; 0 means "no usable signal"
    pub form_score: u8,
    /// Triggered findings, in fixed check order
    pub observations: Vec<String>,
    /// One coaching cue per triggered finding
    pub recommendations: Vec<String>,
    /// Raw metrics, kept for debugging output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PoseMetrics>,
}

impl FrameAnalysis {
    /// Sentinel for frames where the detector found nobody
    #[must_use]
    pub fn no_pose() -> Self {
        Self {
            form_score: 0,
            observations: vec!["No pose detected".to_string()],
            recommendations: vec!["Please ensure you are visible in the frame".to_string()],
            metrics: None,
        }
    }

    /// Sentinel for poses below the usable-confidence cutoff
    #[must_use]
    pub fn low_pose_confidence() -> Self {
        Self {
            form_score: 0,
            observations: vec!["Low confidence in pose detection".to_string()],
            recommendations: vec![
                "Please ensure better lighting and that your full body is visible".to_string(),
            ],
            metrics: None,
        }
    }
}

/// Map a detection result to its frame analysis.
///
/// `None` means nobody was found in the frame; a pose below the usable
/// cutoff is answered with the low-confidence sentinel rather than being
/// measured and scored.
#[must_use]
pub fn analyze_pose(pose: Option<&Pose>) -> FrameAnalysis {
    let Some(pose) = pose else {
        return FrameAnalysis::no_pose();
    };
    if pose.score() < MIN_USABLE_POSE_CONFIDENCE {
        return FrameAnalysis::low_pose_confidence();
    }
    analyze_form(measure(pose))
}

/// Evaluate the fixed rule set against one frame's metrics.
///
/// Checks run in a fixed order so the aggregator's first-occurrence
/// deduplication stays deterministic. When nothing triggers, the result
/// carries exactly one positive observation instead of empty lists.
#[must_use]
pub fn analyze_form(metrics: PoseMetrics) -> FrameAnalysis {
    if metrics.avg_confidence < MIN_PART_CONFIDENCE {
        return FrameAnalysis {
            form_score: 0,
            observations: vec!["Pose detection confidence too low".to_string()],
            recommendations: vec![
                "Please ensure better lighting and full body visibility".to_string(),
            ],
            metrics: Some(metrics),
        };
    }

    let mut observations = Vec::new();
    let mut recommendations = Vec::new();

    if metrics.arm_platform_angle < PLATFORM_ANGLE_THRESHOLD
        && metrics.confidences.wrists >= MIN_PART_CONFIDENCE
    {
        observations.push("Arms not forming a flat platform".to_string());
        recommendations.push("Keep your arms straighter when creating the platform".to_string());
    }

    if metrics.hip_alignment > ALIGNMENT_TOLERANCE && metrics.confidences.hips >= MIN_PART_CONFIDENCE {
        observations.push("Hips not level".to_string());
        recommendations.push("Keep your hips level and square to the target".to_string());
    }

    if metrics.shoulder_alignment > ALIGNMENT_TOLERANCE
        && metrics.confidences.shoulders >= MIN_PART_CONFIDENCE
    {
        observations.push("Shoulders not level".to_string());
        recommendations.push("Maintain level shoulders throughout the movement".to_string());
    }

    if metrics.mean_knee_flexion() < KNEE_FLEXION_THRESHOLD
        && metrics.confidences.knees >= MIN_PART_CONFIDENCE
    {
        observations.push("Need more knee bend".to_string());
        recommendations.push("Bend your knees more to maintain an athletic position".to_string());
    }

    if metrics.foot_spacing < FOOT_SPACING_THRESHOLD
        && metrics.confidences.ankles >= MIN_PART_CONFIDENCE
    {
        observations.push("Feet too close together".to_string());
        recommendations.push("Keep feet shoulder-width apart for better balance".to_string());
    }

    let form_score = form_score(&metrics);

    if observations.is_empty() {
        observations.push("Good form!".to_string());
        recommendations.push("Keep up the good work!".to_string());
    }

    FrameAnalysis {
        form_score,
        observations,
        recommendations,
        metrics: Some(metrics),
    }
}

/// Confidence-weighted 0-10 score from the five normalized sub-scores.
#[must_use]
pub fn form_score(metrics: &PoseMetrics) -> u8 {
    if metrics.avg_confidence < MIN_PART_CONFIDENCE {
        return 0;
    }

    let platform = clamp01(metrics.arm_platform_angle / PLATFORM_ANGLE_FULL);
    let hip = (1.0 - metrics.hip_alignment * ALIGNMENT_PENALTY_SCALE).max(0.0);
    let shoulder = (1.0 - metrics.shoulder_alignment * ALIGNMENT_PENALTY_SCALE).max(0.0);
    let knee = clamp01(metrics.mean_knee_flexion() / KNEE_FLEXION_FULL);
    let foot = clamp01(metrics.foot_spacing);

    let weighted = (platform * PLATFORM_WEIGHT
        + hip * HIP_WEIGHT
        + shoulder * SHOULDER_WEIGHT
        + knee * KNEE_WEIGHT
        + foot * FOOT_WEIGHT)
        * metrics.avg_confidence;

    (weighted * 10.0).round() as u8
}

fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PartConfidences;

    fn confident_metrics() -> PoseMetrics {
        PoseMetrics {
            arm_platform_angle: 175.0,
            left_elbow_angle: 170.0,
            right_elbow_angle: 170.0,
            left_knee_flexion: 60.0,
            right_knee_flexion: 60.0,
            hip_alignment: 0.02,
            shoulder_alignment: 0.02,
            height_ratio: 0.5,
            foot_spacing: 1.3,
            confidences: PartConfidences {
                shoulders: 0.9,
                elbows: 0.9,
                wrists: 0.9,
                hips: 0.9,
                knees: 0.9,
                ankles: 0.9,
            },
            avg_confidence: 0.9,
        }
    }

    #[test]
    fn test_weight_sum() {
        let total = PLATFORM_WEIGHT + HIP_WEIGHT + SHOULDER_WEIGHT + KNEE_WEIGHT + FOOT_WEIGHT;
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_low_confidence_sentinel() {
        let mut metrics = confident_metrics();
        metrics.avg_confidence = 0.1;
        let analysis = analyze_form(metrics);
        assert_eq!(analysis.form_score, 0);
        assert_eq!(analysis.observations, vec!["Pose detection confidence too low"]);
        assert_eq!(
            analysis.recommendations,
            vec!["Please ensure better lighting and full body visibility"]
        );
    }

    #[test]
    fn test_confidence_at_cutoff() {
        let mut metrics = confident_metrics();
        metrics.avg_confidence = MIN_PART_CONFIDENCE;
        let analysis = analyze_form(metrics);
        assert!(analysis.form_score > 0);
    }

    #[test]
    fn test_good_form() {
        let analysis = analyze_form(confident_metrics());
        assert_eq!(analysis.observations, vec!["Good form!"]);
        assert_eq!(analysis.recommendations, vec!["Keep up the good work!"]);
    }

    #[test]
    fn test_bent_platform() {
        let mut metrics = confident_metrics();
        metrics.arm_platform_angle = 140.0;
        let analysis = analyze_form(metrics);
        assert_eq!(analysis.observations, vec!["Arms not forming a flat platform"]);
        assert_eq!(
            analysis.recommendations,
            vec!["Keep your arms straighter when creating the platform"]
        );
    }

    #[test]
    fn test_low_part_confidence() {
        let mut metrics = confident_metrics();
        metrics.arm_platform_angle = 140.0;
        metrics.confidences.wrists = 0.1;
        let analysis = analyze_form(metrics);
        assert_eq!(analysis.observations, vec!["Good form!"]);
    }

    #[test]
    fn test_perfect_score() {
        let mut metrics = confident_metrics();
        metrics.arm_platform_angle = 180.0;
        metrics.hip_alignment = 0.0;
        metrics.shoulder_alignment = 0.0;
        metrics.left_knee_flexion = 90.0;
        metrics.right_knee_flexion = 90.0;
        metrics.foot_spacing = 1.5;
        metrics.avg_confidence = 1.0;
        assert_eq!(form_score(&metrics), 10);
    }

    #[test]
    fn test_degenerate_foot_ratio() {
        let mut metrics = confident_metrics();
        metrics.foot_spacing = f32::NAN;
        let score = form_score(&metrics);
        assert!(score <= 10);
    }
}
