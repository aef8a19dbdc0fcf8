//! Single-person pose detection with the MoveNet Thunder ONNX model.
//!
//! Frames are resized to the network's fixed input resolution and fed
//! through `ort`. The network always emits 17 keypoints; detections whose
//! mean confidence falls below `MIN_POSE_SCORE` are reported as no pose
//! rather than as an unreliable one.

use std::path::Path;

use log::{debug, info};
use ndarray::Array4;
use opencv::core::{AlgorithmHint, Mat, Size, CV_32FC3};
use opencv::imgproc;
use opencv::prelude::*;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use crate::constants::{MIN_POSE_SCORE, MOVENET_INPUT_SIZE};
use crate::keypoint::{Keypoint, KeypointKind, Pose};
use crate::{Error, Result};

/// MoveNet Thunder wrapped in an ONNX Runtime session
pub struct PoseDetector {
    session: Session,
}

impl PoseDetector {
    /// Load the MoveNet Thunder model from an ONNX file.
    ///
    /// # Errors
    ///
    /// `ModelLoadError` when the file is missing or not a valid model.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let path = model_path.as_ref();
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(path)
            .map_err(|source| Error::ModelLoadError {
                path: path.display().to_string(),
                source,
            })?;
        info!("Loaded pose model from {}", path.display());

        Ok(Self { session })
    }

    /// Run inference on one BGR frame.
    ///
    /// Returns `None` when the mean keypoint confidence is too low to treat
    /// as a person being present.
    ///
    /// # Errors
    ///
    /// Preprocessing or inference failure.
    pub fn detect(&mut self, frame: &Mat) -> Result<Option<Pose>> {
        let input = preprocess_frame(frame)?;
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])?;

        // MoveNet output is [1, 1, 17, 3] rows of (y, x, confidence)
        let output: ndarray::ArrayViewD<f32> =
            outputs["StatefulPartitionedCall_0"].try_extract_array()?;

        let mut keypoints = [Keypoint::default(); KeypointKind::COUNT];
        for (i, slot) in keypoints.iter_mut().enumerate() {
            let y = output[[0, 0, i, 0]];
            let x = output[[0, 0, i, 1]];
            let confidence = output[[0, 0, i, 2]];
            *slot = Keypoint::new(x, y, confidence);
        }

        let pose = Pose::new(keypoints);
        if pose.score() < MIN_POSE_SCORE {
            debug!("Pose score {:.3} below detection cutoff", pose.score());
            return Ok(None);
        }
        Ok(Some(pose))
    }
}

/// Convert a BGR frame into the network input tensor.
///
/// BGR becomes RGB, the frame is resized to the square input resolution,
/// and pixels stay in the 0.0 to 255.0 range the model was exported with.
fn preprocess_frame(frame: &Mat) -> Result<Array4<f32>> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(
        frame,
        &mut rgb,
        imgproc::COLOR_BGR2RGB,
        0,
        AlgorithmHint::ALGO_HINT_DEFAULT,
    )?;

    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(MOVENET_INPUT_SIZE, MOVENET_INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let mut float_mat = Mat::default();
    resized.convert_to(&mut float_mat, CV_32FC3, 1.0, 0.0)?;

    let side = MOVENET_INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, 3));
    for y in 0..MOVENET_INPUT_SIZE {
        for x in 0..MOVENET_INPUT_SIZE {
            let pixel = float_mat.at_2d::<opencv::core::Vec3f>(y, x)?;
            tensor[[0, y as usize, x as usize, 0]] = pixel[0];
            tensor[[0, y as usize, x as usize, 1]] = pixel[1];
            tensor[[0, y as usize, x as usize, 2]] = pixel[2];
        }
    }

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC3};

    #[test]
    fn test_preprocess_shape() {
        let frame =
            Mat::new_rows_cols_with_default(480, 640, CV_8UC3, Scalar::all(128.0)).unwrap();
        let tensor = preprocess_frame(&frame).unwrap();
        let side = MOVENET_INPUT_SIZE as usize;
        assert_eq!(tensor.shape(), &[1, side, side, 3]);
    }

    #[test]
    fn test_preprocess_pixel_scale() {
        // A uniform frame stays uniform through resize and conversion
        let frame = Mat::new_rows_cols_with_default(720, 1280, CV_8UC3, Scalar::all(200.0)).unwrap();
        let tensor = preprocess_frame(&frame).unwrap();
        assert!((tensor[[0, 0, 0, 0]] - 200.0).abs() < f32::EPSILON);
        assert!((tensor[[0, 128, 128, 2]] - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_preprocess_channel_swap() {
        // Pure blue in BGR must land in the tensor's last (blue) channel
        let frame =
            Mat::new_rows_cols_with_default(64, 64, CV_8UC3, Scalar::new(255.0, 0.0, 0.0, 0.0))
                .unwrap();
        let tensor = preprocess_frame(&frame).unwrap();
        assert!((tensor[[0, 10, 10, 0]] - 0.0).abs() < f32::EPSILON);
        assert!((tensor[[0, 10, 10, 2]] - 255.0).abs() < f32::EPSILON);
    }
}
