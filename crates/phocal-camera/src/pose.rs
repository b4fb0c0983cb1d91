use serde::{Deserialize, Serialize};

use crate::error::CameraError;
use crate::linalg::{self, mat33_mul_vec3, transpose33};

/// Rigid transform `[R|t]` from the reference frame to the camera frame.
///
/// # Fields
///
/// * `rotation` - The rotation matrix of the camera 3x3
/// * `translation` - The translation vector of the camera 3x1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// The rotation matrix of the camera 3x3
    pub rotation: [[f64; 3]; 3],
    /// The translation vector of the camera 3x1
    pub translation: [f64; 3],
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::identity()
    }
}

impl CameraPose {
    /// The identity pose: the reference frame is the camera frame.
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }

    /// Create a pose from a 3x4 `[R|t]` matrix.
    pub fn from_matrix34(rt: &[[f64; 4]; 3]) -> Self {
        let mut rotation = [[0.0; 3]; 3];
        let mut translation = [0.0; 3];
        for (i, row) in rt.iter().enumerate() {
            rotation[i].copy_from_slice(&row[..3]);
            translation[i] = row[3];
        }
        Self {
            rotation,
            translation,
        }
    }

    /// Create the reference-to-camera pose from a 4x4 camera-to-reference transform.
    ///
    /// Photogrammetry projects store camera transforms in the camera-to-chunk
    /// direction; projecting needs the inverse.
    pub fn from_camera_to_world(transform: &[[f64; 4]; 4]) -> Result<Self, CameraError> {
        Self::check_affine(transform)?;

        let world_from_camera = Self::from_matrix34(&[transform[0], transform[1], transform[2]]);
        Ok(world_from_camera.inverse())
    }

    /// Check that a 4x4 transform has the affine bottom row `[0, 0, 0, 1]`.
    pub fn check_affine(transform: &[[f64; 4]; 4]) -> Result<(), CameraError> {
        if transform[3] != [0.0, 0.0, 0.0, 1.0] {
            return Err(CameraError::InvalidPose(format!(
                "expected bottom row [0, 0, 0, 1], got {:?}",
                transform[3]
            )));
        }
        Ok(())
    }

    /// The inverse rigid transform: `R' = R^T`, `t' = -R^T t`.
    pub fn inverse(&self) -> Self {
        let rotation = transpose33(&self.rotation);
        let t = mat33_mul_vec3(&rotation, &self.translation);
        Self {
            rotation,
            translation: [-t[0], -t[1], -t[2]],
        }
    }

    /// The pose as a 3x4 `[R|t]` matrix.
    pub fn matrix34(&self) -> [[f64; 4]; 3] {
        let mut rt = [[0.0; 4]; 3];
        for (i, row) in rt.iter_mut().enumerate() {
            row[..3].copy_from_slice(&self.rotation[i]);
            row[3] = self.translation[i];
        }
        rt
    }

    /// Position of the camera centre in the reference frame.
    pub fn camera_center(&self) -> [f64; 3] {
        self.inverse().translation
    }

    /// Transform a point from the reference frame into the camera frame.
    pub fn transform_point(&self, point: &[f64; 3]) -> [f64; 3] {
        self.transform_homogeneous(&[point[0], point[1], point[2], 1.0])
    }

    /// Apply `[R|t]` to a homogeneous point `(x, y, z, w)`.
    pub fn transform_homogeneous(&self, point: &[f64; 4]) -> [f64; 3] {
        let xyz = [point[0], point[1], point[2]];
        let r = mat33_mul_vec3(&self.rotation, &xyz);
        [
            r[0] + self.translation[0] * point[3],
            r[1] + self.translation[1] * point[3],
            r[2] + self.translation[2] * point[3],
        ]
    }

    /// Transform a batch of points into the camera frame.
    pub fn transform_points(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        let mut dst_points = vec![[0.0; 3]; points.len()];
        linalg::transform_points(points, &self.rotation, &self.translation, &mut dst_points);
        dst_points
    }

    /// Check that `R R^T` is the identity within `tol`.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        (0..3).all(|i| {
            (0..3).all(|j| {
                let v = linalg::dot_product3(&self.rotation[i], &self.rotation[j]);
                let expected = if i == j { 1.0 } else { 0.0 };
                (v - expected).abs() <= tol
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rotation_z(angle: f64) -> [[f64; 3]; 3] {
        let (s, c) = angle.sin_cos();
        [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
    }

    #[test]
    fn test_matrix34_roundtrip() {
        let pose = CameraPose {
            rotation: rotation_z(0.3),
            translation: [1.0, -2.0, 3.0],
        };
        assert_eq!(CameraPose::from_matrix34(&pose.matrix34()), pose);
    }

    #[test]
    fn test_from_camera_to_world() -> Result<(), CameraError> {
        let r = rotation_z(0.5);
        let center = [10.0, 20.0, 30.0];
        let transform = [
            [r[0][0], r[0][1], r[0][2], center[0]],
            [r[1][0], r[1][1], r[1][2], center[1]],
            [r[2][0], r[2][1], r[2][2], center[2]],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let pose = CameraPose::from_camera_to_world(&transform)?;

        // the camera centre maps to the origin of the camera frame
        let origin = pose.transform_point(&center);
        for v in origin {
            assert_relative_eq!(v, 0.0, epsilon = 1e-12);
        }
        let c = pose.camera_center();
        for i in 0..3 {
            assert_relative_eq!(c[i], center[i], epsilon = 1e-12);
        }
        assert!(pose.is_orthonormal(1e-12));
        Ok(())
    }

    #[test]
    fn test_from_camera_to_world_rejects_projective() {
        let mut transform = [[0.0; 4]; 4];
        transform[3] = [0.0, 0.0, 1.0, 1.0];
        assert!(matches!(
            CameraPose::from_camera_to_world(&transform),
            Err(CameraError::InvalidPose(_))
        ));
    }

    #[test]
    fn test_transform_homogeneous_scales_translation() {
        let pose = CameraPose {
            rotation: CameraPose::identity().rotation,
            translation: [1.0, 2.0, 3.0],
        };
        assert_eq!(pose.transform_homogeneous(&[1.0, 1.0, 1.0, 2.0]), [3.0, 5.0, 7.0]);
        assert_eq!(pose.transform_point(&[1.0, 1.0, 1.0]), [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_transform_points_matches_single() {
        let pose = CameraPose {
            rotation: rotation_z(-1.1),
            translation: [0.5, 0.25, -4.0],
        };
        let points = vec![[1.0, 2.0, 3.0], [-4.0, 0.5, 9.0], [0.0, 0.0, 0.0]];
        let batch = pose.transform_points(&points);
        for (p, b) in points.iter().zip(batch.iter()) {
            let single = pose.transform_point(p);
            for i in 0..3 {
                assert_relative_eq!(single[i], b[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_is_orthonormal_detects_scale() {
        let pose = CameraPose {
            rotation: [[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
        };
        assert!(!pose.is_orthonormal(1e-6));
    }
}
