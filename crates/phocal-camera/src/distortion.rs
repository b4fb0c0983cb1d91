use serde::{Deserialize, Serialize};

use crate::intrinsics::CameraIntrinsics;

/// Represents the Brown-Conrady distortion parameters of a frame camera.
///
/// The higher order tangential scaling `p3`, `p4` and the affinity / skew terms
/// `b1`, `b2` are optional in calibration files and default to zero.
///
/// # Fields
///
/// * `k1` - The first radial distortion coefficient
/// * `k2` - The second radial distortion coefficient
/// * `k3` - The third radial distortion coefficient
/// * `k4` - The fourth radial distortion coefficient
/// * `p1` - The first tangential distortion coefficient
/// * `p2` - The second tangential distortion coefficient
/// * `p3` - The first tangential scaling coefficient
/// * `p4` - The second tangential scaling coefficient
/// * `b1` - The affinity coefficient in pixels
/// * `b2` - The skew coefficient in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistortionCoefficients {
    /// The first radial distortion coefficient
    pub k1: f64,
    /// The second radial distortion coefficient
    pub k2: f64,
    /// The third radial distortion coefficient
    pub k3: f64,
    /// The fourth radial distortion coefficient
    pub k4: f64,
    /// The first tangential distortion coefficient
    pub p1: f64,
    /// The second tangential distortion coefficient
    pub p2: f64,
    /// The first tangential scaling coefficient
    #[serde(default)]
    pub p3: f64,
    /// The second tangential scaling coefficient
    #[serde(default)]
    pub p4: f64,
    /// The affinity coefficient in pixels
    #[serde(default)]
    pub b1: f64,
    /// The skew coefficient in pixels
    #[serde(default)]
    pub b2: f64,
}

impl DistortionCoefficients {
    /// Distortion parameters with all coefficients set to zero.
    pub fn none() -> Self {
        Self::default()
    }

    /// Distortion parameters with radial and tangential coefficients only.
    pub fn radial_tangential(k1: f64, k2: f64, k3: f64, k4: f64, p1: f64, p2: f64) -> Self {
        Self {
            k1,
            k2,
            k3,
            k4,
            p1,
            p2,
            ..Self::default()
        }
    }

    /// Check whether every coefficient is zero.
    pub fn is_identity(&self) -> bool {
        [
            self.k1, self.k2, self.k3, self.k4, self.p1, self.p2, self.p3, self.p4, self.b1,
            self.b2,
        ]
        .iter()
        .all(|c| *c == 0.0)
    }

    /// Coefficients in the OpenCV order `[k1, k2, p1, p2, k3]`.
    ///
    /// NOTE: `k4`, `p3`, `p4`, `b1` and `b2` have no counterpart in this layout
    /// and are dropped. The tangential terms are copied as they are, but OpenCV
    /// pairs `p2` with `r^2 + 2x^2` where [`apply_distortion`] pairs `p1`, so
    /// OpenCV reproduces this model only after swapping `p1` and `p2`.
    pub fn opencv_coefficients(&self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }
}

/// Distort a normalized image coordinate.
///
/// # Arguments
///
/// * `x` - The x coordinate of the undistorted normalized point
/// * `y` - The y coordinate of the undistorted normalized point
/// * `distortion` - The distortion parameters of the camera
///
/// # Returns
///
/// The distorted normalized point `(x', y')`.
pub fn apply_distortion(x: f64, y: f64, distortion: &DistortionCoefficients) -> (f64, f64) {
    let DistortionCoefficients {
        k1,
        k2,
        k3,
        k4,
        p1,
        p2,
        p3,
        p4,
        ..
    } = *distortion;

    let r2 = x * x + y * y;
    let r4 = r2 * r2;

    // radial distortion
    let rad = 1.0 + k1 * r2 + k2 * r4 + k3 * r4 * r2 + k4 * r4 * r4;

    // tangential distortion
    let tang_scale = 1.0 + p3 * r2 + p4 * r4;
    let x_tang = (p1 * (r2 + 2.0 * x * x) + 2.0 * p2 * x * y) * tang_scale;
    let y_tang = (p2 * (r2 + 2.0 * y * y) + 2.0 * p1 * x * y) * tang_scale;

    (x * rad + x_tang, y * rad + y_tang)
}

/// Map a distorted normalized coordinate to pixels, including affinity and skew.
///
/// The intrinsics must have been validated by the caller.
pub(crate) fn distorted_to_pixel(
    xd: f64,
    yd: f64,
    intrinsic: &CameraIntrinsics,
    distortion: &DistortionCoefficients,
) -> [f64; 2] {
    [
        intrinsic.principal_x() + xd * intrinsic.f + xd * distortion.b1 + yd * distortion.b2,
        intrinsic.principal_y() + yd * intrinsic.f,
    ]
}

/// Exact inverse of [`distorted_to_pixel`].
///
/// The caller must ensure `f + b1` is positive.
pub(crate) fn pixel_to_distorted(
    u: f64,
    v: f64,
    intrinsic: &CameraIntrinsics,
    distortion: &DistortionCoefficients,
) -> (f64, f64) {
    let yd = (v - intrinsic.principal_y()) / intrinsic.f;
    let xd = (u - intrinsic.principal_x() - yd * distortion.b2) / (intrinsic.f + distortion.b1);
    (xd, yd)
}
