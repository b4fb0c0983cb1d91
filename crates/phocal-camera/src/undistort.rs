use serde::{Deserialize, Serialize};

use crate::distortion::{apply_distortion, pixel_to_distorted, DistortionCoefficients};
use crate::error::CameraError;
use crate::intrinsics::CameraIntrinsics;

/// Termination criteria for the iterative undistortion.
///
/// By default the refinement runs exactly `max_iterations` times. Setting a
/// `tolerance` enables an early exit once `|dx| + |dy|` drops below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UndistortCriteria {
    /// Maximum number of fixed-point iterations.
    pub max_iterations: usize,
    /// Optional early exit threshold on `|dx| + |dy|`.
    #[serde(default)]
    pub tolerance: Option<f64>,
}

impl Default for UndistortCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            tolerance: None,
        }
    }
}

/// Result of the iterative undistortion of one normalized coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct UndistortResult {
    /// The x coordinate of the undistorted normalized point.
    pub x: f64,
    /// The y coordinate of the undistorted normalized point.
    pub y: f64,
    /// The residual `(dx, dy)` measured at each iteration.
    pub residuals: Vec<(f64, f64)>,
}

impl UndistortResult {
    /// Number of iterations that were run.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.residuals.len()
    }

    /// The last residual as `|dx| + |dy|`, or infinity when no iteration ran.
    pub fn final_residual(&self) -> f64 {
        self.residuals
            .last()
            .map_or(f64::INFINITY, |(dx, dy)| dx.abs() + dy.abs())
    }

    /// Fail with [`CameraError::UndistortionDidNotConverge`] when the last
    /// residual is above `tolerance` or when no iteration ran.
    pub fn ensure_converged(&self, tolerance: f64) -> Result<(), CameraError> {
        let residual = self.final_residual();
        if residual.is_finite() && residual <= tolerance {
            return Ok(());
        }
        Err(CameraError::UndistortionDidNotConverge {
            residual,
            tolerance,
            iterations: self.iterations(),
        })
    }
}

/// Undistort a normalized coordinate by fixed-point iteration.
///
/// Each iteration distorts the current estimate, measures the residual against
/// the observed distorted coordinate and subtracts it from the estimate.
///
/// # Arguments
///
/// * `x_dist` - The x coordinate of the distorted normalized point
/// * `y_dist` - The y coordinate of the distorted normalized point
/// * `distortion` - The distortion parameters of the camera
/// * `criteria` - The termination criteria
///
/// # Returns
///
/// The undistorted estimate and the residual history. Divergence is not
/// detected here; see [`UndistortResult::ensure_converged`].
pub fn undistort(
    x_dist: f64,
    y_dist: f64,
    distortion: &DistortionCoefficients,
    criteria: &UndistortCriteria,
) -> UndistortResult {
    let (mut x, mut y) = (x_dist, y_dist);
    let mut residuals = Vec::with_capacity(criteria.max_iterations);

    for i in 0..criteria.max_iterations {
        let (xd, yd) = apply_distortion(x, y, distortion);
        let dx = xd - x_dist;
        let dy = yd - y_dist;
        x -= dx;
        y -= dy;
        residuals.push((dx, dy));

        log::trace!("Iteration {}: x={}, y={}, residual=({}, {})", i, x, y, dx, dy);

        if let Some(tolerance) = criteria.tolerance {
            if dx.abs() + dy.abs() < tolerance {
                log::debug!("Undistortion converged in {} iterations", i + 1);
                break;
            }
        }
    }

    UndistortResult { x, y, residuals }
}

/// Undistort a pixel observed through the lens.
///
/// The pixel is mapped to a distorted normalized coordinate through the
/// inverse of the skewed pixel mapping, undistorted, and mapped back with the
/// pinhole model. The output is comparable to
/// [`project_point`](crate::projection::project_point).
pub fn undistort_pixel(
    pixel: &[f64; 2],
    intrinsic: &CameraIntrinsics,
    distortion: &DistortionCoefficients,
    criteria: &UndistortCriteria,
) -> Result<([f64; 2], UndistortResult), CameraError> {
    intrinsic.validate()?;
    let fx = intrinsic.f + distortion.b1;
    if !fx.is_finite() || fx <= 0.0 {
        return Err(CameraError::InvalidIntrinsics(format!(
            "focal length plus affinity must be positive, got {fx}"
        )));
    }

    let (xd, yd) = pixel_to_distorted(pixel[0], pixel[1], intrinsic, distortion);
    let result = undistort(xd, yd, distortion, criteria);

    Ok((intrinsic.normalized_to_pixel(result.x, result.y), result))
}

/// Same as [`undistort_pixel`] but requires the final residual to be below `tolerance`.
pub fn undistort_pixel_checked(
    pixel: &[f64; 2],
    intrinsic: &CameraIntrinsics,
    distortion: &DistortionCoefficients,
    criteria: &UndistortCriteria,
    tolerance: f64,
) -> Result<[f64; 2], CameraError> {
    let (undistorted, result) = undistort_pixel(pixel, intrinsic, distortion, criteria)?;
    result.ensure_converged(tolerance)?;
    Ok(undistorted)
}
