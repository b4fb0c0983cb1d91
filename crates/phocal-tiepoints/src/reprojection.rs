use phocal_camera::{
    project_point_distorted, project_with_matrix, projection_matrix, undistort_pixel,
    UndistortCriteria,
};
use serde::Serialize;

use crate::error::ProjectError;
use crate::source::ProjectSource;

/// Comparison of a manual projection-matrix reprojection with the lens model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReprojectionReport {
    /// Projection matrix `P = K [R|t]` of the camera.
    pub projection_matrix: [[f64; 4]; 3],
    /// Pixel obtained by applying `P` to the point.
    pub manual_undistorted: [f64; 2],
    /// Pixel predicted by the full distortion model.
    pub model_distorted: [f64; 2],
    /// `model_distorted` after iterative undistortion.
    pub undistorted_from_distorted: [f64; 2],
    /// Residuals of the undistortion, one per iteration.
    pub residual_history: Vec<(f64, f64)>,
    /// Shift introduced by the lens, `model_distorted - undistorted_from_distorted`.
    pub distortion_correction: [f64; 2],
    /// Disagreement between the manual and the model path,
    /// `manual_undistorted - undistorted_from_distorted`.
    pub difference: [f64; 2],
}

impl ReprojectionReport {
    /// Euclidean norm of [`ReprojectionReport::difference`] in pixels.
    pub fn difference_norm(&self) -> f64 {
        self.difference[0].hypot(self.difference[1])
    }
}

/// Reproject a tiepoint into a camera with the manual projection matrix and
/// with the lens model, and compare both.
///
/// # Arguments
///
/// * `source` - The project data
/// * `point_index` - Index of the tiepoint
/// * `camera_index` - Index of the camera
/// * `criteria` - Stopping criteria of the undistortion
pub fn reprojection_report<S: ProjectSource + ?Sized>(
    source: &S,
    point_index: usize,
    camera_index: usize,
    criteria: &UndistortCriteria,
) -> Result<ReprojectionReport, ProjectError> {
    let point = source
        .points()
        .get(point_index)
        .ok_or(ProjectError::PointNotFound(point_index))?;
    let camera = source.camera_or_err(camera_index)?;
    let pose = camera.pose()?;
    let intrinsics = &camera.sensor.intrinsics;
    let distortion = &camera.sensor.distortion;

    let p = projection_matrix(intrinsics, &pose)?;
    let manual = project_with_matrix(&p, &point.coord)?;
    let distorted = project_point_distorted(&point.coord, intrinsics, distortion, &pose)?;
    let (undistorted, result) = undistort_pixel(&distorted, intrinsics, distortion, criteria)?;

    let report = ReprojectionReport {
        projection_matrix: p,
        manual_undistorted: manual,
        model_distorted: distorted,
        undistorted_from_distorted: undistorted,
        residual_history: result.residuals,
        distortion_correction: [
            distorted[0] - undistorted[0],
            distorted[1] - undistorted[1],
        ],
        difference: [manual[0] - undistorted[0], manual[1] - undistorted[1]],
    };

    log::debug!(
        "Track {} in camera {}: manual {:?}, model {:?}, difference {:.3e} px",
        point.track_id,
        camera.label,
        report.manual_undistorted,
        report.undistorted_from_distorted,
        report.difference_norm()
    );

    Ok(report)
}
