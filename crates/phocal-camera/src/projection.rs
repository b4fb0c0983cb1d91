use crate::distortion::{apply_distortion, distorted_to_pixel, DistortionCoefficients};
use crate::error::CameraError;
use crate::intrinsics::CameraIntrinsics;
use crate::linalg::matmul33_34;
use crate::pose::CameraPose;

/// Divide a camera-space point by its depth.
fn normalize_camera_point(p_cam: &[f64; 3]) -> Result<(f64, f64), CameraError> {
    let z = p_cam[2];
    if !z.is_finite() || z <= 0.0 {
        return Err(CameraError::DegenerateProjection { z });
    }
    Ok((p_cam[0] / z, p_cam[1] / z))
}

/// Project a 3D point to pixel coordinates with the pinhole model.
///
/// No lens distortion is applied; see [`project_point_distorted`] for the full model.
///
/// # Arguments
///
/// * `point` - The 3D point in the frame expected by `pose`
/// * `intrinsic` - The intrinsic parameters of the camera
/// * `pose` - The transform from the point frame to the camera frame
///
/// # Returns
///
/// The undistorted pixel `[u, v]`, or [`CameraError::DegenerateProjection`]
/// when the point is not in front of the camera.
///
/// Example:
///
/// ```
/// use phocal_camera::{project_point, CameraIntrinsics, CameraPose};
///
/// let intrinsic = CameraIntrinsics::new(8885.78, 0.0, 0.0, 5472, 4096).unwrap();
/// let pixel = project_point(&[0.0, 0.0, 10.0], &intrinsic, &CameraPose::identity()).unwrap();
/// assert_eq!(pixel, [2736.0, 2048.0]);
/// ```
pub fn project_point(
    point: &[f64; 3],
    intrinsic: &CameraIntrinsics,
    pose: &CameraPose,
) -> Result<[f64; 2], CameraError> {
    project_point_homogeneous(&[point[0], point[1], point[2], 1.0], intrinsic, pose)
}

/// Project a homogeneous 3D point `(x, y, z, w)` with the pinhole model.
pub fn project_point_homogeneous(
    point: &[f64; 4],
    intrinsic: &CameraIntrinsics,
    pose: &CameraPose,
) -> Result<[f64; 2], CameraError> {
    intrinsic.validate()?;

    let p_cam = pose.transform_homogeneous(point);
    let (x, y) = normalize_camera_point(&p_cam)?;

    Ok(intrinsic.normalized_to_pixel(x, y))
}

/// Project a 3D point to pixel coordinates through the lens distortion model.
///
/// The normalized coordinate is distorted with [`apply_distortion`] and mapped
/// to pixels including the affinity and skew terms.
pub fn project_point_distorted(
    point: &[f64; 3],
    intrinsic: &CameraIntrinsics,
    distortion: &DistortionCoefficients,
    pose: &CameraPose,
) -> Result<[f64; 2], CameraError> {
    intrinsic.validate()?;

    let p_cam = pose.transform_point(point);
    let (x, y) = normalize_camera_point(&p_cam)?;
    let (xd, yd) = apply_distortion(x, y, distortion);

    Ok(distorted_to_pixel(xd, yd, intrinsic, distortion))
}

/// Project a batch of points, keeping one result per point.
///
/// Points that cannot be projected yield an error at their index so callers
/// can decide whether to skip them or abort.
pub fn project_points(
    points: &[[f64; 3]],
    intrinsic: &CameraIntrinsics,
    distortion: Option<&DistortionCoefficients>,
    pose: &CameraPose,
) -> Result<Vec<Result<[f64; 2], CameraError>>, CameraError> {
    intrinsic.validate()?;

    let points_cam = pose.transform_points(points);
    let pixels = points_cam
        .iter()
        .map(|p_cam| {
            let (x, y) = normalize_camera_point(p_cam)?;
            Ok(match distortion {
                Some(distortion) => {
                    let (xd, yd) = apply_distortion(x, y, distortion);
                    distorted_to_pixel(xd, yd, intrinsic, distortion)
                }
                None => intrinsic.normalized_to_pixel(x, y),
            })
        })
        .collect();

    Ok(pixels)
}

/// Compute the 3x4 projection matrix `P = K [R|t]`.
pub fn projection_matrix(
    intrinsic: &CameraIntrinsics,
    pose: &CameraPose,
) -> Result<[[f64; 4]; 3], CameraError> {
    intrinsic.validate()?;
    Ok(matmul33_34(&intrinsic.camera_matrix(), &pose.matrix34()))
}

/// Project a 3D point with a 3x4 projection matrix.
pub fn project_with_matrix(
    projection: &[[f64; 4]; 3],
    point: &[f64; 3],
) -> Result<[f64; 2], CameraError> {
    let homogeneous = [point[0], point[1], point[2], 1.0];
    let mut proj = [0.0; 3];
    for (val, row) in proj.iter_mut().zip(projection.iter()) {
        *val = row
            .iter()
            .zip(homogeneous.iter())
            .map(|(a, b)| a * b)
            .sum();
    }

    if !proj[2].is_finite() || proj[2] <= 0.0 {
        return Err(CameraError::DegenerateProjection { z: proj[2] });
    }

    Ok([proj[0] / proj[2], proj[1] / proj[2]])
}
