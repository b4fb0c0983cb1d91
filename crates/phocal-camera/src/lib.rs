#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Displacement field survey over a pixel grid.
pub mod displacement;

/// Brown-Conrady lens distortion model.
pub mod distortion;

/// Error types for the camera model.
pub mod error;

/// Camera intrinsic parameters.
pub mod intrinsics;

/// Small fixed-size linear algebra helpers.
pub mod linalg;

/// Rigid camera pose (extrinsics).
pub mod pose;

/// Forward projection of 3D points to pixels.
pub mod projection;

/// Iterative inversion of the lens distortion.
pub mod undistort;

pub use displacement::{DisplacementField, DisplacementMode, DisplacementSample};
pub use distortion::{apply_distortion, DistortionCoefficients};
pub use error::CameraError;
pub use intrinsics::CameraIntrinsics;
pub use pose::CameraPose;
pub use projection::{
    project_point, project_point_distorted, project_point_homogeneous, project_points,
    project_with_matrix, projection_matrix,
};
pub use undistort::{
    undistort, undistort_pixel, undistort_pixel_checked, UndistortCriteria, UndistortResult,
};
