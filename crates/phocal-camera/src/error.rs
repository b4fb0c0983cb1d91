use thiserror::Error;

/// Error types for camera model operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CameraError {
    /// The intrinsic parameters cannot describe a camera.
    #[error("Invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),

    /// The point lies on or behind the camera plane.
    #[error("Degenerate projection: camera-space depth is {z}")]
    DegenerateProjection {
        /// Depth of the point in the camera frame.
        z: f64,
    },

    /// The undistortion residual stayed above the requested tolerance.
    #[error(
        "Undistortion did not converge after {iterations} iterations: residual {residual} > {tolerance}"
    )]
    UndistortionDidNotConverge {
        /// Final residual `|dx| + |dy|`.
        residual: f64,
        /// Tolerance requested by the caller.
        tolerance: f64,
        /// Number of iterations that were run.
        iterations: usize,
    },

    /// The grid stride must be at least one pixel.
    #[error("Invalid grid step: {0}")]
    InvalidStep(usize),

    /// The transform is not a rigid 4x4 transform.
    #[error("Invalid camera pose: {0}")]
    InvalidPose(String),
}
