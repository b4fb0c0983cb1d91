use phocal_camera::CameraError;

/// Error types for project analyses.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Error from the camera model.
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// Failed to parse a project snapshot.
    #[error("Failed to parse project snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a project snapshot.
    #[error("Failed to read project snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// No camera with the given label.
    #[error("Camera not found: {0}")]
    CameraNotFound(String),

    /// Camera index past the end of the camera list.
    #[error("Camera index {index} out of range for {count} cameras")]
    CameraIndexOutOfRange {
        /// Requested camera index.
        index: usize,
        /// Number of cameras in the project.
        count: usize,
    },

    /// The camera has no transform in the chunk.
    #[error("Camera {0} is not aligned")]
    CameraNotAligned(String),

    /// Point index past the end of the point list.
    #[error("Point index {0} out of range")]
    PointNotFound(usize),
}
