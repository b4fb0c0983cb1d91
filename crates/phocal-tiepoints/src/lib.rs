#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Intrinsic matrix and OpenCV coefficient extraction.
pub mod calibration;

/// Distances between a camera centre and the tiepoints it observes.
pub mod distances;

/// Error types for project analyses.
pub mod error;

/// Tiepoint observation queries.
pub mod observations;

/// Manual versus model reprojection of a tiepoint.
pub mod reprojection;

/// Project data source and its in-memory snapshot.
pub mod source;

mod track_index;

pub use calibration::CalibrationSummary;
pub use distances::{camera_tiepoint_distances, TiePointDistance};
pub use error::ProjectError;
pub use observations::{
    find_observation, multi_view_observations, MultiViewParams, TiePointObservation,
};
pub use reprojection::{reprojection_report, ReprojectionReport};
pub use source::{
    Camera, ChunkTransform, Observation, ProjectSnapshot, ProjectSource, SensorCalibration,
    TiePoint,
};
pub use track_index::TrackIndex;
