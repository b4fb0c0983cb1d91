use std::io::Read;
use std::path::Path;

use phocal_camera::{CameraIntrinsics, CameraPose, DistortionCoefficients};
use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// Calibration of the sensor a camera was shot with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorCalibration {
    /// Intrinsic parameters.
    pub intrinsics: CameraIntrinsics,
    /// Lens distortion; all zero when absent.
    #[serde(default)]
    pub distortion: DistortionCoefficients,
}

/// A camera (photo) of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera label, usually the image file name.
    pub label: String,
    /// Sensor calibration.
    pub sensor: SensorCalibration,
    /// Camera-to-chunk transform; `None` when the camera is not aligned.
    #[serde(default)]
    pub transform: Option<[[f64; 4]; 4]>,
}

impl Camera {
    /// Whether the camera has a transform in the chunk.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.transform.is_some()
    }

    /// Camera centre in chunk coordinates.
    pub fn center(&self) -> Result<[f64; 3], ProjectError> {
        let transform = self.aligned_transform()?;
        CameraPose::check_affine(transform)?;
        Ok([transform[0][3], transform[1][3], transform[2][3]])
    }

    /// Chunk-to-camera pose used for projection.
    pub fn pose(&self) -> Result<CameraPose, ProjectError> {
        Ok(CameraPose::from_camera_to_world(self.aligned_transform()?)?)
    }

    fn aligned_transform(&self) -> Result<&[[f64; 4]; 4], ProjectError> {
        self.transform
            .as_ref()
            .ok_or_else(|| ProjectError::CameraNotAligned(self.label.clone()))
    }
}

/// A reconstructed tiepoint in chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiePoint {
    /// Track linking the point to its observations.
    pub track_id: u64,
    /// Position in chunk coordinates.
    pub coord: [f64; 3],
    /// Whether the point survived filtering.
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

/// Observation of a track in one camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observed track.
    pub track_id: u64,
    /// Pixel coordinates of the observation.
    pub pixel: [f64; 2],
}

/// Similarity transform from chunk coordinates to world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkTransform {
    /// The 4x4 transform matrix.
    pub matrix: [[f64; 4]; 4],
}

impl Default for ChunkTransform {
    fn default() -> Self {
        Self {
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

impl ChunkTransform {
    /// Uniform scale of the transform, the norm of its first column.
    pub fn scale(&self) -> f64 {
        let m = &self.matrix;
        (m[0][0] * m[0][0] + m[1][0] * m[1][0] + m[2][0] * m[2][0]).sqrt()
    }

    /// Map a chunk point to world coordinates.
    pub fn transform_point(&self, point: &[f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        let mut out = [0.0; 3];
        for (i, val) in out.iter_mut().enumerate() {
            *val = m[i][0] * point[0] + m[i][1] * point[1] + m[i][2] * point[2] + m[i][3];
        }
        out
    }
}

/// Read access to the data of a photogrammetry project.
///
/// This is the boundary with the host application: implementors expose the
/// cameras with their calibration and pose, the tiepoints and the per camera
/// observations.
pub trait ProjectSource {
    /// Number of cameras in the project.
    fn camera_count(&self) -> usize;

    /// Camera at `index`.
    fn camera(&self, index: usize) -> Option<&Camera>;

    /// Observations made by the camera at `index`; empty for unknown cameras.
    fn projections(&self, index: usize) -> &[Observation];

    /// All tiepoints of the project.
    fn points(&self) -> &[TiePoint];

    /// Transform from chunk to world coordinates.
    fn chunk_transform(&self) -> &ChunkTransform;

    /// Index of the camera with the given label.
    fn camera_index(&self, label: &str) -> Option<usize> {
        (0..self.camera_count()).find(|&i| self.camera(i).is_some_and(|c| c.label == label))
    }

    /// Camera at `index`, or an error naming the valid range.
    fn camera_or_err(&self, index: usize) -> Result<&Camera, ProjectError> {
        self.camera(index)
            .ok_or(ProjectError::CameraIndexOutOfRange {
                index,
                count: self.camera_count(),
            })
    }
}

/// A camera together with the observations it made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// The camera.
    #[serde(flatten)]
    pub camera: Camera,
    /// Observations made by the camera.
    #[serde(default)]
    pub projections: Vec<Observation>,
}

/// In-memory snapshot of a project, typically exported from the host as JSON.
///
/// Example:
///
/// ```
/// use phocal_tiepoints::{ProjectSnapshot, ProjectSource};
///
/// let json = r#"{
///     "cameras": [{
///         "label": "IMG_0001.JPG",
///         "sensor": {
///             "intrinsics": {"f": 8885.78, "cx": 0.0, "cy": 0.0, "width": 5472, "height": 4096}
///         }
///     }],
///     "points": [{"track_id": 3, "coord": [0.0, 0.0, 1.0]}]
/// }"#;
/// let project = ProjectSnapshot::from_json_str(json).unwrap();
/// assert_eq!(project.camera_count(), 1);
/// assert!(project.points()[0].valid);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Transform from chunk to world coordinates.
    #[serde(default)]
    pub chunk_transform: ChunkTransform,
    /// Cameras with their observations.
    #[serde(default)]
    pub cameras: Vec<CameraRecord>,
    /// Tiepoints.
    #[serde(default)]
    pub points: Vec<TiePoint>,
}

impl ProjectSnapshot {
    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ProjectError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.log_summary();
        Ok(snapshot)
    }

    /// Parse a snapshot from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProjectError> {
        let snapshot: Self = serde_json::from_reader(reader)?;
        snapshot.log_summary();
        Ok(snapshot)
    }

    /// Read and parse a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let file = std::fs::File::open(path.as_ref())?;
        log::debug!("Loading project snapshot from {}", path.as_ref().display());
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn log_summary(&self) {
        log::info!(
            "Loaded project with {} cameras ({} aligned) and {} tiepoints",
            self.cameras.len(),
            self.cameras.iter().filter(|r| r.camera.is_aligned()).count(),
            self.points.len()
        );
    }
}

impl ProjectSource for ProjectSnapshot {
    fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    fn camera(&self, index: usize) -> Option<&Camera> {
        self.cameras.get(index).map(|r| &r.camera)
    }

    fn projections(&self, index: usize) -> &[Observation] {
        self.cameras
            .get(index)
            .map(|r| r.projections.as_slice())
            .unwrap_or(&[])
    }

    fn points(&self) -> &[TiePoint] {
        &self.points
    }

    fn chunk_transform(&self) -> &ChunkTransform {
        &self.chunk_transform
    }
}
