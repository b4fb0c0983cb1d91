use phocal_camera::linalg::euclidean_distance;
use serde::Serialize;

use crate::error::ProjectError;
use crate::source::ProjectSource;
use crate::track_index::TrackIndex;

/// Distance from a camera centre to one tiepoint it observes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TiePointDistance {
    /// Index of the tiepoint in the project.
    pub point_index: usize,
    /// Track of the tiepoint.
    pub track_id: u64,
    /// Tiepoint position in chunk coordinates.
    pub coord: [f64; 3],
    /// Distance in world units.
    pub distance: f64,
}

/// Compute the distance from a camera centre to every valid tiepoint it observes.
///
/// Distances are measured in chunk coordinates and scaled to world units with
/// the chunk transform. Observations of invalid or unknown tracks are skipped.
///
/// # Arguments
///
/// * `source` - The project data
/// * `camera_index` - Index of the camera
///
/// # Returns
///
/// One entry per usable observation, in observation order.
pub fn camera_tiepoint_distances<S: ProjectSource + ?Sized>(
    source: &S,
    camera_index: usize,
) -> Result<Vec<TiePointDistance>, ProjectError> {
    let camera = source.camera_or_err(camera_index)?;
    let center = camera.center()?;
    let scale = source.chunk_transform().scale();

    let points = source.points();
    let tracks = TrackIndex::new(points);

    let mut distances = Vec::new();
    let mut skipped = 0;
    for observation in source.projections(camera_index) {
        let Some(point_index) = tracks.get(observation.track_id) else {
            skipped += 1;
            continue;
        };
        let point = &points[point_index];
        if !point.valid {
            skipped += 1;
            continue;
        }

        distances.push(TiePointDistance {
            point_index,
            track_id: point.track_id,
            coord: point.coord,
            distance: euclidean_distance(&center, &point.coord) * scale,
        });
    }

    log::debug!(
        "Camera {}: {} tiepoint distances, {} observations skipped",
        camera.label,
        distances.len(),
        skipped
    );

    Ok(distances)
}
