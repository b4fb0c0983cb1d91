use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;
use crate::source::{Observation, ProjectSource};
use crate::track_index::TrackIndex;

/// Parameters of the multi-view observation export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiViewParams {
    /// Minimum number of aligned cameras that must observe a tiepoint.
    pub min_views: usize,
}

impl Default for MultiViewParams {
    fn default() -> Self {
        Self { min_views: 2 }
    }
}

/// Pixel observation of a tiepoint in a named camera.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TiePointObservation {
    /// Index of the tiepoint in the project.
    pub point_index: usize,
    /// Label of the observing camera.
    pub camera_label: String,
    /// Pixel coordinates `[u, v]`.
    pub pixel: [f64; 2],
}

/// Look up the observation of a tiepoint in one camera.
///
/// # Returns
///
/// `Ok(None)` when the camera does not observe the point.
pub fn find_observation<S: ProjectSource + ?Sized>(
    source: &S,
    point_index: usize,
    camera_index: usize,
) -> Result<Option<Observation>, ProjectError> {
    let point = source
        .points()
        .get(point_index)
        .ok_or(ProjectError::PointNotFound(point_index))?;
    let camera = source.camera_or_err(camera_index)?;

    let observation = source
        .projections(camera_index)
        .iter()
        .find(|o| o.track_id == point.track_id)
        .copied();

    match &observation {
        Some(o) => log::debug!(
            "Track {} observed in camera {} at {:?}",
            point.track_id,
            camera.label,
            o.pixel
        ),
        None => log::debug!(
            "Track {} not observed in camera {}",
            point.track_id,
            camera.label
        ),
    }

    Ok(observation)
}

/// Collect the pixel observations of tiepoints seen by several cameras.
///
/// Unaligned cameras are ignored both when counting views and when emitting
/// observations. Observations are returned grouped by camera, in camera order.
pub fn multi_view_observations<S: ProjectSource + ?Sized>(
    source: &S,
    params: &MultiViewParams,
) -> Vec<TiePointObservation> {
    let tracks = TrackIndex::new(source.points());

    let aligned = (0..source.camera_count())
        .filter_map(|i| source.camera(i).map(|c| (i, c)))
        .filter(|(_, camera)| {
            if !camera.is_aligned() {
                log::debug!("Skipping unaligned camera {}", camera.label);
            }
            camera.is_aligned()
        })
        .collect::<Vec<_>>();

    // count views per point
    let mut views: HashMap<usize, usize> = HashMap::new();
    for (i, _) in &aligned {
        for observation in source.projections(*i) {
            if let Some(point_index) = tracks.get(observation.track_id) {
                *views.entry(point_index).or_insert(0) += 1;
            }
        }
    }

    let mut observations = Vec::new();
    for (i, camera) in &aligned {
        for observation in source.projections(*i) {
            let Some(point_index) = tracks.get(observation.track_id) else {
                continue;
            };
            if views.get(&point_index).copied().unwrap_or(0) >= params.min_views {
                observations.push(TiePointObservation {
                    point_index,
                    camera_label: camera.label.clone(),
                    pixel: observation.pixel,
                });
            }
        }
    }

    log::debug!(
        "{} observations of tiepoints seen by at least {} cameras",
        observations.len(),
        params.min_views
    );

    observations
}
