use serde::{Deserialize, Serialize};

use crate::distortion::{apply_distortion, DistortionCoefficients};
use crate::error::CameraError;
use crate::intrinsics::CameraIntrinsics;
use crate::undistort::{undistort, UndistortCriteria};

/// How each grid pixel is turned into a displacement vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplacementMode {
    /// Treat the grid pixel as distorted, undistort it and reproject it with
    /// the pinhole model. Measures the undistortion round trip.
    #[default]
    RoundTrip,
    /// Treat the grid pixel as ideal, distort it and project it with the
    /// pinhole model. Measures the distortion magnitude itself.
    ///
    /// The tangential terms follow [`apply_distortion`], where `p1` pairs with
    /// `r^2 + 2x^2`. OpenCV pairs `p2` with that term, so a plot made by feeding
    /// [`DistortionCoefficients::opencv_coefficients`] to OpenCV differs in its
    /// tangential part.
    ForwardDistortion,
}

/// One grid point of a displacement field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplacementSample {
    /// The grid pixel.
    pub origin: [f64; 2],
    /// The reprojected pixel minus the grid pixel.
    pub displacement: [f64; 2],
}

impl DisplacementSample {
    /// Euclidean length of the displacement in pixels.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.displacement[0].hypot(self.displacement[1])
    }

    /// The pixel the grid point moved to.
    #[inline]
    pub fn target(&self) -> [f64; 2] {
        [
            self.origin[0] + self.displacement[0],
            self.origin[1] + self.displacement[1],
        ]
    }
}

/// Lazily evaluated distortion displacement field over the image grid.
///
/// The grid covers `[0, width) x [0, height)` with the given stride in row-major
/// order. The field holds only its inputs, so [`DisplacementField::iter`] can be
/// called repeatedly and always yields the same samples.
///
/// Example:
///
/// ```
/// use phocal_camera::{CameraIntrinsics, DisplacementField, DistortionCoefficients};
///
/// let intrinsic = CameraIntrinsics::new(8885.78, 0.0, 0.0, 5472, 4096).unwrap();
/// let field = DisplacementField::new(intrinsic, DistortionCoefficients::none(), 100).unwrap();
/// assert_eq!(field.len(), 55 * 41);
/// ```
#[derive(Debug, Clone)]
pub struct DisplacementField {
    intrinsic: CameraIntrinsics,
    distortion: DistortionCoefficients,
    step: usize,
    cols: usize,
    rows: usize,
    mode: DisplacementMode,
    criteria: UndistortCriteria,
}

impl DisplacementField {
    /// Create a round-trip displacement field with the default undistortion criteria.
    pub fn new(
        intrinsic: CameraIntrinsics,
        distortion: DistortionCoefficients,
        step: usize,
    ) -> Result<Self, CameraError> {
        intrinsic.validate()?;
        if step == 0 {
            return Err(CameraError::InvalidStep(step));
        }

        Ok(Self {
            intrinsic,
            distortion,
            step,
            cols: (intrinsic.width as usize).div_ceil(step),
            rows: (intrinsic.height as usize).div_ceil(step),
            mode: DisplacementMode::default(),
            criteria: UndistortCriteria::default(),
        })
    }

    /// Set how grid pixels are mapped.
    pub fn with_mode(mut self, mode: DisplacementMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the criteria used to undistort each grid pixel.
    pub fn with_criteria(mut self, criteria: UndistortCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Number of samples in the field.
    #[inline]
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    /// Check if the field has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid size as `(cols, rows)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Evaluate the sample at `index` in row-major order.
    pub fn sample(&self, index: usize) -> Option<DisplacementSample> {
        if index >= self.len() {
            return None;
        }

        let u = ((index % self.cols) * self.step) as f64;
        let v = ((index / self.cols) * self.step) as f64;
        let (x, y) = self.intrinsic.pixel_to_normalized(u, v);

        let target = match self.mode {
            DisplacementMode::RoundTrip => {
                let result = undistort(x, y, &self.distortion, &self.criteria);
                self.intrinsic.normalized_to_pixel(result.x, result.y)
            }
            DisplacementMode::ForwardDistortion => {
                let (xd, yd) = apply_distortion(x, y, &self.distortion);
                self.intrinsic.normalized_to_pixel(xd, yd)
            }
        };

        Some(DisplacementSample {
            origin: [u, v],
            displacement: [target[0] - u, target[1] - v],
        })
    }

    /// Iterate over the samples of the field.
    pub fn iter(&self) -> DisplacementIter<'_> {
        DisplacementIter {
            field: self,
            index: 0,
        }
    }

    /// The sample with the largest displacement magnitude and its index.
    ///
    /// Ties resolve to the first sample in row-major order.
    pub fn max_displacement(&self) -> Option<(usize, DisplacementSample)> {
        let max = self
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| b.magnitude().total_cmp(&a.magnitude()));

        if let Some((index, sample)) = &max {
            log::debug!(
                "Max displacement {:.4} px at index {} (origin {:?}, vector {:?})",
                sample.magnitude(),
                index,
                sample.origin,
                sample.displacement
            );
        }

        max
    }
}

impl<'a> IntoIterator for &'a DisplacementField {
    type Item = DisplacementSample;
    type IntoIter = DisplacementIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the samples of a [`DisplacementField`].
#[derive(Debug, Clone)]
pub struct DisplacementIter<'a> {
    field: &'a DisplacementField,
    index: usize,
}

impl Iterator for DisplacementIter<'_> {
    type Item = DisplacementSample;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.field.sample(self.index)?;
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.field.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DisplacementIter<'_> {}
