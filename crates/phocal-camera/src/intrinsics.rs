use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Represents the intrinsic parameters of a frame camera.
///
/// The principal point is given as an offset from the image centre, the way
/// photogrammetry calibrations store it.
///
/// # Fields
///
/// * `f` - The focal length in pixels
/// * `cx` - The x offset of the principal point from the image centre
/// * `cy` - The y offset of the principal point from the image centre
/// * `width` - The image width in pixels
/// * `height` - The image height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// The focal length in pixels
    pub f: f64,
    /// The x offset of the principal point from the image centre
    pub cx: f64,
    /// The y offset of the principal point from the image centre
    pub cy: f64,
    /// The image width in pixels
    pub width: u32,
    /// The image height in pixels
    pub height: u32,
}

impl CameraIntrinsics {
    /// Create validated camera intrinsics.
    pub fn new(f: f64, cx: f64, cy: f64, width: u32, height: u32) -> Result<Self, CameraError> {
        let intrinsics = Self {
            f,
            cx,
            cy,
            width,
            height,
        };
        intrinsics.validate()?;
        Ok(intrinsics)
    }

    /// Check the invariants `f > 0`, `width > 0` and `height > 0`.
    pub fn validate(&self) -> Result<(), CameraError> {
        if !self.f.is_finite() || self.f <= 0.0 {
            return Err(CameraError::InvalidIntrinsics(format!(
                "focal length must be positive, got {}",
                self.f
            )));
        }
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(CameraError::InvalidIntrinsics(format!(
                "principal point must be finite, got ({}, {})",
                self.cx, self.cy
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CameraError::InvalidIntrinsics(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Absolute x coordinate of the principal point in pixels.
    #[inline]
    pub fn principal_x(&self) -> f64 {
        self.cx + self.width as f64 / 2.0
    }

    /// Absolute y coordinate of the principal point in pixels.
    #[inline]
    pub fn principal_y(&self) -> f64 {
        self.cy + self.height as f64 / 2.0
    }

    /// Returns the camera matrix `K` as a 3x3 array.
    pub fn camera_matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.f, 0.0, self.principal_x()],
            [0.0, self.f, self.principal_y()],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Map a normalized image coordinate to pixels with the pinhole model.
    #[inline]
    pub fn normalized_to_pixel(&self, x: f64, y: f64) -> [f64; 2] {
        [
            self.f * x + self.principal_x(),
            self.f * y + self.principal_y(),
        ]
    }

    /// Map a pixel to a normalized image coordinate, inverting `K`.
    #[inline]
    pub fn pixel_to_normalized(&self, u: f64, v: f64) -> (f64, f64) {
        (
            (u - self.principal_x()) / self.f,
            (v - self.principal_y()) / self.f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> CameraIntrinsics {
        CameraIntrinsics {
            f: 8885.78,
            cx: 33.09,
            cy: 12.26,
            width: 5472,
            height: 4096,
        }
    }

    #[test]
    fn test_camera_matrix() {
        let k = reference().camera_matrix();
        assert_eq!(k[0], [8885.78, 0.0, 2736.0 + 33.09]);
        assert_eq!(k[1], [0.0, 8885.78, 2048.0 + 12.26]);
        assert_eq!(k[2], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_pixel_normalized_inverse() {
        let intrinsics = reference();
        let (x, y) = intrinsics.pixel_to_normalized(100.0, 3900.0);
        let [u, v] = intrinsics.normalized_to_pixel(x, y);
        assert_relative_eq!(u, 100.0, epsilon = 1e-9);
        assert_relative_eq!(v, 3900.0, epsilon = 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(reference().validate().is_ok());
        assert!(matches!(
            CameraIntrinsics::new(0.0, 0.0, 0.0, 10, 10),
            Err(CameraError::InvalidIntrinsics(_))
        ));
        assert!(matches!(
            CameraIntrinsics::new(-5.0, 0.0, 0.0, 10, 10),
            Err(CameraError::InvalidIntrinsics(_))
        ));
        assert!(matches!(
            CameraIntrinsics::new(f64::NAN, 0.0, 0.0, 10, 10),
            Err(CameraError::InvalidIntrinsics(_))
        ));
        assert!(matches!(
            CameraIntrinsics::new(100.0, 0.0, 0.0, 0, 10),
            Err(CameraError::InvalidIntrinsics(_))
        ));
        assert!(matches!(
            CameraIntrinsics::new(100.0, 0.0, 0.0, 10, 0),
            Err(CameraError::InvalidIntrinsics(_))
        ));
    }
}
