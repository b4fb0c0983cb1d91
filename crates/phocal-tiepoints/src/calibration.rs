use serde::Serialize;

use crate::error::ProjectError;
use crate::source::SensorCalibration;

/// Calibration of a sensor in the OpenCV convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationSummary {
    /// Camera matrix `K` with the absolute principal point.
    pub camera_matrix: [[f64; 3]; 3],
    /// Distortion coefficients ordered as `[k1, k2, p1, p2, k3]`.
    pub opencv_coefficients: [f64; 5],
}

impl CalibrationSummary {
    /// Summarize the calibration of a sensor.
    ///
    /// Terms without an OpenCV counterpart (`k4`, `p3`, `p4`, `b1`, `b2`) are
    /// dropped with a warning when they are not zero.
    pub fn from_sensor(sensor: &SensorCalibration) -> Result<Self, ProjectError> {
        sensor.intrinsics.validate()?;

        let d = &sensor.distortion;
        if [d.k4, d.p3, d.p4, d.b1, d.b2].iter().any(|&v| v != 0.0) {
            log::warn!(
                "Dropping terms without OpenCV counterpart: k4={} p3={} p4={} b1={} b2={}",
                d.k4,
                d.p3,
                d.p4,
                d.b1,
                d.b2
            );
        }

        Ok(Self {
            camera_matrix: sensor.intrinsics.camera_matrix(),
            opencv_coefficients: d.opencv_coefficients(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phocal_camera::{CameraError, CameraIntrinsics, DistortionCoefficients};

    fn sensor(f: f64) -> SensorCalibration {
        SensorCalibration {
            intrinsics: CameraIntrinsics {
                f,
                cx: 32.0,
                cy: -12.0,
                width: 5472,
                height: 4096,
            },
            distortion: DistortionCoefficients {
                b1: 0.5,
                ..DistortionCoefficients::radial_tangential(-0.07, 0.46, -0.99, 0.0, -0.0001, 0.0002)
            },
        }
    }

    #[test]
    fn test_from_sensor() -> Result<(), ProjectError> {
        let _ = env_logger::builder().is_test(true).try_init();

        let summary = CalibrationSummary::from_sensor(&sensor(8885.0))?;
        assert_eq!(
            summary.camera_matrix,
            [
                [8885.0, 0.0, 2768.0],
                [0.0, 8885.0, 2036.0],
                [0.0, 0.0, 1.0],
            ]
        );
        assert_eq!(
            summary.opencv_coefficients,
            [-0.07, 0.46, -0.0001, 0.0002, -0.99]
        );
        Ok(())
    }

    #[test]
    fn test_invalid_focal() {
        assert!(matches!(
            CalibrationSummary::from_sensor(&sensor(0.0)),
            Err(ProjectError::Camera(CameraError::InvalidIntrinsics(_)))
        ));
    }

    #[test]
    fn test_serialize() -> Result<(), Box<dyn std::error::Error>> {
        let summary = CalibrationSummary::from_sensor(&sensor(1000.0))?;
        let json: serde_json::Value = serde_json::to_value(summary)?;
        assert_eq!(json["camera_matrix"][0][2], 2768.0);
        assert_eq!(json["opencv_coefficients"].as_array().map(Vec::len), Some(5));
        Ok(())
    }
}
