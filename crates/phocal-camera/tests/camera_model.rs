use approx::assert_relative_eq;
use phocal_camera::{
    apply_distortion, project_point, project_point_distorted, projection_matrix,
    project_with_matrix, undistort, undistort_pixel, CameraError, CameraIntrinsics, CameraPose,
    DisplacementField, DistortionCoefficients, UndistortCriteria,
};

fn reference_intrinsics() -> CameraIntrinsics {
    CameraIntrinsics {
        f: 8885.77658,
        cx: 32.09487,
        cy: 12.26385,
        width: 5472,
        height: 4096,
    }
}

fn reference_distortion() -> DistortionCoefficients {
    DistortionCoefficients {
        k1: -0.0741900169,
        k2: 0.465760013,
        k3: -0.99955936,
        k4: 0.0,
        p1: -0.000132860699,
        p2: 0.000195260138,
        p3: 0.0,
        p4: 0.0,
        b1: 0.0,
        b2: 0.0,
    }
}

fn random_pose() -> Result<CameraPose, CameraError> {
    let angle = rand::random::<f64>() * std::f64::consts::PI;
    let (s, c) = angle.sin_cos();
    let center = [
        rand::random::<f64>() * 10.0,
        rand::random::<f64>() * 10.0,
        rand::random::<f64>() * 10.0,
    ];
    // camera-to-world transform rotating about the optical axis
    let transform = [
        [c, -s, 0.0, center[0]],
        [s, c, 0.0, center[1]],
        [0.0, 0.0, 1.0, center[2]],
        [0.0, 0.0, 0.0, 1.0],
    ];
    CameraPose::from_camera_to_world(&transform)
}

#[test]
fn test_scenario_center_pixel() -> Result<(), CameraError> {
    let intrinsic = CameraIntrinsics::new(8885.78, 0.0, 0.0, 5472, 4096)?;
    let pixel = project_point(&[0.0, 0.0, 10.0], &intrinsic, &CameraPose::identity())?;
    assert_eq!(pixel, [2736.0, 2048.0]);

    let pixel = project_point_distorted(
        &[0.0, 0.0, 10.0],
        &intrinsic,
        &DistortionCoefficients::none(),
        &CameraPose::identity(),
    )?;
    assert_eq!(pixel, [2736.0, 2048.0]);
    Ok(())
}

#[test]
fn test_round_trip_law_random_points() {
    let _ = env_logger::builder().is_test(true).try_init();

    let distortion = reference_distortion();
    let criteria = UndistortCriteria::default();

    for _ in 0..1000 {
        // points inside the image circle of the reference sensor
        let r = rand::random::<f64>() * 0.4;
        let theta = rand::random::<f64>() * std::f64::consts::TAU;
        let (x, y) = (r * theta.cos(), r * theta.sin());

        let (xd, yd) = apply_distortion(x, y, &distortion);
        let result = undistort(xd, yd, &distortion, &criteria);

        assert_eq!(result.iterations(), 5);
        assert!((result.x - x).abs() < 1e-4, "x: {} vs {}", result.x, x);
        assert!((result.y - y).abs() < 1e-4, "y: {} vs {}", result.y, y);
    }
}

#[test]
fn test_round_trip_law_typical_coefficients() {
    for _ in 0..200 {
        let distortion = DistortionCoefficients {
            k1: (rand::random::<f64>() - 0.5) * 0.2,
            k2: (rand::random::<f64>() - 0.5) * 0.2,
            k3: (rand::random::<f64>() - 0.5) * 0.2,
            k4: (rand::random::<f64>() - 0.5) * 0.2,
            p1: (rand::random::<f64>() - 0.5) * 1e-3,
            p2: (rand::random::<f64>() - 0.5) * 1e-3,
            p3: 0.0,
            p4: 0.0,
            b1: 0.0,
            b2: 0.0,
        };
        let r = rand::random::<f64>() * 0.45;
        let theta = rand::random::<f64>() * std::f64::consts::TAU;
        let (x, y) = (r * theta.cos(), r * theta.sin());

        let (xd, yd) = apply_distortion(x, y, &distortion);
        let result = undistort(xd, yd, &distortion, &UndistortCriteria::default());

        assert!((result.x - x).abs() < 1e-4);
        assert!((result.y - y).abs() < 1e-4);
    }
}

#[test]
fn test_residual_monotonicity() {
    let distortion = reference_distortion();
    for _ in 0..200 {
        let x = (rand::random::<f64>() - 0.5) * 0.6;
        let y = (rand::random::<f64>() - 0.5) * 0.45;
        let (xd, yd) = apply_distortion(x, y, &distortion);
        let result = undistort(xd, yd, &distortion, &UndistortCriteria::default());

        let magnitudes: Vec<f64> = result
            .residuals
            .iter()
            .map(|(dx, dy)| dx.abs() + dy.abs())
            .collect();
        for w in magnitudes.windows(2) {
            // allow for floating point noise once the residual reaches machine precision
            assert!(w[1] <= w[0] + 1e-15, "{:?}", magnitudes);
        }
    }
}

#[test]
fn test_distorted_projection_undistorts_to_pinhole() -> Result<(), CameraError> {
    let intrinsic = reference_intrinsics();
    let distortion = DistortionCoefficients {
        b1: 1.7,
        b2: -0.4,
        p3: 0.1,
        p4: 0.05,
        ..reference_distortion()
    };
    let criteria = UndistortCriteria {
        max_iterations: 10,
        tolerance: None,
    };

    for _ in 0..100 {
        let pose = random_pose()?;
        let center = pose.camera_center();
        let point = [
            center[0] + (rand::random::<f64>() - 0.5) * 2.0,
            center[1] + (rand::random::<f64>() - 0.5) * 1.5,
            center[2] + 4.0 + rand::random::<f64>(),
        ];

        let ideal = project_point(&point, &intrinsic, &pose)?;
        let distorted = project_point_distorted(&point, &intrinsic, &distortion, &pose)?;
        let (recovered, _) = undistort_pixel(&distorted, &intrinsic, &distortion, &criteria)?;

        assert_relative_eq!(recovered[0], ideal[0], epsilon = 1e-3);
        assert_relative_eq!(recovered[1], ideal[1], epsilon = 1e-3);
    }
    Ok(())
}

#[test]
fn test_projection_matrix_random_poses() -> Result<(), CameraError> {
    let intrinsic = reference_intrinsics();
    for _ in 0..100 {
        let pose = random_pose()?;
        let p = projection_matrix(&intrinsic, &pose)?;
        let center = pose.camera_center();
        let point = [center[0] + 0.3, center[1] - 0.2, center[2] + 5.0];

        let a = project_point(&point, &intrinsic, &pose)?;
        let b = project_with_matrix(&p, &point)?;
        assert_relative_eq!(a[0], b[0], epsilon = 1e-6);
        assert_relative_eq!(a[1], b[1], epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_degenerate_point_on_camera_plane() -> Result<(), CameraError> {
    let pose = random_pose()?;
    let center = pose.camera_center();
    let point = [center[0] + 1.0, center[1] + 1.0, center[2]];
    let res = project_point(&point, &reference_intrinsics(), &pose);
    assert!(matches!(res, Err(CameraError::DegenerateProjection { .. })));
    Ok(())
}

#[test]
fn test_displacement_field_reference_lens() -> Result<(), CameraError> {
    let field = DisplacementField::new(reference_intrinsics(), reference_distortion(), 100)?;
    assert_eq!(field.len(), 5472_usize.div_ceil(100) * 4096_usize.div_ceil(100));

    let (index, sample) = field.max_displacement().ok_or(CameraError::InvalidStep(100))?;
    assert!(index < field.len());
    // the reference lens moves the sensor corners by roughly a dozen pixels
    assert!(sample.magnitude() > 1.0 && sample.magnitude() < 50.0);
    Ok(())
}
