/// Compute the dot product of two 3-vectors.
#[inline]
pub fn dot_product3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Multiply a 3x3 matrix by a 3-vector.
#[inline]
pub fn mat33_mul_vec3(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        dot_product3(&m[0], v),
        dot_product3(&m[1], v),
        dot_product3(&m[2], v),
    ]
}

/// Transpose a 3x3 matrix.
#[inline]
pub fn transpose33(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Multiply a 3x3 matrix by a 3x4 matrix.
pub fn matmul33_34(a: &[[f64; 3]; 3], b: &[[f64; 4]; 3]) -> [[f64; 4]; 3] {
    let mut m = [[0.0; 4]; 3];
    for (i, row) in m.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    m
}

/// Compute the Euclidean distance between two points.
///
/// Example:
/// ```
/// use phocal_camera::linalg::euclidean_distance;
///
/// let d = euclidean_distance(&[1.0, 2.0, 3.0], &[4.0, 6.0, 3.0]);
/// assert_eq!(d, 5.0);
/// ```
pub fn euclidean_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

/// Transform a set of points using a rotation and translation.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `dst_r_src` - A rotation matrix.
/// * `dst_t_src` - A translation vector.
/// * `dst_points` - A pre-allocated slice to store the transformed points.
///
/// PRECONDITION: dst_points has the same length as src_points.
pub fn transform_points(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) {
    assert_eq!(src_points.len(), dst_points.len());

    let dst_r_src_mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| dst_r_src[i][j]);
    let dst_t_src_col = faer::col![dst_t_src[0], dst_t_src[1], dst_t_src[2]];

    for (point_dst, point_src) in dst_points.iter_mut().zip(src_points.iter()) {
        let point_src_col = faer::col![point_src[0], point_src[1], point_src[2]];
        let point_dst_col = &dst_r_src_mat * &point_src_col + &dst_t_src_col;
        for (i, val) in point_dst.iter_mut().enumerate() {
            *val = point_dst_col.read(i);
        }
    }
}
