use nalgebra as na;

/// Axis remap from the pose log's world frame to the manifest's world frame.
///
/// Applied on the left of both the rotation and the translation of each pose.
/// This is a one-sided change of the world axes, not a similarity `M * T * M^-1`.
pub const W2W_PRIME: [[f64; 3]; 3] = [[0.0, -1.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]];

pub fn w2w_prime() -> na::Matrix3<f64> {
    na::Matrix3::from_fn(|r, c| W2W_PRIME[r][c])
}

/// Rotation matrix of a quaternion given as `[x, y, z, w]`.
///
/// Non-unit input is rescaled by the `2 / |q|^2` factor of the formula rather
/// than normalized up front.
pub fn quat_to_rotation(quat: &[f64; 4]) -> na::Matrix3<f64> {
    let [x, y, z, w] = *quat;
    let n = x * x + y * y + z * z + w * w;
    let s = if n > 0.0 { 2.0 / n } else { 0.0 };

    let (xx, yy, zz) = (x * x * s, y * y * s, z * z * s);
    let (xy, xz, yz) = (x * y * s, x * z * s, y * z * s);
    let (wx, wy, wz) = (w * x * s, w * y * s, w * z * s);

    na::Matrix3::new(
        1.0 - (yy + zz),
        xy - wz,
        xz + wy,
        xy + wz,
        1.0 - (xx + zz),
        yz - wx,
        xz - wy,
        yz + wx,
        1.0 - (xx + yy),
    )
}

/// Homogeneous 4x4 pose from a position and an `[x, y, z, w]` quaternion.
pub fn pose_to_se3(position: &[f64; 3], quat: &[f64; 4]) -> na::Matrix4<f64> {
    let mut se3 = na::Matrix4::<f64>::identity();
    se3.fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&quat_to_rotation(quat));
    se3.fixed_view_mut::<3, 1>(0, 3)
        .copy_from(&na::Vector3::from_column_slice(position));
    se3
}

/// Left-multiplies [`W2W_PRIME`] onto the rotation block and the translation column.
pub fn to_output_frame(se3: &na::Matrix4<f64>) -> na::Matrix4<f64> {
    let m = w2w_prime();
    let rotation = m * se3.fixed_view::<3, 3>(0, 0);
    let translation = m * se3.fixed_view::<3, 1>(0, 3);

    let mut out = *se3;
    out.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
    out.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
    out
}

/// Pose in the manifest's convention, ready to be written as `transform_matrix`.
pub fn build_transform(position: &[f64; 3], quat: &[f64; 4]) -> na::Matrix4<f64> {
    to_output_frame(&pose_to_se3(position, quat))
}

/// Row-major nested array, the layout used by `transform_matrix`.
pub fn matrix_to_rows(m: &na::Matrix4<f64>) -> [[f64; 4]; 4] {
    std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_quaternion() {
        assert_relative_eq!(
            quat_to_rotation(&[0.0, 0.0, 0.0, 1.0]),
            na::Matrix3::identity(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn quarter_turn_about_z() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let r = quat_to_rotation(&[0.0, 0.0, h, h]);
        let x = r * na::Vector3::x();
        assert_relative_eq!(x, na::Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn non_unit_quaternion_is_rescaled() {
        let unit = quat_to_rotation(&[0.1, 0.2, 0.3, 0.9].map(|v| v / 0.9746794344808963));
        let scaled = quat_to_rotation(&[0.1, 0.2, 0.3, 0.9]);
        assert_relative_eq!(unit, scaled, epsilon = 1e-9);
    }

    #[test]
    fn remap_is_one_sided() {
        let t = build_transform(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0, 1.0]);
        let m = w2w_prime();
        assert_relative_eq!(
            t.fixed_view::<3, 3>(0, 0).into_owned(),
            m,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            t.fixed_view::<3, 1>(0, 3).into_owned(),
            na::Vector3::new(-2.0, -3.0, 1.0),
            epsilon = 1e-12
        );
        assert_eq!(t.row(3).into_owned(), na::RowVector4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn rows_are_row_major() {
        let t = build_transform(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0, 1.0]);
        let rows = matrix_to_rows(&t);
        assert_eq!(rows[0], [0.0, -1.0, 0.0, -2.0]);
        assert_eq!(rows[1], [0.0, 0.0, -1.0, -3.0]);
        assert_eq!(rows[2], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    }
}
