use nalgebra::{self as na, Matrix2};

/// Builds the 2x2 covariance matrix of an error ellipse.
///
/// The axis-aligned variances `(sigma_minor², sigma_major²)` are rotated through `theta`
/// (radians), so at `theta = 0` the major axis lies along the y axis.
pub fn compute_covariance<F: na::RealField + Copy>(
    sigma_major: F,
    sigma_minor: F,
    theta: F,
) -> Matrix2<F> {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let major_pow2 = sigma_major.powi(2);
    let minor_pow2 = sigma_minor.powi(2);
    let sin_theta_pow2 = sin_theta.powi(2);
    let cos_theta_pow2 = cos_theta.powi(2);

    let var_x = minor_pow2 * cos_theta_pow2 + major_pow2 * sin_theta_pow2;
    let var_y = minor_pow2 * sin_theta_pow2 + major_pow2 * cos_theta_pow2;
    let cov_xy = cos_theta * sin_theta * (major_pow2 - minor_pow2);

    Matrix2::new(var_x, cov_xy, cov_xy, var_y)
}

/// Recovers `(sigma_major, sigma_minor, theta)` from a symmetric covariance matrix.
///
/// `theta` is returned in radians, in `[-π/2, π/2]` as produced by `atan2`. Only the upper
/// triangle is read.
pub fn decompose_covariance<F: na::RealField + Copy>(matrix: &Matrix2<F>) -> (F, F, F) {
    let two: F = na::convert(2.0);
    let half: F = na::convert(0.5);

    let var_x = matrix[(0, 0)];
    let var_y = matrix[(1, 1)];
    let cov_xy2 = two * matrix[(0, 1)];

    let sum = var_x + var_y;
    let diff = var_y - var_x;

    let theta = half * cov_xy2.atan2(diff);
    let spread = diff.hypot(cov_xy2);

    let sigma_major = (half * (sum + spread)).max(F::zero()).sqrt();
    // Rounding can push the smaller eigenvalue just below zero
    let sigma_minor = (half * (sum - spread)).max(F::zero()).sqrt();

    (sigma_major, sigma_minor, theta)
}

/// Reduces an axis orientation in degrees to `[0, 180)`.
///
/// An ellipse is symmetric under a half turn, so orientations that differ by 180° describe
/// the same ellipse.
pub fn normalize_orientation<F: na::RealField + Copy>(degrees: F) -> F {
    let half_turn: F = na::convert(180.0);
    let mut reduced = degrees % half_turn;
    if reduced < F::zero() {
        reduced += half_turn;
    }
    // -0.0 and values that round up to exactly 180 after the shift
    if reduced >= half_turn || reduced == F::zero() {
        reduced = F::zero();
    }
    reduced
}

pub fn to_radians<F: na::RealField + Copy>(degrees: F) -> F {
    let half_turn: F = na::convert(180.0);
    degrees * F::pi() / half_turn
}

pub fn to_degrees<F: na::RealField + Copy>(radians: F) -> F {
    let half_turn: F = na::convert(180.0);
    radians * half_turn / F::pi()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

    fn assert_matrix_eq(a: &Matrix2<f64>, b: &Matrix2<f64>) {
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(a[(i, j)], b[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_circle_covariance() {
        let m = compute_covariance(2.0, 2.0, 0.0);
        assert_matrix_eq(&m, &Matrix2::new(4.0, 0.0, 0.0, 4.0));
    }

    #[test]
    fn test_circle_rotation_invariance() {
        let m1 = compute_covariance(1.5, 1.5, 0.0);
        let m2 = compute_covariance(1.5, 1.5, FRAC_PI_6);
        assert_matrix_eq(&m1, &m2);
    }

    #[test]
    fn test_unrotated_major_axis_along_y() {
        let m = compute_covariance(3.0, 1.0, 0.0);
        assert_matrix_eq(&m, &Matrix2::new(1.0, 0.0, 0.0, 9.0));
    }

    #[test]
    fn test_quarter_turn_major_axis_along_x() {
        let m = compute_covariance(3.0, 1.0, FRAC_PI_2);
        assert_matrix_eq(&m, &Matrix2::new(9.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotated_covariance_is_symmetric_and_positive() {
        let m = compute_covariance(3.0, 1.0, FRAC_PI_4);
        assert_relative_eq!(m[(0, 1)], m[(1, 0)], epsilon = 1e-12);
        assert_relative_eq!(m[(0, 1)], 4.0, epsilon = 1e-10);

        let eigenvalues = m.symmetric_eigenvalues();
        assert!(eigenvalues.iter().all(|&e| e > 0.0));
        // Trace and determinant are rotation invariant
        assert_relative_eq!(m.trace(), 10.0, epsilon = 1e-10);
        assert_relative_eq!(m.determinant(), 9.0, epsilon = 1e-10);
    }

    #[test]
    fn test_decompose_round_trip() {
        for &theta in &[0.0, FRAC_PI_6, FRAC_PI_4, 1.2, -0.4, -1.3] {
            let m = compute_covariance(5.0, 2.0, theta);
            let (major, minor, recovered) = decompose_covariance(&m);
            assert_relative_eq!(major, 5.0, epsilon = 1e-10);
            assert_relative_eq!(minor, 2.0, epsilon = 1e-10);
            assert_relative_eq!(recovered, theta, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_decompose_circle() {
        let (major, minor, theta) = decompose_covariance(&Matrix2::new(4.0, 0.0, 0.0, 4.0));
        assert_relative_eq!(major, 2.0);
        assert_relative_eq!(minor, 2.0);
        assert_relative_eq!(theta, 0.0);
    }

    #[test]
    fn test_decompose_degenerate_line() {
        // A zero-width ellipse must not produce NaN for the minor axis
        let m = compute_covariance(2.0_f64, 0.0, 0.3);
        let (major, minor, _) = decompose_covariance(&m);
        assert_relative_eq!(major, 2.0, epsilon = 1e-10);
        assert!(!minor.is_nan());
        assert_relative_eq!(minor, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_orientation() {
        assert_relative_eq!(normalize_orientation(0.0), 0.0);
        assert_relative_eq!(normalize_orientation(45.0), 45.0);
        assert_relative_eq!(normalize_orientation(180.0), 0.0);
        assert_relative_eq!(normalize_orientation(-56.0), 124.0);
        assert_relative_eq!(normalize_orientation(-180.0), 0.0);
        assert_relative_eq!(normalize_orientation(370.0), 10.0);
        assert_relative_eq!(normalize_orientation(-0.0), 0.0);
        assert!(normalize_orientation(-0.0_f64).is_sign_positive());
    }

    #[test]
    fn test_angle_conversions() {
        assert_relative_eq!(to_radians(180.0), std::f64::consts::PI);
        assert_relative_eq!(to_degrees(FRAC_PI_4), 45.0);
        assert_relative_eq!(to_degrees(to_radians(-56.0)), -56.0, epsilon = 1e-12);
    }
}
