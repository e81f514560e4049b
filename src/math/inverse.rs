use nalgebra::{self as na, Matrix2};
use thiserror::Error;

/// Errors that can occur while inverting a 2x2 matrix
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SingularMatrixError {
    #[error("Matrix contains NaN or infinite values")]
    NonFinite,
    #[error("Matrix is singular, det={0}")]
    Singular(f64),
}

fn max_abs<F: na::RealField + Copy>(matrix: &Matrix2<F>) -> F {
    matrix.iter().fold(F::zero(), |acc, &x| acc.max(x.abs()))
}

/// Returns `true` when `matrix` cannot be inverted reliably.
///
/// The matrix is divided by its largest absolute entry before the determinant is taken, so
/// the check does not depend on the units of the matrix and the determinant cannot
/// underflow or overflow.
pub fn is_singular<F: na::RealField + Copy>(matrix: &Matrix2<F>, tolerance: F) -> bool {
    let scale = max_abs(matrix);
    if scale == F::zero() || !scale.is_finite() {
        return true;
    }
    let normalized = matrix.unscale(scale);
    let det = normalized.determinant();
    !det.is_finite() || det.abs() <= tolerance * normalized.norm_squared()
}

/// Calculates the inverse of a 2x2 matrix in closed form.
///
/// The adjugate is taken on the matrix scaled to a largest entry of one, and the result is
/// scaled back afterwards.
///
/// # Arguments
/// * `matrix` - The matrix to invert, need not be symmetric
/// * `tolerance` - Relative threshold below which the determinant counts as zero
///
/// # Errors
/// * `SingularMatrixError::NonFinite` - If the input contains NaN or infinity, or the inverse
///   does not fit in `F`
/// * `SingularMatrixError::Singular` - If the determinant is (near) zero
pub fn inverse_2x2<F: na::RealField + Copy>(
    matrix: &Matrix2<F>,
    tolerance: F,
) -> Result<Matrix2<F>, SingularMatrixError> {
    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(SingularMatrixError::NonFinite);
    }
    if is_singular(matrix, tolerance) {
        return Err(SingularMatrixError::Singular(
            matrix.determinant().to_subset_unchecked(),
        ));
    }

    let scale = max_abs(matrix);
    let normalized = matrix.unscale(scale);
    let det = normalized.determinant();
    let adjugate = Matrix2::new(
        normalized[(1, 1)],
        -normalized[(0, 1)],
        -normalized[(1, 0)],
        normalized[(0, 0)],
    );

    let inverse = adjugate.unscale(det * scale);
    if inverse.iter().any(|x| !x.is_finite()) {
        return Err(SingularMatrixError::NonFinite);
    }

    Ok(inverse)
}
