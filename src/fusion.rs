//! Inverse-variance weighted fusion of independent error ellipses.
//!
//! Each ellipse is turned into a precision (information) matrix `P_i = C_i⁻¹`. Under the
//! independence assumption precisions add, so the fused estimate is
//!
//! - `C = (Σ P_i)⁻¹`
//! - `μ = C · Σ P_i · x_i`
//!
//! which is the closed-form maximum-likelihood combination of the inputs.

use crate::geom::ellipse::{EllipseError, ErrorEllipse};
use crate::math::inverse::{inverse_2x2, SingularMatrixError};
use crate::Real;
use nalgebra::{self as na, Matrix2, Point2, Vector2};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("at least one ellipse is required")]
    Empty,

    #[error(transparent)]
    Ellipse(#[from] EllipseError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FusionError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Singular matrix: {0}")]
    SingularMatrix(#[from] SingularMatrixError),
}

impl From<EllipseError> for FusionError {
    fn from(err: EllipseError) -> Self {
        Self::InvalidInput(err.into())
    }
}

/// Stateless fusion engine.
///
/// The only setting is the relative tolerance used to decide when a matrix is too close to
/// singular to invert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseFusion<F: na::RealField + Copy> {
    tolerance: F,
}

impl<F: na::RealField + Copy> Default for EllipseFusion<F> {
    fn default() -> Self {
        Self {
            tolerance: F::default_epsilon(),
        }
    }
}

impl<F: na::RealField + Copy> EllipseFusion<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: F) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn inverse_2x2(&self, matrix: &Matrix2<F>) -> Result<Matrix2<F>, SingularMatrixError> {
        inverse_2x2(matrix, self.tolerance)
    }

    /// Precision matrix of a single ellipse
    pub fn to_precision(&self, ellipse: &ErrorEllipse<F>) -> Result<Matrix2<F>, FusionError> {
        Ok(self.inverse_2x2(&ellipse.covariance())?)
    }

    /// Turns an accumulated precision matrix and precision-weighted center sum back into an
    /// ellipse.
    pub fn from_precision(
        &self,
        precision: &Matrix2<F>,
        weighted_center: &Vector2<F>,
    ) -> Result<ErrorEllipse<F>, FusionError> {
        let covariance = self.inverse_2x2(precision)?;
        let mu = covariance * weighted_center;
        // An out-of-range weighted sum shows up here as inf or NaN
        if mu.iter().any(|x| !x.is_finite()) {
            return Err(SingularMatrixError::NonFinite.into());
        }
        Ok(ErrorEllipse::from_covariance(&covariance, Point2::from(mu)))
    }

    /// Fuses all `ellipses` into one.
    ///
    /// # Errors
    /// * `FusionError::InvalidInput` - If `ellipses` is empty
    /// * `FusionError::SingularMatrix` - If an input covariance or the summed precision cannot
    ///   be inverted
    pub fn combine(&self, ellipses: &[ErrorEllipse<F>]) -> Result<ErrorEllipse<F>, FusionError> {
        if ellipses.is_empty() {
            return Err(InvalidInputError::Empty.into());
        }

        let mut precision_sum = Matrix2::<F>::zeros();
        let mut weighted_sum = Vector2::<F>::zeros();

        for (idx, ellipse) in ellipses.iter().enumerate() {
            let precision = self.to_precision(ellipse)?;
            trace!(idx, ?precision, "accumulating ellipse precision");

            weighted_sum += precision * ellipse.center().coords;
            precision_sum += precision;
        }

        let fused = self.from_precision(&precision_sum, &weighted_sum)?;
        debug!(
            inputs = ellipses.len(),
            x = ?fused.x(),
            y = ?fused.y(),
            sigma_major = ?fused.sigma_major(),
            sigma_minor = ?fused.sigma_minor(),
            theta = ?fused.theta(),
            "fused error ellipses"
        );

        Ok(fused)
    }

    /// Same as [`EllipseFusion::combine`] on plain `(x, y, sigma_major, sigma_minor, theta)`
    /// tuples. Every tuple is validated before any matrix work starts.
    pub fn combine_tuples(
        &self,
        ellipses: &[(F, F, F, F, F)],
    ) -> Result<(F, F, F, F, F), FusionError> {
        let ellipses = ellipses
            .iter()
            .map(|&t| ErrorEllipse::try_from(t))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.combine(&ellipses)?.data())
    }
}

/// Fuses `ellipses` with the default tolerance.
pub fn combine<F: na::RealField + Copy>(
    ellipses: &[ErrorEllipse<F>],
) -> Result<ErrorEllipse<F>, FusionError> {
    EllipseFusion::default().combine(ellipses)
}

/// Fuses `(x, y, sigma_major, sigma_minor, theta)` tuples, `theta` in degrees.
pub fn combine_tuples(
    ellipses: &[(Real, Real, Real, Real, Real)],
) -> Result<(Real, Real, Real, Real, Real), FusionError> {
    EllipseFusion::default().combine_tuples(ellipses)
}

/// Fuses many independent groups of ellipses in parallel, one result per group.
#[cfg(feature = "parallel")]
pub fn combine_batches<F: na::RealField + Copy>(
    batches: &[Vec<ErrorEllipse<F>>],
) -> Vec<Result<ErrorEllipse<F>, FusionError>> {
    use rayon::prelude::*;

    let engine = EllipseFusion::<F>::default();
    batches
        .par_iter()
        .map(|batch| engine.combine(batch))
        .collect()
}
