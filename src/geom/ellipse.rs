use crate::math::covariance::{self, normalize_orientation, to_degrees, to_radians};
use nalgebra::{self as na, Matrix2, Point2};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EllipseError {
    #[error("Ellipse parameter '{0}' must be finite")]
    NonFinite(&'static str),

    #[error("Axis length '{0}' must not be negative, got {1}")]
    NegativeAxis(&'static str, f64),

    #[error("Semi-major axis must not be shorter than semi-minor axis, got major={0}, minor={1}")]
    InvalidAxesRatio(f64, f64),
}

/// A 2-D Gaussian error region.
///
/// `theta` is the orientation of the major axis in degrees, measured from the y axis towards
/// the x axis. Axis lengths share whatever unit the caller uses, which must be the same for
/// every ellipse that is fused together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorEllipse<F: na::RealField + Copy> {
    center: Point2<F>,
    sigma_major: F,
    sigma_minor: F,
    theta: F,
}

impl<F: na::RealField + Copy> ErrorEllipse<F> {
    /// Creates an ellipse, rejecting non-finite values, negative axes and a minor axis that
    /// exceeds the major axis.
    ///
    /// Zero-length axes are accepted; such an ellipse is degenerate and fails later when its
    /// covariance is inverted.
    pub fn new(
        x: F,
        y: F,
        sigma_major: F,
        sigma_minor: F,
        theta: F,
    ) -> Result<Self, EllipseError> {
        for (name, value) in [
            ("x", x),
            ("y", y),
            ("sigma_major", sigma_major),
            ("sigma_minor", sigma_minor),
            ("theta", theta),
        ] {
            if !value.is_finite() {
                return Err(EllipseError::NonFinite(name));
            }
        }
        if sigma_major < F::zero() {
            return Err(EllipseError::NegativeAxis(
                "sigma_major",
                sigma_major.to_subset_unchecked(),
            ));
        }
        if sigma_minor < F::zero() {
            return Err(EllipseError::NegativeAxis(
                "sigma_minor",
                sigma_minor.to_subset_unchecked(),
            ));
        }
        if sigma_minor > sigma_major {
            return Err(EllipseError::InvalidAxesRatio(
                sigma_major.to_subset_unchecked(),
                sigma_minor.to_subset_unchecked(),
            ));
        }

        Ok(Self {
            center: Point2::new(x, y),
            sigma_major,
            sigma_minor,
            theta,
        })
    }

    /// Recovers an ellipse from a covariance matrix and a center.
    ///
    /// The orientation is reported in `[0, 180)` degrees.
    pub fn from_covariance(matrix: &Matrix2<F>, center: Point2<F>) -> Self {
        let (sigma_major, sigma_minor, theta) = covariance::decompose_covariance(matrix);
        Self {
            center,
            sigma_major,
            sigma_minor,
            theta: normalize_orientation(to_degrees(theta)),
        }
    }

    pub fn x(&self) -> F {
        self.center.x
    }

    pub fn y(&self) -> F {
        self.center.y
    }

    pub fn center(&self) -> Point2<F> {
        self.center
    }

    pub fn sigma_major(&self) -> F {
        self.sigma_major
    }

    pub fn sigma_minor(&self) -> F {
        self.sigma_minor
    }

    /// Orientation of the major axis in degrees
    pub fn theta(&self) -> F {
        self.theta
    }

    /// Returns `(x, y, sigma_major, sigma_minor, theta)`
    pub fn data(&self) -> (F, F, F, F, F) {
        (
            self.center.x,
            self.center.y,
            self.sigma_major,
            self.sigma_minor,
            self.theta,
        )
    }

    /// Covariance matrix of the ellipse shape
    pub fn covariance(&self) -> Matrix2<F> {
        covariance::compute_covariance(self.sigma_major, self.sigma_minor, to_radians(self.theta))
    }
}

impl<F: na::RealField + Copy> TryFrom<(F, F, F, F, F)> for ErrorEllipse<F> {
    type Error = EllipseError;

    fn try_from(value: (F, F, F, F, F)) -> Result<Self, Self::Error> {
        let (x, y, sigma_major, sigma_minor, theta) = value;
        Self::new(x, y, sigma_major, sigma_minor, theta)
    }
}

impl<F: na::RealField + Copy> From<ErrorEllipse<F>> for (F, F, F, F, F) {
    fn from(value: ErrorEllipse<F>) -> Self {
        value.data()
    }
}
