pub mod covariance;
pub mod inverse;

pub use covariance::{compute_covariance, decompose_covariance, normalize_orientation};
pub use inverse::{inverse_2x2, is_singular, SingularMatrixError};
