use crate::fusion::FusionError;
use crate::geom::EllipseError;
use crate::math::SingularMatrixError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ellipse(#[from] EllipseError),

    #[error(transparent)]
    SingularMatrix(#[from] SingularMatrixError),

    #[error(transparent)]
    Fusion(#[from] FusionError),
}
