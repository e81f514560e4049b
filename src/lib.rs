pub mod error;
pub mod fusion;
pub mod geom;
pub mod math;

#[cfg(not(feature = "f32"))]
pub type Real = f64;
#[cfg(feature = "f32")]
pub type Real = f32;

pub use error::Error;
pub use fusion::{combine, combine_tuples, EllipseFusion, FusionError, InvalidInputError};
pub use geom::{EllipseError, ErrorEllipse};

#[cfg(feature = "parallel")]
pub use fusion::combine_batches;
