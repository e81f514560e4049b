pub mod ellipse;

pub use ellipse::{EllipseError, ErrorEllipse};
