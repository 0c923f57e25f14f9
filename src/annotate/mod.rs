//! Drawing over a chart before it is sent for analysis.
pub mod canvas;

pub use canvas::{AnnotateError, AnnotationCanvas, StrokeColor, Tool};
