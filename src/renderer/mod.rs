//! WebGPU rendering module
//!
//! Every entity is a flat-coloured triangle list built in field coordinates.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, field_to_ndc};
pub use shapes::{Starfield, scene};
pub use vertex::Vertex;
