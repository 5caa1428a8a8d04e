//! Small value types shared by the runtime and the renderers.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
