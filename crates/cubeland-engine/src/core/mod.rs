//! Contract between the runtime loop and the viewer.
//!
//! The viewer sees a window handle, the GPU, input for the current frame and
//! a `render` helper; winit's event loop stays inside `window`.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
