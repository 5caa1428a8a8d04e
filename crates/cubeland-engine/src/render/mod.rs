//! Frame rendering.
//!
//! Each frame is planned on the CPU from the scene ([`plan_frame`]) and then
//! handed to a [`RenderBackend`]: first the shadow pass from the light, then
//! the shading pass from the camera.
//!
//! Conventions:
//! - matrices are built with GL clip conventions (depth in -1..1)
//! - the wgpu backend remaps depth to 0..1 when uploading
//! - [`soft::SoftBackend`] is the CPU reference used by tests

mod backend;
mod ctx;
mod frame;
mod programs;

pub mod gpu;
pub mod soft;

pub use backend::{
    FrameUniforms, RenderBackend, ShadedDraw, ShadingPassDesc, ShadowDraw, ShadowPassDesc,
    SHADOW_BIAS,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use frame::{plan_frame, render_frame, FramePlan, LIGHT_MARKER_SCALE};
pub use gpu::{GpuBackend, SceneRenderer};
pub use programs::{ProgramStatus, ProgramTable, ShadingModel};
