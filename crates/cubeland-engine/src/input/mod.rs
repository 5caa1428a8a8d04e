//! Input subsystem.
//!
//! The public API does not expose winit types; the runtime translates
//! platform events with the helpers in `platform`.

mod frame;
mod state;
mod types;
pub(crate) mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
