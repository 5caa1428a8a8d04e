//! Cubeland engine crate.
//!
//! Scene model, two-pass renderer and the window/GPU runtime used by the
//! viewer binary.

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod resources;
pub mod scene;
pub mod window;
