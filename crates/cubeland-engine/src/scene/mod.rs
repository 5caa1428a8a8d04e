//! Scene model.
//!
//! Plain data plus the matrices derived from it: transforms, the camera, the
//! single light and the placed objects. Nothing here touches the GPU; the
//! render module reads a `Scene` once per frame after all edits are applied.

mod camera;
mod geometry;
mod light;
mod object;
mod transform;
mod world;

pub use camera::{Camera, CameraMove, PITCH_PER_UNIT, YAW_PER_UNIT};
pub use geometry::{Vertex, CUBE_VERTICES, PLANE_VERTICES};
pub use light::{Light, LightKind};
pub use object::{Material, NameAllocator, SceneObject, Shape, DEFAULT_OBJECT_COLOR};
pub use transform::{Transform, WORLD_X, WORLD_Y, WORLD_Z};
pub use world::{Scene, SceneCommand, ROTATE_STEP_DEG};
