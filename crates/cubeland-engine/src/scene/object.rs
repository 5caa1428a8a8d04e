use std::collections::HashMap;
use std::fmt;

use cgmath::Vector3;

use crate::resources::TextureHandle;

use super::geometry::{Vertex, CUBE_VERTICES, PLANE_VERTICES};
use super::transform::Transform;

/// Initial value of the scene-wide object color.
pub const DEFAULT_OBJECT_COLOR: Vector3<f32> = Vector3::new(1.0, 0.5, 0.31);

/// Geometric kind of a scene object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Shape {
    Cube,
    Plane,
}

impl Shape {
    /// Lowercase kind name used as the base of object names.
    pub fn kind_name(self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Plane => "plane",
        }
    }

    pub fn vertices(self) -> &'static [Vertex] {
        match self {
            Shape::Cube => &CUBE_VERTICES,
            Shape::Plane => &PLANE_VERTICES,
        }
    }

    /// Base edge length the transform's scale is multiplied by.
    pub fn edge_length(self) -> f32 {
        match self {
            Shape::Cube | Shape::Plane => 1.0,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Texture maps bound for an object in the shading pass.
///
/// A missing map is sampled as plain white.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Material {
    pub diffuse: Option<TextureHandle>,
    pub specular: Option<TextureHandle>,
}

/// A placed (or placeholder) piece of geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    pub material: Material,
}

impl SceneObject {
    /// Default object carrying the bare kind name. Does not touch any counter.
    pub fn placeholder(shape: Shape) -> Self {
        Self {
            name: shape.kind_name().to_string(),
            shape,
            transform: Transform::default(),
            material: Material::default(),
        }
    }

    /// Named object allocated from `names`.
    pub fn placed(shape: Shape, names: &mut NameAllocator, material: Material) -> Self {
        Self {
            name: names.allocate(shape),
            shape,
            transform: Transform::default(),
            material,
        }
    }
}

/// Per-kind monotonically increasing name counters.
///
/// Counters never decrease, so a name freed by deleting an object is never
/// handed out again.
#[derive(Debug, Default, Clone)]
pub struct NameAllocator {
    counters: HashMap<Shape, u32>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `"<kind> <n>"` and advances that kind's counter.
    pub fn allocate(&mut self, shape: Shape) -> String {
        let n = self.counters.entry(shape).or_insert(0);
        let name = format!("{} {}", shape.kind_name(), n);
        *n += 1;
        name
    }

    /// Number of names handed out so far for `shape`.
    pub fn issued(&self, shape: Shape) -> u32 {
        self.counters.get(&shape).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── naming ────────────────────────────────────────────────────────────

    #[test]
    fn cubes_are_numbered_from_zero() {
        let mut names = NameAllocator::new();
        let got: Vec<String> = (0..4).map(|_| names.allocate(Shape::Cube)).collect();
        assert_eq!(got, vec!["cube 0", "cube 1", "cube 2", "cube 3"]);
        assert_eq!(names.issued(Shape::Cube), 4);
    }

    #[test]
    fn kinds_count_independently() {
        let mut names = NameAllocator::new();
        assert_eq!(names.allocate(Shape::Cube), "cube 0");
        assert_eq!(names.allocate(Shape::Plane), "plane 0");
        assert_eq!(names.allocate(Shape::Cube), "cube 1");
        assert_eq!(names.issued(Shape::Plane), 1);
    }

    #[test]
    fn placeholder_consumes_no_number() {
        let mut names = NameAllocator::new();
        let ph = SceneObject::placeholder(Shape::Cube);
        assert_eq!(ph.name, "cube");
        assert_eq!(names.issued(Shape::Cube), 0);
        let placed = SceneObject::placed(Shape::Cube, &mut names, Material::default());
        assert_eq!(placed.name, "cube 0");
    }

    // ── shape ─────────────────────────────────────────────────────────────

    #[test]
    fn shape_geometry() {
        assert_eq!(Shape::Cube.vertices().len(), 36);
        assert_eq!(Shape::Plane.vertices().len(), 6);
        assert_eq!(Shape::Cube.edge_length(), 1.0);
        assert_eq!(Shape::Plane.to_string(), "plane");
    }

    #[test]
    fn default_material_has_no_maps() {
        let m = Material::default();
        assert!(m.diffuse.is_none() && m.specular.is_none());
        assert_eq!(DEFAULT_OBJECT_COLOR, Vector3::new(1.0, 0.5, 0.31));
    }
}
