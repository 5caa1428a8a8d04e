//! CPU reference backend.
//!
//! Rasterizes the shadow pass into a [`DepthMap`] and records the shading
//! pass instead of drawing it. Its shadow test uses the same [`SHADOW_BIAS`]
//! as the GPU programs, over unbiased depth.

mod depth_map;

use cgmath::{Matrix4, Vector3, Vector4};

use crate::coords::Viewport;

use super::backend::{RenderBackend, ShadedDraw, ShadingPassDesc, ShadowPassDesc, SHADOW_BIAS};
use super::programs::{ProgramTable, ShadingModel};

pub use depth_map::{DepthMap, FAR_DEPTH};

/// What the shading pass would have drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedRecord {
    pub draw: ShadedDraw,
    /// Fraction of the mesh's vertices in shadow, `0.0..=1.0`.
    pub shadow_coverage: f32,
}

/// One executed pass, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum PassRecord {
    Shadow {
        width: u32,
        height: u32,
        draws: usize,
    },
    Shading {
        viewport: Viewport,
        program: ShadingModel,
        draws: Vec<ShadedRecord>,
    },
    /// No usable program; nothing was drawn.
    ShadingSkipped,
}

pub struct SoftBackend {
    depth: DepthMap,
    light_space: Matrix4<f32>,
    programs: ProgramTable,
    passes: Vec<PassRecord>,
}

impl Default for SoftBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftBackend {
    pub fn new() -> Self {
        Self::with_programs(ProgramTable::all_ready())
    }

    /// Backend whose program availability is controlled by the caller.
    pub fn with_programs(programs: ProgramTable) -> Self {
        Self {
            depth: DepthMap::new(1, 1),
            light_space: Matrix4::from_scale(1.0),
            programs,
            passes: Vec::new(),
        }
    }

    pub fn depth_map(&self) -> &DepthMap {
        &self.depth
    }

    pub fn passes(&self) -> &[PassRecord] {
        &self.passes
    }

    /// Shadow term at a world position: 1.0 when something nearer to the light
    /// was drawn there, 0.0 otherwise. Points outside the map or beyond the far
    /// plane are never shadowed.
    pub fn shadow_factor(&self, world: Vector3<f32>) -> f32 {
        let p = self.light_space * world.extend(1.0);
        let ndc = p.truncate() / p.w;
        let coords = ndc * 0.5 + Vector3::new(0.5, 0.5, 0.5);

        if coords.z > 1.0 {
            return 0.0;
        }
        let Some(closest) = self.depth.sample(coords.x, coords.y) else {
            return 0.0;
        };

        if coords.z - SHADOW_BIAS > closest { 1.0 } else { 0.0 }
    }

    fn coverage(&self, draw: &ShadedDraw) -> f32 {
        if draw.unlit {
            return 0.0;
        }
        let vertices = draw.shape.vertices();
        let shadowed: f32 = vertices
            .iter()
            .map(|v| {
                let w = draw.model * Vector4::new(v.position[0], v.position[1], v.position[2], 1.0);
                self.shadow_factor(w.truncate())
            })
            .sum();
        shadowed / vertices.len() as f32
    }
}

impl RenderBackend for SoftBackend {
    fn shadow_pass(&mut self, pass: &ShadowPassDesc) {
        self.depth.clear(pass.width, pass.height);
        self.light_space = pass.light_space;

        for draw in &pass.draws {
            let mvp = pass.light_space * draw.model;
            for tri in draw.shape.vertices().chunks_exact(3) {
                let clip = [0, 1, 2].map(|i| {
                    let p = tri[i].position;
                    mvp * Vector4::new(p[0], p[1], p[2], 1.0)
                });
                self.depth.rasterize(clip);
            }
        }

        self.passes.push(PassRecord::Shadow {
            width: pass.width,
            height: pass.height,
            draws: pass.draws.len(),
        });
    }

    fn shading_pass(&mut self, pass: &ShadingPassDesc) {
        let Some(program) = self.programs.resolve(pass.program) else {
            self.passes.push(PassRecord::ShadingSkipped);
            return;
        };

        let draws = pass
            .draws
            .iter()
            .map(|d| ShadedRecord {
                draw: d.clone(),
                shadow_coverage: self.coverage(d),
            })
            .collect();

        self.passes.push(PassRecord::Shading {
            viewport: pass.viewport,
            program,
            draws,
        });
    }
}
