//! wgpu implementation of [`RenderBackend`].
//!
//! [`SceneRenderer`] holds everything that outlives a frame (pipelines, mesh
//! buffers, textures, the shadow map). [`GpuBackend`] borrows it together with
//! the current frame's encoder and executes the two passes.

mod pipelines;
mod resources;
mod uniforms;

use wgpu::util::DeviceExt;

use crate::render::backend::{RenderBackend, ShadingPassDesc, ShadowPassDesc};
use crate::render::programs::{ProgramStatus, ProgramTable, ShadingModel};
use crate::render::{RenderCtx, RenderTarget};
use crate::resources::ResourceCache;

use pipelines::Layouts;
use resources::{MaterialTextures, Meshes, ObjectSlots, ShadowMap};
use uniforms::{FrameUniform, LightSpaceUniform, ObjectUniform};

pub use uniforms::OPENGL_TO_WGPU_MATRIX;

/// Persistent GPU state for drawing a scene. Built lazily on first use.
#[derive(Default)]
pub struct SceneRenderer {
    programs: ProgramTable,
    state: Option<GpuState>,
}

struct GpuState {
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,

    layouts: Layouts,
    depth_pipeline: Option<wgpu::RenderPipeline>,
    shading_pipelines: [Option<wgpu::RenderPipeline>; 3],

    light_ubo: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    frame_ubo: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    shadow_slots: ObjectSlots,
    shading_slots: ObjectSlots,

    meshes: Meshes,
    materials: MaterialTextures,
    shadow_map: Option<ShadowMap>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the renderer to one frame.
    pub fn backend<'a, 'c, 't>(
        &'a mut self,
        ctx: &'a RenderCtx<'c>,
        target: &'a mut RenderTarget<'t>,
        cache: &'a ResourceCache,
    ) -> GpuBackend<'a, 'c, 't> {
        self.ensure_state(ctx);
        GpuBackend {
            renderer: self,
            ctx,
            target,
            cache,
        }
    }

    fn ensure_state(&mut self, ctx: &RenderCtx<'_>) {
        if let Some(state) = &self.state {
            if state.color_format == ctx.surface_format && state.depth_format == ctx.depth_format {
                return;
            }
            log::debug!("render target formats changed, rebuilding pipelines");
        }

        let device = ctx.device;
        let layouts = Layouts::new(device);

        let depth_pipeline = match pipelines::depth_pipeline(device, &layouts) {
            Ok(p) => Some(p),
            Err(msg) => {
                log::error!("shadow depth program unusable: {msg}");
                None
            }
        };

        let mut shading_pipelines: [Option<wgpu::RenderPipeline>; 3] = Default::default();
        for (slot, model) in shading_pipelines.iter_mut().zip(ShadingModel::ALL) {
            match pipelines::shading_pipeline(
                device,
                &layouts,
                model,
                ctx.surface_format,
                ctx.depth_format,
            ) {
                Ok(p) => {
                    *slot = Some(p);
                    self.programs.set(model, ProgramStatus::Ready);
                }
                Err(msg) => self.programs.set(model, ProgramStatus::Failed(msg)),
            }
        }

        let (light_ubo, light_bind_group) = uniform_block(
            device,
            &layouts,
            "cubeland light-space ubo",
            bytemuck::bytes_of(&LightSpaceUniform::new(cgmath::Matrix4::from_scale(1.0))),
        );
        let (frame_ubo, frame_bind_group) = uniform_block(
            device,
            &layouts,
            "cubeland frame ubo",
            &[0u8; std::mem::size_of::<FrameUniform>()],
        );

        self.state = Some(GpuState {
            color_format: ctx.surface_format,
            depth_format: ctx.depth_format,
            depth_pipeline,
            shading_pipelines,
            light_ubo,
            light_bind_group,
            frame_ubo,
            frame_bind_group,
            shadow_slots: ObjectSlots::new(device, "cubeland shadow objects"),
            shading_slots: ObjectSlots::new(device, "cubeland shading objects"),
            meshes: Meshes::new(device),
            materials: MaterialTextures::new(device, ctx.queue),
            shadow_map: None,
            layouts,
        });
    }
}

fn uniform_block(
    device: &wgpu::Device,
    layouts: &Layouts,
    label: &'static str,
    contents: &[u8],
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &layouts.uniforms,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}

/// A [`SceneRenderer`] bound to the current frame's encoder and targets.
pub struct GpuBackend<'a, 'c, 't> {
    renderer: &'a mut SceneRenderer,
    ctx: &'a RenderCtx<'c>,
    target: &'a mut RenderTarget<'t>,
    cache: &'a ResourceCache,
}

impl GpuState {
    fn ensure_shadow_map(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let fits = self
            .shadow_map
            .as_ref()
            .is_some_and(|m| m.width == width && m.height == height);
        if !fits {
            log::debug!("allocating {width}x{height} shadow map");
            self.shadow_map = Some(ShadowMap::new(device, &self.layouts, width, height));
        }
    }
}

impl RenderBackend for GpuBackend<'_, '_, '_> {
    fn shadow_pass(&mut self, pass: &ShadowPassDesc) {
        let ctx = self.ctx;
        let Some(state) = self.renderer.state.as_mut() else { return };
        state.ensure_shadow_map(ctx.device, pass.width, pass.height);

        ctx.queue.write_buffer(
            &state.light_ubo,
            0,
            bytemuck::bytes_of(&LightSpaceUniform::new(pass.light_space)),
        );
        let items: Vec<ObjectUniform> = pass
            .draws
            .iter()
            .map(|d| ObjectUniform::depth_only(d.model))
            .collect();
        state
            .shadow_slots
            .write(ctx.device, ctx.queue, &state.layouts, &items);

        let Some(shadow_map) = state.shadow_map.as_ref() else { return };

        // The pass clears the map even when nothing casts a shadow.
        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cubeland shadow pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &shadow_map.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (Some(pipeline), Some(objects)) =
            (state.depth_pipeline.as_ref(), state.shadow_slots.bind_group())
        else {
            return;
        };
        if pass.draws.is_empty() {
            return;
        }

        rpass.set_viewport(0.0, 0.0, pass.width as f32, pass.height as f32, 0.0, 1.0);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &state.light_bind_group, &[]);

        for (i, draw) in pass.draws.iter().enumerate() {
            let (vbo, count) = state.meshes.get(draw.shape);
            rpass.set_bind_group(1, objects, &[state.shadow_slots.offset(i)]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(0..count, 0..1);
        }
    }

    fn shading_pass(&mut self, pass: &ShadingPassDesc) {
        if !pass.viewport.is_valid() {
            return;
        }
        let ctx = self.ctx;
        let Some(program) = self.renderer.programs.resolve(pass.program) else { return };
        let Some(state) = self.renderer.state.as_mut() else { return };

        ctx.queue.write_buffer(
            &state.frame_ubo,
            0,
            bytemuck::bytes_of(&FrameUniform::from(&pass.uniforms)),
        );
        let items: Vec<ObjectUniform> = pass.draws.iter().map(ObjectUniform::shaded).collect();
        state
            .shading_slots
            .write(ctx.device, ctx.queue, &state.layouts, &items);
        for draw in &pass.draws {
            state.materials.prepare(
                ctx.device,
                ctx.queue,
                &state.layouts,
                self.cache,
                draw.material,
            );
        }

        let pipeline_index = ShadingModel::ALL
            .iter()
            .position(|m| *m == program)
            .unwrap_or(0);
        let (Some(pipeline), Some(objects), Some(shadow_map)) = (
            state.shading_pipelines[pipeline_index].as_ref(),
            state.shading_slots.bind_group(),
            state.shadow_map.as_ref(),
        ) else {
            return;
        };

        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cubeland shading pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (w, h) = (pass.viewport.width as f32, pass.viewport.height as f32);
        rpass.set_viewport(0.0, 0.0, w, h, 0.0, 1.0);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &state.frame_bind_group, &[]);
        rpass.set_bind_group(3, &shadow_map.bind_group, &[]);

        for (i, draw) in pass.draws.iter().enumerate() {
            let Some(material) = state.materials.bind_group(draw.material) else { continue };
            let (vbo, count) = state.meshes.get(draw.shape);

            rpass.insert_debug_marker(&draw.label);
            rpass.set_bind_group(1, objects, &[state.shading_slots.offset(i)]);
            rpass.set_bind_group(2, material, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(0..count, 0..1);
        }
    }
}
