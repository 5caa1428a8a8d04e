use crate::render::backend::SHADOW_BIAS;
use crate::render::programs::ShadingModel;
use crate::scene::Vertex;

use super::uniforms::ObjectUniform;

pub(super) const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bind group layouts shared by the depth and shading pipelines.
pub(super) struct Layouts {
    /// Group 0: a plain uniform block (frame or light-space).
    pub uniforms: wgpu::BindGroupLayout,
    /// Group 1: per-draw block behind a dynamic offset.
    pub object: wgpu::BindGroupLayout,
    /// Group 2: diffuse + specular maps and their sampler.
    pub material: wgpu::BindGroupLayout,
    /// Group 3: shadow map + comparison sampler.
    pub shadow: wgpu::BindGroupLayout,
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubeland uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubeland object bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubeland material bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shadow = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubeland shadow bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        Self {
            uniforms,
            object,
            material,
            shadow,
        }
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
    2 => Float32x2  // uv
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

fn primitive() -> wgpu::PrimitiveState {
    // The baked meshes do not share a winding, so nothing is culled.
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

/// WGSL for one shading model, with `SHADOW_BIAS` injected from the Rust
/// constant so both backends test against the same offset.
fn shading_source(model: ShadingModel) -> String {
    let body = match model {
        ShadingModel::Phong => include_str!("../shaders/phong.wgsl"),
        ShadingModel::Gouraud => include_str!("../shaders/gouraud.wgsl"),
        ShadingModel::BlinnPhong => include_str!("../shaders/blinn_phong.wgsl"),
    };
    format!("const SHADOW_BIAS: f32 = {SHADOW_BIAS:?};\n{body}")
}

/// Depth state of the shadow pass. No hardware bias: the shading programs
/// apply [`SHADOW_BIAS`] themselves.
fn shadow_depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: SHADOW_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Runs `build` inside a validation error scope.
///
/// Shader and pipeline errors are reported through the scope instead of the
/// device's uncaptured-error handler, so a broken program does not abort.
fn validated<T>(device: &wgpu::Device, build: impl FnOnce() -> T) -> Result<T, String> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    match pollster::block_on(scope.pop()) {
        Some(err) => Err(err.to_string()),
        None => Ok(value),
    }
}

/// Depth-only pipeline writing into the shadow map.
pub(super) fn depth_pipeline(
    device: &wgpu::Device,
    layouts: &Layouts,
) -> Result<wgpu::RenderPipeline, String> {
    validated(device, || {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cubeland depth shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/depth.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cubeland depth pipeline layout"),
            bind_group_layouts: &[&layouts.uniforms, &layouts.object],
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cubeland depth pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: None,
            primitive: primitive(),
            depth_stencil: Some(shadow_depth_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    })
}

/// Lit pipeline for one shading model.
pub(super) fn shading_pipeline(
    device: &wgpu::Device,
    layouts: &Layouts,
    model: ShadingModel,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, String> {
    validated(device, || {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(model.label()),
            source: wgpu::ShaderSource::Wgsl(shading_source(model).into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cubeland shading pipeline layout"),
            bind_group_layouts: &[
                &layouts.uniforms,
                &layouts.object,
                &layouts.material,
                &layouts.shadow,
            ],
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(model.label()),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── shadow bias ───────────────────────────────────────────────────────

    #[test]
    fn shading_sources_define_the_shared_bias_once() {
        let decl = format!("const SHADOW_BIAS: f32 = {SHADOW_BIAS:?};");
        for model in ShadingModel::ALL {
            let src = shading_source(model);
            assert!(src.starts_with(&decl), "{model:?}");
            assert_eq!(src.matches("const SHADOW_BIAS").count(), 1, "{model:?}");
            assert!(src.contains("ndc.z - SHADOW_BIAS"), "{model:?}");
        }
    }

    #[test]
    fn shadow_pass_writes_unbiased_depth() {
        let state = shadow_depth_state();
        assert_eq!(state.bias, wgpu::DepthBiasState::default());
        assert!(state.depth_write_enabled);
    }
}
