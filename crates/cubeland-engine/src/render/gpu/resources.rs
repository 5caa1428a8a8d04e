//! GPU-side resources owned by the scene renderer.
//!
//! Every wgpu handle here is released when its owner is dropped.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::resources::{ResourceCache, TextureHandle};
use crate::scene::{Material, Shape};

use super::pipelines::{Layouts, SHADOW_FORMAT};
use super::uniforms::{aligned_stride, ObjectUniform};

// ── shadow map ────────────────────────────────────────────────────────────

pub(super) struct ShadowMap {
    pub width: u32,
    pub height: u32,
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// Group 3 of the shading pipelines.
    pub bind_group: wgpu::BindGroup,
}

impl ShadowMap {
    pub fn new(device: &wgpu::Device, layouts: &Layouts, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cubeland shadow map"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubeland shadow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cubeland shadow bind group"),
            layout: &layouts.shadow,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            width,
            height,
            _texture: texture,
            view,
            bind_group,
        }
    }
}

// ── meshes ────────────────────────────────────────────────────────────────

pub(super) struct Meshes {
    cube: wgpu::Buffer,
    plane: wgpu::Buffer,
}

impl Meshes {
    pub fn new(device: &wgpu::Device) -> Self {
        let upload = |label, shape: Shape| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(shape.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            })
        };

        Self {
            cube: upload("cubeland cube vbo", Shape::Cube),
            plane: upload("cubeland plane vbo", Shape::Plane),
        }
    }

    /// Vertex buffer and vertex count for `shape`.
    pub fn get(&self, shape: Shape) -> (&wgpu::Buffer, u32) {
        let buffer = match shape {
            Shape::Cube => &self.cube,
            Shape::Plane => &self.plane,
        };
        (buffer, shape.vertices().len() as u32)
    }
}

// ── material textures ─────────────────────────────────────────────────────

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuTexture {
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Uploaded material textures plus one bind group per distinct material.
pub(super) struct MaterialTextures {
    white: GpuTexture,
    sampler: wgpu::Sampler,
    textures: HashMap<TextureHandle, GpuTexture>,
    bind_groups: HashMap<Material, wgpu::BindGroup>,
}

impl MaterialTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = GpuTexture::upload(device, queue, "cubeland white texel", 1, 1, &[255u8; 4]);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubeland material sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            white,
            sampler,
            textures: HashMap::new(),
            bind_groups: HashMap::new(),
        }
    }

    /// Uploads any texture `material` references that is not on the GPU yet
    /// and builds its bind group.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &Layouts,
        cache: &ResourceCache,
        material: Material,
    ) {
        if self.bind_groups.contains_key(&material) {
            return;
        }

        for handle in [material.diffuse, material.specular].into_iter().flatten() {
            if self.textures.contains_key(&handle) {
                continue;
            }
            // Failed loads stay on the white fallback.
            if let Some(img) = cache.image(handle) {
                let label = format!("cubeland texture {}", handle.index());
                let tex = GpuTexture::upload(
                    device,
                    queue,
                    &label,
                    img.width(),
                    img.height(),
                    img.as_raw(),
                );
                self.textures.insert(handle, tex);
            }
        }

        let diffuse = self.view(material.diffuse);
        let specular = self.view(material.specular);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cubeland material bind group"),
            layout: &layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(diffuse),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(specular),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.bind_groups.insert(material, bind_group);
    }

    pub fn bind_group(&self, material: Material) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(&material)
    }

    fn view(&self, handle: Option<TextureHandle>) -> &wgpu::TextureView {
        handle
            .and_then(|h| self.textures.get(&h))
            .map(|t| &t.view)
            .unwrap_or(&self.white.view)
    }
}

// ── per-draw uniform slots ────────────────────────────────────────────────

/// Growable uniform buffer holding one [`ObjectUniform`] per draw.
pub(super) struct ObjectSlots {
    label: &'static str,
    stride: u64,
    capacity: usize,
    buffer: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl ObjectSlots {
    pub fn new(device: &wgpu::Device, label: &'static str) -> Self {
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        Self {
            label,
            stride: aligned_stride(std::mem::size_of::<ObjectUniform>() as u64, align),
            capacity: 0,
            buffer: None,
            bind_group: None,
        }
    }

    /// Writes `items` into consecutive slots, growing the buffer if needed.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &Layouts,
        items: &[ObjectUniform],
    ) {
        if items.is_empty() {
            return;
        }
        self.ensure_capacity(device, layouts, items.len());
        let Some(buffer) = self.buffer.as_ref() else { return };

        let stride = self.stride as usize;
        let mut bytes = vec![0u8; items.len() * stride];
        for (i, item) in items.iter().enumerate() {
            let src = bytemuck::bytes_of(item);
            bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
        }
        queue.write_buffer(buffer, 0, &bytes);
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    pub fn offset(&self, index: usize) -> u32 {
        (index as u64 * self.stride) as u32
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, layouts: &Layouts, required: usize) {
        if required <= self.capacity && self.buffer.is_some() {
            return;
        }

        let capacity = required.next_power_of_two().max(16);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size: capacity as u64 * self.stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout: &layouts.object,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });

        self.buffer = Some(buffer);
        self.bind_group = Some(bind_group);
        self.capacity = capacity;
    }
}
