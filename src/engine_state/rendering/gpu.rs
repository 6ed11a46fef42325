//! `wgpu` implementation of the chunk graphics boundary.
//!
//! Each published chunk owns a vertex buffer and a small uniform buffer holding its
//! model matrix, bound through a per-chunk bind group. Dropping the
//! `WgpuMeshBuffer` releases all three.
//!
//! The shader is expected to declare the model matrix as
//! `@group(N) @binding(0) var<uniform> model: mat4x4<f32>;` where `N` is the
//! group index given to `WgpuChunkPass`.

use cgmath::Matrix4;
use wgpu::{util::DeviceExt, BindGroup, BindGroupLayout, Buffer, Device, RenderPass};

use super::{GraphicsContext, Renderer, Vertex};

/// Label of the bind group layout for per-chunk model uniforms
pub const CHUNK_MODEL_BIND_GROUP_LAYOUT: &str = "chunk_model_bind_group_layout";
const CHUNK_MODEL_BIND_GROUP: &str = "chunk_model_bind_group";
const CHUNK_MODEL_BUFFER: &str = "chunk_model_buffer";
const CHUNK_VERTEX_BUFFER: &str = "chunk_vertex_buffer";

/// GPU resources of one published chunk.
#[derive(Debug)]
pub struct WgpuMeshBuffer {
    vertex_buffer: Buffer,
    // Kept alive for the bind group.
    _model_buffer: Buffer,
    bind_group: BindGroup,
    vertex_count: u32,
}

impl WgpuMeshBuffer {
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Creates chunk GPU resources on the thread owning the device.
pub struct WgpuMeshUploader<'a> {
    device: &'a Device,
    model_layout: &'a BindGroupLayout,
}

impl<'a> WgpuMeshUploader<'a> {
    pub fn new(device: &'a Device, model_layout: &'a BindGroupLayout) -> Self {
        WgpuMeshUploader { device, model_layout }
    }

    /// Creates the bind group layout every chunk's model bind group conforms to.
    ///
    /// Pipelines drawing chunks must include it at the group index passed to
    /// `WgpuChunkPass::new`.
    pub fn create_model_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some(CHUNK_MODEL_BIND_GROUP_LAYOUT),
        })
    }
}

impl GraphicsContext for WgpuMeshUploader<'_> {
    type MeshBuffer = WgpuMeshBuffer;

    fn upload_mesh(&mut self, model: Matrix4<f32>, vertices: &[Vertex]) -> WgpuMeshBuffer {
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(CHUNK_VERTEX_BUFFER),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let model: [[f32; 4]; 4] = model.into();
        let model_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(CHUNK_MODEL_BUFFER),
            contents: bytemuck::cast_slice(&[model]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: self.model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
            label: Some(CHUNK_MODEL_BIND_GROUP),
        });

        WgpuMeshBuffer {
            vertex_buffer,
            _model_buffer: model_buffer,
            bind_group,
            vertex_count: vertices.len() as u32,
        }
    }
}

/// Records chunk draws into a render pass whose pipeline is already set.
pub struct WgpuChunkPass<'p, 'e> {
    render_pass: &'p mut RenderPass<'e>,
    model_group: u32,
}

impl<'p, 'e> WgpuChunkPass<'p, 'e> {
    pub fn new(render_pass: &'p mut RenderPass<'e>, model_group: u32) -> Self {
        WgpuChunkPass {
            render_pass,
            model_group,
        }
    }
}

impl Renderer<WgpuMeshBuffer> for WgpuChunkPass<'_, '_> {
    fn draw(&mut self, _model: Matrix4<f32>, buffer: &WgpuMeshBuffer) {
        // The model matrix was baked into the chunk's uniform at upload.
        if buffer.vertex_count == 0 {
            return;
        }
        self.render_pass.set_bind_group(self.model_group, &buffer.bind_group, &[]);
        self.render_pass.set_vertex_buffer(0, buffer.vertex_buffer.slice(..));
        self.render_pass.draw(0..buffer.vertex_count, 0..1);
    }
}
