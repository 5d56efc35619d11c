//! Shared wgpu boilerplate helpers for the scene pipelines.

use super::texture::DepthTarget;

/// Vertex-visible uniform buffer binding.
#[must_use]
pub fn uniform_buffer(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Standard less-than depth test with writes enabled.
#[must_use]
pub fn depth_stencil() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DepthTarget::FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Everything that differs between the scene pipelines.
pub struct ScenePipelineDesc<'a> {
    /// Debug label prefix.
    pub label: &'a str,
    /// Module with `vs_main` and `fs_main` entry points.
    pub shader: &'a wgpu::ShaderModule,
    /// Color target format.
    pub format: wgpu::TextureFormat,
    /// Bind group layouts, in group order.
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Vertex (and instance) buffer layouts.
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// Primitive topology.
    pub topology: wgpu::PrimitiveTopology,
    /// Back-face culling.
    pub cull_mode: Option<wgpu::Face>,
}

/// Create a depth-tested, opaque render pipeline with `vs_main` /
/// `fs_main` entry points.
#[must_use]
pub fn create_scene_pipeline(
    device: &wgpu::Device,
    desc: &ScenePipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", desc.label)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(depth_stencil()),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
