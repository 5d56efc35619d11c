//! Draws a [`Scene`] from a [`Camera`]: instanced lit cubes plus a line
//! pass for wireframes and axes.

pub mod geometry;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use self::geometry::{cube_edges, cube_mesh, MeshVertex};
use crate::camera::{Camera, CameraUniform};
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{
    create_scene_pipeline, uniform_buffer, ScenePipelineDesc,
};
use crate::gpu::texture::DepthTarget;
use crate::gpu::RenderContext;
use crate::scene::{Drawable, Scene};

/// Per-instance data for one solid cube.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshInstance {
    /// Model matrix columns (size scaling included).
    pub model: [[f32; 4]; 4],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

impl MeshInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// World-space line endpoint.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// Everything one frame draws, flattened out of the scene graph.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneDraws {
    /// Solid cubes.
    pub cubes: Vec<MeshInstance>,
    /// Line-list endpoints (wireframe cubes and axes).
    pub lines: Vec<LineVertex>,
}

impl SceneDraws {
    /// Walk the visible part of `scene`.
    #[must_use]
    pub fn collect(scene: &Scene) -> Self {
        let mut draws = Self::default();
        let edges = cube_edges();
        scene.visit_visible(|_, node, world| match node.drawable {
            Some(Drawable::Cube {
                size,
                color,
                wireframe: false,
            }) => {
                let model = *world * Mat4::from_scale(Vec3::splat(size));
                draws.cubes.push(MeshInstance {
                    model: model.to_cols_array_2d(),
                    color: [color[0], color[1], color[2], 1.0],
                });
            }
            Some(Drawable::Cube {
                size,
                color,
                wireframe: true,
            }) => {
                let model = *world * Mat4::from_scale(Vec3::splat(size));
                draws.lines.extend(edges.iter().map(|&p| {
                    LineVertex::new(model.transform_point3(p), color)
                }));
            }
            Some(Drawable::Axes { size }) => {
                let origin = world.transform_point3(Vec3::ZERO);
                for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                    let color = axis.to_array();
                    let tip = world.transform_point3(axis * size);
                    draws.lines.push(LineVertex::new(origin, color));
                    draws.lines.push(LineVertex::new(tip, color));
                }
            }
            None => {}
        });
        draws
    }
}

/// GPU state for drawing the scene.
pub struct SceneRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    cube_vertices: wgpu::Buffer,
    cube_indices: wgpu::Buffer,
    cube_index_count: u32,
    instances: TypedBuffer<MeshInstance>,
    lines: TypedBuffer<LineVertex>,
    depth: DepthTarget,
    depth_generation: u64,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Build pipelines and static buffers for `context`'s surface format.
    #[must_use]
    pub fn new(context: &RenderContext, clear_color: [f32; 3]) -> Self {
        let device = &context.device;

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_buffer(0)],
            });
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform"),
                contents: bytemuck::bytes_of(&CameraUniform::default()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let mesh_shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/scene/mesh.wgsl"
        ));
        let line_shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/scene/line.wgsl"
        ));
        let mesh_pipeline = create_scene_pipeline(
            device,
            &ScenePipelineDesc {
                label: "Cube",
                shader: &mesh_shader,
                format: context.format(),
                bind_group_layouts: &[&camera_layout],
                buffers: &[MeshVertex::layout(), MeshInstance::layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        let line_pipeline = create_scene_pipeline(
            device,
            &ScenePipelineDesc {
                label: "Line",
                shader: &line_shader,
                format: context.format(),
                bind_group_layouts: &[&camera_layout],
                buffers: &[LineVertex::layout()],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
            },
        );

        let (vertices, indices) = cube_mesh();
        let cube_vertices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cube Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let cube_indices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cube Indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            mesh_pipeline,
            line_pipeline,
            camera_buffer,
            camera_bind_group,
            cube_vertices,
            cube_indices,
            cube_index_count: indices.len() as u32,
            instances: TypedBuffer::with_capacity(
                device,
                "Cube Instances",
                16,
                wgpu::BufferUsages::VERTEX,
            ),
            lines: TypedBuffer::with_capacity(
                device,
                "Line Vertices",
                64,
                wgpu::BufferUsages::VERTEX,
            ),
            depth: DepthTarget::new(device, context.width(), context.height()),
            depth_generation: context.size_generation(),
            clear_color: to_wgpu_color(clear_color),
        }
    }

    /// Change the background color.
    pub fn set_clear_color(&mut self, color: [f32; 3]) {
        self.clear_color = to_wgpu_color(color);
    }

    /// Draw `scene` from `camera` and present.
    ///
    /// # Errors
    ///
    /// Returns the surface error if no frame could be acquired.
    pub fn render(
        &mut self,
        context: &RenderContext,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = context.get_next_frame()?;
        self.ensure_depth(context);

        let draws = SceneDraws::collect(scene);
        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(camera)),
        );
        let _ = self
            .instances
            .write(&context.device, &context.queue, &draws.cubes);
        let _ = self
            .lines
            .write(&context.device, &context.queue, &draws.lines);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.clear_color),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            if !self.instances.is_empty() {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_vertex_buffer(0, self.cube_vertices.slice(..));
                pass.set_vertex_buffer(1, self.instances.buffer().slice(..));
                pass.set_index_buffer(
                    self.cube_indices.slice(..),
                    wgpu::IndexFormat::Uint16,
                );
                pass.draw_indexed(
                    0..self.cube_index_count,
                    0,
                    0..self.instances.count() as u32,
                );
            }
            if !self.lines.is_empty() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, self.lines.buffer().slice(..));
                pass.draw(0..self.lines.count() as u32, 0..1);
            }
        }
        context.submit(encoder);
        frame.present();
        Ok(())
    }

    /// Rebuild the depth target after the surface's backing size changed.
    fn ensure_depth(&mut self, context: &RenderContext) {
        if self.depth_generation == context.size_generation() {
            return;
        }
        self.depth =
            DepthTarget::new(&context.device, context.width(), context.height());
        self.depth_generation = context.size_generation();
        log::debug!(
            "depth target rebuilt at {}x{}",
            self.depth.size().0,
            self.depth.size().1
        );
    }
}

fn to_wgpu_color([r, g, b]: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;

    fn cube(wireframe: bool) -> Drawable {
        Drawable::Cube {
            size: 2.0,
            color: [1.0, 0.0, 0.0],
            wireframe,
        }
    }

    #[test]
    fn solid_cube_becomes_one_instance() {
        let mut scene = Scene::new();
        let root = scene.root();
        let _ = scene.add_child(
            root,
            Node::drawable("cube", cube(false)).at(Vec3::new(0.0, 1.0, 0.0)),
        );
        let draws = SceneDraws::collect(&scene);
        assert_eq!(draws.cubes.len(), 1);
        assert!(draws.lines.is_empty());
        let model = Mat4::from_cols_array_2d(&draws.cubes[0].model);
        assert_eq!(
            model.transform_point3(Vec3::splat(0.5)),
            Vec3::new(1.0, 2.0, 1.0)
        );
    }

    #[test]
    fn wireframe_cube_becomes_edges() {
        let mut scene = Scene::new();
        let root = scene.root();
        let _ = scene.add_child(root, Node::drawable("cube", cube(true)));
        let draws = SceneDraws::collect(&scene);
        assert!(draws.cubes.is_empty());
        assert_eq!(draws.lines.len(), 24);
    }

    #[test]
    fn axes_become_three_colored_lines() {
        let mut scene = Scene::new();
        let root = scene.root();
        let _ = scene
            .add_child(root, Node::drawable("axes", Drawable::Axes { size: 1.0 }));
        let draws = SceneDraws::collect(&scene);
        assert_eq!(draws.lines.len(), 6);
        assert_eq!(draws.lines[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(draws.lines[1].color, [1.0, 0.0, 0.0]);
        assert_eq!(draws.lines[5].position, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn hidden_nodes_are_not_drawn() {
        let mut scene = Scene::new();
        let root = scene.root();
        let id = scene
            .add_child(root, Node::drawable("cube", cube(false)))
            .unwrap();
        scene.node_mut(id).unwrap().visible = false;
        assert_eq!(SceneDraws::collect(&scene), SceneDraws::default());
    }
}
