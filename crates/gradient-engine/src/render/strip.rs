use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

/// Renderer for the gradient strip mesh.
///
/// Holds one bound mesh (position, color, and index buffers). Callers choose
/// between two upload paths:
/// - [`update`](Self::update) writes new contents into the bound buffers when
///   the vertex count is unchanged
/// - [`rebuild`](Self::rebuild) discards the mesh and allocates fresh buffers
///   when the topology changed
///
/// Both paths render identically for the same input.
#[derive(Default)]
pub struct StripRenderer {
    /// One pipeline per target format (window surface, offscreen capture).
    pipelines: Vec<(wgpu::TextureFormat, wgpu::RenderPipeline)>,
    mesh: Option<StripMesh>,
}

struct StripMesh {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    vertex_count: usize,
    index_count: u32,
}

impl StripRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Replaces the bound mesh with freshly allocated buffers.
    pub fn rebuild(
        &mut self,
        ctx: &RenderCtx<'_>,
        positions: &[[f32; 2]],
        colors: &[[f32; 3]],
        indices: &[u32],
    ) {
        debug_assert_eq!(positions.len(), colors.len());

        let positions_buf = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gradient strip positions"),
            contents: bytemuck::cast_slice(positions),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let colors_buf = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gradient strip colors"),
            contents: bytemuck::cast_slice(colors),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let indices_buf = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gradient strip indices"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "strip mesh rebuilt: {} vertices, {} indices",
            positions.len(),
            indices.len()
        );

        self.mesh = Some(StripMesh {
            positions: positions_buf,
            colors: colors_buf,
            indices: indices_buf,
            vertex_count: positions.len(),
            index_count: indices.len() as u32,
        });
    }

    /// Writes new vertex contents into the bound buffers.
    ///
    /// Returns `false` (and leaves the mesh alone) when there is no bound mesh
    /// or the vertex count differs; the caller must rebuild instead.
    pub fn update(
        &mut self,
        ctx: &RenderCtx<'_>,
        positions: &[[f32; 2]],
        colors: &[[f32; 3]],
    ) -> bool {
        let Some(mesh) = self.mesh.as_ref() else {
            return false;
        };
        if mesh.vertex_count != positions.len() || positions.len() != colors.len() {
            return false;
        }

        ctx.queue.write_buffer(&mesh.positions, 0, bytemuck::cast_slice(positions));
        ctx.queue.write_buffer(&mesh.colors, 0, bytemuck::cast_slice(colors));
        true
    }

    /// Draws the bound mesh into `target`. No-op before the first upload.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.mesh.is_none() {
            return;
        }
        let pipeline_index = self.ensure_pipeline(ctx);

        let Some(mesh) = self.mesh.as_ref() else {
            return;
        };
        let pipeline = &self.pipelines[pipeline_index].1;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gradient strip pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, mesh.positions.slice(..));
        rpass.set_vertex_buffer(1, mesh.colors.slice(..));
        rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) -> usize {
        if let Some(i) = self.pipelines.iter().position(|(f, _)| *f == ctx.target_format) {
            return i;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gradient strip shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/strip.wgsl").into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gradient strip pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gradient strip pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[position_layout(), color_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("strip pipeline created for {:?}", ctx.target_format);
        self.pipelines.push((ctx.target_format, pipeline));
        self.pipelines.len() - 1
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}

fn color_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &COLOR_ATTRS,
    }
}
