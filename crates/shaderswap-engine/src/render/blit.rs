use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::shader::{BoundShader, ShaderId, ShaderKind};

use super::{RenderCtx, RenderTarget};

type Module = Arc<wgpu::ShaderModule>;

/// Full-destination texture copy.
///
/// Owns the built-in vertex/pixel stages, the bind group layout every source
/// texture is bound with, and one pipeline per (vertex, pixel, format)
/// combination seen so far.
pub struct BlitRenderer {
    default_module: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    vertex: Option<ShaderId>,
    pixel: Option<ShaderId>,
    format: wgpu::TextureFormat,
}

impl BlitRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let default_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaderswap built-in copy shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shaderswap copy bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shaderswap copy pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        // Nearest filtering keeps single-texel patterns intact.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shaderswap copy sampler"),
            ..Default::default()
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shaderswap copy quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shaderswap copy quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            default_module,
            bind_group_layout,
            pipeline_layout,
            sampler,
            quad_vbo,
            quad_ibo,
            pipelines: HashMap::new(),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Drops cached pipelines that reference `id`.
    pub fn forget_shader(&mut self, id: ShaderId) {
        self.pipelines
            .retain(|key, _| key.vertex != Some(id) && key.pixel != Some(id));
    }

    /// Records one copy of `source` over the whole of `target`.
    ///
    /// `vertex`/`pixel` are the shaders active on the context; `None` selects
    /// the built-in stage.
    pub fn copy(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        vertex: Option<&BoundShader<Module>>,
        pixel: Option<&BoundShader<Module>>,
        source: &wgpu::BindGroup,
    ) {
        debug_assert!(vertex.is_none_or(|s| s.kind == ShaderKind::Vertex));
        debug_assert!(pixel.is_none_or(|s| s.kind == ShaderKind::Pixel));

        let key = PipelineKey {
            vertex: vertex.map(|s| s.id),
            pixel: pixel.map(|s| s.id),
            format: ctx.format,
        };
        let vs: &wgpu::ShaderModule = vertex.map_or(&self.default_module, |s| &*s.module);
        let fs: &wgpu::ShaderModule = pixel.map_or(&self.default_module, |s| &*s.module);

        let pipeline = self.pipelines.entry(key).or_insert_with(|| {
            log::debug!(
                "building copy pipeline (vertex {:?}, pixel {:?}, {:?})",
                key.vertex,
                key.pixel,
                key.format
            );
            build_pipeline(ctx.device, &self.pipeline_layout, vs, fs, key.format)
        });

        let mut rpass = target.begin_pass("shaderswap copy pass", wgpu::Color::BLACK);

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, source, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    vs: &wgpu::ShaderModule,
    fs: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("shaderswap copy pipeline"),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: vs,
            entry_point: Some(ShaderKind::Vertex.entry_point()),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: fs,
            entry_point: Some(ShaderKind::Pixel.entry_point()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
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
    })
}

// ── quad ──────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // NDC
    uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Covers the whole destination: NDC [-1, 1] on both axes.
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0], uv: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_full_destination() {
        let (mut min, mut max) = ([f32::MAX; 2], [f32::MIN; 2]);
        for v in QUAD_VERTICES {
            for a in 0..2 {
                min[a] = min[a].min(v.pos[a]);
                max[a] = max[a].max(v.pos[a]);
            }
        }
        assert_eq!(min, [-1.0, -1.0]);
        assert_eq!(max, [1.0, 1.0]);
    }

    #[test]
    fn quad_maps_top_left_to_uv_origin() {
        let top_left = QUAD_VERTICES
            .iter()
            .find(|v| v.pos == [-1.0, 1.0])
            .unwrap();
        assert_eq!(top_left.uv, [0.0, 0.0]);

        let bottom_right = QUAD_VERTICES
            .iter()
            .find(|v| v.pos == [1.0, -1.0])
            .unwrap();
        assert_eq!(bottom_right.uv, [1.0, 1.0]);
    }

    #[test]
    fn quad_indices_form_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn vertex_layout_matches_struct() {
        let layout = QuadVertex::layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }
}
