use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use log::warn;
use wgpu::util::DeviceExt;

use prism_engine::render::RenderCtx;
use prism_engine::shader::{Program, ProgramDesc, ShaderSource};

use super::{Scene, SceneCtx};

const SHADER: &str = include_str!("shaders/quad.wgsl");

/// Quad edge length in target pixels.
const QUAD_SIZE: f32 = 200.0;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct QuadUniforms {
    mvp: [[f32; 4]; 4],
}

/// Two textured quads drawn at editable offsets with alpha blending,
/// positioned in target-pixel space under an orthographic projection.
pub struct TextureQuadScene {
    program: Program,
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    quads: [QuadInstance; 2],
    offsets: [[f32; 2]; 2],
}

struct QuadInstance {
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl TextureQuadScene {
    pub fn new(ctx: &SceneCtx<'_>) -> Result<Self> {
        let source = ShaderSource::parse(SHADER)?;

        let bind_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture quad bind layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let program = Program::build(
            ctx.device,
            &source,
            &ProgramDesc {
                bind_group_layouts: &[&bind_layout],
                vertex_buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
                }],
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                ..ProgramDesc::new("texture quad", ctx.color_format)
            },
        )?;

        let half = QUAD_SIZE / 2.0;
        let vertices = [
            QuadVertex { position: [-half, -half], uv: [0.0, 0.0] },
            QuadVertex { position: [half, -half], uv: [1.0, 0.0] },
            QuadVertex { position: [half, half], uv: [1.0, 1.0] },
            QuadVertex { position: [-half, half], uv: [0.0, 1.0] },
        ];
        let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("texture quad vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("texture quad ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture_view = upload_texture(ctx)?;
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture quad sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let quads: [QuadInstance; 2] = std::array::from_fn(|i| {
            let uniforms = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("texture quad uniforms"),
                size: std::mem::size_of::<QuadUniforms>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(if i == 0 { "quad a" } else { "quad b" }),
                layout: &bind_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&texture_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
            QuadInstance { uniforms, bind_group }
        });

        Ok(Self {
            program,
            vbo,
            ibo,
            quads,
            offsets: [[200.0, 200.0], [450.0, 300.0]],
        })
    }
}

impl Scene for TextureQuadScene {
    fn on_render(&mut self, ctx: &mut RenderCtx<'_>) {
        let (w, h) = ctx.target_size_f32();
        // Pixel space, origin top-left, +Y down, depth 0..1.
        let proj = Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0);

        for (quad, offset) in self.quads.iter().zip(&self.offsets) {
            let mvp = proj * Mat4::from_translation(Vec3::new(offset[0], offset[1], 0.0));
            ctx.queue.write_buffer(
                &quad.uniforms,
                0,
                bytemuck::bytes_of(&QuadUniforms {
                    mvp: mvp.to_cols_array_2d(),
                }),
            );
        }

        let mut pass = ctx.target.begin_color_pass(
            ctx.encoder,
            wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.12,
                a: 1.0,
            },
        );
        pass.set_pipeline(self.program.pipeline());
        pass.set_vertex_buffer(0, self.vbo.slice(..));
        pass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
        for quad in &self.quads {
            pass.set_bind_group(0, &quad.bind_group, &[]);
            pass.draw_indexed(0..6, 0, 0..1);
        }
    }

    fn on_ui(&mut self, ui: &mut egui::Ui) {
        for (label, offset) in ["Quad A", "Quad B"].iter().zip(&mut self.offsets) {
            ui.label(*label);
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut offset[0]).range(0.0..=4096.0));
                ui.add(egui::DragValue::new(&mut offset[1]).range(0.0..=4096.0));
            });
        }
    }
}

/// Loads the scene texture from disk, falling back to a generated checker
/// pattern when the file is missing.
fn upload_texture(ctx: &SceneCtx<'_>) -> Result<wgpu::TextureView> {
    let path = ctx.assets_dir.join("textures/checker.png");
    let rgba = match image::open(&path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!(
                "cannot load {}: {e}; using generated checker",
                path.display()
            );
            image::RgbaImage::from_fn(256, 256, |x, y| {
                if (x / 32 + y / 32) % 2 == 0 {
                    image::Rgba([230, 230, 230, 255])
                } else {
                    image::Rgba([60, 60, 70, 255])
                }
            })
        }
    };

    let (width, height) = rgba.dimensions();
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("texture quad image"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    Ok(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}
