use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use prism_engine::render::RenderCtx;
use prism_engine::shader::{Program, ProgramDesc, ShaderSource};

use super::{Scene, SceneCtx, Spin};

const SHADER: &str = include_str!("shaders/triangle.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct TriVertex {
    position: [f32; 2],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct TriangleUniforms {
    mvp: [[f32; 4]; 4],
}

const VERTICES: [TriVertex; 3] = [
    TriVertex { position: [-0.6, -0.6], color: [1.0, 0.2, 0.2] },
    TriVertex { position: [0.6, -0.6], color: [0.2, 1.0, 0.2] },
    TriVertex { position: [0.0, 0.7], color: [0.2, 0.2, 1.0] },
];

/// One vertex-colored triangle in NDC, spinning about its center with an
/// adjustable translation.
pub struct TriangleScene {
    program: Program,
    vbo: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    spin: Spin,
    translation: [f32; 2],
}

impl TriangleScene {
    pub fn new(ctx: &SceneCtx<'_>) -> Result<Self> {
        let source = ShaderSource::parse(SHADER)?;

        let bind_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("triangle bind layout"),
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
            });

        let layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3],
        };

        let program = Program::build(
            ctx.device,
            &source,
            &ProgramDesc {
                bind_group_layouts: &[&bind_layout],
                vertex_buffers: &[layout],
                ..ProgramDesc::new("triangle", ctx.color_format)
            },
        )?;

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("triangle vbo"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniforms = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("triangle uniforms"),
            size: std::mem::size_of::<TriangleUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("triangle bind group"),
            layout: &bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        Ok(Self {
            program,
            vbo,
            uniforms,
            bind_group,
            spin: Spin::new(1.2),
            translation: [0.0, 0.0],
        })
    }
}

impl Scene for TriangleScene {
    fn on_update(&mut self, dt: f32) {
        self.spin.tick(dt);
    }

    fn on_render(&mut self, ctx: &mut RenderCtx<'_>) {
        let mvp = Mat4::from_translation(Vec3::new(self.translation[0], self.translation[1], 0.0))
            * Mat4::from_rotation_z(self.spin.angle);
        ctx.queue.write_buffer(
            &self.uniforms,
            0,
            bytemuck::bytes_of(&TriangleUniforms {
                mvp: mvp.to_cols_array_2d(),
            }),
        );

        let mut pass = ctx.target.begin_color_pass(
            ctx.encoder,
            wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.07,
                a: 1.0,
            },
        );
        pass.set_pipeline(self.program.pipeline());
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vbo.slice(..));
        pass.draw(0..3, 0..1);
    }

    fn on_ui(&mut self, ui: &mut egui::Ui) {
        if ui
            .button(if self.spin.enabled { "Stop Spin" } else { "Spin" })
            .clicked()
        {
            self.spin.enabled = !self.spin.enabled;
        }
        ui.add(egui::Slider::new(&mut self.translation[0], -1.0..=1.0).text("Translate X"));
        ui.add(egui::Slider::new(&mut self.translation[1], -1.0..=1.0).text("Translate Y"));
    }
}
