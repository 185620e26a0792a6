use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use log::error;

use prism_engine::mesh::{LoadOptions, Model, Vertex};
use prism_engine::render::RenderCtx;
use prism_engine::shader::{Program, ProgramDesc, ShaderSource};

use super::{Scene, SceneCtx, Spin};

const SHADER: &str = include_str!("shaders/model.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ModelUniforms {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

/// OBJ viewer: loads a model file and orbits it under a simple directional
/// light, with optional wireframe when the adapter supports line fill.
pub struct ModelViewScene {
    program: Program,
    wire_program: Option<Program>,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    model: Model,
    path: String,
    load_options: LoadOptions,
    load_error: Option<String>,
    reload_requested: bool,

    spin: Spin,
    scale: f32,
    translation: [f32; 3],
    wireframe: bool,
}

impl ModelViewScene {
    pub fn new(ctx: &SceneCtx<'_>) -> Result<Self> {
        let source = ShaderSource::parse(SHADER)?;

        let bind_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("model bind layout"),
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

        let desc = ProgramDesc {
            bind_group_layouts: &[&bind_layout],
            vertex_buffers: &[Vertex::layout()],
            depth_test: true,
            ..ProgramDesc::new("model", ctx.color_format)
        };
        let program = Program::build(ctx.device, &source, &desc)?;

        // Line fill is an optional feature; without it the wireframe toggle
        // is hidden entirely.
        let wire_program = ctx
            .device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE)
            .then(|| {
                Program::build(
                    ctx.device,
                    &source,
                    &ProgramDesc {
                        polygon_mode: wgpu::PolygonMode::Line,
                        ..desc
                    },
                )
            })
            .transpose()?;

        let uniforms = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model uniforms"),
            size: std::mem::size_of::<ModelUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model bind group"),
            layout: &bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let mut scene = Self {
            program,
            wire_program,
            uniforms,
            bind_group,
            model: Model::default(),
            path: ctx.assets_dir.join("models/cube.obj").display().to_string(),
            load_options: LoadOptions { vertex_normals: true, ..Default::default() },
            load_error: None,
            reload_requested: false,
            spin: Spin::new(0.6),
            scale: 1.0,
            translation: [0.0; 3],
            wireframe: false,
        };
        scene.reload(ctx.device);
        Ok(scene)
    }

    /// Best-effort load; a failure leaves the model in the "not loaded"
    /// state and keeps the scene running.
    fn reload(&mut self, device: &wgpu::Device) {
        match self.model.load(device, &self.path, self.load_options) {
            Ok(()) => self.load_error = None,
            Err(e) => {
                error!("{e:#}");
                self.load_error = Some(format!("{e:#}"));
            }
        }
    }
}

impl Scene for ModelViewScene {
    fn on_update(&mut self, dt: f32) {
        self.spin.tick(dt);
    }

    fn on_render(&mut self, ctx: &mut RenderCtx<'_>) {
        if self.reload_requested {
            self.reload_requested = false;
            self.reload(ctx.device);
        }

        let (w, h) = ctx.target_size_f32();
        let aspect = w / h.max(1.0);
        let proj = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 1.5, 4.0), Vec3::ZERO, Vec3::Y);
        let model = Mat4::from_translation(Vec3::from_array(self.translation))
            * Mat4::from_rotation_y(self.spin.angle)
            * Mat4::from_scale(Vec3::splat(self.scale));

        ctx.queue.write_buffer(
            &self.uniforms,
            0,
            bytemuck::bytes_of(&ModelUniforms {
                mvp: (proj * view * model).to_cols_array_2d(),
                model: model.to_cols_array_2d(),
            }),
        );

        let mut pass = ctx.target.begin_pass(
            ctx.encoder,
            wgpu::Color {
                r: 0.08,
                g: 0.08,
                b: 0.1,
                a: 1.0,
            },
        );

        let Some(mesh) = self.model.mesh() else {
            return;
        };

        let program = if self.wireframe {
            self.wire_program.as_ref().unwrap_or(&self.program)
        } else {
            &self.program
        };
        pass.set_pipeline(program.pipeline());
        pass.set_bind_group(0, &self.bind_group, &[]);
        mesh.draw(&mut pass);
    }

    fn on_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Model path");
        ui.text_edit_singleline(&mut self.path);

        ui.checkbox(&mut self.load_options.face_normals, "Flat face normals");
        ui.checkbox(&mut self.load_options.vertex_normals, "Smooth vertex normals");

        if ui.button("Reload").clicked() {
            self.reload_requested = true;
        }

        ui.add(egui::Slider::new(&mut self.scale, 0.1..=5.0).text("Scale"));
        ui.label("Translation");
        ui.horizontal(|ui| {
            for axis in &mut self.translation {
                ui.add(egui::DragValue::new(axis).speed(0.05).range(-10.0..=10.0));
            }
        });
        ui.add(egui::Slider::new(&mut self.spin.speed, 0.0..=4.0).text("Spin"));

        if self.wire_program.is_some() {
            ui.checkbox(&mut self.wireframe, "Wireframe");
        }

        match (&self.load_error, self.model.is_loaded()) {
            (Some(err), _) => {
                ui.colored_label(egui::Color32::LIGHT_RED, err);
            }
            (None, true) => {
                ui.label(format!("{} triangles", self.model.triangle_count()));
            }
            (None, false) => {
                ui.label("No model loaded");
            }
        }
    }
}
