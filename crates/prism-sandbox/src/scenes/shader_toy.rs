use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use log::error;

use prism_engine::input::PointerSnapshot;
use prism_engine::render::RenderCtx;
use prism_engine::shader::{Program, ProgramDesc, ShaderSource};

use crate::workbench::ShaderWorkbench;

use super::{Scene, SceneCtx};

/// Uniform block available to every workbench shader at group 0, binding 0.
///
/// `mouse` packs current position in xy and, while the left button is held,
/// the press position in zw (zero otherwise). All positions are in
/// render-target pixels.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
struct ToyUniforms {
    resolution: [f32; 2],
    time: f32,
    frame: u32,
    mouse: [f32; 4],
}

/// Live shader editing scene.
///
/// Fragment shaders from the shader directory run over a fullscreen
/// triangle. The selected file is edited in-panel; saving writes the buffer
/// to disk and rebuilds the pipeline. A failed build keeps the previous
/// pipeline running and shows the error instead.
pub struct ShaderToyScene {
    workbench: ShaderWorkbench,
    color_format: wgpu::TextureFormat,
    program: Option<Program>,
    compile_error: Option<String>,

    bind_layout: wgpu::BindGroupLayout,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    time: f32,
    frame: u32,
    cursor: [f32; 2],
    press: Option<[f32; 2]>,
    left_was_down: bool,

    pending_select: Option<usize>,
    save_requested: bool,
    rescan_requested: bool,
}

impl ShaderToyScene {
    pub fn new(ctx: &SceneCtx<'_>) -> Result<Self> {
        let bind_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shadertoy bind layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniforms = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shadertoy uniforms"),
            size: std::mem::size_of::<ToyUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadertoy bind group"),
            layout: &bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let mut scene = Self {
            workbench: ShaderWorkbench::new(ctx.assets_dir.join("shadertoy")),
            color_format: ctx.color_format,
            program: None,
            compile_error: None,
            bind_layout,
            uniforms,
            bind_group,
            time: 0.0,
            frame: 0,
            cursor: [0.0; 2],
            press: None,
            left_was_down: false,
            pending_select: None,
            save_requested: false,
            rescan_requested: false,
        };

        if !scene.workbench.files().is_empty() {
            scene.load_and_compile(ctx.device, 0);
        }

        Ok(scene)
    }

    fn load_and_compile(&mut self, device: &wgpu::Device, index: usize) {
        match self.workbench.select(index) {
            Ok(()) => self.compile(device),
            Err(e) => {
                error!("{e:#}");
                self.compile_error = Some(format!("{e:#}"));
            }
        }
    }

    /// Rebuilds the pipeline from the edit buffer. On failure the previous
    /// program stays bound and the error is surfaced in the panel.
    fn compile(&mut self, device: &wgpu::Device) {
        let result = ShaderSource::parse(self.workbench.buffer()).and_then(|source| {
            Program::build(
                device,
                &source,
                &ProgramDesc {
                    bind_group_layouts: &[&self.bind_layout],
                    ..ProgramDesc::new("shadertoy", self.color_format)
                },
            )
        });

        match result {
            Ok(program) => {
                self.program = Some(program);
                self.compile_error = None;
            }
            Err(e) => {
                error!("shader build failed: {e:#}");
                self.compile_error = Some(format!("{e:#}"));
            }
        }
    }
}

impl Scene for ShaderToyScene {
    fn on_update(&mut self, dt: f32) {
        self.time += dt;
        self.frame = self.frame.wrapping_add(1);
    }

    fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.cursor = [x, y];
    }

    fn on_mouse_event(&mut self, event: &PointerSnapshot) {
        self.cursor = [event.x, event.y];
        if event.left_down && !self.left_was_down {
            self.press = Some(self.cursor);
        } else if !event.left_down {
            self.press = None;
        }
        self.left_was_down = event.left_down;
    }

    fn on_render(&mut self, ctx: &mut RenderCtx<'_>) {
        // UI actions that need the device are deferred to here.
        if self.rescan_requested {
            self.rescan_requested = false;
            self.workbench.rescan();
        }
        if let Some(index) = self.pending_select.take() {
            self.load_and_compile(ctx.device, index);
        }
        if self.save_requested {
            self.save_requested = false;
            match self.workbench.save() {
                Ok(_) => self.compile(ctx.device),
                Err(e) => {
                    error!("{e:#}");
                    self.compile_error = Some(format!("{e:#}"));
                }
            }
        }

        let (w, h) = ctx.target_size_f32();
        let press = self.press.unwrap_or([0.0; 2]);
        ctx.queue.write_buffer(
            &self.uniforms,
            0,
            bytemuck::bytes_of(&ToyUniforms {
                resolution: [w, h],
                time: self.time,
                frame: self.frame,
                mouse: [self.cursor[0], self.cursor[1], press[0], press[1]],
            }),
        );

        let mut pass = ctx
            .target
            .begin_color_pass(ctx.encoder, wgpu::Color::BLACK);
        if let Some(program) = &self.program {
            pass.set_pipeline(program.pipeline());
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }

    fn on_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let selected_name = self
                .workbench
                .selected_path()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("(none)")
                .to_owned();

            egui::ComboBox::from_label("Shader")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    let names: Vec<String> =
                        self.workbench.file_names().map(str::to_owned).collect();
                    for (i, name) in names.iter().enumerate() {
                        let selected = self.workbench.selected() == Some(i);
                        if ui.selectable_label(selected, name).clicked() && !selected {
                            self.pending_select = Some(i);
                        }
                    }
                });

            if ui.button("Rescan").clicked() {
                self.rescan_requested = true;
            }
        });

        if self.workbench.selected().is_some() {
            egui::ScrollArea::vertical()
                .max_height(ui.available_height() - 60.0)
                .show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::multiline(self.workbench.buffer_mut())
                            .code_editor()
                            .desired_width(f32::INFINITY)
                            .desired_rows(24),
                    );
                    if response.changed() {
                        self.workbench.mark_dirty();
                    }
                });

            let label = if self.workbench.dirty() {
                "Save & recompile *"
            } else {
                "Save & recompile"
            };
            if ui.button(label).clicked() {
                self.save_requested = true;
            }
        } else {
            ui.label(format!(
                "No shader files in {}",
                self.workbench.dir().display()
            ));
        }

        if let Some(err) = &self.compile_error {
            ui.colored_label(egui::Color32::LIGHT_RED, err);
        }
    }
}
