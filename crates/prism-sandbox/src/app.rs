//! Per-frame orchestration.
//!
//! Frame flow: apply deferred menu actions, size the off-screen target to
//! last frame's panel rect, forward panel-local pointer state to the scene,
//! update and render the scene into the target, then run egui (side panel
//! with menu or scene controls, central panel showing the target as an
//! image) and composite onto the window surface.

use std::path::PathBuf;

use prism_engine::coords::{PanelMapping, Vec2};
use prism_engine::input::{MouseButton, PointerSnapshot};
use prism_engine::render::{RenderCtx, RenderTarget, TARGET_COLOR_FORMAT};
use prism_engine::window::{App, AppControl, EventResponse, FrameCtx};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::scenes::{SceneCtx, SceneRegistry, SceneStage};
use crate::ui::UiLayer;

/// Menu action recorded during the UI pass and applied at the next frame
/// start, where the device is available for scene construction.
enum StageAction {
    Enter(usize),
    Back,
}

pub struct SandboxApp {
    registry: SceneRegistry,
    stage: SceneStage,
    pending: Option<StageAction>,

    ui: Option<UiLayer>,
    target: Option<RenderTarget>,
    target_id: Option<egui::TextureId>,

    /// Desired target size in physical pixels, taken from the panel rect
    /// observed in the previous frame's UI pass.
    panel_size_px: (u32, u32),
    /// Panel rect in window-space logical pixels, for pointer mapping.
    panel_mapping: Option<PanelMapping>,
    /// Last pointer state forwarded to the scene, for edge detection.
    last_pointer: Option<PointerSnapshot>,

    assets_dir: PathBuf,
}

impl SandboxApp {
    pub fn new(registry: SceneRegistry) -> Self {
        Self {
            registry,
            stage: SceneStage::default(),
            pending: None,
            ui: None,
            target: None,
            target_id: None,
            panel_size_px: (960, 540),
            panel_mapping: None,
            last_pointer: None,
            assets_dir: PathBuf::from("assets"),
        }
    }

    fn apply_pending(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        match self.pending.take() {
            Some(StageAction::Enter(index)) => {
                let ctx = SceneCtx {
                    device,
                    queue,
                    color_format: TARGET_COLOR_FORMAT,
                    target_size: self.panel_size_px,
                    assets_dir: &self.assets_dir,
                };
                match self.registry.construct(index, &ctx) {
                    Ok(scene) => self.stage.enter(index, scene),
                    Err(e) => {
                        // Stay on the menu; a broken scene must not take
                        // the whole tool down.
                        log::error!("scene construction failed: {e:#}");
                    }
                }
            }
            Some(StageAction::Back) => self.stage.back(),
            None => {}
        }
    }

}

impl App for SandboxApp {
    fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> EventResponse {
        if let Some(ui) = self.ui.as_mut() {
            if ui.on_window_event(window, event) {
                return EventResponse::Consumed;
            }
        }
        EventResponse::Ignored
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.ui.is_none() {
            self.ui = Some(UiLayer::new(
                ctx.gpu.device(),
                ctx.gpu.surface_format(),
                ctx.window,
            ));
        }
        if self.target.is_none() {
            self.target = Some(RenderTarget::new(
                ctx.gpu.device(),
                self.panel_size_px.0,
                self.panel_size_px.1,
            ));
        }

        self.apply_pending(ctx.gpu.device(), ctx.gpu.queue());

        let (Some(ui), Some(target)) = (self.ui.as_mut(), self.target.as_mut()) else {
            return AppControl::Continue;
        };

        // Track the panel size observed last frame. Recreated attachments
        // invalidate the registered egui texture.
        let recreated = target.resize(ctx.gpu.device(), self.panel_size_px.0, self.panel_size_px.1);
        if recreated {
            if let Some(id) = self.target_id.take() {
                ui.free_target(id);
            }
            if let Some(scene) = self.stage.scene_mut() {
                scene.on_window_resize(self.panel_size_px.0, self.panel_size_px.1);
            }
        }
        if self.target_id.is_none() {
            self.target_id = Some(ui.register_target(ctx.gpu.device(), target.color_view()));
        }

        let ppp = ui.pixels_per_point();

        let mut frame = match ctx.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(e) => {
                return match ctx.gpu.handle_surface_error(e) {
                    prism_engine::device::SurfaceErrorAction::Fatal => {
                        log::error!("surface lost irrecoverably");
                        AppControl::Exit
                    }
                    _ => AppControl::Continue,
                };
            }
        };

        // Scene phase.
        {
            let pointer = ctx.pointer;
            let snapshot = self
                .panel_mapping
                .zip(pointer.pos)
                .and_then(|(mapping, (x, y))| mapping.to_local_scaled(Vec2::new(x, y), ppp))
                .map(|local| PointerSnapshot {
                    x: local.x,
                    y: local.y,
                    left_down: pointer.button_down(MouseButton::Left),
                    right_down: pointer.button_down(MouseButton::Right),
                });

            match snapshot {
                Some(snap) => {
                    let prev = self.last_pointer;
                    if let Some(scene) = self.stage.scene_mut() {
                        if prev.map_or(true, |p| (p.x, p.y) != (snap.x, snap.y)) {
                            scene.on_mouse_move(snap.x, snap.y);
                        }
                        let prev_buttons =
                            prev.map_or((false, false), |p| (p.left_down, p.right_down));
                        if prev_buttons != (snap.left_down, snap.right_down) {
                            scene.on_mouse_event(&snap);
                        }
                    }
                    self.last_pointer = Some(snap);
                }
                None => self.last_pointer = None,
            }

            if let Some(scene) = self.stage.scene_mut() {
                scene.on_update(ctx.time.dt);
                let mut render_ctx = RenderCtx {
                    device: ctx.gpu.device(),
                    queue: ctx.gpu.queue(),
                    encoder: &mut frame.encoder,
                    target,
                };
                scene.on_render(&mut render_ctx);
            } else {
                // Menu active: keep the viewport at a neutral clear.
                let _pass = target.begin_color_pass(
                    &mut frame.encoder,
                    wgpu::Color {
                        r: 0.05,
                        g: 0.05,
                        b: 0.06,
                        a: 1.0,
                    },
                );
            }
        }

        // UI phase.
        let stage = &mut self.stage;
        let registry = &self.registry;
        let pending = &mut self.pending;
        let panel_size_px = &mut self.panel_size_px;
        let panel_mapping = &mut self.panel_mapping;
        let target_id = self.target_id;
        let dt = ctx.time.dt;

        let ui_frame = ui.run(ctx.window, ctx.gpu.size(), |egui_ctx| {
            egui::SidePanel::left("controls")
                .resizable(true)
                .default_width(280.0)
                .show(egui_ctx, |panel| {
                    panel.heading("Prism Sandbox");
                    panel.label(format!("{:.2} ms/frame", dt * 1000.0));
                    panel.separator();

                    if stage.menu_active() {
                        for (i, name) in registry.names().enumerate() {
                            if panel.button(name).clicked() {
                                *pending = Some(StageAction::Enter(i));
                            }
                        }
                    } else {
                        if panel.button("< Back").clicked() {
                            *pending = Some(StageAction::Back);
                        }
                        if let Some(index) = stage.active_index() {
                            if let Some(name) = registry.name(index) {
                                panel.label(name);
                            }
                        }
                        panel.separator();
                        if let Some(scene) = stage.scene_mut() {
                            scene.on_ui(panel);
                        }
                    }
                });

            egui::CentralPanel::default().show(egui_ctx, |panel| {
                let avail = panel.available_size();
                let desired_w = ((avail.x * ppp) as u32).max(1);
                let desired_h = ((avail.y * ppp) as u32).max(1);
                *panel_size_px = (desired_w, desired_h);

                if let Some(id) = target_id {
                    let response = panel.image(egui::load::SizedTexture { id, size: avail });
                    let rect = response.rect;
                    *panel_mapping = Some(PanelMapping::new(
                        Vec2::new(rect.min.x, rect.min.y),
                        Vec2::new(rect.width(), rect.height()),
                    ));
                } else {
                    panel.label("No viewport");
                    *panel_mapping = None;
                }
            });
        });

        ui.prepare(ctx.gpu.device(), ctx.gpu.queue(), &mut frame.encoder, &ui_frame);
        ui.render(&mut frame.encoder, &frame.view, ui_frame);

        ctx.gpu.submit(frame);

        AppControl::Continue
    }
}
