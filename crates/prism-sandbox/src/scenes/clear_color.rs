use prism_engine::render::RenderCtx;

use super::Scene;

/// Clears the viewport to an editable color. The simplest scene, useful to
/// verify the target/panel plumbing end to end.
pub struct ClearColorScene {
    color: [f32; 4],
}

impl ClearColorScene {
    pub fn new() -> Self {
        Self {
            color: [0.2, 0.3, 0.8, 1.0],
        }
    }
}

impl Scene for ClearColorScene {
    fn on_render(&mut self, ctx: &mut RenderCtx<'_>) {
        let clear = wgpu::Color {
            r: self.color[0] as f64,
            g: self.color[1] as f64,
            b: self.color[2] as f64,
            a: self.color[3] as f64,
        };
        let _pass = ctx.target.begin_color_pass(ctx.encoder, clear);
    }

    fn on_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Clear color");
        ui.color_edit_button_rgba_unmultiplied(&mut self.color);
    }
}
