//! egui integration layer.
//!
//! Bridges winit events into egui, runs the per-frame egui pass, and owns
//! the egui wgpu renderer. The off-screen scene target is surfaced to the
//! UI as a registered native texture drawn with `ui.image`.

use winit::event::WindowEvent;
use winit::window::Window;

/// Tessellated output of one egui frame, handed to [`UiLayer::prepare`] and
/// [`UiLayer::render`].
pub struct UiFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen: egui_wgpu::ScreenDescriptor,
}

pub struct UiLayer {
    egui_ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl UiLayer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let egui_ctx = egui::Context::default();
        let viewport_id = egui_ctx.viewport_id();
        let state = egui_winit::State::new(egui_ctx.clone(), viewport_id, window, None, None, None);
        let renderer =
            egui_wgpu::Renderer::new(device, surface_format, egui_wgpu::RendererOptions::default());

        Self {
            egui_ctx,
            state,
            renderer,
        }
    }

    /// Forwards a winit event to egui; returns `true` when egui consumed it.
    ///
    /// Button releases are always reported unconsumed so the engine pointer
    /// state can observe drag ends that finish over a widget.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);

        if let WindowEvent::MouseInput {
            state: winit::event::ElementState::Released,
            ..
        } = event
        {
            return false;
        }

        response.consumed
    }

    pub fn pixels_per_point(&self) -> f32 {
        self.egui_ctx.pixels_per_point()
    }

    /// Registers an externally rendered texture view for display via
    /// `ui.image`. The returned id stays valid until freed.
    pub fn register_target(
        &mut self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
    ) -> egui::TextureId {
        self.renderer
            .register_native_texture(device, view, wgpu::FilterMode::Linear)
    }

    pub fn free_target(&mut self, id: egui::TextureId) {
        self.renderer.free_texture(&id);
    }

    /// Runs one egui pass, building widgets inside `build`.
    pub fn run(
        &mut self,
        window: &Window,
        surface_size: winit::dpi::PhysicalSize<u32>,
        build: impl FnOnce(&egui::Context),
    ) -> UiFrame {
        let raw_input = self.state.take_egui_input(window);
        self.egui_ctx.begin_pass(raw_input);

        build(&self.egui_ctx);

        let egui::FullOutput {
            shapes,
            textures_delta,
            platform_output,
            ..
        } = self.egui_ctx.end_pass();

        self.state.handle_platform_output(window, platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(shapes, self.egui_ctx.pixels_per_point());

        UiFrame {
            primitives,
            textures_delta,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [surface_size.width, surface_size.height],
                pixels_per_point: self.egui_ctx.pixels_per_point(),
            },
        }
    }

    /// Uploads egui-managed textures and geometry for the frame.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &UiFrame,
    ) {
        for (id, delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        // No paint callbacks in use, so the returned user command buffers
        // are always empty.
        let _ = self
            .renderer
            .update_buffers(device, queue, encoder, &frame.primitives, &frame.screen);
    }

    /// Records the egui draw pass onto the surface view, clearing it, then
    /// frees textures egui no longer references.
    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        frame: UiFrame,
    ) {
        {
            let mut rpass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: surface_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.02,
                                g: 0.02,
                                b: 0.025,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                })
                .forget_lifetime();

            self.renderer
                .render(&mut rpass, &frame.primitives, &frame.screen);
        }

        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
