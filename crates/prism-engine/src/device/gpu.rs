use anyhow::{Context, Result};
use wgpu::CurrentSurfaceTexture;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// What to do when the GPU reports an uncaptured error (validation failure,
/// misuse of the API).
///
/// The classic pattern is a hard stop in debug builds and a plain exit in
/// release builds; that asymmetry is kept but as explicit configuration
/// rather than a compile-time branch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GpuErrorPolicy {
    /// Panic with the error message. Best while developing.
    Abort,
    /// Log the error and terminate the process with a nonzero status.
    Exit,
    /// Log the error and keep running; rendering may be visually broken.
    LogAndContinue,
}

impl Default for GpuErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            GpuErrorPolicy::Abort
        } else {
            GpuErrorPolicy::Exit
        }
    }
}

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is broadly supported and maps to
    /// vsync-on, which is what an interactive sandbox wants.
    pub present_mode: wgpu::PresentMode,

    /// Features the application cannot run without.
    ///
    /// Passed to device creation as-is; an adapter lacking any of them
    /// fails `Gpu::new`.
    pub required_features: wgpu::Features,

    /// Features used when available.
    ///
    /// Intersected with `Adapter::features` before device creation, so an
    /// adapter lacking them still yields a device.
    pub optional_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,

    /// Uncaptured-error handling policy installed on the device.
    pub error_policy: GpuErrorPolicy,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            error_policy: GpuErrorPolicy::default(),
        }
    }
}

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires frames and provides an encoder + view for rendering
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

/// Represents a single acquired frame.
///
/// Short-lived; holding the surface texture prevents acquisition of
/// subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        // Surface lifetime is tied to `window` via `'w`.
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        // Optional features must not fail device creation on adapters that
        // lack them; required ones are passed through and fail loudly.
        let features = resolve_features(
            init.required_features,
            init.optional_features,
            adapter.features(),
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("prism-engine device"),
                required_features: features,
                required_limits: init.required_limits,
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await
            .context("failed to create wgpu device/queue")?;

        install_error_handler(&device, init.error_policy);

        let surface_caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        Ok(Gpu {
            surface,
            adapter,
            device,
            queue,
            config,
            size,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that
    /// case only internal state is updated and configuration is deferred.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            self.size = new_size;
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// The returned frame owns the surface texture. Releasing it (after
    /// submission) presents the frame.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, CurrentSurfaceTexture> {
        let surface_texture = match self.surface.get_current_texture() {
            CurrentSurfaceTexture::Success(texture) | CurrentSurfaceTexture::Suboptimal(texture) => {
                texture
            }
            err => return Err(err),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Converts a failed surface acquisition into a higher-level action.
    pub fn handle_surface_error(&mut self, err: CurrentSurfaceTexture) -> SurfaceErrorAction {
        match err {
            CurrentSurfaceTexture::Lost | CurrentSurfaceTexture::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            CurrentSurfaceTexture::Timeout => SurfaceErrorAction::SkipFrame,
            CurrentSurfaceTexture::Occluded => SurfaceErrorAction::SkipFrame,
            CurrentSurfaceTexture::Validation => SurfaceErrorAction::SkipFrame,
            CurrentSurfaceTexture::Success(_) | CurrentSurfaceTexture::Suboptimal(_) => {
                SurfaceErrorAction::SkipFrame
            }
        }
    }
}

fn install_error_handler(device: &wgpu::Device, policy: GpuErrorPolicy) {
    device.on_uncaptured_error(std::sync::Arc::new(move |err| match policy {
        GpuErrorPolicy::Abort => panic!("uncaptured GPU error: {err}"),
        GpuErrorPolicy::Exit => {
            log::error!("uncaptured GPU error: {err}");
            std::process::exit(1);
        }
        GpuErrorPolicy::LogAndContinue => {
            log::error!("uncaptured GPU error (continuing): {err}");
        }
    }));
}

/// Feature set handed to device creation: everything required, plus the
/// subset of optional features the adapter actually supports.
fn resolve_features(
    required: wgpu::Features,
    optional: wgpu::Features,
    adapter: wgpu::Features,
) -> wgpu::Features {
    required | (optional & adapter)
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_features_survive_an_adapter_without_them() {
        // Device creation is the place that rejects these, not us.
        let features = resolve_features(
            wgpu::Features::DEPTH_CLIP_CONTROL,
            wgpu::Features::empty(),
            wgpu::Features::empty(),
        );
        assert!(features.contains(wgpu::Features::DEPTH_CLIP_CONTROL));
    }

    #[test]
    fn optional_features_are_dropped_when_unsupported() {
        let features = resolve_features(
            wgpu::Features::empty(),
            wgpu::Features::POLYGON_MODE_LINE,
            wgpu::Features::empty(),
        );
        assert!(features.is_empty());
    }

    #[test]
    fn supported_optional_features_are_kept_alongside_required() {
        let features = resolve_features(
            wgpu::Features::DEPTH_CLIP_CONTROL,
            wgpu::Features::POLYGON_MODE_LINE,
            wgpu::Features::POLYGON_MODE_LINE | wgpu::Features::TIMESTAMP_QUERY,
        );
        assert_eq!(
            features,
            wgpu::Features::DEPTH_CLIP_CONTROL | wgpu::Features::POLYGON_MODE_LINE
        );
    }
}
