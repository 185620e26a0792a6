use super::RenderTarget;

/// Per-frame rendering context handed to the active scene.
///
/// Borrows the device/queue, the frame's command encoder, and the off-screen
/// target the scene draws into. Scenes record passes through
/// [`RenderTarget::begin_pass`] / [`RenderTarget::begin_color_pass`] and
/// upload uniforms through `queue`.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub target: &'a RenderTarget,
}

impl<'a> RenderCtx<'a> {
    /// Target size in pixels as floats, for projection math.
    #[inline]
    pub fn target_size_f32(&self) -> (f32, f32) {
        (self.target.width() as f32, self.target.height() as f32)
    }
}
