use winit::dpi::PhysicalSize;

/// Color format of every render target.
///
/// sRGB so the composited panel image matches surface output.
pub const TARGET_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Combined depth + stencil attachment format.
pub const TARGET_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Off-screen render target: a color attachment plus a combined
/// depth/stencil attachment, sized to the viewport panel.
///
/// The target itself is the stable identity; the attachments are released
/// and recreated whenever the panel size actually changes. Consumers holding
/// a registered display handle for the color attachment must refresh it
/// after any resize that reports recreation.
pub struct RenderTarget {
    size: PhysicalSize<u32>,

    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl RenderTarget {
    /// Allocates attachments at the given size (clamped to at least 1x1).
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = PhysicalSize::new(width.max(1), height.max(1));
        let (color, color_view, depth, depth_view) = create_attachments(device, size);

        Self {
            size,
            color,
            color_view,
            depth,
            depth_view,
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// The color attachment view, for display as an image elsewhere.
    ///
    /// The handle is invalidated by any resize that recreates attachments.
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Resizes the target.
    ///
    /// A no-op when the dimensions are unchanged: the existing attachments
    /// (and therefore any registered display handles) keep their identity.
    /// Otherwise both attachments are dropped and reallocated at the new
    /// size. Returns `true` when recreation happened.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        let Some(new_size) = plan_resize(self.size, width, height) else {
            return false;
        };

        self.size = new_size;

        let (color, color_view, depth, depth_view) = create_attachments(device, new_size);
        self.color = color;
        self.color_view = color_view;
        self.depth = depth;
        self.depth_view = depth_view;

        true
    }

    /// Begins a render pass targeting both attachments, clearing them.
    ///
    /// The pass viewport is implied by the attachment size; this is the
    /// rendering-surface entry point scenes draw through.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        clear: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }

    /// Like [`begin_pass`](Self::begin_pass) but without the depth/stencil
    /// attachment, for 2D scenes whose pipelines carry no depth state.
    pub fn begin_color_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        clear: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism scene color pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Decides whether a resize request actually changes the attachment size.
///
/// Requests are clamped to at least 1x1. Returns the clamped size when it
/// differs from `current`, `None` when the attachments can be kept.
fn plan_resize(current: PhysicalSize<u32>, width: u32, height: u32) -> Option<PhysicalSize<u32>> {
    let requested = PhysicalSize::new(width.max(1), height.max(1));
    (requested != current).then_some(requested)
}

fn create_attachments(
    device: &wgpu::Device,
    size: PhysicalSize<u32>,
) -> (
    wgpu::Texture,
    wgpu::TextureView,
    wgpu::Texture,
    wgpu::TextureView,
) {
    let extent = wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    };

    let color = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("prism target color"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_COLOR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("prism target depth"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

    (color, color_view, depth, depth_view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_keeps_attachments() {
        assert_eq!(plan_resize(PhysicalSize::new(800, 600), 800, 600), None);
    }

    #[test]
    fn changed_size_is_clamped_and_reported() {
        assert_eq!(
            plan_resize(PhysicalSize::new(800, 600), 1024, 768),
            Some(PhysicalSize::new(1024, 768))
        );
        assert_eq!(
            plan_resize(PhysicalSize::new(800, 600), 0, 0),
            Some(PhysicalSize::new(1, 1))
        );
    }

    #[test]
    fn zero_request_matching_a_minimal_target_is_a_no_op() {
        // A collapsed panel keeps asking for 0x0; once the target sits at
        // 1x1 those requests must not thrash the attachments.
        assert_eq!(plan_resize(PhysicalSize::new(1, 1), 0, 0), None);
    }
}
