use anyhow::Result;

use super::ShaderSource;

/// Pipeline construction parameters for [`Program::build`].
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub color_format: wgpu::TextureFormat,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// Attach depth state targeting the render target's depth format.
    pub depth_test: bool,
    pub blend: Option<wgpu::BlendState>,
    pub topology: wgpu::PrimitiveTopology,
    pub polygon_mode: wgpu::PolygonMode,
}

impl<'a> ProgramDesc<'a> {
    pub fn new(label: &'a str, color_format: wgpu::TextureFormat) -> Self {
        Self {
            label,
            color_format,
            bind_group_layouts: &[],
            vertex_buffers: &[],
            depth_test: false,
            blend: None,
            topology: wgpu::PrimitiveTopology::TriangleList,
            polygon_mode: wgpu::PolygonMode::Fill,
        }
    }
}

/// A compiled-and-validated render pipeline built from a [`ShaderSource`].
///
/// Construction runs inside a wgpu validation error scope: a WGSL compile
/// error or pipeline validation failure yields `Err` and no pipeline, so a
/// caller doing live recompilation can keep its previous `Program` bound
/// until a replacement verifiably builds.
pub struct Program {
    pipeline: wgpu::RenderPipeline,
}

impl Program {
    pub fn build(
        device: &wgpu::Device,
        source: &ShaderSource,
        desc: &ProgramDesc<'_>,
    ) -> Result<Self> {
        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(source.vertex.as_str().into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(source.fragment.as_str().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &desc
                .bind_group_layouts
                .iter()
                .map(|layout| Some(*layout))
                .collect::<Vec<_>>(),
            immediate_size: 0,
        });

        let depth_stencil = desc.depth_test.then(|| wgpu::DepthStencilState {
            format: crate::render::TARGET_DEPTH_FORMAT,
            depth_write_enabled: Some(true),
            depth_compare: Some(wgpu::CompareFunction::Less),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: desc.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                polygon_mode: desc.polygon_mode,
                ..Default::default()
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Blocks until validation of everything recorded in the scope; a
        // failed build must not hand out a pipeline.
        if let Some(err) = pollster::block_on(error_scope.pop()) {
            anyhow::bail!("shader program {:?} failed to build: {err}", desc.label);
        }

        Ok(Self { pipeline })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}
