use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic,
};

/// Material layout (group 0) plus the pipeline itself.
pub struct ToonPipeline {
    pub material_layout: wgpu::BindGroupLayout,
    pub pipeline: wgpu::RenderPipeline,
}

impl ToonPipeline {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let material_layout = basic::uniform_layout(device, "material_bind_group_layout");
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Toon Pipeline Layout"),
            bind_group_layouts: &[
                Some(&material_layout),
                Some(camera_bind_group_layout),
                Some(light_bind_group_layout),
            ],
            immediate_size: 0,
        });
        let shader = wgpu::ShaderModuleDescriptor {
            label: Some("Toon Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("toon.wgsl").into()),
        };
        let pipeline = basic::mk_render_pipeline(
            device,
            &layout,
            config.format,
            Some(wgpu::BlendState::REPLACE),
            Some(Texture::DEPTH_FORMAT),
            &[ModelVertex::desc(), InstanceRaw::desc()],
            shader,
        );
        Self {
            material_layout,
            pipeline,
        }
    }
}
