use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::{data_structures::material::Color, pipelines::basic};

/// Upper bound of simultaneously lit point lights. Extra lights are ignored.
pub const MAX_LIGHTS: usize = 8;

/// An omnidirectional light with physically based distance falloff:
/// `intensity / max(distance^decay, 0.01)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: Color,
    pub intensity: f32,
    pub decay: f32,
}

impl PointLight {
    pub fn new(position: impl Into<Vector3<f32>>, color: Color, intensity: f32, decay: f32) -> Self {
        Self {
            position: position.into(),
            color,
            intensity,
            decay,
        }
    }

    /// White, intensity 1, inverse square.
    pub fn white(position: impl Into<Vector3<f32>>) -> Self {
        Self::new(position, Color::WHITE, 1.0, 2.0)
    }

    pub fn to_raw(&self) -> PointLightRaw {
        PointLightRaw {
            position: self.position.into(),
            intensity: self.intensity,
            color: self.color.to_array(),
            decay: self.decay,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    position: [f32; 3],
    // packs into the vec3 tail, keeping 16 byte alignment
    intensity: f32,
    color: [f32; 3],
    decay: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    lights: [PointLightRaw; MAX_LIGHTS],
    count: u32,
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: [u32; 3],
}

impl LightsUniform {
    pub fn new<'a>(lights: impl IntoIterator<Item = &'a PointLight>) -> Self {
        let mut uniform = Self {
            lights: [PointLightRaw::default(); MAX_LIGHTS],
            count: 0,
            _padding: [0; 3],
        };
        for light in lights {
            if uniform.count as usize == MAX_LIGHTS {
                log::warn!("More than {MAX_LIGHTS} point lights, ignoring the rest");
                break;
            }
            uniform.lights[uniform.count as usize] = light.to_raw();
            uniform.count += 1;
        }
        uniform
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }
}

pub struct LightResources {
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = LightsUniform::new(std::iter::empty());
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = basic::uniform_layout(device, "lights_bind_group_layout");
        let bind_group =
            basic::uniform_bind_group(device, &bind_group_layout, &buffer, "lights_bind_group");
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Replaces the whole light set. Called once per frame with the lights of the mounted scene.
    pub fn write(&mut self, queue: &wgpu::Queue, lights: &[PointLight]) {
        self.uniform = LightsUniform::new(lights);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
