//! GPU models: vertex layout, uploaded meshes and materials, draw helpers.
//!
//! A [`ModelData`] is the CPU description (geometry + material per part) that
//! entities carry around; [`Model`] is its uploaded counterpart.

use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::Geometry,
    material::{Material, ToonMaterial},
};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// One drawable part: geometry plus exactly one material.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPart {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
}

/// CPU description of everything an entity draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelData {
    pub parts: Vec<MeshPart>,
}

impl ModelData {
    pub fn single(name: &str, geometry: Geometry, material: ToonMaterial) -> Self {
        Self {
            parts: vec![MeshPart {
                name: name.to_string(),
                geometry,
                material: material.into(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.geometry.is_empty())
    }

    pub fn upload(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Model {
        let mut materials = Vec::with_capacity(self.parts.len());
        let mut meshes = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            if part.geometry.is_empty() {
                log::warn!("Skipping empty mesh part {}", part.name);
                continue;
            }
            // Anything that was not converted still renders with its base colour.
            let toon = match part.material.as_toon() {
                Some(toon) => toon.clone(),
                None => ToonMaterial::new(part.material.base_color()),
            };
            materials.push(GpuMaterial::new(device, &part.name, &toon, layout));
            meshes.push(Mesh::new(device, &part.name, &part.geometry, materials.len() - 1));
        }
        Model { meshes, materials }
    }
}

pub struct GpuMaterial {
    #[allow(unused)]
    pub name: String,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        material: &ToonMaterial,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Material Buffer", name)),
            contents: bytemuck::cast_slice(&[material.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(&format!("{:?} Material Bind Group", name)),
        });
        Self {
            name: name.to_string(),
            buffer,
            bind_group,
        }
    }
}

pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: usize,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, name: &str, geometry: &Geometry, material: usize) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: geometry.indices.len() as u32,
            material,
        }
    }
}

pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<GpuMaterial>,
}

pub trait DrawModel<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a Mesh,
        material: &'a GpuMaterial,
        instances: std::ops::Range<u32>,
    );

    fn draw_model_instanced(&mut self, model: &'a Model, instances: std::ops::Range<u32>);
}

/// Bind group 0 is the material; camera (1) and lights (2) are bound once per pass.
impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b Mesh,
        material: &'b GpuMaterial,
        instances: std::ops::Range<u32>,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }

    fn draw_model_instanced(&mut self, model: &'b Model, instances: std::ops::Range<u32>) {
        for mesh in &model.meshes {
            match model.materials.get(mesh.material) {
                Some(material) => self.draw_mesh_instanced(mesh, material, instances.clone()),
                None => log::warn!("Mesh {} references a missing material", mesh.name),
            }
        }
    }
}
