//! Scene entities and their per-frame update rules.
//!
//! Every entity owns its transform and whatever state its update rule needs.
//! Nothing is shared between entities, so they can be updated in any order.

use std::f64::consts::TAU;

use cgmath::{Deg, Euler, Quaternion, Rad, Rotation3};
use wgpu::util::DeviceExt;

use crate::{
    context::{Context, GPUResource},
    data_structures::{
        instance::Transform,
        model::{Model, ModelData},
    },
    error::SceneError,
    pipelines::light::PointLight,
    render::{Instanced, Render},
    scene::stars::StarField,
};

/// Per-frame update rule of a mesh entity, with the state it accumulates.
///
/// Accumulators are `f64` so hours of frames still advance them exactly;
/// they are narrowed to `f32` only when written into the transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Bounded wobble driven by a frame counter: one degree per frame,
    /// independent of the frame time. Wraps at 360.
    Wobble { degrees: f64 },
    /// Unbounded spin about X, one radian per second.
    Roll { angle: f64 },
    /// Fixed yaw, Z rotation oscillating with `sin(elapsed)`.
    Sway { yaw: Rad<f32>, elapsed: f64 },
    /// Spin about the local Y axis on top of a fixed base orientation.
    Turntable {
        base: Euler<Rad<f32>>,
        speed: f32,
        spin: f64,
    },
}

impl Motion {
    pub fn wobble() -> Self {
        Motion::Wobble { degrees: 0.0 }
    }

    pub fn roll() -> Self {
        Motion::Roll { angle: 0.0 }
    }

    pub fn sway(yaw: impl Into<Rad<f32>>) -> Self {
        Motion::Sway {
            yaw: yaw.into(),
            elapsed: 0.0,
        }
    }

    pub fn turntable(base: Euler<Rad<f32>>, speed: f32) -> Self {
        Motion::Turntable {
            base,
            speed,
            spin: 0.0,
        }
    }

    /// Advances one frame of `dt` seconds and writes the resulting rotation.
    pub fn advance(&mut self, dt: f32, transform: &mut Transform) {
        let dt = f64::from(dt);
        match self {
            Motion::Wobble { degrees } => {
                *degrees = (*degrees + 1.0) % 360.0;
                let angle = Rad::from(Deg(*degrees as f32)).0;
                transform.rotation = Euler::new(
                    Rad(4.0 * angle.cos()),
                    Rad(3.0 * angle.sin()),
                    Rad(2.0 * angle.cos()),
                );
            }
            Motion::Roll { angle } => {
                *angle += dt;
                transform.rotation.x = Rad(*angle as f32);
            }
            Motion::Sway { yaw, elapsed } => {
                *elapsed += dt;
                transform.rotation = Euler::new(Rad(0.0), *yaw, Rad(elapsed.sin() as f32));
            }
            Motion::Turntable { base, speed, spin } => {
                *spin = (*spin + f64::from(*speed) * dt) % TAU;
                let rotation = Quaternion::from(*base) * Quaternion::from_angle_y(Rad(*spin as f32));
                transform.rotation = Euler::from(rotation);
            }
        }
    }
}

struct GpuBody {
    model: Model,
    instance_buffer: wgpu::Buffer,
}

/// A single mesh (or flattened model) with its own transform.
pub struct MeshEntity {
    pub name: String,
    pub transform: Transform,
    pub motion: Motion,
    pub model: ModelData,
    gpu: Option<GpuBody>,
}

impl MeshEntity {
    pub fn new(name: &str, model: ModelData, transform: Transform, motion: Motion) -> Self {
        Self {
            name: name.to_string(),
            transform,
            motion,
            model,
            gpu: None,
        }
    }

    /// Runs the update rule. A non-finite result is rolled back and reported,
    /// leaving the entity at its last good transform and motion state.
    pub fn update(&mut self, dt: f32) -> Result<(), SceneError> {
        let previous = (self.transform, self.motion);
        self.motion.advance(dt, &mut self.transform);
        if self.transform.is_finite() {
            Ok(())
        } else {
            (self.transform, self.motion) = previous;
            Err(SceneError::NonFiniteTransform {
                entity: self.name.clone(),
            })
        }
    }
}

impl<'a> GPUResource<'a> for MeshEntity {
    fn write_to_buffer(&mut self, ctx: &Context) {
        let raw = self.transform.to_raw();
        match &self.gpu {
            Some(body) => {
                ctx.queue
                    .write_buffer(&body.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
            }
            None if self.model.is_empty() => (),
            None => {
                let model = self.model.upload(&ctx.device, &ctx.pipelines.toon.material_layout);
                let instance_buffer =
                    ctx.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("{} Instance Buffer", self.name)),
                            contents: bytemuck::cast_slice(&[raw]),
                            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        });
                log::debug!("Uploaded {} ({} meshes)", self.name, model.meshes.len());
                self.gpu = Some(GpuBody {
                    model,
                    instance_buffer,
                });
            }
        }
    }

    fn get_render(&'a self) -> Render<'a> {
        match &self.gpu {
            Some(body) => Render::Default(Instanced {
                instance: &body.instance_buffer,
                model: &body.model,
                amount: 1,
            }),
            None => Render::None,
        }
    }
}

/// Everything the scene holds. The camera is not in here: it lives on the
/// [`Context`] so the orbit controls can reach it.
pub enum Entity {
    /// Procedural geometry (box, torus).
    StaticMesh(MeshEntity),
    /// A model that arrived from the loader.
    LoadedModel(MeshEntity),
    PointLight(PointLight),
    StarField(StarField),
}

impl Entity {
    pub fn name(&self) -> &str {
        match self {
            Entity::StaticMesh(mesh) | Entity::LoadedModel(mesh) => mesh.name.as_str(),
            Entity::PointLight(_) => "point light",
            Entity::StarField(_) => "star field",
        }
    }

    pub fn update(&mut self, dt: f32) -> Result<(), SceneError> {
        match self {
            Entity::StaticMesh(mesh) | Entity::LoadedModel(mesh) => mesh.update(dt),
            Entity::PointLight(_) | Entity::StarField(_) => Ok(()),
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshEntity> {
        match self {
            Entity::StaticMesh(mesh) | Entity::LoadedModel(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&PointLight> {
        match self {
            Entity::PointLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_star_field(&self) -> Option<&StarField> {
        match self {
            Entity::StarField(stars) => Some(stars),
            _ => None,
        }
    }
}

impl<'a> GPUResource<'a> for Entity {
    fn write_to_buffer(&mut self, ctx: &Context) {
        match self {
            Entity::StaticMesh(mesh) | Entity::LoadedModel(mesh) => mesh.write_to_buffer(ctx),
            Entity::StarField(stars) => stars.write_to_buffer(ctx),
            // lights are collected into one uniform by the scene
            Entity::PointLight(_) => (),
        }
    }

    fn get_render(&'a self) -> Render<'a> {
        match self {
            Entity::StaticMesh(mesh) | Entity::LoadedModel(mesh) => mesh.get_render(),
            Entity::StarField(stars) => stars.get_render(),
            Entity::PointLight(_) => Render::None,
        }
    }
}
