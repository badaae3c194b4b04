//! The star field: random points drawn as small glowing spheres.

use cgmath::Vector3;
use rand::{Rng, seq::SliceRandom};
use wgpu::util::DeviceExt;

use crate::{
    context::{Context, GPUResource},
    data_structures::{
        geometry::Geometry,
        instance::{InstanceRaw, Transform},
        material::{Color, ToonMaterial},
        model::{Model, ModelData},
    },
    render::{Instanced, Render},
};

pub const PALETTE: [&str; 4] = ["#e50000", "#FFBF00", "#ffffff", "#5f85ff"];
pub const STAR_RADIUS: f32 = 0.25;
pub const STAR_SEGMENTS: u32 = 24;

/// A single star: where it is and which [`PALETTE`] entry it glows in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vector3<f32>,
    pub colour: usize,
}

/// Scatters `count` stars uniformly in a cube of edge `spread` centred on the origin.
///
/// Not seeded: every call gives a different sky.
pub fn generate(count: usize, spread: f32) -> Vec<Star> {
    generate_with(&mut rand::thread_rng(), count, spread)
}

pub fn generate_with<R: Rng>(rng: &mut R, count: usize, spread: f32) -> Vec<Star> {
    let half = spread.abs() / 2.0;
    let indices: Vec<usize> = (0..PALETTE.len()).collect();
    (0..count)
        .map(|_| {
            let mut coordinate = || {
                if half > 0.0 {
                    rng.gen_range(-half..=half)
                } else {
                    0.0
                }
            };
            let position = Vector3::new(coordinate(), coordinate(), coordinate());
            let colour = indices.choose(&mut *rng).copied().unwrap_or_default();
            Star { position, colour }
        })
        .collect()
}

/// Linear colour of a palette entry. Out of range indices are white.
pub fn palette_colour(index: usize) -> Color {
    PALETTE
        .get(index)
        .and_then(|hex| Color::from_hex(hex))
        .unwrap_or(Color::WHITE)
}

struct StarBatch {
    model: Model,
    instance_buffer: wgpu::Buffer,
    amount: usize,
}

/// Stars are generated once and never move, so each colour is uploaded a
/// single time as one instanced batch.
pub struct StarField {
    stars: Vec<Star>,
    batches: Vec<StarBatch>,
}

impl StarField {
    pub fn new(stars: Vec<Star>) -> Self {
        Self {
            stars,
            batches: Vec::new(),
        }
    }

    pub fn generate(count: usize, spread: f32) -> Self {
        Self::new(generate(count, spread))
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Star transforms grouped by palette index; colours without stars are left out.
    pub fn colour_batches(&self) -> Vec<(usize, Vec<Transform>)> {
        (0..PALETTE.len())
            .filter_map(|colour| {
                let transforms: Vec<Transform> = self
                    .stars
                    .iter()
                    .filter(|star| star.colour == colour)
                    .map(|star| Transform::at(star.position))
                    .collect();
                (!transforms.is_empty()).then_some((colour, transforms))
            })
            .collect()
    }
}

impl<'a> GPUResource<'a> for StarField {
    fn write_to_buffer(&mut self, ctx: &Context) {
        if !self.batches.is_empty() {
            return;
        }
        let sphere = Geometry::sphere(STAR_RADIUS, STAR_SEGMENTS, STAR_SEGMENTS);
        self.batches = self
            .colour_batches()
            .into_iter()
            .map(|(colour, transforms)| {
                let data = ModelData::single(
                    "star",
                    sphere.clone(),
                    ToonMaterial::glowing(palette_colour(colour)),
                );
                let model = data.upload(&ctx.device, &ctx.pipelines.toon.material_layout);
                let raw: Vec<InstanceRaw> = transforms.iter().map(Transform::to_raw).collect();
                let instance_buffer =
                    ctx.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("Star {} Instance Buffer", PALETTE[colour])),
                            contents: bytemuck::cast_slice(&raw),
                            usage: wgpu::BufferUsages::VERTEX,
                        });
                StarBatch {
                    model,
                    instance_buffer,
                    amount: raw.len(),
                }
            })
            .collect();
        log::debug!("Uploaded {} stars in {} batches", self.len(), self.batches.len());
    }

    fn get_render(&'a self) -> Render<'a> {
        Render::Defaults(
            self.batches
                .iter()
                .map(|batch| Instanced {
                    instance: &batch.instance_buffer,
                    model: &batch.model,
                    amount: batch.amount,
                })
                .collect(),
        )
    }
}
