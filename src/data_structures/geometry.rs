//! CPU-side triangle meshes and the procedural shapes used by the scene.
//!
//! Layouts follow the usual three.js conventions (same segment counts and
//! winding) so the shapes look the way the scene was designed.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Transform as _, Vector3};

use crate::data_structures::model::ModelVertex;

/// Indexed triangle list, counter clockwise front faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Axis aligned box centred on the origin, one quad per face.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
        // normal, u axis, v axis of each face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let half = Vector3::new(hw, hh, hd);
        let mut geometry = Geometry::default();
        for (normal, u, v) in faces {
            let (n, u, v) = (Vector3::from(normal), Vector3::from(u), Vector3::from(v));
            let base = geometry.vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = n + u * su + v * sv;
                geometry.vertices.push(ModelVertex {
                    position: [p.x * half.x, p.y * half.y, p.z * half.z],
                    normal,
                });
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        geometry
    }

    /// Torus in the XY plane around the Z axis.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);
        let mut geometry = Geometry::default();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * PI * 2.0;
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * PI * 2.0;
                let position = Vector3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let centre = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let normal = (position - centre).normalize();
                geometry.vertices.push(ModelVertex {
                    position: position.into(),
                    normal: normal.into(),
                });
            }
        }

        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = (tubular_segments + 1) * j + i - 1;
                let b = (tubular_segments + 1) * (j - 1) + i - 1;
                let c = (tubular_segments + 1) * (j - 1) + i;
                let d = (tubular_segments + 1) * j + i;
                geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        geometry
    }

    /// UV sphere centred on the origin.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut geometry = Geometry::default();

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let phi = v * PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let theta = u * PI * 2.0;
                let normal = Vector3::new(
                    -phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                );
                geometry.vertices.push(ModelVertex {
                    position: (normal * radius).into(),
                    normal: normal.into(),
                });
            }
        }

        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // the pole rows collapse to a point, skip their degenerate halves
                if iy != 0 {
                    geometry.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    geometry.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        geometry
    }

    /// Bakes `matrix` into positions and normals.
    pub fn transformed(mut self, matrix: &Matrix4<f32>) -> Self {
        let linear = Matrix3::from_cols(
            matrix.x.truncate(),
            matrix.y.truncate(),
            matrix.z.truncate(),
        );
        let normal_matrix = linear
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear);
        // mirrored transforms flip the winding
        let mirrored = linear.determinant() < 0.0;

        for vertex in self.vertices.iter_mut() {
            let p = matrix.transform_point(cgmath::Point3::from(vertex.position));
            vertex.position = [p.x, p.y, p.z];
            let n = normal_matrix * Vector3::from(vertex.normal);
            if n.magnitude2() > 0.0 {
                vertex.normal = n.normalize().into();
            }
        }
        if mirrored {
            self.indices.chunks_exact_mut(3).for_each(|tri| tri.swap(1, 2));
        }
        self
    }

    /// Smooth normals from the area weighted face normals around each vertex.
    ///
    /// For imported meshes that ship without a normal attribute.
    pub fn compute_normals(&mut self) {
        let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(va), Some(vb), Some(vc)) =
                (self.vertices.get(a), self.vertices.get(b), self.vertices.get(c))
            else {
                continue;
            };
            let pa = Vector3::from(va.position);
            let face = (Vector3::from(vb.position) - pa).cross(Vector3::from(vc.position) - pa);
            for i in [a, b, c] {
                accumulated[i] += face;
            }
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            vertex.normal = if normal.magnitude2() > 0.0 {
                normal.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            };
        }
    }
}
