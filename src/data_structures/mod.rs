//! Engine data structures: transforms, geometry, materials, models and scene graphs.
//!
//! - `instance` holds the per-entity transform and its GPU instance layout
//! - `geometry` contains CPU triangle meshes and procedural shapes
//! - `material` contains colours and the toon material
//! - `model` contains the vertex layout and uploaded GPU models
//! - `scene_graph` is the node tree produced by the model loader
//! - `texture` wraps the depth target

pub mod geometry;
pub mod instance;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
