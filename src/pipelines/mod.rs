//! Render pipelines.
//!
//! - `basic`: shared pipeline and uniform layout builders
//! - `light`: point lights and their uniform
//! - `toon`: the cel shaded pipeline every scene mesh is drawn with

pub mod basic;
pub mod light;
pub mod toon;
