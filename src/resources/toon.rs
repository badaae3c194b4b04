use crate::data_structures::{material::ToonMaterial, scene_graph::SceneGraph};

/// What the converted material uses as emissive colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmissiveMode {
    /// No glow.
    #[default]
    None,
    /// The base colour glows as well.
    BaseColor,
}

/// Swaps every mesh material in `graph` for a toon material with the same base colour.
///
/// The colour is read from the material currently attached to the mesh before
/// it is replaced, so converting twice yields the same colours. Returns the
/// number of meshes converted.
pub fn convert_to_toon(graph: &mut SceneGraph, mode: EmissiveMode) -> usize {
    let mut converted = 0;
    graph.traverse_mut(&mut |node| {
        for mesh in node.meshes.iter_mut() {
            let original = mesh.material.base_color();
            let toon = match mode {
                EmissiveMode::None => ToonMaterial::new(original),
                EmissiveMode::BaseColor => ToonMaterial::glowing(original),
            };
            mesh.material = toon.into();
            converted += 1;
        }
    });
    converted
}
