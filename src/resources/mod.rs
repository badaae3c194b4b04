use cgmath::Matrix4;

use crate::{
    data_structures::{
        geometry::Geometry,
        material::{Color, Material, StandardMaterial},
        model::{MeshPart, ModelVertex},
        scene_graph::{SceneGraph, SceneNode},
    },
    error::SceneError,
};

/**
 * This module contains all logic for loading models from external files
 * and preparing them for the toon renderer.
 */
pub mod toon;

pub use toon::{EmissiveMode, convert_to_toon};

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("no origin: {e:?}"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

/// Reads `assets/<file_name>`: over HTTP in the browser, from disk natively.
pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(path)?
    };

    Ok(data)
}

/// Fetches and parses a glTF model into a scene graph with its original materials.
///
/// `.glb` files carry their buffers inline; `.gltf` buffers are fetched
/// relative to `path`.
pub async fn load_model(path: &str) -> Result<SceneGraph, SceneError> {
    log::info!("Loading model {}", path);
    let bytes = load_binary(path)
        .await
        .map_err(|e| SceneError::asset_load(path, e))?;
    let gltf = gltf::Gltf::from_slice(&bytes).map_err(|e| SceneError::asset_parse(path, e))?;

    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => buffer_data.push(embedded_blob(path, &gltf)?),
            gltf::buffer::Source::Uri(uri) => {
                let sibling = sibling_path(path, uri);
                let bin = load_binary(&sibling)
                    .await
                    .map_err(|e| SceneError::asset_load(&sibling, e))?;
                buffer_data.push(bin);
            }
        }
    }
    build_scene_graph(path, &gltf, &buffer_data)
}

/// Parses a self contained binary glTF.
pub fn parse_glb(path: &str, bytes: &[u8]) -> Result<SceneGraph, SceneError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| SceneError::asset_parse(path, e))?;
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => buffer_data.push(embedded_blob(path, &gltf)?),
            gltf::buffer::Source::Uri(uri) => {
                return Err(SceneError::asset_parse(
                    path,
                    format!("external buffer `{uri}` in a binary model"),
                ));
            }
        }
    }
    build_scene_graph(path, &gltf, &buffer_data)
}

fn embedded_blob(path: &str, gltf: &gltf::Gltf) -> Result<Vec<u8>, SceneError> {
    gltf.blob
        .clone()
        .ok_or_else(|| SceneError::asset_parse(path, "missing binary chunk"))
}

fn sibling_path(path: &str, uri: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{uri}"),
        None => uri.to_string(),
    }
}

fn build_scene_graph(
    path: &str,
    gltf: &gltf::Gltf,
    buffer_data: &[Vec<u8>],
) -> Result<SceneGraph, SceneError> {
    let materials: Vec<Material> = gltf.materials().map(|m| standard_material(&m)).collect();
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| SceneError::asset_parse(path, "no scene"))?;

    let roots = scene
        .nodes()
        .map(|node| to_scene_node(path, node, buffer_data, &materials))
        .collect::<Result<Vec<_>, _>>()?;
    let graph = SceneGraph::new(roots);
    if graph.mesh_count() == 0 {
        return Err(SceneError::asset_parse(path, "no mesh nodes"));
    }
    Ok(graph)
}

fn standard_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _] = pbr.base_color_factor();
    StandardMaterial {
        name: material.name().unwrap_or("material").to_string(),
        base_color: Color::linear(r, g, b),
        emissive: material.emissive_factor().into(),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
    }
    .into()
}

/// glTF's default material: white, fully rough, fully metallic.
fn default_material() -> Material {
    StandardMaterial {
        name: "default".to_string(),
        base_color: Color::WHITE,
        emissive: Color::BLACK,
        metallic: 1.0,
        roughness: 1.0,
    }
    .into()
}

fn to_scene_node(
    path: &str,
    node: gltf::scene::Node,
    buffer_data: &[Vec<u8>],
    materials: &[Material],
) -> Result<SceneNode, SceneError> {
    let mut scene_node = SceneNode::new(node.name().unwrap_or("node"))
        .with_local(Matrix4::from(node.transform().matrix()));

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("mesh");
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping {:?} primitive of {} in {}",
                    primitive.mode(),
                    mesh_name,
                    path
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| SceneError::asset_parse(path, format!("{mesh_name} has no positions")))?
                .collect();
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|n| n.collect());
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            if indices.iter().any(|&i| i as usize >= positions.len()) {
                return Err(SceneError::asset_parse(
                    path,
                    format!("{mesh_name} indexes past its vertices"),
                ));
            }

            let vertices = positions
                .iter()
                .enumerate()
                .map(|(i, position)| ModelVertex {
                    position: *position,
                    normal: normals
                        .as_ref()
                        .and_then(|n| n.get(i).copied())
                        .unwrap_or_default(),
                })
                .collect();
            let mut geometry = Geometry { vertices, indices };
            if normals.is_none() {
                geometry.compute_normals();
            }

            let material = primitive
                .material()
                .index()
                .and_then(|i| materials.get(i).cloned())
                .unwrap_or_else(default_material);
            scene_node.meshes.push(MeshPart {
                name: mesh_name.to_string(),
                geometry,
                material,
            });
        }
    }

    for child in node.children() {
        scene_node.add_child(to_scene_node(path, child, buffer_data, materials)?);
    }
    Ok(scene_node)
}
