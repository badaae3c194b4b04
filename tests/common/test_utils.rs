#![allow(dead_code)]

use std::rc::Rc;

use scrollscape::{
    Scene, ScrollSource,
    camera::Camera,
    scene::{CAMERA_START, CAMERA_TARGET},
    scroll::VirtualScroll,
};

pub const EPSILON: f32 = 1e-4;

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

pub fn scene_camera() -> Camera {
    Camera::new(CAMERA_START, CAMERA_TARGET)
}

/// A scene on a virtual scroll container, already subscribed to it.
pub fn mounted_scene() -> (Scene, Rc<VirtualScroll>) {
    let scroll = Rc::new(VirtualScroll::default());
    let mut scene = Scene::new(ScrollSource::Virtual(scroll.clone()));
    scene
        .mount_scroll()
        .expect("virtual scroll containers always mount");
    (scene, scroll)
}

/// Packs a JSON document and a binary chunk into a GLB container. An empty
/// `bin` leaves the binary chunk out.
pub fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let bin_chunk = if bin.is_empty() { 0 } else { 8 + bin.len() };
    let total = 12 + 8 + json.len() + bin_chunk;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
    }
    out
}

/// One counter clockwise triangle in the XY plane, without normals, in a
/// node translated by `translation` and with a single material of `base_color`.
pub fn triangle_glb(translation: [f32; 3], base_color: [f32; 4]) -> Vec<u8> {
    let [r, g, b, a] = base_color;
    let material = format!(
        r#"{{ "name": "paint", "pbrMetallicRoughness": {{ "baseColorFactor": [{r:?}, {g:?}, {b:?}, {a:?}] }} }}"#
    );
    triangle_glb_with(translation, Some(material))
}

/// The same triangle with no material at all.
pub fn bare_triangle_glb() -> Vec<u8> {
    triangle_glb_with([0.0; 3], None)
}

fn triangle_glb_with(translation: [f32; 3], material: Option<String>) -> Vec<u8> {
    let mut bin = Vec::new();
    for position in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for coordinate in position {
            bin.extend_from_slice(&coordinate.to_le_bytes());
        }
    }
    for index in [0u16, 1, 2] {
        bin.extend_from_slice(&index.to_le_bytes());
    }

    let [tx, ty, tz] = translation;
    let (material_ref, materials) = match material {
        Some(material) => (r#", "material": 0"#, format!(r#""materials": [{material}],"#)),
        None => ("", String::new()),
    };
    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "triangle", "mesh": 0, "translation": [{tx:?}, {ty:?}, {tz:?}] }}],
  "meshes": [{{
    "name": "triangle",
    "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1{material_ref} }}]
  }}],
  {materials}
  "buffers": [{{ "byteLength": {len} }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 6 }}
  ],
  "accessors": [
    {{
      "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
    }},
    {{ "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }}
  ]
}}"#,
        len = bin.len(),
    );
    glb(&json, &bin)
}
