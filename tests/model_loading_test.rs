use futures::executor::block_on;
use scrollscape::{
    SceneError, SceneEvent,
    data_structures::material::{Color, Material},
    resources::{self, EmissiveMode, convert_to_toon},
    scene::{Entity, ModelPlacement, Stage, fixed_entities},
};

use crate::common::test_utils::{assert_close, bare_triangle_glb, glb, triangle_glb};

mod common;

const RED: [f32; 4] = [0.8, 0.1, 0.1, 1.0];

fn colours(graph: &scrollscape::data_structures::scene_graph::SceneGraph) -> Vec<Color> {
    let mut colours = Vec::new();
    graph.traverse(&mut |node| {
        colours.extend(node.meshes.iter().map(|mesh| mesh.material.base_color()));
    });
    colours
}

#[test]
fn parses_a_binary_model_with_baked_node_transforms() {
    let graph = resources::parse_glb("triangle.glb", &triangle_glb([0.0, 0.0, 5.0], RED)).unwrap();
    assert_eq!(graph.mesh_count(), 1);

    let model = graph.flatten();
    assert_eq!(model.parts.len(), 1);
    let part = &model.parts[0];
    assert_eq!(part.geometry.indices, vec![0, 1, 2]);

    let positions: Vec<[f32; 3]> = part.geometry.vertices.iter().map(|v| v.position).collect();
    assert_eq!(positions, vec![[0.0, 0.0, 5.0], [1.0, 0.0, 5.0], [0.0, 1.0, 5.0]]);
    for vertex in &part.geometry.vertices {
        assert_close(vertex.normal[2], 1.0);
    }

    assert!(matches!(part.material, Material::Standard(_)));
    assert_eq!(part.material.base_color(), Color::linear(0.8, 0.1, 0.1));
}

#[test]
fn primitive_without_material_gets_the_gltf_default() {
    let model = resources::parse_glb("bare.glb", &bare_triangle_glb()).unwrap().flatten();
    let Material::Standard(standard) = &model.parts[0].material else {
        panic!("expected the imported material");
    };
    assert_eq!(standard.base_color, Color::WHITE);
    assert_eq!((standard.metallic, standard.roughness), (1.0, 1.0));
}

#[test]
fn conversion_keeps_the_base_colour_and_is_idempotent() {
    let mut graph = resources::parse_glb("triangle.glb", &triangle_glb([0.0; 3], RED)).unwrap();
    let original = colours(&graph);

    assert_eq!(convert_to_toon(&mut graph, EmissiveMode::None), 1);
    let once = colours(&graph);
    assert_eq!(convert_to_toon(&mut graph, EmissiveMode::None), 1);
    let twice = colours(&graph);

    assert_eq!(original, once);
    assert_eq!(once, twice);
    graph.traverse(&mut |node| {
        for mesh in &node.meshes {
            let toon = mesh.material.as_toon().expect("converted to toon");
            assert_eq!(toon.emissive, Color::BLACK);
        }
    });
}

#[test]
fn glowing_conversion_uses_the_base_colour_as_emissive() {
    let mut graph = resources::parse_glb("triangle.glb", &triangle_glb([0.0; 3], RED)).unwrap();
    convert_to_toon(&mut graph, EmissiveMode::BaseColor);
    let model = graph.flatten();
    let toon = model.parts[0].material.as_toon().unwrap();
    assert_eq!(toon.color, Color::linear(0.8, 0.1, 0.1));
    assert_eq!(toon.emissive, toon.color);
}

#[test]
fn monkey_arrives_with_its_own_light() {
    let graph = resources::parse_glb("monkey.glb", &triangle_glb([0.0; 3], RED)).unwrap();
    let entities = ModelPlacement::monkey().into_entities(graph).unwrap();
    assert_eq!(entities.len(), 2);

    let Entity::LoadedModel(monkey) = &entities[0] else {
        panic!("expected a loaded model first");
    };
    assert_eq!(monkey.name, "monkey");
    assert_eq!(monkey.transform.position, cgmath::Vector3::new(-2.0, 2.0, 30.0));
    assert!(monkey.model.parts.iter().all(|part| part.material.as_toon().is_some()));

    let light = entities[1].as_light().unwrap();
    assert_eq!(light.position, monkey.transform.position);
    assert_eq!((light.intensity, light.decay), (1.0, 2.0));
}

#[test]
fn donut_is_scaled_and_glows() {
    let graph = resources::parse_glb("donut.glb", &triangle_glb([0.0; 3], RED)).unwrap();
    let entities = ModelPlacement::donut().into_entities(graph).unwrap();
    assert_eq!(entities.len(), 1);
    let donut = entities[0].as_mesh().unwrap();
    assert_eq!(donut.transform.scale, cgmath::Vector3::new(15.0, 15.0, 15.0));
    let toon = donut.model.parts[0].material.as_toon().unwrap();
    assert_eq!(toon.emissive, toon.color);
}

#[test]
fn garbage_is_a_parse_error() {
    let err = resources::parse_glb("broken.glb", b"definitely not a model").unwrap_err();
    assert!(matches!(err, SceneError::AssetParse { ref path, .. } if path == "broken.glb"));
    assert!(err.is_asset_error());
}

#[test]
fn model_without_meshes_is_rejected() {
    let json = r#"{ "asset": { "version": "2.0" }, "scenes": [{ "nodes": [0] }], "nodes": [{ "name": "empty" }] }"#;
    let err = resources::parse_glb("empty.glb", &glb(json, &[])).unwrap_err();
    assert!(matches!(err, SceneError::AssetParse { .. }));
}

#[test]
fn missing_asset_fails_the_load() {
    let event = block_on(ModelPlacement::monkey().with_path("models/does_not_exist.glb").load());
    match event {
        SceneEvent::ModelFailed { name, error } => {
            assert_eq!(name, "monkey");
            assert!(matches!(error, SceneError::AssetLoad { .. }));
        }
        SceneEvent::ModelLoaded { .. } => panic!("loaded a model that does not exist"),
    }
}

#[test]
fn failed_load_leaves_the_scene_intact() {
    let mut stage = Stage::new(fixed_entities());
    let before = stage.entities().len();

    let event = block_on(ModelPlacement::donut().with_path("models/does_not_exist.glb").load());
    assert!(!stage.accept_load(event));
    assert_eq!(stage.entities().len(), before);
    assert!(stage.find("donut").is_none());

    for _ in 0..10 {
        assert_eq!(stage.update(0.016), 0);
    }
    assert_eq!(stage.lights().len(), 4);
}

#[test]
fn successful_load_joins_the_scene() {
    let mut stage = Stage::new(fixed_entities());
    let graph = resources::parse_glb("monkey.glb", &triangle_glb([0.0; 3], RED)).unwrap();
    let entities = ModelPlacement::monkey().into_entities(graph).unwrap();

    assert!(stage.accept_load(SceneEvent::ModelLoaded {
        name: "monkey".to_string(),
        entities,
    }));
    assert!(stage.find("monkey").is_some());
    assert_eq!(stage.lights().len(), 5);
}

#[test]
fn load_finishing_after_unmount_is_dropped() {
    let mut stage = Stage::new(fixed_entities());
    let before = stage.entities().len();
    stage.unmount();

    let graph = resources::parse_glb("monkey.glb", &triangle_glb([0.0; 3], RED)).unwrap();
    let entities = ModelPlacement::monkey().into_entities(graph).unwrap();
    assert!(!stage.accept_load(SceneEvent::ModelLoaded {
        name: "monkey".to_string(),
        entities,
    }));
    assert_eq!(stage.entities().len(), before);
}

#[test]
fn scene_starts_both_model_loads() {
    let (scene, _scroll) = common::test_utils::mounted_scene();
    let names: Vec<&str> = scene.loads().iter().map(|placement| placement.name).collect();
    assert_eq!(names, ["monkey", "donut"]);
    assert!(scene.stage().find("monkey").is_none());
}
