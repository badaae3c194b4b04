use scrollscape::{
    data_structures::material::Color,
    pipelines::light::{LightsUniform, MAX_LIGHTS, PointLight},
    scene::{LIGHTS, probe::{CameraProbe, describe}},
};

use crate::common::test_utils::{mounted_scene, scene_camera};

mod common;

#[test]
fn light_uniform_counts_lights() {
    let lights: Vec<PointLight> = LIGHTS
        .iter()
        .map(|(hex, position)| PointLight::new(*position, Color::from_hex(hex).unwrap(), 10.0, 3.0))
        .collect();
    assert_eq!(LightsUniform::new(&lights).count(), 4);
    assert_eq!(LightsUniform::new(std::iter::empty()).count(), 0);
}

#[test]
fn light_uniform_ignores_lights_past_the_limit() {
    let lights: Vec<PointLight> = (0..MAX_LIGHTS + 3)
        .map(|i| PointLight::white([i as f32, 0.0, 0.0]))
        .collect();
    assert_eq!(LightsUniform::new(&lights).count(), MAX_LIGHTS);
}

#[test]
fn light_colours_are_valid_hex() {
    for (hex, _) in LIGHTS {
        assert!(Color::from_hex(hex).is_some(), "{hex}");
    }
    assert_eq!(Color::from_hex("#ff00"), None);
    assert_eq!(Color::from_hex("#gg0000"), None);
}

#[test]
fn probe_reports_the_recorded_camera() {
    let probe = CameraProbe::new();
    assert_eq!(probe.position(), [0.0; 3]);

    let mut camera = scene_camera();
    camera.position.z = 20.0;
    probe.record(&camera);
    assert_eq!(probe.position(), [3.1, 4.1, 20.0]);
    assert_eq!(describe([1.0, 2.5, -3.0]), "camera position x: 1, y: 2.5, z: -3");
}

#[test]
fn probe_never_changes_the_scene() {
    let (mut scene, scroll) = mounted_scene();
    let mut camera = scene_camera();
    scroll.scroll_to(500.0);
    scene.advance(&mut camera, 0.016);

    let position = camera.position;
    scene.probe().report();
    scene.advance(&mut camera, 0.016);
    assert_eq!(camera.position, position);
    let expected: [f32; 3] = position.into();
    assert_eq!(scene.probe().position(), expected);
}
