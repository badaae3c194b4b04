use std::rc::Rc;

use scrollscape::{
    Scene, ScrollSource, SceneError,
    camera::ScrollCamera,
    scroll::{ScrollContainer, ScrollState, ScrollTracker, VirtualScroll},
};

use crate::common::test_utils::{assert_close, mounted_scene, scene_camera};

mod common;

#[test]
fn depth_follows_clamped_linear_mapping() {
    let camera = ScrollCamera::default();
    assert_close(camera.depth_for(0.0), 6.1);
    assert_close(camera.depth_for(1000.0), 41.1);
    assert_close(camera.depth_for(2000.0), 65.0);
    assert_close(camera.depth_for(-500.0), 6.1);
}

#[test]
fn depth_never_leaves_its_range() {
    let camera = ScrollCamera::default();
    for offset in (-3000..6000).step_by(37) {
        let z = camera.depth_for(offset as f64);
        assert!((6.1..=65.0).contains(&z), "offset {offset} gave z {z}");
    }
}

#[test]
fn sync_only_writes_on_new_scroll_values() {
    let scroll = Rc::new(VirtualScroll::default());
    let state = ScrollState::new();
    let _tracker = ScrollTracker::mount(scroll.clone(), state.clone()).unwrap();
    let mut scroll_camera = ScrollCamera::default();
    let mut camera = scene_camera();

    assert!(scroll_camera.sync(&state, &mut camera));
    assert_close(camera.position.z, 6.1);

    // e.g. the orbit controls moved the camera in between
    camera.position.z = 20.0;
    assert!(!scroll_camera.sync(&state, &mut camera));
    assert_close(camera.position.z, 20.0);

    scroll.scroll_to(1000.0);
    assert!(scroll_camera.sync(&state, &mut camera));
    assert_close(camera.position.z, 41.1);
}

#[test]
fn scroll_events_between_frames_collapse_into_the_latest() {
    let (mut scene, scroll) = mounted_scene();
    let mut camera = scene_camera();
    scene.advance(&mut camera, 0.016);

    scroll.scroll_to(100.0);
    scroll.scroll_to(500.0);
    scroll.scroll_to(1000.0);
    scene.advance(&mut camera, 0.016);

    assert_eq!(scene.scroll_state().offset(), 1000.0);
    assert_close(camera.position.z, 41.1);
}

#[test]
fn scrolling_only_moves_the_camera_depth() {
    let (mut scene, scroll) = mounted_scene();
    let mut camera = scene_camera();
    let target = camera.target;

    for offset in [0.0, 250.0, 1800.0, 2400.0] {
        scroll.scroll_to(offset);
        scene.advance(&mut camera, 0.016);
        assert_close(camera.position.x, 3.1);
        assert_close(camera.position.y, 4.1);
        assert_eq!(camera.target, target);
    }
    assert_close(camera.position.z, 65.0);
}

#[test]
fn virtual_scroll_clamps_and_ignores_non_finite_offsets() {
    let scroll = VirtualScroll::new(500.0);
    scroll.scroll_to(-20.0);
    assert_eq!(scroll.scroll_top(), 0.0);
    scroll.scroll_to(900.0);
    assert_eq!(scroll.scroll_top(), 500.0);
    scroll.scroll_to(f64::NAN);
    assert_eq!(scroll.scroll_top(), 500.0);
    scroll.scroll_by(-VirtualScroll::LINE_HEIGHT);
    assert_eq!(scroll.scroll_top(), 460.0);
}

#[test]
fn missing_container_leaves_the_camera_uncoupled() {
    let mut scene = Scene::new(ScrollSource::Selector("main".to_string()));
    let err = scene.mount_scroll().unwrap_err();
    assert!(matches!(err, SceneError::MissingContainer { ref selector } if selector == "main"));
    assert!(!scene.is_scroll_coupled());

    let mut camera = scene_camera();
    camera.position.z = 12.0;
    assert!(!scene.sync_camera(&mut camera));
    assert_eq!(scene.advance(&mut camera, 0.016), 0);
    assert_close(camera.position.z, 12.0);
}
