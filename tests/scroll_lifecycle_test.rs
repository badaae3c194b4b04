use std::rc::Rc;

use scrollscape::scroll::{ScrollState, ScrollTracker, VirtualScroll};

use crate::common::test_utils::{assert_close, mounted_scene, scene_camera};

mod common;

#[test]
fn mounting_reads_the_current_offset() {
    let scroll = Rc::new(VirtualScroll::default());
    scroll.scroll_to(300.0);
    let state = ScrollState::new();

    let _tracker = ScrollTracker::mount(scroll.clone(), state.clone()).unwrap();
    assert_eq!(state.offset(), 300.0);
    assert_eq!(scroll.listener_count(), 1);
}

#[test]
fn every_scroll_event_is_published() {
    let scroll = Rc::new(VirtualScroll::default());
    let state = ScrollState::new();
    let _tracker = ScrollTracker::mount(scroll.clone(), state.clone()).unwrap();
    let mounted = state.revision();

    scroll.scroll_to(120.0);
    assert_eq!(state.offset(), 120.0);
    scroll.scroll_by(80.0);
    assert_eq!(state.offset(), 200.0);
    assert_eq!(state.revision(), mounted + 2);
}

#[test]
fn dropping_the_tracker_removes_the_listener() {
    let scroll = Rc::new(VirtualScroll::default());
    let state = ScrollState::new();
    let tracker = ScrollTracker::mount(scroll.clone(), state.clone()).unwrap();
    scroll.scroll_to(400.0);

    drop(tracker);
    assert_eq!(scroll.listener_count(), 0);

    let revision = state.revision();
    scroll.scroll_to(1500.0);
    assert_eq!(state.offset(), 400.0);
    assert_eq!(state.revision(), revision);
}

#[test]
fn scene_teardown_stops_scroll_coupling() {
    let (mut scene, scroll) = mounted_scene();
    let mut camera = scene_camera();
    scroll.scroll_to(1000.0);
    scene.advance(&mut camera, 0.016);
    assert_close(camera.position.z, 41.1);

    assert!(scene.stage().is_mounted());
    scene.teardown();
    assert!(!scene.is_scroll_coupled());
    assert!(!scene.stage().is_mounted());
    assert_eq!(scroll.listener_count(), 0);

    scroll.scroll_to(2000.0);
    assert_eq!(scene.scroll_state().offset(), 1000.0);
    scene.advance(&mut camera, 0.016);
    assert_close(camera.position.z, 41.1);
}

#[test]
fn remounting_keeps_a_single_listener() {
    let (mut scene, scroll) = mounted_scene();
    scene.mount_scroll().unwrap();
    assert_eq!(scroll.listener_count(), 1);
}
