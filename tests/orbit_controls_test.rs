use cgmath::{Deg, InnerSpace, Point3, Rad};
use scrollscape::camera::{Camera, OrbitController};
use winit::{
    event::{DeviceId, ElementState, Modifiers, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    keyboard::ModifiersState,
};

use crate::common::test_utils::{assert_close, scene_camera};

mod common;

const VIEWPORT_HEIGHT: u32 = 600;

fn fovy() -> Rad<f32> {
    Deg(50.0f32).into()
}

fn controller() -> OrbitController {
    OrbitController::new(1.0, 1.0, 0.05)
}

fn distance(camera: &Camera) -> f32 {
    (camera.position - camera.target).magnitude()
}

fn button(button: MouseButton, state: ElementState) -> WindowEvent {
    WindowEvent::MouseInput {
        device_id: DeviceId::dummy(),
        state,
        button,
    }
}

fn wheel(lines: f32) -> WindowEvent {
    WindowEvent::MouseWheel {
        device_id: DeviceId::dummy(),
        delta: MouseScrollDelta::LineDelta(0.0, lines),
        phase: TouchPhase::Moved,
    }
}

fn modifiers(state: ModifiersState) -> WindowEvent {
    WindowEvent::ModifiersChanged(Modifiers::from(state))
}

#[test]
fn left_drag_rotates_around_the_target() {
    let mut controls = controller();
    let mut camera = scene_camera();
    let radius = distance(&camera);

    controls.handle_window_events(&button(MouseButton::Left, ElementState::Pressed));
    controls.handle_mouse(120.0, -40.0);
    controls.update(&mut camera, VIEWPORT_HEIGHT, fovy());

    assert_ne!(camera.position, scene_camera().position);
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
    assert_close(distance(&camera), radius);
}

#[test]
fn right_drag_pans_camera_and_target_together() {
    let mut controls = controller();
    let mut camera = scene_camera();
    let offset = camera.position - camera.target;

    controls.handle_window_events(&button(MouseButton::Right, ElementState::Pressed));
    controls.handle_mouse(50.0, 20.0);
    controls.update(&mut camera, VIEWPORT_HEIGHT, fovy());

    assert_ne!(camera.target, Point3::new(0.0, 0.0, 0.0));
    let moved = camera.position - camera.target;
    assert_close(moved.x, offset.x);
    assert_close(moved.y, offset.y);
    assert_close(moved.z, offset.z);
}

#[test]
fn releasing_the_button_ends_the_drag() {
    let mut controls = controller();
    controls.handle_window_events(&button(MouseButton::Left, ElementState::Pressed));
    controls.handle_window_events(&button(MouseButton::Left, ElementState::Released));
    controls.handle_mouse(300.0, 300.0);
    assert!(!controls.has_pending_input());
}

#[test]
fn plain_wheel_is_left_to_the_page() {
    let mut controls = controller();
    let mut camera = scene_camera();
    assert!(!controls.zooming());
    assert!(!controls.handle_window_events(&wheel(3.0)));

    controls.update(&mut camera, VIEWPORT_HEIGHT, fovy());
    assert_eq!(camera, scene_camera());
}

#[test]
fn ctrl_wheel_zooms_towards_the_target() {
    let mut controls = controller();
    let mut camera = scene_camera();
    let radius = distance(&camera);

    controls.handle_window_events(&modifiers(ModifiersState::CONTROL));
    assert!(controls.zooming());
    assert!(controls.handle_window_events(&wheel(1.0)));
    controls.update(&mut camera, VIEWPORT_HEIGHT, fovy());
    assert_close(distance(&camera), radius * 0.95);

    controls.handle_window_events(&modifiers(ModifiersState::empty()));
    assert!(!controls.zooming());
}

#[test]
fn zoom_is_clamped() {
    let mut controls = controller();
    let mut camera = scene_camera();
    controls.handle_window_events(&modifiers(ModifiersState::CONTROL));

    controls.handle_window_events(&wheel(1000.0));
    controls.update(&mut camera, VIEWPORT_HEIGHT, fovy());
    assert_close(distance(&camera), 0.5);

    controls.handle_window_events(&wheel(-1000.0));
    controls.update(&mut camera, VIEWPORT_HEIGHT, fovy());
    assert!((distance(&camera) - 1000.0).abs() < 1e-2);
}
