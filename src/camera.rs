//! Camera, projection and the two things that move the camera.
//!
//! [`OrbitController`] handles manual rotate/pan/zoom from mouse input, and
//! [`ScrollCamera`] maps the page scroll offset to the camera depth. Both
//! write `Camera::position`; neither reads the other's state.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::ModifiersState;

use crate::scroll::ScrollState;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_POLAR: f32 = 0.0001;

/// A look-at camera: it always faces `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn fovy(&self) -> Rad<f32> {
        self.fovy
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    Rotate,
    Pan,
}

/// Orbit style manual controls around `Camera::target`.
///
/// Left drag rotates, right drag pans, Ctrl + wheel zooms. Input is buffered
/// and applied in [`update`](Self::update), so nothing changes on frames
/// without input.
#[derive(Debug)]
pub struct OrbitController {
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    drag: Option<Drag>,
    modifiers: ModifiersState,
    rotate: (f32, f32),
    pan: (f32, f32),
    zoom: f32,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, pan_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            pan_speed,
            zoom_speed,
            min_distance: 0.5,
            max_distance: 1000.0,
            drag: None,
            modifiers: ModifiersState::empty(),
            rotate: (0.0, 0.0),
            pan: (0.0, 0.0),
            zoom: 0.0,
        }
    }

    /// Tracks buttons and modifiers. Returns true if the event was a zoom.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => Some(Drag::Rotate),
                    (MouseButton::Right, ElementState::Pressed) => Some(Drag::Pan),
                    (_, ElementState::Released) => None,
                    _ => self.drag,
                };
                false
            }
            WindowEvent::MouseWheel { delta, .. } if self.zooming() => {
                self.zoom += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                true
            }
            _ => false,
        }
    }

    /// True while the wheel zooms instead of scrolling the page.
    pub fn zooming(&self) -> bool {
        self.modifiers.control_key()
    }

    /// Raw mouse motion in pixels.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        match self.drag {
            Some(Drag::Rotate) => {
                self.rotate.0 += dx as f32;
                self.rotate.1 += dy as f32;
            }
            Some(Drag::Pan) => {
                self.pan.0 += dx as f32;
                self.pan.1 += dy as f32;
            }
            None => (),
        }
    }

    pub fn has_pending_input(&self) -> bool {
        self.rotate != (0.0, 0.0) || self.pan != (0.0, 0.0) || self.zoom != 0.0
    }

    /// Applies buffered input. `viewport_height` and `fovy` turn pixels into world units.
    pub fn update(&mut self, camera: &mut Camera, viewport_height: u32, fovy: Rad<f32>) {
        if !self.has_pending_input() {
            return;
        }
        let height = viewport_height.max(1) as f32;
        let offset = camera.position - camera.target;
        let mut radius = offset.magnitude().max(self.min_distance);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let rotate_per_pixel = 2.0 * std::f32::consts::PI / height * self.rotate_speed;
        theta -= self.rotate.0 * rotate_per_pixel;
        phi -= self.rotate.1 * rotate_per_pixel;
        phi = phi.clamp(SAFE_POLAR, std::f32::consts::PI - SAFE_POLAR);

        if self.zoom != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(self.zoom.abs());
            radius = if self.zoom > 0.0 { radius * scale } else { radius / scale };
            radius = radius.clamp(self.min_distance, self.max_distance);
        }

        let direction = Vector3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos());
        if self.pan != (0.0, 0.0) {
            let world_per_pixel = 2.0 * radius * (fovy.0 / 2.0).tan() / height * self.pan_speed;
            let forward = -direction;
            let right = forward.cross(Vector3::unit_y()).normalize();
            let up = right.cross(forward).normalize();
            camera.target += (right * -self.pan.0 + up * self.pan.1) * world_per_pixel;
        }

        camera.position = camera.target + direction * radius;
        self.rotate = (0.0, 0.0);
        self.pan = (0.0, 0.0);
        self.zoom = 0.0;
    }
}

/// Maps the scroll offset to the camera depth.
///
/// `z = clamp(initial_z + offset * scroll_scale, initial_z, max_z)`. The
/// camera is only touched when the [`ScrollState`] revision changes, so
/// several scroll events between two frames collapse into the latest one.
#[derive(Debug, Clone)]
pub struct ScrollCamera {
    pub initial_z: f32,
    pub scroll_scale: f32,
    pub max_z: f32,
    seen_revision: Option<u64>,
}

impl ScrollCamera {
    pub const INITIAL_Z: f32 = 6.1;
    pub const SCROLL_SCALE: f32 = 0.035;
    pub const MAX_Z: f32 = 65.0;

    pub fn new(initial_z: f32, scroll_scale: f32, max_z: f32) -> Self {
        Self {
            initial_z,
            scroll_scale,
            max_z,
            seen_revision: None,
        }
    }

    pub fn depth_for(&self, offset: f64) -> f32 {
        let raw = self.initial_z + offset as f32 * self.scroll_scale;
        raw.max(self.initial_z).min(self.max_z)
    }

    /// Applies the latest scroll offset if it changed since the last call.
    pub fn sync(&mut self, scroll: &ScrollState, camera: &mut Camera) -> bool {
        let revision = scroll.revision();
        if self.seen_revision == Some(revision) {
            return false;
        }
        self.seen_revision = Some(revision);
        camera.position.z = self.depth_for(scroll.offset());
        true
    }
}

impl Default for ScrollCamera {
    fn default() -> Self {
        Self::new(Self::INITIAL_Z, Self::SCROLL_SCALE, Self::MAX_Z)
    }
}

pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
