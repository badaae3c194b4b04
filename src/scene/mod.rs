//! The scroll-driven scene.
//!
//! [`Scene`] is the only flow of the application. It owns the entity
//! [`Stage`], the scroll subscription and the camera probe, and maps the
//! scroll offset onto the camera depth. Everything it shows is fixed at
//! construction except the two models, which arrive asynchronously.

use std::rc::Rc;

use cgmath::Deg;
use instant::Duration;
use winit::event::{DeviceEvent, MouseScrollDelta, WindowEvent};

use crate::{
    camera::{Camera, Projection, ScrollCamera},
    context::Context,
    data_structures::{
        geometry::Geometry,
        instance::Transform,
        material::{Color, ToonMaterial},
        model::ModelData,
    },
    error::SceneError,
    flow::{GraphicsFlow, Out},
    pipelines::light::PointLight,
    render::Render,
    scroll::{ScrollContainer, ScrollState, ScrollTracker, VirtualScroll},
};

pub mod entity;
pub mod models;
pub mod probe;
pub mod stage;
pub mod stars;

pub use entity::{Entity, MeshEntity, Motion};
pub use models::ModelPlacement;
pub use probe::CameraProbe;
pub use stage::{SceneEvent, Stage};
pub use stars::StarField;

pub const CAMERA_START: [f32; 3] = [3.1, 4.1, ScrollCamera::INITIAL_Z];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];
pub const CAMERA_FOV: f32 = 50.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;

pub const STAR_COUNT: usize = 200;
pub const STAR_SPREAD: f32 = 100.0;

/// The page element whose scroll offset drives the camera.
pub const SCROLL_SELECTOR: &str = "main";

pub const BOX_COLOUR: &str = "#00ff65";
pub const TORUS_COLOUR: &str = "#ff00ff";

/// `(colour, position)` of the four fixed point lights.
pub const LIGHTS: [(&str, [f32; 3]); 4] = [
    ("#FFA500", [1.5, 1.5, 0.0]),
    ("#fa00ff", [-1.5, -1.5, 0.0]),
    ("#efff00", [-1.5, 1.5, 0.0]),
    ("#ff009a", [1.5, -1.5, 0.0]),
];
pub const LIGHT_INTENSITY: f32 = 10.0;
pub const LIGHT_DECAY: f32 = 3.0;

fn colour(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or_else(|| {
        log::warn!("Invalid colour {}, using white", hex);
        Color::WHITE
    })
}

/// Box, torus, star field and the four lights. The models are not part of
/// this set; they are inserted once loaded.
pub fn fixed_entities() -> Vec<Entity> {
    let cube = MeshEntity::new(
        "box",
        ModelData::single(
            "box",
            Geometry::cuboid(2.0, 2.0, 2.0),
            ToonMaterial::new(colour(BOX_COLOUR)),
        ),
        Transform::new(),
        Motion::wobble(),
    );
    let torus = MeshEntity::new(
        "torus",
        ModelData::single(
            "torus",
            Geometry::torus(3.5, 0.5, 12, 48),
            ToonMaterial::new(colour(TORUS_COLOUR)),
        ),
        Transform::new(),
        Motion::roll(),
    );

    let mut entities = vec![
        Entity::StaticMesh(cube),
        Entity::StaticMesh(torus),
        Entity::StarField(StarField::generate(STAR_COUNT, STAR_SPREAD)),
    ];
    entities.extend(LIGHTS.iter().map(|(hex, position)| {
        Entity::PointLight(PointLight::new(
            *position,
            colour(hex),
            LIGHT_INTENSITY,
            LIGHT_DECAY,
        ))
    }));
    entities
}

/// Where the scroll offset comes from.
pub enum ScrollSource {
    /// Wheel driven offset, used natively and in tests.
    Virtual(Rc<VirtualScroll>),
    /// A DOM element found with a CSS selector. Only exists in the browser.
    Selector(String),
}

pub struct Scene {
    stage: Stage,
    models: Vec<ModelPlacement>,
    scroll: ScrollState,
    scroll_camera: ScrollCamera,
    source: ScrollSource,
    tracker: Option<ScrollTracker>,
    probe: CameraProbe,
}

impl Scene {
    pub fn new(source: ScrollSource) -> Self {
        Self {
            stage: Stage::new(fixed_entities()),
            models: vec![ModelPlacement::monkey(), ModelPlacement::donut()],
            scroll: ScrollState::new(),
            scroll_camera: ScrollCamera::default(),
            source,
            tracker: None,
            probe: CameraProbe::new(),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn probe(&self) -> &CameraProbe {
        &self.probe
    }

    /// False when the container was missing; the camera then keeps its start depth.
    pub fn is_scroll_coupled(&self) -> bool {
        self.tracker.is_some()
    }

    /// Subscribes to the scroll container. Mounting twice replaces the old
    /// subscription.
    pub fn mount_scroll(&mut self) -> Result<(), SceneError> {
        self.tracker = None;
        let container: Rc<dyn ScrollContainer> = match &self.source {
            ScrollSource::Virtual(scroll) => scroll.clone() as Rc<dyn ScrollContainer>,
            #[cfg(target_arch = "wasm32")]
            ScrollSource::Selector(selector) => Rc::new(crate::scroll::DomScroll::query(selector)?),
            #[cfg(not(target_arch = "wasm32"))]
            ScrollSource::Selector(selector) => {
                return Err(SceneError::MissingContainer {
                    selector: selector.clone(),
                });
            }
        };
        self.tracker = Some(ScrollTracker::mount(container, self.scroll.clone())?);
        Ok(())
    }

    /// The model loads `on_init` starts.
    pub fn loads(&self) -> Vec<ModelPlacement> {
        self.models.clone()
    }

    /// Moves the camera to the scroll depth if the offset changed.
    pub fn sync_camera(&mut self, camera: &mut Camera) -> bool {
        if self.tracker.is_none() {
            return false;
        }
        self.scroll_camera.sync(&self.scroll, camera)
    }

    /// One frame without the GPU: scroll sync, entity updates and the probe.
    /// Returns how many entities failed to update.
    pub fn advance(&mut self, camera: &mut Camera, dt: f32) -> usize {
        self.sync_camera(camera);
        let faults = self.stage.update(dt);
        self.probe.record(camera);
        faults
    }

    pub fn handle_load(&mut self, event: SceneEvent) -> bool {
        self.stage.accept_load(event)
    }

    /// Removes the scroll listener and makes late load results no-ops.
    pub fn teardown(&mut self) {
        self.stage.unmount();
        self.tracker = None;
        self.probe.detach();
    }
}

impl GraphicsFlow<(), SceneEvent> for Scene {
    fn on_init(&mut self, ctx: &mut Context, _state: &mut ()) -> Out<(), SceneEvent> {
        ctx.camera.camera = Camera::new(CAMERA_START, CAMERA_TARGET);
        ctx.projection = Projection::new(
            ctx.config.width,
            ctx.config.height,
            Deg(CAMERA_FOV),
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        ctx.clear_colour = wgpu::Color::BLACK;

        if let Err(e) = self.mount_scroll() {
            log::warn!("Scrolling will not move the camera: {}", e);
        }
        self.probe.attach();

        Out::FutEvent(
            self.loads()
                .into_iter()
                .map(|placement| {
                    Box::new(placement.load()) as Box<dyn Future<Output = SceneEvent>>
                })
                .collect(),
        )
    }

    fn on_update(&mut self, ctx: &mut Context, _state: &mut (), dt: Duration) -> Out<(), SceneEvent> {
        self.advance(&mut ctx.camera.camera, dt.as_secs_f32());
        ctx.light.write(&ctx.queue, &self.stage.lights());
        self.stage.write_to_buffers(ctx);
        Out::Empty
    }

    fn on_device_events(&mut self, _ctx: &Context, _state: &mut (), _event: &DeviceEvent) -> Out<(), SceneEvent> {
        Out::Empty
    }

    fn on_window_events(&mut self, ctx: &Context, _state: &mut (), event: &WindowEvent) -> Out<(), SceneEvent> {
        match event {
            // Ctrl + wheel belongs to the orbit zoom.
            WindowEvent::MouseWheel { delta, .. } if !ctx.camera.controller.zooming() => {
                if let ScrollSource::Virtual(scroll) = &self.source {
                    match delta {
                        MouseScrollDelta::LineDelta(_, y) => {
                            scroll.scroll_by(-f64::from(*y) * VirtualScroll::LINE_HEIGHT)
                        }
                        MouseScrollDelta::PixelDelta(position) => scroll.scroll_by(-position.y),
                    }
                }
            }
            // The browser reports through the contextmenu listener instead.
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseInput {
                state: winit::event::ElementState::Pressed,
                button: winit::event::MouseButton::Right,
                ..
            } => self.probe.report(),
            _ => (),
        }
        Out::Empty
    }

    fn on_custom_events(&mut self, _ctx: &Context, _state: &mut (), event: SceneEvent) -> Option<SceneEvent> {
        self.handle_load(event);
        None
    }

    fn on_render(&self) -> Render<'_> {
        self.stage.get_render()
    }

    fn on_teardown(&mut self, _ctx: &Context, _state: &mut ()) {
        self.teardown();
    }
}
