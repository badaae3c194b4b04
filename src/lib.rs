//! scrollscape
//!
//! A toon shaded 3D scene whose camera depth follows the page scroll. A
//! wobbling box and a rolling torus sit in a field of glowing stars, lit by
//! four coloured point lights; two glTF models load in the background and
//! join the scene when they arrive. Runs in the browser (WebGL) and natively,
//! where the mouse wheel stands in for the page scroll.
//!
//! High-level modules
//! - `camera`: camera, projection, orbit controls and the scroll to depth mapping
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: geometry, materials, instances, models and scene graphs
//! - `flow`: the event loop and the flow lifecycle
//! - `pipelines`: the toon pipeline, its shader and the light uniform
//! - `resources`: asset fetching, glTF parsing and toon material conversion
//! - `render`: render composition handed from flows to the engine
//! - `scene`: the scene flow, its entities and their update rules
//! - `scroll`: scroll containers, scroll state and the listener lifecycle
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod scroll;

pub use error::SceneError;
pub use scene::{Scene, SceneEvent, ScrollSource};

use crate::{
    context::InitContext,
    flow::{FlowConstructor, GraphicsFlow},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Builds the scene once the GPU context exists.
pub fn scene_constructor(source: ScrollSource) -> FlowConstructor<(), SceneEvent> {
    Box::new(move |_ctx: InitContext| {
        Box::pin(async move {
            Box::new(Scene::new(source)) as Box<dyn GraphicsFlow<(), SceneEvent>>
        })
    })
}

/// Opens the window (or attaches to the page canvas) and runs the scene.
pub fn run() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    let source = ScrollSource::Selector(scene::SCROLL_SELECTOR.to_string());
    #[cfg(not(target_arch = "wasm32"))]
    let source = ScrollSource::Virtual(std::rc::Rc::new(scroll::VirtualScroll::default()));

    flow::run(vec![scene_constructor(source)])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run().map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
