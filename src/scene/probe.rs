//! Diagnostic camera position logging.
//!
//! Natively the scene calls [`CameraProbe::report`] on right click. In the
//! browser a `contextmenu` listener on the document body does the same. The
//! probe only reads the camera; it never changes the scene.

use std::{cell::Cell, rc::Rc};

use crate::camera::Camera;

pub fn describe(position: [f32; 3]) -> String {
    let [x, y, z] = position;
    format!("camera position x: {x}, y: {y}, z: {z}")
}

pub struct CameraProbe {
    position: Rc<Cell<[f32; 3]>>,
    #[cfg(target_arch = "wasm32")]
    listener: Option<(web_sys::HtmlElement, wasm_bindgen::closure::Closure<dyn FnMut()>)>,
}

impl CameraProbe {
    pub fn new() -> Self {
        Self {
            position: Rc::new(Cell::new([0.0; 3])),
            #[cfg(target_arch = "wasm32")]
            listener: None,
        }
    }

    /// Latest camera position, as the listener would print it.
    pub fn position(&self) -> [f32; 3] {
        self.position.get()
    }

    pub fn record(&self, camera: &Camera) {
        self.position.set(camera.position.into());
    }

    pub fn report(&self) {
        log::info!("{}", describe(self.position.get()));
    }

    /// Registers the `contextmenu` listener. A no-op outside the browser.
    pub fn attach(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::{JsCast, closure::Closure};

            if self.listener.is_some() {
                return;
            }
            let Some(body) = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.body())
            else {
                log::warn!("No document body, camera probe disabled");
                return;
            };
            let position = self.position.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                log::info!("{}", describe(position.get()));
            });
            match body.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref()) {
                Ok(()) => self.listener = Some((body, closure)),
                Err(e) => log::warn!("Could not register contextmenu listener: {:?}", e),
            }
        }
    }

    pub fn detach(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;

            if let Some((body, closure)) = self.listener.take() {
                if let Err(e) = body
                    .remove_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())
                {
                    log::warn!("Could not remove contextmenu listener: {:?}", e);
                }
            }
        }
    }
}

impl Default for CameraProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CameraProbe {
    fn drop(&mut self) {
        self.detach();
    }
}
