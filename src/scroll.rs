//! Scroll offset tracking.
//!
//! A [`ScrollContainer`] is anything that has a scroll offset and can notify
//! listeners when it changes: the page's `<main>` element in the browser
//! ([`DomScroll`]) or a wheel driven [`VirtualScroll`] natively and in tests.
//!
//! [`ScrollTracker`] is the subscription. Mounting it reads the container's
//! current offset and registers a listener that republishes every change into
//! a [`ScrollState`]. Dropping the tracker removes the listener; after that no
//! scroll event reaches the state anymore.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::error::SceneError;

/// Latest scroll offset in pixels plus a revision that bumps on every publish.
///
/// Cloning shares the underlying cell. There is one writer (the tracker's
/// listener) and one reader (the camera) and both live on the main thread.
#[derive(Clone, Debug, Default)]
pub struct ScrollState {
    inner: Rc<ScrollCell>,
}

#[derive(Debug, Default)]
struct ScrollCell {
    offset: Cell<f64>,
    revision: Cell<u64>,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f64 {
        self.inner.offset.get()
    }

    /// Number of publishes so far; lets readers skip frames without changes.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    pub(crate) fn publish(&self, offset: f64) {
        self.inner.offset.set(offset);
        self.inner.revision.set(self.inner.revision.get().wrapping_add(1));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub trait ScrollContainer {
    /// Current vertical scroll offset in pixels.
    fn scroll_top(&self) -> f64;

    fn add_scroll_listener(&self, listener: Rc<dyn Fn()>) -> Result<ListenerId, SceneError>;

    /// Unknown ids are ignored.
    fn remove_scroll_listener(&self, id: ListenerId);
}

/// A scroll container without a DOM. The offset is clamped to `[0, max]`.
pub struct VirtualScroll {
    top: Cell<f64>,
    max: f64,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn()>)>>,
}

impl VirtualScroll {
    /// Height of the scrollable content minus the viewport, in pixels.
    pub const DEFAULT_MAX: f64 = 2400.0;
    /// Pixels per wheel line.
    pub const LINE_HEIGHT: f64 = 40.0;

    pub fn new(max: f64) -> Self {
        Self {
            top: Cell::new(0.0),
            max: max.max(0.0),
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Sets the offset and notifies every listener, like a DOM `scroll` event.
    pub fn scroll_to(&self, top: f64) {
        if !top.is_finite() {
            log::warn!("Ignoring non-finite scroll offset {top}");
            return;
        }
        self.top.set(top.clamp(0.0, self.max));
        // listeners may (un)register while being called
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn scroll_by(&self, delta: f64) {
        self.scroll_to(self.top.get() + delta);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Default for VirtualScroll {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX)
    }
}

impl ScrollContainer for VirtualScroll {
    fn scroll_top(&self) -> f64 {
        self.top.get()
    }

    fn add_scroll_listener(&self, listener: Rc<dyn Fn()>) -> Result<ListenerId, SceneError> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(other, _)| *other != id);
    }
}

/// A DOM element's `scroll` events.
#[cfg(target_arch = "wasm32")]
pub struct DomScroll {
    element: web_sys::Element,
    next_id: Cell<u64>,
    closures: RefCell<Vec<(ListenerId, wasm_bindgen::closure::Closure<dyn FnMut()>)>>,
}

#[cfg(target_arch = "wasm32")]
impl DomScroll {
    pub fn query(selector: &str) -> Result<Self, SceneError> {
        let missing = || SceneError::MissingContainer {
            selector: selector.to_string(),
        };
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(missing)?;
        let element = document
            .query_selector(selector)
            .map_err(|_| missing())?
            .ok_or_else(missing)?;
        Ok(Self {
            element,
            next_id: Cell::new(0),
            closures: RefCell::new(Vec::new()),
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl ScrollContainer for DomScroll {
    fn scroll_top(&self) -> f64 {
        f64::from(self.element.scroll_top())
    }

    fn add_scroll_listener(&self, listener: Rc<dyn Fn()>) -> Result<ListenerId, SceneError> {
        use wasm_bindgen::{JsCast, closure::Closure};

        let closure = Closure::<dyn FnMut()>::new(move || listener());
        self.element
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .map_err(|e| SceneError::Listener(format!("{e:?}")))?;
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.closures.borrow_mut().push((id, closure));
        Ok(id)
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        use wasm_bindgen::JsCast;

        let mut closures = self.closures.borrow_mut();
        let Some(index) = closures.iter().position(|(other, _)| *other == id) else {
            return;
        };
        let (_, closure) = closures.remove(index);
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove scroll listener: {:?}", e);
        }
    }
}

/// Keeps a [`ScrollState`] in sync with a container while it is alive.
pub struct ScrollTracker {
    container: Rc<dyn ScrollContainer>,
    id: ListenerId,
    live: Rc<Cell<bool>>,
}

impl ScrollTracker {
    pub fn mount(container: Rc<dyn ScrollContainer>, state: ScrollState) -> Result<Self, SceneError> {
        state.publish(container.scroll_top());

        let live = Rc::new(Cell::new(true));
        let listener_live = live.clone();
        let weak = Rc::downgrade(&container);
        let listener: Rc<dyn Fn()> = Rc::new(move || {
            if !listener_live.get() {
                return;
            }
            if let Some(container) = weak.upgrade() {
                state.publish(container.scroll_top());
            }
        });
        let id = container.add_scroll_listener(listener)?;
        log::debug!("Scroll tracker mounted at offset {}", container.scroll_top());
        Ok(Self { container, id, live })
    }
}

impl Drop for ScrollTracker {
    fn drop(&mut self) {
        self.live.set(false);
        self.container.remove_scroll_listener(self.id);
        log::debug!("Scroll tracker unmounted");
    }
}

