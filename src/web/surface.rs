use std::collections::HashMap;

use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement, KeyboardEvent, PointerEvent, Window};

use crate::controller::input::{is_touch_pointer, InputEvent, PointerButton, ZoneRole};
use crate::controller::surface::{Channel, Handler, InputSurface, ListenerId, Propagation};
use crate::error::{ControlError, Result};
use crate::model::Viewport;

struct Registration {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Where viewport metrics come from: the attachment element, or the window
#[derive(Clone)]
struct ViewportSource {
    window: Window,
    element: Option<HtmlElement>,
}

impl ViewportSource {
    fn read(&self) -> Viewport {
        match &self.element {
            Some(el) => Viewport::new(el.offset_width() as f32, el.offset_height() as f32)
                .with_offset(el.offset_left() as f32, el.offset_top() as f32),
            None => {
                let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                Viewport::new(width as f32, height as f32)
            }
        }
    }
}

/// Browser input surface.
///
/// Touch zones are the elements carrying a role class (`side-left`,
/// `pan-right`, ...), looked up when the channel is subscribed. Pointer and
/// context-menu events come from the attachment element, or the document when
/// there is none; keyboard, resize and blur from the window.
pub struct DomSurface {
    document: Document,
    source: ViewportSource,
    next_id: u64,
    listeners: HashMap<ListenerId, Vec<Registration>>,
}

impl DomSurface {
    pub fn new(element: Option<HtmlElement>) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| ControlError::Surface("no global `window`".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| ControlError::Surface("no document on window".to_string()))?;
        Ok(Self {
            document,
            source: ViewportSource { window, element },
            next_id: 0,
            listeners: HashMap::new(),
        })
    }

    fn pointer_target(&self) -> EventTarget {
        match &self.source.element {
            Some(el) => el.clone().into(),
            None => self.document.clone().into(),
        }
    }

    fn zone_targets(&self, role: ZoneRole) -> Result<Vec<EventTarget>> {
        let nodes = self
            .document
            .query_selector_all(&format!(".{}.{}", role.family(), role.class_name()))
            .map_err(|e| ControlError::Surface(format!("zone query failed: {e:?}")))?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .map(EventTarget::from)
            .collect())
    }

    /// (target, DOM event type) pairs for a channel
    fn bindings(&self, channel: Channel) -> Result<Vec<(EventTarget, &'static str)>> {
        let window: EventTarget = self.source.window.clone().into();
        let pairs = match channel {
            Channel::Touch(role) => {
                let mut pairs = Vec::new();
                for target in self.zone_targets(role)? {
                    for kind in ["touchstart", "touchend", "touchcancel"] {
                        pairs.push((target.clone(), kind));
                    }
                }
                if pairs.is_empty() {
                    debug!(role = role.class_name(), "no touch zone elements for role");
                }
                pairs
            }
            Channel::Pointer => {
                let target = self.pointer_target();
                vec![
                    (target.clone(), "pointerdown"),
                    (target, "pointermove"),
                    // Released outside the element still ends the drag
                    (self.document.clone().into(), "pointerup"),
                ]
            }
            Channel::Keyboard => vec![(window.clone(), "keydown"), (window, "keyup")],
            Channel::ContextMenu => vec![(self.pointer_target(), "contextmenu")],
            Channel::Resize => vec![(window, "resize")],
            Channel::Focus => vec![(window, "blur")],
        };
        Ok(pairs)
    }
}

/// Convert a DOM event into the platform-agnostic form
fn translate(channel: Channel, kind: &str, event: &Event, source: &ViewportSource) -> Option<InputEvent> {
    match (channel, kind) {
        (Channel::Touch(role), "touchstart") => Some(InputEvent::TouchStart(role)),
        (Channel::Touch(role), _) => Some(InputEvent::TouchEnd(role)),
        (Channel::Pointer, "pointermove") => {
            let e = event.dyn_ref::<PointerEvent>()?;
            if is_touch_pointer(&e.pointer_type()) {
                return None;
            }
            Some(InputEvent::PointerMove { page_x: e.page_x() as f32, page_y: e.page_y() as f32 })
        }
        (Channel::Pointer, "pointerdown") => {
            let e = event.dyn_ref::<PointerEvent>()?;
            let button = PointerButton::from_pointer_event(e.button(), &e.pointer_type())?;
            Some(InputEvent::PointerDown { button })
        }
        (Channel::Pointer, _) => {
            let e = event.dyn_ref::<PointerEvent>()?;
            let button = PointerButton::from_pointer_event(e.button(), &e.pointer_type())?;
            Some(InputEvent::PointerUp { button })
        }
        (Channel::Keyboard, "keydown") => Some(InputEvent::KeyDown(event.dyn_ref::<KeyboardEvent>()?.code())),
        (Channel::Keyboard, _) => Some(InputEvent::KeyUp(event.dyn_ref::<KeyboardEvent>()?.code())),
        (Channel::ContextMenu, _) => Some(InputEvent::ContextMenu),
        (Channel::Resize, _) => Some(InputEvent::Resize(source.read())),
        (Channel::Focus, _) => Some(InputEvent::FocusLost),
    }
}

impl InputSurface for DomSurface {
    fn listen(&mut self, channel: Channel, handler: Handler) -> Result<ListenerId> {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let mut registrations = Vec::new();
        for (target, kind) in self.bindings(channel)? {
            let handler = handler.clone();
            let source = self.source.clone();
            let closure = Closure::wrap(Box::new(move |e: Event| {
                if let Some(event) = translate(channel, kind, &e, &source) {
                    if handler(&event) == Propagation::PreventDefault {
                        e.prevent_default();
                    }
                }
            }) as Box<dyn FnMut(Event)>);

            if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
                for reg in &registrations {
                    remove(reg);
                }
                return Err(ControlError::Surface(format!("addEventListener({kind}) failed: {e:?}")));
            }
            registrations.push(Registration { target, kind, closure });
        }

        self.listeners.insert(id, registrations);
        Ok(id)
    }

    fn unlisten(&mut self, id: ListenerId) -> bool {
        match self.listeners.remove(&id) {
            Some(registrations) => {
                for reg in &registrations {
                    remove(reg);
                }
                true
            }
            None => false,
        }
    }

    fn viewport(&self) -> Viewport {
        self.source.read()
    }
}

fn remove(reg: &Registration) {
    if let Err(e) = reg
        .target
        .remove_event_listener_with_callback(reg.kind, reg.closure.as_ref().unchecked_ref())
    {
        warn!(kind = reg.kind, error = ?e, "removeEventListener failed");
    }
}
