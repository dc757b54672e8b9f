use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::controller::input::{InputEvent, InputState};
use crate::controller::surface::{Channel, Handler, InputSurface, ListenerId, Propagation};
use crate::error::Result;

/// Wires surface channels to the shared [`InputState`].
///
/// Every handler holds its own `Rc` to the input state and the enabled flag,
/// so the subscriptions live exactly as long as the surface keeps them.
pub struct EventBinder {
    input: Rc<RefCell<InputState>>,
    enabled: Rc<Cell<bool>>,
    listeners: Vec<ListenerId>,
    connected: bool,
}

impl EventBinder {
    pub fn new(input: Rc<RefCell<InputState>>, enabled: Rc<Cell<bool>>) -> Self {
        Self {
            input,
            enabled,
            listeners: Vec::new(),
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn listener_ids(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Subscribe to every channel. A second call while connected is a no-op.
    pub fn connect<S: InputSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        if self.connected {
            debug!("already connected, skipping");
            return Ok(());
        }

        let handler = self.handler();
        for channel in Channel::all() {
            match surface.listen(channel, handler.clone()) {
                Ok(id) => self.listeners.push(id),
                Err(e) => {
                    warn!(?channel, error = %e, "listener registration failed, rolling back");
                    self.release(surface);
                    return Err(e);
                }
            }
        }

        self.connected = true;
        debug!(listeners = self.listeners.len(), "input connected");
        Ok(())
    }

    /// Remove every subscription this binder registered
    pub fn disconnect<S: InputSurface + ?Sized>(&mut self, surface: &mut S) {
        if !self.connected && self.listeners.is_empty() {
            return;
        }
        self.release(surface);
        debug!("input disconnected");
    }

    /// Forget subscriptions without a surface to remove them from
    pub fn abandon(&mut self) {
        self.listeners.clear();
        self.connected = false;
    }

    fn release<S: InputSurface + ?Sized>(&mut self, surface: &mut S) {
        for id in self.listeners.drain(..) {
            if !surface.unlisten(id) {
                debug!(?id, "listener was already gone");
            }
        }
        self.connected = false;
    }

    fn handler(&self) -> Handler {
        let input = self.input.clone();
        let enabled = self.enabled.clone();
        Rc::new(move |event: &InputEvent| {
            if matches!(event, InputEvent::ContextMenu) {
                // Keep the browser menu from interrupting a secondary-button drag
                return if enabled.get() {
                    Propagation::PreventDefault
                } else {
                    Propagation::Continue
                };
            }
            input.borrow_mut().process_event(event);
            Propagation::Continue
        })
    }
}
