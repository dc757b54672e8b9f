use std::rc::Rc;

use crate::controller::input::{InputEvent, ZoneRole};
use crate::error::Result;
use crate::model::Viewport;

/// Group of events a listener subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// touch start/end/cancel on every zone tagged with this role
    Touch(ZoneRole),
    /// pointer down/up/move on the attachment element
    Pointer,
    /// key down/up
    Keyboard,
    ContextMenu,
    Resize,
    /// window blur
    Focus,
}

impl Channel {
    pub fn all() -> Vec<Channel> {
        let mut channels: Vec<Channel> = ZoneRole::ALL.iter().copied().map(Channel::Touch).collect();
        channels.extend([
            Channel::Pointer,
            Channel::Keyboard,
            Channel::ContextMenu,
            Channel::Resize,
            Channel::Focus,
        ]);
        channels
    }
}

/// What the surface should do with the native event after the handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    PreventDefault,
}

pub type Handler = Rc<dyn Fn(&InputEvent) -> Propagation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Source of input events the binder subscribes to
pub trait InputSurface {
    fn listen(&mut self, channel: Channel, handler: Handler) -> Result<ListenerId>;
    /// Returns false if `id` was not registered
    fn unlisten(&mut self, id: ListenerId) -> bool;
    fn viewport(&self) -> Viewport;
}

/// In-process surface: the host pushes events in with [`LocalSurface::emit`]
pub struct LocalSurface {
    next_id: u64,
    listeners: Vec<(ListenerId, Channel, Handler)>,
    viewport: Viewport,
}

impl LocalSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
            viewport,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Deliver `event` to every listener on `channel`
    pub fn dispatch(&self, channel: Channel, event: &InputEvent) -> Propagation {
        // Snapshot handlers before calling them
        let handlers: Vec<Handler> = self
            .listeners
            .iter()
            .filter(|(_, ch, _)| *ch == channel)
            .map(|(_, _, h)| h.clone())
            .collect();

        let mut result = Propagation::Continue;
        for handler in handlers {
            if handler(event) == Propagation::PreventDefault {
                result = Propagation::PreventDefault;
            }
        }
        result
    }

    /// Deliver `event` on the channel it naturally belongs to
    pub fn emit(&self, event: &InputEvent) -> Propagation {
        self.dispatch(event.channel(), event)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for LocalSurface {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl InputSurface for LocalSurface {
    fn listen(&mut self, channel: Channel, handler: Handler) -> Result<ListenerId> {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, channel, handler));
        Ok(id)
    }

    fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dispatch_reaches_only_matching_channel() {
        let mut surface = LocalSurface::default();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let id = surface
            .listen(
                Channel::Keyboard,
                Rc::new(move |_: &InputEvent| {
                    counter.set(counter.get() + 1);
                    Propagation::Continue
                }),
            )
            .unwrap();

        surface.emit(&InputEvent::KeyDown("KeyW".into()));
        surface.emit(&InputEvent::ContextMenu);
        assert_eq!(hits.get(), 1);

        assert!(surface.unlisten(id));
        assert!(!surface.unlisten(id));
        surface.emit(&InputEvent::KeyDown("KeyW".into()));
        assert_eq!(hits.get(), 1);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn any_prevent_default_wins() {
        let mut surface = LocalSurface::default();
        surface.listen(Channel::ContextMenu, Rc::new(|_: &InputEvent| Propagation::Continue)).unwrap();
        surface.listen(Channel::ContextMenu, Rc::new(|_: &InputEvent| Propagation::PreventDefault)).unwrap();
        assert_eq!(surface.emit(&InputEvent::ContextMenu), Propagation::PreventDefault);
    }

    #[test]
    fn all_channels_cover_every_zone() {
        let channels = Channel::all();
        assert_eq!(channels.len(), ZoneRole::ALL.len() + 5);
        assert!(channels.contains(&Channel::Touch(ZoneRole::PanRight)));
    }
}
