//! Platform-agnostic input handling system
use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::controller::surface::Channel;
use crate::model::{Viewport, ViewportMetrics};

/// Semantic tag of an on-screen touch zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneRole {
    SideLeft,
    SideRight,
    Forward,
    Back,
    PanLeft,
    PanRight,
}

impl ZoneRole {
    pub const ALL: [ZoneRole; 6] = [
        ZoneRole::SideLeft,
        ZoneRole::SideRight,
        ZoneRole::Forward,
        ZoneRole::Back,
        ZoneRole::PanLeft,
        ZoneRole::PanRight,
    ];

    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "side-left" => Some(ZoneRole::SideLeft),
            "side-right" => Some(ZoneRole::SideRight),
            "forward" => Some(ZoneRole::Forward),
            "back" => Some(ZoneRole::Back),
            "pan-left" => Some(ZoneRole::PanLeft),
            "pan-right" => Some(ZoneRole::PanRight),
            _ => None,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            ZoneRole::SideLeft => "side-left",
            ZoneRole::SideRight => "side-right",
            ZoneRole::Forward => "forward",
            ZoneRole::Back => "back",
            ZoneRole::PanLeft => "pan-left",
            ZoneRole::PanRight => "pan-right",
        }
    }

    /// Group class shared by zones of the same kind (`.move` or `.pan`)
    pub fn family(self) -> &'static str {
        match self {
            ZoneRole::PanLeft | ZoneRole::PanRight => "pan",
            _ => "move",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            ZoneRole::SideLeft => Direction::Left,
            ZoneRole::SideRight => Direction::Right,
            ZoneRole::Forward => Direction::Forward,
            ZoneRole::Back => Direction::Backward,
            ZoneRole::PanLeft => Direction::LookLeft,
            ZoneRole::PanRight => Direction::LookRight,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Logical command a flag stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    LookLeft,
    LookRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl PointerButton {
    pub fn from_web_button(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }

    /// Button of a pointer event, or `None` for touch contacts.
    ///
    /// Touch contacts on a zone also fire pointer events; those are left to
    /// the zone listeners so a pan or strafe touch never asserts forward.
    pub fn from_pointer_event(button: i16, pointer_type: &str) -> Option<Self> {
        if is_touch_pointer(pointer_type) {
            None
        } else {
            Some(Self::from_web_button(button))
        }
    }

    fn mask(self) -> u32 {
        match self {
            PointerButton::Primary => 1,
            PointerButton::Auxiliary => 1 << 1,
            PointerButton::Secondary => 1 << 2,
            PointerButton::Other(b) => 1 << (3 + (b.clamp(0, 28) as u32)),
        }
    }
}

/// `pointerType` of a touch contact
pub fn is_touch_pointer(pointer_type: &str) -> bool {
    pointer_type.eq_ignore_ascii_case("touch")
}

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    TouchStart(ZoneRole),
    TouchEnd(ZoneRole),

    PointerDown { button: PointerButton },
    PointerUp { button: PointerButton },
    /// Page coordinates in CSS pixels
    PointerMove { page_x: f32, page_y: f32 },

    /// Physical key code, e.g. `KeyW` or `ArrowUp`
    KeyDown(String),
    KeyUp(String),

    ContextMenu,
    Resize(Viewport),
    FocusLost,
}

impl InputEvent {
    /// Surface channel this event is delivered on
    pub fn channel(&self) -> Channel {
        match self {
            InputEvent::TouchStart(role) | InputEvent::TouchEnd(role) => Channel::Touch(*role),
            InputEvent::PointerDown { .. } | InputEvent::PointerUp { .. } | InputEvent::PointerMove { .. } => {
                Channel::Pointer
            }
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => Channel::Keyboard,
            InputEvent::ContextMenu => Channel::ContextMenu,
            InputEvent::Resize(_) => Channel::Resize,
            InputEvent::FocusLost => Channel::Focus,
        }
    }
}

/// Physical key code to direction mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    bindings: HashMap<String, Direction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("ArrowUp".to_string(), Direction::Forward),
            ("KeyW".to_string(), Direction::Forward),
            ("ArrowLeft".to_string(), Direction::Left),
            ("KeyA".to_string(), Direction::Left),
            ("ArrowDown".to_string(), Direction::Backward),
            ("KeyS".to_string(), Direction::Backward),
            ("ArrowRight".to_string(), Direction::Right),
            ("KeyD".to_string(), Direction::Right),
            ("KeyR".to_string(), Direction::Up),
            ("KeyF".to_string(), Direction::Down),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn lookup(&self, code: &str) -> Option<Direction> {
        self.bindings.get(code).copied()
    }

    pub fn bind(&mut self, code: impl Into<String>, direction: Direction) -> Option<Direction> {
        self.bindings.insert(code.into(), direction)
    }

    pub fn unbind(&mut self, code: &str) -> Option<Direction> {
        self.bindings.remove(code)
    }
}

/// Per-frame view of every logical flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionFlags {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub look_left: bool,
    pub look_right: bool,
}

impl MotionFlags {
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.move_forward,
            Direction::Backward => self.move_backward,
            Direction::Left => self.move_left,
            Direction::Right => self.move_right,
            Direction::Up => self.move_up,
            Direction::Down => self.move_down,
            Direction::LookLeft => self.look_left,
            Direction::LookRight => self.look_right,
        }
    }

    pub fn set(&mut self, direction: Direction, value: bool) {
        let slot = match direction {
            Direction::Forward => &mut self.move_forward,
            Direction::Backward => &mut self.move_backward,
            Direction::Left => &mut self.move_left,
            Direction::Right => &mut self.move_right,
            Direction::Up => &mut self.move_up,
            Direction::Down => &mut self.move_down,
            Direction::LookLeft => &mut self.look_left,
            Direction::LookRight => &mut self.look_right,
        };
        *slot = value;
    }

    pub fn any(&self) -> bool {
        *self != MotionFlags::default()
    }
}

/// What is currently being commanded, tracked per input source.
///
/// A direction stays asserted while any source still holds it: keyboard keys
/// through the pressed-code set, touch zones through a per-role count of active
/// touches, pointer buttons through the held-button mask.
pub struct InputState {
    pressed_keys: HashSet<String>,
    touches: [u32; ZoneRole::ALL.len()],
    buttons: u32,
    pointer: Vec2,
    metrics: ViewportMetrics,
    bindings: KeyBindings,
}

impl InputState {
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::default())
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            touches: [0; ZoneRole::ALL.len()],
            buttons: 0,
            pointer: Vec2::ZERO,
            metrics: ViewportMetrics::default(),
            bindings,
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::TouchStart(role) => {
                let count = &mut self.touches[role.index()];
                *count = count.saturating_add(1);
                trace!(role = role.class_name(), count = *count, "touch start");
            }
            InputEvent::TouchEnd(role) => {
                let count = &mut self.touches[role.index()];
                *count = count.saturating_sub(1);
                trace!(role = role.class_name(), count = *count, "touch end");
            }
            InputEvent::PointerDown { button } => {
                self.buttons |= button.mask();
                trace!(?button, "pointer down");
            }
            InputEvent::PointerUp { button } => {
                self.buttons &= !button.mask();
                trace!(?button, "pointer up");
            }
            InputEvent::PointerMove { page_x, page_y } => {
                let (x, y) = self.metrics.center_offset(*page_x, *page_y);
                self.pointer = Vec2::new(x, y);
            }
            InputEvent::KeyDown(code) => {
                if self.pressed_keys.insert(code.clone()) {
                    trace!(code = code.as_str(), "key down");
                }
            }
            InputEvent::KeyUp(code) => {
                if self.pressed_keys.remove(code.as_str()) {
                    trace!(code = code.as_str(), "key up");
                }
            }
            InputEvent::Resize(viewport) => self.set_viewport(viewport),
            InputEvent::FocusLost => self.release_all(),
            InputEvent::ContextMenu => {}
        }
    }

    /// Combine every source into one flag set.
    ///
    /// Pointer buttons only drive forward/backward when `active_look` is on.
    pub fn flags(&self, active_look: bool) -> MotionFlags {
        let mut flags = MotionFlags::default();
        for code in &self.pressed_keys {
            if let Some(direction) = self.bindings.lookup(code) {
                flags.set(direction, true);
            }
        }
        for role in ZoneRole::ALL {
            if self.touches[role.index()] > 0 {
                flags.set(role.direction(), true);
            }
        }
        if active_look {
            if self.is_button_held(PointerButton::Primary) {
                flags.move_forward = true;
            }
            if self.is_button_held(PointerButton::Secondary) {
                flags.move_backward = true;
            }
        }
        flags
    }

    /// Pointer offset from the viewport center in pixels
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn drag_active(&self) -> bool {
        self.buttons != 0
    }

    pub fn is_button_held(&self, button: PointerButton) -> bool {
        self.buttons & button.mask() != 0
    }

    pub fn is_key_pressed(&self, code: &str) -> bool {
        self.pressed_keys.contains(code)
    }

    pub fn active_touches(&self, role: ZoneRole) -> u32 {
        self.touches[role.index()]
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    pub fn set_viewport(&mut self, viewport: &Viewport) {
        self.metrics = ViewportMetrics::from_viewport(viewport);
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Drop every held key, touch and button
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.touches = [0; ZoneRole::ALL.len()];
        self.buttons = 0;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
