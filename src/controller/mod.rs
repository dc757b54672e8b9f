// CONTROLLER: input state, event binding and per-frame motion
pub mod input;
pub mod surface;
pub mod binder;
pub mod motion;
pub mod look_target;
pub mod touch_controller;

pub use input::{Direction, InputEvent, InputState, KeyBindings, MotionFlags, PointerButton, ZoneRole};
pub use surface::{Channel, Handler, InputSurface, ListenerId, LocalSurface, Propagation};
pub use binder::EventBinder;
pub use motion::{look_snapshot, MotionIntegrator};
pub use look_target::LookTarget;
pub use touch_controller::TouchController;
