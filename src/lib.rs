pub mod logging;
pub mod error;

// MVC Architecture (the view is the host's renderer)
pub mod model;
pub mod controller;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::{InputEvent, LookTarget, TouchController, ZoneRole};
pub use error::{ControlError, Result};
pub use model::{ControlledObject, ControllerConfig, Object3D};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    logging::init();
}
