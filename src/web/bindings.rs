use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use js_sys::Reflect;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

use crate::controller::{LookTarget, TouchController};
use crate::error::ControlError;
use crate::model::ControllerConfig;
use crate::web::{DomSurface, JsObject3D};

/// `lookAt(vector)` or `lookAt(x, y, z)`; any other shape is rejected
fn look_target_from_js(x: &JsValue, y: Option<f64>, z: Option<f64>) -> Result<LookTarget, ControlError> {
    if let (Some(x), Some(y), Some(z)) = (x.as_f64(), y, z) {
        return Ok(LookTarget::Components(x as f32, y as f32, z as f32));
    }
    if x.is_object() {
        let component = |key: &str| Reflect::get(x, &JsValue::from_str(key)).ok().and_then(|v| v.as_f64());
        if let (Some(px), Some(py), Some(pz)) = (component("x"), component("y"), component("z")) {
            return Ok(LookTarget::Point(Vec3::new(px as f32, py as f32, pz as f32)));
        }
        return Err(ControlError::InvalidLookTarget("object lacks numeric x, y and z".to_string()));
    }
    Err(ControlError::InvalidLookTarget(
        "expected a point object or three numbers".to_string(),
    ))
}

/// JS-facing controller for a three.js camera
#[wasm_bindgen(js_name = TouchController)]
pub struct WebTouchController {
    inner: TouchController<JsObject3D, DomSurface>,
}

#[wasm_bindgen(js_class = TouchController)]
impl WebTouchController {
    /// With an element the controller connects and sizes itself immediately,
    /// otherwise call `connect()` and `handleResize()` when ready.
    #[wasm_bindgen(constructor)]
    pub fn new(object: JsValue, dom_element: Option<HtmlElement>) -> Result<WebTouchController, JsValue> {
        let object = Rc::new(RefCell::new(JsObject3D::new(object)));
        let connect_now = dom_element.is_some();
        let surface = DomSurface::new(dom_element)?;
        let inner = if connect_now {
            TouchController::with_surface(object, surface)?
        } else {
            let mut inner = TouchController::new(object);
            let _ = inner.attach(surface)?;
            inner
        };
        Ok(Self { inner })
    }

    pub fn connect(&mut self) -> Result<(), JsValue> {
        Ok(self.inner.connect()?)
    }

    pub fn disconnect(&mut self) {
        self.inner.disconnect();
    }

    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    #[wasm_bindgen(js_name = handleResize)]
    pub fn handle_resize(&mut self) {
        self.inner.handle_resize();
    }

    #[wasm_bindgen(js_name = lookAt)]
    pub fn look_at(&mut self, x: JsValue, y: Option<f64>, z: Option<f64>) -> Result<(), JsValue> {
        let target = look_target_from_js(&x, y, z)?;
        self.inner.look_at(target)?;
        Ok(())
    }

    pub fn update(&mut self, delta: f32) {
        self.inner.update(delta);
    }

    #[wasm_bindgen(js_name = loadConfig)]
    pub fn load_config(&mut self, toml: &str) -> Result<(), JsValue> {
        self.inner.set_config(ControllerConfig::from_toml_str(toml)?);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn lat(&self) -> f32 {
        self.inner.orientation_snapshot().lat
    }

    #[wasm_bindgen(getter)]
    pub fn lon(&self) -> f32 {
        self.inner.orientation_snapshot().lon
    }

    #[wasm_bindgen(getter)]
    pub fn enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    #[wasm_bindgen(setter)]
    pub fn set_enabled(&mut self, value: bool) {
        self.inner.set_enabled(value);
    }

    #[wasm_bindgen(getter = movementSpeed)]
    pub fn movement_speed(&self) -> f32 {
        self.inner.config().movement_speed
    }

    #[wasm_bindgen(setter = movementSpeed)]
    pub fn set_movement_speed(&mut self, value: f32) {
        self.inner.config_mut().movement_speed = value;
    }

    #[wasm_bindgen(getter = lookSpeed)]
    pub fn look_speed(&self) -> f32 {
        self.inner.config().look_speed
    }

    #[wasm_bindgen(setter = lookSpeed)]
    pub fn set_look_speed(&mut self, value: f32) {
        self.inner.config_mut().look_speed = value;
    }

    #[wasm_bindgen(getter = lookVertical)]
    pub fn look_vertical(&self) -> bool {
        self.inner.config().look_vertical
    }

    #[wasm_bindgen(setter = lookVertical)]
    pub fn set_look_vertical(&mut self, value: bool) {
        self.inner.config_mut().look_vertical = value;
    }

    #[wasm_bindgen(getter = autoForward)]
    pub fn auto_forward(&self) -> bool {
        self.inner.config().auto_forward
    }

    #[wasm_bindgen(setter = autoForward)]
    pub fn set_auto_forward(&mut self, value: bool) {
        self.inner.config_mut().auto_forward = value;
    }

    #[wasm_bindgen(getter = activeLook)]
    pub fn active_look(&self) -> bool {
        self.inner.config().active_look
    }

    #[wasm_bindgen(setter = activeLook)]
    pub fn set_active_look(&mut self, value: bool) {
        self.inner.config_mut().active_look = value;
    }

    #[wasm_bindgen(getter = heightSpeed)]
    pub fn height_speed(&self) -> bool {
        self.inner.config().height_speed
    }

    #[wasm_bindgen(setter = heightSpeed)]
    pub fn set_height_speed(&mut self, value: bool) {
        self.inner.config_mut().height_speed = value;
    }

    #[wasm_bindgen(getter = heightCoef)]
    pub fn height_coef(&self) -> f32 {
        self.inner.config().height_coef
    }

    #[wasm_bindgen(setter = heightCoef)]
    pub fn set_height_coef(&mut self, value: f32) {
        self.inner.config_mut().height_coef = value;
    }

    #[wasm_bindgen(getter = heightMin)]
    pub fn height_min(&self) -> f32 {
        self.inner.config().height_min
    }

    #[wasm_bindgen(setter = heightMin)]
    pub fn set_height_min(&mut self, value: f32) {
        self.inner.config_mut().height_min = value;
    }

    #[wasm_bindgen(getter = heightMax)]
    pub fn height_max(&self) -> f32 {
        self.inner.config().height_max
    }

    #[wasm_bindgen(setter = heightMax)]
    pub fn set_height_max(&mut self, value: f32) {
        self.inner.config_mut().height_max = value;
    }

    #[wasm_bindgen(getter = constrainVertical)]
    pub fn constrain_vertical(&self) -> bool {
        self.inner.config().constrain_vertical
    }

    #[wasm_bindgen(setter = constrainVertical)]
    pub fn set_constrain_vertical(&mut self, value: bool) {
        self.inner.config_mut().constrain_vertical = value;
    }

    #[wasm_bindgen(getter = verticalMin)]
    pub fn vertical_min(&self) -> f32 {
        self.inner.config().vertical_min
    }

    #[wasm_bindgen(setter = verticalMin)]
    pub fn set_vertical_min(&mut self, value: f32) {
        self.inner.config_mut().vertical_min = value;
    }

    #[wasm_bindgen(getter = verticalMax)]
    pub fn vertical_max(&self) -> f32 {
        self.inner.config().vertical_max
    }

    #[wasm_bindgen(setter = verticalMax)]
    pub fn set_vertical_max(&mut self, value: f32) {
        self.inner.config_mut().vertical_max = value;
    }

    #[wasm_bindgen(getter = continuousLook)]
    pub fn continuous_look(&self) -> bool {
        self.inner.config().continuous_look
    }

    #[wasm_bindgen(setter = continuousLook)]
    pub fn set_continuous_look(&mut self, value: bool) {
        self.inner.config_mut().continuous_look = value;
    }
}
