use glam::{Quat, Vec3};
use js_sys::{Function, Reflect};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};

use crate::model::{ControlledObject, LocalAxis};

/// Adapter over a three.js-style `Object3D` living on the JS side.
///
/// Reads `position` / `quaternion` and calls `translateX/Y/Z`, `rotateY` and
/// `lookAt` through reflection. A call that throws is logged and skipped.
pub struct JsObject3D {
    inner: JsValue,
}

impl JsObject3D {
    pub fn new(inner: JsValue) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &JsValue {
        &self.inner
    }

    fn field(&self, name: &str) -> Option<JsValue> {
        Reflect::get(&self.inner, &JsValue::from_str(name)).ok()
    }

    fn method(&self, name: &str) -> Option<Function> {
        self.field(name)?.dyn_into::<Function>().ok()
    }

    fn call(&self, name: &str, args: &[f32]) {
        let Some(f) = self.method(name) else {
            warn!(method = name, "controlled object has no such method");
            return;
        };
        let result = match args {
            [a] => f.call1(&self.inner, &JsValue::from_f64(*a as f64)),
            [a, b, c] => f.call3(
                &self.inner,
                &JsValue::from_f64(*a as f64),
                &JsValue::from_f64(*b as f64),
                &JsValue::from_f64(*c as f64),
            ),
            _ => f.call0(&self.inner),
        };
        if let Err(e) = result {
            warn!(method = name, error = ?e, "controlled object call threw");
        }
    }
}

fn number(obj: &JsValue, key: &str) -> f32 {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32
}

impl ControlledObject for JsObject3D {
    fn position(&self) -> Vec3 {
        match self.field("position") {
            Some(p) => Vec3::new(number(&p, "x"), number(&p, "y"), number(&p, "z")),
            None => Vec3::ZERO,
        }
    }

    fn set_position_y(&mut self, y: f32) {
        if let Some(p) = self.field("position") {
            if Reflect::set(&p, &JsValue::from_str("y"), &JsValue::from_f64(y as f64)).is_err() {
                warn!("could not write position.y");
            }
        }
    }

    fn translate_local(&mut self, axis: LocalAxis, distance: f32) {
        let method = match axis {
            LocalAxis::X => "translateX",
            LocalAxis::Y => "translateY",
            LocalAxis::Z => "translateZ",
        };
        self.call(method, &[distance]);
    }

    fn rotate_local_y(&mut self, angle: f32) {
        self.call("rotateY", &[angle]);
    }

    fn look_at(&mut self, target: Vec3) {
        self.call("lookAt", &[target.x, target.y, target.z]);
    }

    fn orientation(&self) -> Quat {
        match self.field("quaternion") {
            Some(q) => Quat::from_xyzw(number(&q, "x"), number(&q, "y"), number(&q, "z"), {
                // A missing quaternion reads as identity, not as the zero quaternion
                Reflect::get(&q, &JsValue::from_str("w"))
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1.0) as f32
            }),
            None => Quat::IDENTITY,
        }
    }
}
