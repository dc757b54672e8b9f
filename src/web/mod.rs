// WEB: browser input surface, three.js object adapter and JS bindings
pub mod surface;
pub mod object;
pub mod bindings;

pub use surface::DomSurface;
pub use object::JsObject3D;
pub use bindings::WebTouchController;
