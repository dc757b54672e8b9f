// MODEL: the controlled object and the data the controller keeps about it
pub mod object;
pub mod orientation;
pub mod config;
pub mod viewport;

pub use object::{ControlledObject, LocalAxis, Object3D};
pub use orientation::{OrientationSnapshot, Spherical};
pub use config::ControllerConfig;
pub use viewport::{Viewport, ViewportMetrics};
