//! Crate-level error type.

use std::fmt;

/// Errors produced by the controller and its input surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlError {
    /// The look-at argument was neither a point nor three finite scalars.
    InvalidLookTarget(String),
    /// The controller was disposed and no longer references its object.
    Disposed,
    /// An input surface could not register a listener.
    Surface(String),
    /// Configuration text failed to parse or serialize.
    Config(String),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLookTarget(msg) => write!(f, "invalid look-at target: {msg}"),
            Self::Disposed => write!(f, "controller has been disposed"),
            Self::Surface(msg) => write!(f, "input surface error: {msg}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for ControlError {}

impl From<toml::de::Error> for ControlError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for ControlError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ControlError> for wasm_bindgen::JsValue {
    fn from(e: ControlError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, ControlError>;
