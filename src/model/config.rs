use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables read by the motion integrator every frame.
///
/// Loadable from TOML; missing keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// World units per second
    pub movement_speed: f32,
    /// Scale applied to the pointer offset when continuous look is on
    pub look_speed: f32,
    pub look_vertical: bool,
    /// Keep moving forward unless backward is held
    pub auto_forward: bool,
    /// Pointer buttons move forward/backward, and continuous look is live
    pub active_look: bool,
    /// Forward speed grows with height between `height_min` and `height_max`
    pub height_speed: bool,
    pub height_coef: f32,
    pub height_min: f32,
    pub height_max: f32,
    /// Map the polar angle into `[vertical_min, vertical_max]` (radians)
    pub constrain_vertical: bool,
    pub vertical_min: f32,
    pub vertical_max: f32,
    /// Re-aim the object from the pointer offset every frame
    pub continuous_look: bool,
    /// Discrete pan rate is `pan_rate_degrees * dt * pan_rate_scale` degrees per step
    pub pan_rate_degrees: f32,
    pub pan_rate_scale: f32,
    /// Latitude clamp for continuous look, degrees
    pub lat_limit_degrees: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 1.0,
            look_speed: 0.005,
            look_vertical: true,
            auto_forward: false,
            active_look: true,
            height_speed: false,
            height_coef: 1.0,
            height_min: 0.0,
            height_max: 1.0,
            constrain_vertical: false,
            vertical_min: 0.0,
            vertical_max: std::f32::consts::PI,
            continuous_look: false,
            pan_rate_degrees: 3.0,
            pan_rate_scale: 10.0,
            lat_limit_degrees: 85.0,
        }
    }
}

impl ControllerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Pan angle in radians for one step of `dt` seconds
    pub fn pan_angle(&self, dt: f32) -> f32 {
        self.pan_rate_degrees.to_radians() * dt * self.pan_rate_scale
    }

    pub fn vertical_look_ratio(&self) -> f32 {
        if self.constrain_vertical {
            std::f32::consts::PI / (self.vertical_max - self.vertical_min)
        } else {
            1.0
        }
    }
}
