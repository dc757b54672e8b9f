use glam::Vec3;

use crate::error::{ControlError, Result};

/// Argument to [`TouchController::look_at`](crate::controller::TouchController::look_at)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookTarget {
    Point(Vec3),
    Components(f32, f32, f32),
}

impl LookTarget {
    /// World-space point, rejecting non-finite input
    pub fn resolve(self) -> Result<Vec3> {
        let point = match self {
            LookTarget::Point(p) => p,
            LookTarget::Components(x, y, z) => Vec3::new(x, y, z),
        };
        if !point.is_finite() {
            return Err(ControlError::InvalidLookTarget(format!(
                "components must be finite, got ({}, {}, {})",
                point.x, point.y, point.z
            )));
        }
        Ok(point)
    }
}

impl From<Vec3> for LookTarget {
    fn from(p: Vec3) -> Self {
        LookTarget::Point(p)
    }
}

impl From<[f32; 3]> for LookTarget {
    fn from([x, y, z]: [f32; 3]) -> Self {
        LookTarget::Components(x, y, z)
    }
}

impl From<(f32, f32, f32)> for LookTarget {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        LookTarget::Components(x, y, z)
    }
}
