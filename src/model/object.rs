use glam::{Mat3, Quat, Vec3};

/// Axis in the object's own frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalAxis {
    X,
    Y,
    Z,
}

impl LocalAxis {
    pub fn unit(self) -> Vec3 {
        match self {
            LocalAxis::X => Vec3::X,
            LocalAxis::Y => Vec3::Y,
            LocalAxis::Z => Vec3::Z,
        }
    }
}

/// What the controller needs from the thing it moves.
///
/// Implementors follow the camera convention: the object faces its local -Z
/// axis with local +Y up.
pub trait ControlledObject {
    fn position(&self) -> Vec3;
    /// For hosts that clamp or snap height; the controller itself never calls it
    fn set_position_y(&mut self, y: f32);
    /// Move `distance` along one of the object's own axes
    fn translate_local(&mut self, axis: LocalAxis, distance: f32);
    /// Rotate about the object's own Y axis (radians)
    fn rotate_local_y(&mut self, angle: f32);
    /// Turn so that local -Z points at `target` (world space)
    fn look_at(&mut self, target: Vec3);
    fn orientation(&self) -> Quat;
}

/// Plain position + quaternion object for native hosts and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object3D {
    pub position: Vec3,
    pub orientation: Quat,
    pub up: Vec3,
}

impl Object3D {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            up: Vec3::Y,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl ControlledObject for Object3D {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position_y(&mut self, y: f32) {
        self.position.y = y;
    }

    fn translate_local(&mut self, axis: LocalAxis, distance: f32) {
        self.position += self.orientation * axis.unit() * distance;
    }

    fn rotate_local_y(&mut self, angle: f32) {
        self.orientation = (self.orientation * Quat::from_rotation_y(angle)).normalize();
    }

    fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() <= f32::EPSILON {
            // Coincident target has no direction, keep the current facing
            return;
        }
        self.orientation = look_rotation(dir, self.up);
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }
}

/// Rotation whose local -Z points along `dir` with local +Y as close to `up` as possible
pub fn look_rotation(dir: Vec3, up: Vec3) -> Quat {
    let z = -dir.normalize();
    let mut x = up.cross(z);
    if x.length_squared() <= 1e-8 {
        // Looking straight along `up`; nudge the basis like three.js does
        let nudged = if up.z.abs() < 0.9 {
            z + Vec3::new(0.0, 0.0, 1e-4)
        } else {
            z + Vec3::new(1e-4, 0.0, 0.0)
        }
        .normalize();
        x = up.cross(nudged);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
