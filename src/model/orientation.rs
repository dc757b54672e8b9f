use glam::{Quat, Vec3};

/// Spherical coordinates with the polar angle measured from +Y and the
/// azimuth measured around +Y starting at +Z (three.js convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self { radius: 0.0, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    pub fn to_vec3(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Cached latitude/longitude (degrees) of the object's facing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationSnapshot {
    pub lat: f32,
    pub lon: f32,
}

impl OrientationSnapshot {
    /// Derive lat/lon from the direction local -Z points to under `orientation`
    pub fn from_orientation(orientation: Quat) -> Self {
        let look = orientation * Vec3::NEG_Z;
        let s = Spherical::from_vec3(look);
        Self {
            lat: 90.0 - s.phi.to_degrees(),
            lon: s.theta.to_degrees(),
        }
    }

    /// Unit direction for this lat/lon
    pub fn direction(&self) -> Vec3 {
        Spherical {
            radius: 1.0,
            phi: (90.0 - self.lat).to_radians(),
            theta: self.lon.to_radians(),
        }
        .to_vec3()
    }
}
