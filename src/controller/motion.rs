use std::f32::consts::PI;

use glam::{Quat, Vec2, Vec3};

use crate::controller::input::MotionFlags;
use crate::model::{ControlledObject, ControllerConfig, LocalAxis, OrientationSnapshot, Spherical};

/// Turns flags and pointer offset into motion of the controlled object.
///
/// Holds the scratch values of the last step so nothing is shared between
/// controller instances.
#[derive(Debug, Default, Clone)]
pub struct MotionIntegrator {
    last_auto_speed: f32,
    last_look_target: Option<Vec3>,
}

impl MotionIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height-driven forward speed bonus of the last step
    pub fn last_auto_speed(&self) -> f32 {
        self.last_auto_speed
    }

    /// Point the last continuous-look step aimed at
    pub fn last_look_target(&self) -> Option<Vec3> {
        self.last_look_target
    }

    /// Advance one enabled frame of `dt` seconds
    pub fn step<O: ControlledObject + ?Sized>(
        &mut self,
        object: &mut O,
        config: &ControllerConfig,
        flags: &MotionFlags,
        pointer: Vec2,
        orientation: &mut OrientationSnapshot,
        dt: f32,
    ) {
        self.last_auto_speed = if config.height_speed {
            // max/min instead of f32::clamp, a misordered range must not panic
            let y = config.height_min.max(config.height_max.min(object.position().y));
            dt * (y - config.height_min) * config.height_coef
        } else {
            0.0
        };

        let move_speed = dt * config.movement_speed;

        if flags.move_forward || (config.auto_forward && !flags.move_backward) {
            object.translate_local(LocalAxis::Z, -(move_speed + self.last_auto_speed));
        }
        if flags.move_backward {
            object.translate_local(LocalAxis::Z, move_speed);
        }

        if flags.move_left {
            object.translate_local(LocalAxis::X, -move_speed);
        }
        if flags.move_right {
            object.translate_local(LocalAxis::X, move_speed);
        }

        if flags.move_up {
            object.translate_local(LocalAxis::Y, move_speed);
        }
        if flags.move_down {
            object.translate_local(LocalAxis::Y, -move_speed);
        }

        // Both pan flags held cancel out
        let pan = axis_value(flags.look_left, flags.look_right) * config.pan_angle(dt);

        self.last_look_target = None;
        if config.continuous_look {
            // Continuous look re-aims from lat/lon each frame, so pan is a yaw in that space
            *orientation = look_snapshot(object.orientation(), config);
            orientation.lon += pan.to_degrees();
            self.look(object, config, pointer, orientation, dt);
        } else if pan != 0.0 {
            object.rotate_local_y(pan);
        }
    }

    fn look<O: ControlledObject + ?Sized>(
        &mut self,
        object: &mut O,
        config: &ControllerConfig,
        pointer: Vec2,
        orientation: &mut OrientationSnapshot,
        dt: f32,
    ) {
        let look_speed = if config.active_look { dt * config.look_speed } else { 0.0 };

        orientation.lon -= pointer.x * look_speed;
        if config.look_vertical {
            orientation.lat -= pointer.y * look_speed * config.vertical_look_ratio();
        }
        let limit = config.lat_limit_degrees;
        orientation.lat = (-limit).max(limit.min(orientation.lat));

        let mut phi = (90.0 - orientation.lat).to_radians();
        let theta = orientation.lon.to_radians();
        if config.constrain_vertical {
            phi = map_linear(phi, 0.0, PI, config.vertical_min, config.vertical_max);
        }

        let target = object.position() + Spherical { radius: 1.0, phi, theta }.to_vec3();
        object.look_at(target);
        self.last_look_target = Some(target);
    }
}

/// Lat/lon of `orientation` in the space continuous look steers in.
///
/// With `constrain_vertical` the polar angle is mapped back from
/// `[vertical_min, vertical_max]` to `[0, π]`, the inverse of the remap in
/// the look step.
pub fn look_snapshot(orientation: Quat, config: &ControllerConfig) -> OrientationSnapshot {
    let mut snapshot = OrientationSnapshot::from_orientation(orientation);
    if config.continuous_look && config.constrain_vertical && config.vertical_max != config.vertical_min {
        let phi = (90.0 - snapshot.lat).to_radians();
        let phi = map_linear(phi, config.vertical_min, config.vertical_max, 0.0, PI);
        snapshot.lat = 90.0 - phi.to_degrees();
    }
    snapshot
}

/// +1 for only `positive`, -1 for only `negative`, 0 otherwise
fn axis_value(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Object3D;

    fn run(flags: MotionFlags, config: &ControllerConfig, dt: f32) -> Object3D {
        let mut obj = Object3D::default();
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        MotionIntegrator::new().step(&mut obj, config, &flags, Vec2::ZERO, &mut orientation, dt);
        obj
    }

    #[test]
    fn forward_moves_along_negative_z() {
        let flags = MotionFlags { move_forward: true, ..Default::default() };
        let config = ControllerConfig { movement_speed: 4.0, ..Default::default() };
        let obj = run(flags, &config, 0.25);
        assert!(obj.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn strafe_and_vertical() {
        let flags = MotionFlags { move_right: true, move_up: true, ..Default::default() };
        let obj = run(flags, &ControllerConfig::default(), 0.5);
        assert!(obj.position.abs_diff_eq(Vec3::new(0.5, 0.5, 0.0), 1e-6));

        let flags = MotionFlags { move_left: true, move_down: true, ..Default::default() };
        let obj = run(flags, &ControllerConfig::default(), 0.5);
        assert!(obj.position.abs_diff_eq(Vec3::new(-0.5, -0.5, 0.0), 1e-6));
    }

    #[test]
    fn auto_forward_is_suppressed_by_backward() {
        let config = ControllerConfig { auto_forward: true, ..Default::default() };
        let obj = run(MotionFlags::default(), &config, 1.0);
        assert!(obj.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));

        let flags = MotionFlags { move_backward: true, ..Default::default() };
        let obj = run(flags, &config, 1.0);
        assert!(obj.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn height_speed_scales_with_clamped_height() {
        let config = ControllerConfig {
            height_speed: true,
            height_min: 0.0,
            height_max: 10.0,
            height_coef: 0.5,
            movement_speed: 1.0,
            ..Default::default()
        };
        let flags = MotionFlags { move_forward: true, ..Default::default() };

        let mut obj = Object3D::new(Vec3::new(0.0, 4.0, 0.0));
        let mut orientation = OrientationSnapshot::default();
        let mut integrator = MotionIntegrator::new();
        integrator.step(&mut obj, &config, &flags, Vec2::ZERO, &mut orientation, 1.0);
        assert!((integrator.last_auto_speed() - 2.0).abs() < 1e-6);
        assert!((obj.position.z + 3.0).abs() < 1e-6);

        // Above height_max the bonus saturates
        let mut obj = Object3D::new(Vec3::new(0.0, 50.0, 0.0));
        integrator.step(&mut obj, &config, &flags, Vec2::ZERO, &mut orientation, 1.0);
        assert!((integrator.last_auto_speed() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn pan_rotates_at_fixed_rate() {
        let dt = 0.2;
        let flags = MotionFlags { look_left: true, ..Default::default() };
        let obj = run(flags, &ControllerConfig::default(), dt);
        let (axis, angle) = obj.orientation.to_axis_angle();
        let expected = 3f32.to_radians() * dt * 10.0;
        assert!((angle - expected).abs() < 1e-5);
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-4));

        let flags = MotionFlags { look_right: true, ..Default::default() };
        let obj = run(flags, &ControllerConfig::default(), dt);
        let quat = glam::Quat::from_rotation_y(-expected);
        assert!(obj.orientation.abs_diff_eq(quat, 1e-5));
    }

    #[test]
    fn opposing_pan_flags_cancel() {
        let flags = MotionFlags { look_left: true, look_right: true, ..Default::default() };
        let obj = run(flags, &ControllerConfig::default(), 1.0);
        assert_eq!(obj.orientation, glam::Quat::IDENTITY);
    }

    #[test]
    fn continuous_look_off_ignores_pointer() {
        let mut obj = Object3D::default();
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        let mut integrator = MotionIntegrator::new();
        integrator.step(
            &mut obj,
            &ControllerConfig::default(),
            &MotionFlags::default(),
            Vec2::new(300.0, -200.0),
            &mut orientation,
            1.0,
        );
        assert_eq!(obj.orientation, glam::Quat::IDENTITY);
        assert!(integrator.last_look_target().is_none());
    }

    #[test]
    fn continuous_look_turns_toward_pointer() {
        let config = ControllerConfig { continuous_look: true, look_speed: 0.1, ..Default::default() };
        let mut obj = Object3D::default();
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        let lon_before = orientation.lon;
        let mut integrator = MotionIntegrator::new();
        integrator.step(&mut obj, &config, &MotionFlags::default(), Vec2::new(100.0, 0.0), &mut orientation, 1.0);

        assert!((orientation.lon - (lon_before - 10.0)).abs() < 1e-3);
        let target = integrator.last_look_target().unwrap();
        assert!(obj.forward().abs_diff_eq(target - obj.position, 1e-4));
    }

    #[test]
    fn continuous_look_clamps_latitude() {
        let config = ControllerConfig { continuous_look: true, look_speed: 1.0, ..Default::default() };
        let mut obj = Object3D::default();
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        MotionIntegrator::new().step(
            &mut obj,
            &config,
            &MotionFlags::default(),
            Vec2::new(0.0, -10_000.0),
            &mut orientation,
            1.0,
        );
        assert_eq!(orientation.lat, 85.0);
        assert!(obj.forward().y > 0.99);
    }

    #[test]
    fn continuous_look_needs_active_look() {
        let config = ControllerConfig {
            continuous_look: true,
            active_look: false,
            ..Default::default()
        };
        let mut obj = Object3D::default();
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        let before = orientation;
        MotionIntegrator::new().step(
            &mut obj,
            &config,
            &MotionFlags::default(),
            Vec2::new(500.0, 500.0),
            &mut orientation,
            1.0,
        );
        assert_eq!(orientation, before);
        assert!(obj.forward().abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    fn continuous(config: ControllerConfig) -> ControllerConfig {
        ControllerConfig { continuous_look: true, ..config }
    }

    fn step_with(obj: &mut Object3D, config: &ControllerConfig, flags: MotionFlags, pointer: Vec2) -> OrientationSnapshot {
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        MotionIntegrator::new().step(obj, config, &flags, pointer, &mut orientation, 0.1);
        orientation
    }

    #[test]
    fn constrained_pitch_survives_panning() {
        let config = continuous(ControllerConfig {
            constrain_vertical: true,
            vertical_min: PI / 4.0,
            vertical_max: 3.0 * PI / 4.0,
            ..Default::default()
        });
        let mut obj = Object3D::default();
        obj.look_at(Vec3::new(0.0, 0.3, -1.0));

        // First step settles onto the constrained range
        step_with(&mut obj, &config, MotionFlags::default(), Vec2::ZERO);
        let pitch = obj.forward().y;
        step_with(&mut obj, &config, MotionFlags::default(), Vec2::ZERO);
        assert!((obj.forward().y - pitch).abs() < 1e-4);

        let pan = MotionFlags { look_left: true, ..Default::default() };
        for _ in 0..10 {
            step_with(&mut obj, &config, pan, Vec2::ZERO);
            assert!((obj.forward().y - pitch).abs() < 1e-4);
        }
    }

    #[test]
    fn continuous_pan_turns_left() {
        let config = continuous(ControllerConfig::default());
        let mut obj = Object3D::default();
        let pan = MotionFlags { look_left: true, ..Default::default() };
        // 3 deg * 0.1 s * 10 per step, 30 steps
        for _ in 0..30 {
            step_with(&mut obj, &config, pan, Vec2::ZERO);
        }
        assert!(obj.forward().abs_diff_eq(Vec3::NEG_X, 1e-3));
    }

    #[test]
    fn constrained_vertical_scales_and_remaps_latitude() {
        let config = continuous(ControllerConfig {
            constrain_vertical: true,
            vertical_min: PI / 4.0,
            vertical_max: 3.0 * PI / 4.0,
            look_speed: 0.01,
            ..Default::default()
        });
        let mut obj = Object3D::default();
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        MotionIntegrator::new().step(&mut obj, &config, &MotionFlags::default(), Vec2::new(0.0, -100.0), &mut orientation, 1.0);

        // 100 px * 0.01 * ratio 2 raises lat by 2 deg; phi 88 deg maps to 89 deg
        assert!((orientation.lat - 2.0).abs() < 1e-3);
        assert!((obj.forward().y - 1f32.to_radians().sin()).abs() < 1e-4);
    }

    #[test]
    fn look_vertical_off_ignores_pointer_y() {
        let config = continuous(ControllerConfig { look_vertical: false, look_speed: 0.01, ..Default::default() });
        let mut obj = Object3D::default();
        let mut orientation = OrientationSnapshot::from_orientation(obj.orientation);
        MotionIntegrator::new().step(&mut obj, &config, &MotionFlags::default(), Vec2::new(0.0, -300.0), &mut orientation, 1.0);

        assert!(orientation.lat.abs() < 1e-4);
        assert!(obj.forward().abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn look_snapshot_inverts_vertical_remap() {
        let config = continuous(ControllerConfig {
            constrain_vertical: true,
            vertical_min: PI / 4.0,
            vertical_max: 3.0 * PI / 4.0,
            ..Default::default()
        });
        // Facing 22.5 deg above the horizon is lat 45 in the unconstrained range
        let mut obj = Object3D::default();
        obj.look_at(Vec3::new(0.0, 22.5f32.to_radians().tan(), -1.0));
        let snapshot = look_snapshot(obj.orientation, &config);
        assert!((snapshot.lat - 45.0).abs() < 1e-3);

        let plain = look_snapshot(obj.orientation, &ControllerConfig::default());
        assert!((plain.lat - 22.5).abs() < 1e-3);
    }

    #[test]
    fn axis_value_tie_break() {
        assert_eq!(axis_value(true, true), 0.0);
        assert_eq!(axis_value(false, false), 0.0);
        assert_eq!(axis_value(true, false), 1.0);
        assert_eq!(axis_value(false, true), -1.0);
    }
}
