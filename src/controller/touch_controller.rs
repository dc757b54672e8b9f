use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::controller::binder::EventBinder;
use crate::controller::input::{InputState, KeyBindings};
use crate::controller::look_target::LookTarget;
use crate::controller::motion::{look_snapshot, MotionIntegrator};
use crate::controller::surface::{InputSurface, LocalSurface};
use crate::error::{ControlError, Result};
use crate::model::{ControlledObject, ControllerConfig, OrientationSnapshot};

/// Fly controller driving one object from touch zones, pointer and keyboard.
///
/// The object is shared with the host through `Rc<RefCell<_>>`; the controller
/// drops its handle on [`dispose`](Self::dispose) and never touches the object
/// again.
pub struct TouchController<O: ControlledObject, S: InputSurface = LocalSurface> {
    object: Option<Rc<RefCell<O>>>,
    surface: Option<S>,
    config: ControllerConfig,
    input: Rc<RefCell<InputState>>,
    enabled: Rc<Cell<bool>>,
    binder: EventBinder,
    integrator: MotionIntegrator,
    orientation: OrientationSnapshot,
}

impl<O: ControlledObject, S: InputSurface> TouchController<O, S> {
    /// Controller without an input surface; attach one before connecting
    pub fn new(object: Rc<RefCell<O>>) -> Self {
        let input = Rc::new(RefCell::new(InputState::new()));
        let enabled = Rc::new(Cell::new(true));
        let binder = EventBinder::new(input.clone(), enabled.clone());
        let orientation = OrientationSnapshot::from_orientation(object.borrow().orientation());

        Self {
            object: Some(object),
            surface: None,
            config: ControllerConfig::default(),
            input,
            enabled,
            binder,
            integrator: MotionIntegrator::new(),
            orientation,
        }
    }

    /// Controller bound to `surface`, connected and sized right away
    pub fn with_surface(object: Rc<RefCell<O>>, surface: S) -> Result<Self> {
        let mut controller = Self::new(object);
        controller.surface = Some(surface);
        controller.connect()?;
        controller.handle_resize();
        Ok(controller)
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the input surface, moving live subscriptions over to the new one.
    ///
    /// Returns the previous surface.
    pub fn attach(&mut self, surface: S) -> Result<Option<S>> {
        let was_connected = self.binder.is_connected();
        self.disconnect();
        let previous = self.surface.replace(surface);
        if was_connected {
            self.connect()?;
        }
        self.handle_resize();
        Ok(previous)
    }

    pub fn connect(&mut self) -> Result<()> {
        if self.object.is_none() {
            warn!("connect on a disposed controller");
            return Err(ControlError::Disposed);
        }
        let Some(surface) = self.surface.as_mut() else {
            return Err(ControlError::Surface("no input surface attached".to_string()));
        };
        self.binder.connect(surface)
    }

    /// Remove every subscription; safe to call at any time
    pub fn disconnect(&mut self) {
        match self.surface.as_mut() {
            Some(surface) => self.binder.disconnect(surface),
            None => self.binder.abandon(),
        }
        self.input.borrow_mut().release_all();
    }

    /// Disconnect and release the controlled object
    pub fn dispose(&mut self) {
        self.disconnect();
        if self.object.take().is_some() {
            debug!("controller disposed");
        }
    }

    /// Re-read viewport metrics from the surface
    pub fn handle_resize(&mut self) {
        if let Some(surface) = &self.surface {
            let viewport = surface.viewport();
            debug!(width = viewport.width, height = viewport.height, "viewport resized");
            self.input.borrow_mut().set_viewport(&viewport);
        }
    }

    /// Face `target` and resynchronize the orientation snapshot
    pub fn look_at(&mut self, target: impl Into<LookTarget>) -> Result<&mut Self> {
        let target: LookTarget = target.into();
        let point = target.resolve().map_err(|e| {
            warn!(error = %e, "look_at rejected");
            e
        })?;
        let Some(object) = &self.object else {
            warn!("look_at on a disposed controller");
            return Err(ControlError::Disposed);
        };
        object.borrow_mut().look_at(point);
        self.resync();
        debug!(x = point.x, y = point.y, z = point.z, lat = self.orientation.lat, lon = self.orientation.lon, "look_at");
        Ok(self)
    }

    /// Recompute lat/lon from the object's current orientation
    pub fn resync(&mut self) {
        if let Some(object) = &self.object {
            self.orientation = look_snapshot(object.borrow().orientation(), &self.config);
        }
    }

    /// Advance one frame; a no-op while disabled or after dispose
    pub fn update(&mut self, dt: f32) {
        if !self.enabled.get() {
            return;
        }
        let Some(object) = &self.object else {
            return;
        };

        let (flags, pointer) = {
            let input = self.input.borrow();
            (input.flags(self.config.active_look), input.pointer())
        };

        let mut object = object.borrow_mut();
        self.integrator
            .step(&mut *object, &self.config, &flags, pointer, &mut self.orientation, dt);
        trace!(dt, ?flags, position = ?object.position(), "update");
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn is_connected(&self) -> bool {
        self.binder.is_connected()
    }

    pub fn is_disposed(&self) -> bool {
        self.object.is_none()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ControllerConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: ControllerConfig) {
        self.config = config;
    }

    pub fn set_key_bindings(&mut self, bindings: KeyBindings) {
        self.input.borrow_mut().set_bindings(bindings);
    }

    pub fn orientation_snapshot(&self) -> OrientationSnapshot {
        self.orientation
    }

    pub fn input(&self) -> Ref<'_, InputState> {
        self.input.borrow()
    }

    pub fn integrator(&self) -> &MotionIntegrator {
        &self.integrator
    }

    pub fn object(&self) -> Option<&Rc<RefCell<O>>> {
        self.object.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }
}

impl<O: ControlledObject, S: InputSurface> Drop for TouchController<O, S> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::{InputEvent, ZoneRole};
    use crate::model::{Object3D, Viewport};
    use glam::{Quat, Vec3};

    fn controller() -> (TouchController<Object3D>, Rc<RefCell<Object3D>>) {
        let camera = Rc::new(RefCell::new(Object3D::default()));
        let surface = LocalSurface::new(Viewport::new(640.0, 480.0));
        let ctl = TouchController::with_surface(camera.clone(), surface).unwrap();
        (ctl, camera)
    }

    fn emit(ctl: &TouchController<Object3D>, event: InputEvent) {
        ctl.surface().unwrap().emit(&event);
    }

    #[test]
    fn with_surface_connects_and_sizes() {
        let (ctl, _) = controller();
        assert!(ctl.is_connected());
        assert_eq!(ctl.input().metrics().half_x, 320.0);
        assert_eq!(ctl.input().metrics().half_y, 240.0);
    }

    #[test]
    fn disabled_update_is_noop() {
        let (mut ctl, camera) = controller();
        ctl.config_mut().auto_forward = true;
        emit(&ctl, InputEvent::TouchStart(ZoneRole::PanLeft));
        ctl.set_enabled(false);
        for dt in [0.0, 0.016, 1.0, 10.0] {
            ctl.update(dt);
        }
        let cam = camera.borrow();
        assert_eq!(cam.position, Vec3::ZERO);
        assert_eq!(cam.orientation, Quat::IDENTITY);
    }

    #[test]
    fn connect_without_surface_errors() {
        let camera = Rc::new(RefCell::new(Object3D::default()));
        let mut ctl: TouchController<Object3D> = TouchController::new(camera);
        assert!(matches!(ctl.connect(), Err(ControlError::Surface(_))));
        ctl.disconnect();
        ctl.dispose();
    }

    #[test]
    fn dispose_releases_object() {
        let (mut ctl, camera) = controller();
        assert_eq!(Rc::strong_count(&camera), 2);
        ctl.dispose();
        assert!(ctl.is_disposed());
        assert_eq!(Rc::strong_count(&camera), 1);
        assert_eq!(ctl.surface().unwrap().listener_count(), 0);

        assert!(matches!(ctl.look_at(Vec3::X), Err(ControlError::Disposed)));
        assert!(matches!(ctl.connect(), Err(ControlError::Disposed)));
        ctl.update(1.0);
        ctl.dispose();
    }

    #[test]
    fn look_at_rejects_before_touching_object() {
        let (mut ctl, camera) = controller();
        assert!(ctl.look_at((f32::NAN, 0.0_f32, 0.0_f32)).is_err());
        assert_eq!(camera.borrow().orientation, Quat::IDENTITY);
    }

    #[test]
    fn look_at_chains() {
        let (mut ctl, camera) = controller();
        ctl.look_at(Vec3::new(1.0, 0.0, 0.0)).unwrap().set_enabled(true);
        assert!(camera.borrow().forward().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn attach_moves_subscriptions() {
        let (mut ctl, _) = controller();
        let old = ctl.attach(LocalSurface::new(Viewport::new(100.0, 100.0))).unwrap().unwrap();
        assert_eq!(old.listener_count(), 0);
        assert!(ctl.is_connected());
        assert_eq!(ctl.input().metrics().half_x, 50.0);
    }

    #[test]
    fn disconnect_clears_held_input() {
        let (mut ctl, camera) = controller();
        emit(&ctl, InputEvent::KeyDown("KeyW".into()));
        ctl.disconnect();
        ctl.update(1.0);
        assert_eq!(camera.borrow().position, Vec3::ZERO);
    }
}
