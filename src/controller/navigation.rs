use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};
use tracing::trace;

use crate::controller::input::{Control, InputEvent, KeyBindings, KeyState, MouseDragState};
use crate::model::Camera;

/// Pitch and yaw tracked by the controller. The camera rotation is derived
/// from these, never the other way round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrientation {
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for CameraOrientation {
    fn default() -> Self {
        Self {
            pitch: PI / 10.0,
            yaw: 0.0,
        }
    }
}

/// First-person navigation: WASD/EQ movement and drag-to-look.
///
/// Exclusively owns the camera. Movement is a fixed step per
/// `apply_movement` call, so walking speed follows the frame rate.
pub struct NavigationController {
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub bindings: KeyBindings,
    camera: Camera,
    keys: KeyState,
    drag: MouseDragState,
    orientation: CameraOrientation,
}

impl NavigationController {
    /// The camera keeps its own rotation until the first drag, even though
    /// the tracked pitch starts at π/10.
    pub fn new(camera: Camera) -> Self {
        Self {
            move_speed: 0.5,
            look_sensitivity: 1.0,
            bindings: KeyBindings::default(),
            camera,
            keys: KeyState::new(),
            drag: MouseDragState::default(),
            orientation: CameraOrientation::default(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn orientation(&self) -> CameraOrientation {
        self.orientation
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn on_key_down(&mut self, control: Control) {
        self.keys.set(control, true);
    }

    pub fn on_key_up(&mut self, control: Control) {
        self.keys.set(control, false);
    }

    /// Route a raw key code through the bindings; unbound codes do nothing.
    pub fn handle_key(&mut self, code: u32, pressed: bool) {
        if let Some(control) = self.bindings.control_for(code) {
            trace!(?control, pressed, "key");
            self.keys.set(control, pressed);
        }
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(code) => self.handle_key(code, true),
            InputEvent::KeyUp(code) => self.handle_key(code, false),
            InputEvent::PointerMove { x, y, primary_pressed } => {
                self.on_pointer_move(x, y, primary_pressed)
            }
            InputEvent::Resized { width, height } => self.resize(width, height),
        }
    }

    /// Without the primary button this only records the position, so the
    /// first dragged move measures from here and the view never jumps.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, primary_pressed: bool) {
        let pos = Vec2::new(x, y);
        if !primary_pressed {
            self.drag.last = pos;
            return;
        }

        let delta = (pos - self.drag.last) * self.look_sensitivity;
        self.drag.last = pos;

        self.orientation.yaw -= delta.x;
        self.orientation.pitch = (self.orientation.pitch - delta.y).clamp(-FRAC_PI_2, FRAC_PI_2);

        // Yaw about world up first, then pitch about the turned right axis
        self.camera.reset_rotation();
        self.camera.rotate_on_axis(Vec3::Y, self.orientation.yaw);
        self.camera.rotate_on_axis(Vec3::X, self.orientation.pitch);
        trace!(yaw = self.orientation.yaw, pitch = self.orientation.pitch, "look");
    }

    /// Move the camera one step along every held control, in its local frame.
    pub fn apply_movement(&mut self) {
        let speed = self.move_speed;
        let mut local = Vec3::ZERO;

        if self.keys.forward {
            local.z -= speed;
        }
        if self.keys.backward {
            local.z += speed;
        }
        if self.keys.left {
            local.x -= speed;
        }
        if self.keys.right {
            local.x += speed;
        }
        if self.keys.up {
            local.y += speed;
        }
        if self.keys.down {
            local.y -= speed;
        }

        self.camera.position += self.camera.local_to_world(local);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.set_aspect(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::key_codes;
    use glam::Quat;

    const EPS: f32 = 1e-6;
    // Positions near 40 units only carry ~4e-6 of f32 resolution
    const POS_EPS: f32 = 1e-5;

    fn controller() -> NavigationController {
        NavigationController::new(Camera::new(800, 600))
    }

    fn assert_vec_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).abs().max_element() < POS_EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_press_release_symmetry() {
        let mut nav = controller();
        for control in Control::ALL {
            nav.on_key_down(control);
            nav.on_key_down(control);
            assert!(nav.keys().is_held(control));
            nav.on_key_up(control);
            assert!(!nav.keys().is_held(control));
        }
        assert_eq!(*nav.keys(), KeyState::default());
    }

    #[test]
    fn test_pressing_one_control_leaves_others() {
        let mut nav = controller();
        nav.on_key_down(Control::Up);
        nav.on_key_down(Control::Left);
        nav.on_key_up(Control::Up);
        assert!(nav.keys().left);
        assert!(!nav.keys().up);
        assert!(!nav.keys().forward);
    }

    #[test]
    fn test_unbound_key_codes_are_ignored() {
        let mut nav = controller();
        nav.handle_key(13, true);
        nav.handle_key(999, true);
        assert_eq!(*nav.keys(), KeyState::default());

        nav.process_event(&InputEvent::KeyDown(key_codes::E));
        assert!(nav.keys().up);
        nav.process_event(&InputEvent::KeyUp(key_codes::E));
        assert!(!nav.keys().up);
    }

    #[test]
    fn test_drag_start_measures_from_last_hover() {
        let mut nav = controller();
        nav.on_pointer_move(-0.8, 0.6, false); // P0
        nav.on_pointer_move(0.1, 0.2, false); // P1
        nav.on_pointer_move(0.3, 0.1, true); // P2

        let o = nav.orientation();
        assert!((o.yaw - -(0.3 - 0.1)).abs() < EPS);
        assert!((o.pitch - (PI / 10.0 - (0.1 - 0.2))).abs() < EPS);
    }

    #[test]
    fn test_hover_does_not_rotate() {
        let mut nav = controller();
        nav.on_pointer_move(0.5, 0.5, false);
        nav.on_pointer_move(-0.5, -0.5, false);
        assert_eq!(nav.orientation(), CameraOrientation::default());
        assert_eq!(nav.camera().rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_pitch_clamps_at_bound_and_recovers() {
        let mut nav = controller();
        nav.on_pointer_move(0.0, 1.0, false);
        nav.on_pointer_move(0.0, -1.0, true);
        assert_eq!(nav.orientation().pitch, FRAC_PI_2);
        nav.on_pointer_move(0.0, -3.0, true);
        assert_eq!(nav.orientation().pitch, FRAC_PI_2);

        nav.on_pointer_move(0.0, -2.5, true);
        assert!((nav.orientation().pitch - (FRAC_PI_2 - 0.5)).abs() < EPS);

        nav.on_pointer_move(0.0, 10.0, true);
        assert_eq!(nav.orientation().pitch, -FRAC_PI_2);
    }

    #[test]
    fn test_rotation_is_yaw_then_pitch() {
        let mut nav = controller();
        nav.on_pointer_move(0.0, 0.0, false);
        nav.on_pointer_move(-0.7, -0.4, true);

        let o = nav.orientation();
        let expected = Quat::from_rotation_y(o.yaw) * Quat::from_rotation_x(o.pitch);
        let swapped = Quat::from_rotation_x(o.pitch) * Quat::from_rotation_y(o.yaw);
        assert!(nav.camera().rotation.abs_diff_eq(expected, 1e-5));
        assert!(!nav.camera().rotation.abs_diff_eq(swapped, 1e-3));
    }

    #[test]
    fn test_opposite_controls_cancel() {
        for (a, b) in [
            (Control::Forward, Control::Backward),
            (Control::Left, Control::Right),
            (Control::Up, Control::Down),
        ] {
            let mut nav = controller();
            nav.on_pointer_move(0.0, 0.0, false);
            nav.on_pointer_move(0.4, 0.3, true);
            let start = nav.camera().position;
            nav.on_key_down(a);
            nav.on_key_down(b);
            nav.apply_movement();
            assert_vec_close(nav.camera().position, start);
        }
    }

    #[test]
    fn test_forward_step_before_first_drag() {
        let mut nav = controller();
        nav.on_key_down(Control::Forward);
        nav.apply_movement();
        assert_vec_close(nav.camera().position, Vec3::new(0.0, 10.0, 39.5));
    }

    #[test]
    fn test_forward_step_follows_tracked_pitch() {
        let mut nav = controller();
        // A zero-length drag applies the tracked yaw=0, pitch=π/10
        nav.on_pointer_move(0.0, 0.0, false);
        nav.on_pointer_move(0.0, 0.0, true);

        nav.on_key_down(Control::Forward);
        nav.apply_movement();
        let pitch = PI / 10.0;
        assert_vec_close(
            nav.camera().position,
            Vec3::new(0.0, 10.0 + 0.5 * pitch.sin(), 40.0 - 0.5 * pitch.cos()),
        );
    }

    #[test]
    fn test_no_keys_no_motion() {
        let mut nav = controller();
        nav.apply_movement();
        assert_eq!(nav.camera().position, Vec3::new(0.0, 10.0, 40.0));
    }

    #[test]
    fn test_resize_updates_aspect_and_ignores_zero() {
        let mut nav = controller();
        nav.process_event(&InputEvent::Resized { width: 1920, height: 1080 });
        assert!((nav.camera().aspect - 1920.0 / 1080.0).abs() < EPS);
        nav.resize(0, 600);
        assert!((nav.camera().aspect - 1920.0 / 1080.0).abs() < EPS);
    }
}
