use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::controller::broadcaster::UniformBroadcaster;
use crate::controller::navigation::NavigationController;
use crate::model::Scene;

/// Per-frame update shared by the browser and native shells.
///
/// The platform owns the actual loop; it calls `update` once per frame and
/// draws afterwards.
pub struct FrameLoopContext {
    pub navigation: Rc<RefCell<NavigationController>>,
    pub broadcaster: UniformBroadcaster,
    pub scene: Scene,
    frames: u64,
}

impl FrameLoopContext {
    pub fn new(navigation: Rc<RefCell<NavigationController>>, scene: Scene) -> Self {
        let mut broadcaster = UniformBroadcaster::new();
        broadcaster.register(&scene.animatables());
        info!(materials = broadcaster.len(), "frame loop ready");

        Self {
            navigation,
            broadcaster,
            scene,
            frames: 0,
        }
    }

    /// Move the camera, then push `time_seconds` into every animated material.
    pub fn update(&mut self, time_seconds: f32) -> usize {
        self.navigation.borrow_mut().apply_movement();
        let written = self.broadcaster.broadcast(time_seconds);

        self.frames += 1;
        if self.frames % 600 == 0 {
            let pos = self.navigation.borrow().camera().position;
            debug!(frames = self.frames, time_seconds, ?pos, "frame");
        }
        written
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::Control;
    use crate::model::Camera;
    use glam::Vec3;

    fn context() -> FrameLoopContext {
        let nav = Rc::new(RefCell::new(NavigationController::new(Camera::new(800, 600))));
        FrameLoopContext::new(nav, Scene::new())
    }

    #[test]
    fn test_update_moves_then_broadcasts() {
        let mut ctx = context();
        ctx.navigation.borrow_mut().on_key_down(Control::Backward);

        assert_eq!(ctx.update(0.5), 1);
        assert_eq!(ctx.update(1.25), 1);

        assert_eq!(ctx.scene.sky_time(), 1.25);
        assert_eq!(ctx.frames(), 2);
        let pos = ctx.navigation.borrow().camera().position;
        assert!((pos - Vec3::new(0.0, 10.0, 41.0)).length() < 1e-5);
    }

    #[test]
    fn test_sky_time_starts_at_zero() {
        let ctx = context();
        assert_eq!(ctx.scene.sky_time(), 0.0);
        assert_eq!(ctx.broadcaster.len(), 1);
    }
}
