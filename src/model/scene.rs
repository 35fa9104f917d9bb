use crate::controller::Animatable;
use crate::model::material::{MaterialRef, ShaderMaterial};

/// Owns the materials the museum scene creates at startup.
///
/// Geometry and layout live with the renderer; the scene only keeps the
/// strong references so the broadcaster's weak ones stay alive.
pub struct Scene {
    pub sky: MaterialRef,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            sky: ShaderMaterial::animated("skybox").into_shared(),
        }
    }

    /// Everything in the scene that wants the per-frame time value.
    pub fn animatables(&self) -> Vec<Animatable> {
        vec![Animatable::Single(Some(self.sky.clone()))]
    }

    /// Current sky time; zero until the first broadcast.
    pub fn sky_time(&self) -> f32 {
        self.sky
            .try_borrow()
            .ok()
            .and_then(|m| m.time())
            .unwrap_or(0.0)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
