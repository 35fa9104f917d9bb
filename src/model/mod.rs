// MODEL: Camera, materials, and scene state
pub mod camera;
pub mod material;
pub mod scene;

pub use camera::Camera;
pub use material::{MaterialRef, ShaderMaterial, UniformValue, TIME_UNIFORM};
pub use scene::Scene;
