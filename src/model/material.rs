use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;

/// Name of the scalar uniform every animated shader reads.
pub const TIME_UNIFORM: &str = "time";

/// Shared handle to a material. Scene code owns the strong references.
pub type MaterialRef = Rc<RefCell<ShaderMaterial>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
    Color([f32; 4]),
}

/// A material as seen by the animation layer: a label plus an optional
/// uniform table. Standard (non-shader) materials carry no table at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderMaterial {
    pub label: String,
    pub uniforms: Option<HashMap<String, UniformValue>>,
}

impl ShaderMaterial {
    pub fn shader<'a>(
        label: impl Into<String>,
        uniforms: impl IntoIterator<Item = (&'a str, UniformValue)>,
    ) -> Self {
        Self {
            label: label.into(),
            uniforms: Some(
                uniforms
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
            ),
        }
    }

    /// Shader material with only a `time` uniform, starting at zero.
    pub fn animated(label: impl Into<String>) -> Self {
        Self::shader(label, [(TIME_UNIFORM, UniformValue::Float(0.0))])
    }

    pub fn standard(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            uniforms: None,
        }
    }

    pub fn into_shared(self) -> MaterialRef {
        Rc::new(RefCell::new(self))
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.as_ref()?.get(name)
    }

    pub fn time(&self) -> Option<f32> {
        match self.uniform(TIME_UNIFORM)? {
            UniformValue::Float(t) => Some(*t),
            _ => None,
        }
    }

    /// Mutable access to the scalar time uniform, if this material has one.
    pub fn time_slot_mut(&mut self) -> Option<&mut f32> {
        match self.uniforms.as_mut()?.get_mut(TIME_UNIFORM)? {
            UniformValue::Float(t) => Some(t),
            _ => None,
        }
    }
}
