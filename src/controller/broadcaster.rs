use std::rc::{Rc, Weak};
use std::cell::RefCell;

use tracing::debug;

use crate::model::{MaterialRef, ShaderMaterial};

/// Something in the scene that may carry animated materials
#[derive(Debug, Clone)]
pub enum Animatable {
    /// The candidate is itself a material
    Direct(MaterialRef),
    /// Carries one named material slot, which may be empty
    Single(Option<MaterialRef>),
    /// Carries an ordered list of materials
    Many(Vec<MaterialRef>),
}

/// Pushes the frame time into every registered material's `time` uniform.
///
/// Holds weak references only: materials belong to whoever built the scene,
/// and a disposed one simply stops receiving updates.
#[derive(Default)]
pub struct UniformBroadcaster {
    materials: Vec<Weak<RefCell<ShaderMaterial>>>,
}

impl UniformBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry with the materials extracted from `sources`.
    ///
    /// Single materials come first in source order, followed by every list
    /// flattened in source order. Empty slots are dropped.
    pub fn register(&mut self, sources: &[Animatable]) {
        let singles = sources.iter().filter_map(|source| match source {
            Animatable::Direct(material) => Some(material),
            Animatable::Single(slot) => slot.as_ref(),
            Animatable::Many(_) => None,
        });
        let lists = sources.iter().flat_map(|source| match source {
            Animatable::Many(materials) => materials.as_slice(),
            _ => &[][..],
        });

        self.materials = singles.chain(lists).map(Rc::downgrade).collect();
        debug!(count = self.materials.len(), "registered animated materials");
    }

    /// Write `time_seconds` into every live material with a time slot.
    /// Returns how many were written.
    pub fn broadcast(&self, time_seconds: f32) -> usize {
        let mut written = 0;
        for weak in &self.materials {
            let Some(material) = weak.upgrade() else { continue };
            let Ok(mut material) = material.try_borrow_mut() else { continue };
            if let Some(slot) = material.time_slot_mut() {
                *slot = time_seconds;
                written += 1;
            }
        }
        written
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Live registered materials in registry order.
    pub fn materials(&self) -> impl Iterator<Item = MaterialRef> + '_ {
        self.materials.iter().filter_map(Weak::upgrade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UniformValue;

    fn animated(label: &str) -> MaterialRef {
        ShaderMaterial::animated(label).into_shared()
    }

    fn labels(broadcaster: &UniformBroadcaster) -> Vec<String> {
        broadcaster
            .materials()
            .map(|m| m.borrow().label.clone())
            .collect()
    }

    #[test]
    fn test_register_flattens_in_rule_order() {
        let artifact = animated("artifact");
        let stars: Vec<_> = (0..3).map(|i| animated(&format!("star{i}"))).collect();

        let mut broadcaster = UniformBroadcaster::new();
        broadcaster.register(&[
            Animatable::Direct(artifact.clone()),
            Animatable::Many(stars.clone()),
            Animatable::Single(None),
        ]);

        assert_eq!(broadcaster.len(), 4);
        assert_eq!(labels(&broadcaster), ["artifact", "star0", "star1", "star2"]);
    }

    #[test]
    fn test_singles_precede_lists() {
        let stars = vec![animated("star")];
        let text = animated("title");
        let pyramid = animated("pyramid");

        let mut broadcaster = UniformBroadcaster::new();
        broadcaster.register(&[
            Animatable::Many(stars.clone()),
            Animatable::Single(Some(text.clone())),
            Animatable::Direct(pyramid.clone()),
        ]);
        assert_eq!(labels(&broadcaster), ["title", "pyramid", "star"]);
    }

    #[test]
    fn test_register_replaces_previous_set() {
        let first = animated("first");
        let second = animated("second");
        let mut broadcaster = UniformBroadcaster::new();
        broadcaster.register(&[Animatable::Direct(first.clone())]);
        broadcaster.register(&[Animatable::Direct(second.clone())]);
        assert_eq!(labels(&broadcaster), ["second"]);

        broadcaster.register(&[]);
        assert!(broadcaster.is_empty());
    }

    #[test]
    fn test_broadcast_skips_materials_without_time() {
        let valid: Vec<_> = (0..3).map(|i| animated(&format!("shader{i}"))).collect();
        let standard = ShaderMaterial::standard("floor").into_shared();
        let tinted = ShaderMaterial::shader(
            "frame",
            [("color", UniformValue::Color([0.4, 0.3, 0.2, 1.0]))],
        )
        .into_shared();
        let standard_before = standard.borrow().clone();
        let tinted_before = tinted.borrow().clone();

        let mut broadcaster = UniformBroadcaster::new();
        broadcaster.register(&[
            Animatable::Direct(valid[0].clone()),
            Animatable::Direct(standard.clone()),
            Animatable::Many(vec![valid[1].clone(), tinted.clone(), valid[2].clone()]),
        ]);
        assert_eq!(broadcaster.len(), 5);

        assert_eq!(broadcaster.broadcast(1.5), 3);
        for material in &valid {
            assert_eq!(material.borrow().time(), Some(1.5));
        }
        assert_eq!(*standard.borrow(), standard_before);
        assert_eq!(*tinted.borrow(), tinted_before);
    }

    #[test]
    fn test_broadcast_is_repeatable() {
        let sky = animated("sky");
        let mut broadcaster = UniformBroadcaster::new();
        broadcaster.register(&[Animatable::Single(Some(sky.clone()))]);

        broadcaster.broadcast(0.25);
        broadcaster.broadcast(0.25);
        assert_eq!(sky.borrow().time(), Some(0.25));
        broadcaster.broadcast(3.0);
        assert_eq!(sky.borrow().time(), Some(3.0));
    }

    #[test]
    fn test_disposed_and_busy_materials_are_skipped() {
        let kept = animated("kept");
        let disposed = animated("disposed");
        let busy = animated("busy");

        let mut broadcaster = UniformBroadcaster::new();
        broadcaster.register(&[
            Animatable::Direct(kept.clone()),
            Animatable::Direct(disposed.clone()),
            Animatable::Direct(busy.clone()),
        ]);
        drop(disposed);

        let guard = busy.borrow_mut();
        assert_eq!(broadcaster.broadcast(7.0), 1);
        drop(guard);

        assert_eq!(kept.borrow().time(), Some(7.0));
        assert_eq!(busy.borrow().time(), Some(0.0));
        assert_eq!(broadcaster.materials().count(), 2);
    }
}
