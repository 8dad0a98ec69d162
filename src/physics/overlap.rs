//! Naive O(n^2) broadphase over `{CTransform, CPhysics}` entities,
//! producing Enter/Stay/Exit pair events between successive collections.

use std::collections::HashSet;

use crate::ecs::{CPhysics, CTransform, Entity, Registry};

use super::aabb::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(pub Entity, pub Entity);

impl PairKey {
    fn canonical(a: Entity, b: Entity) -> Self {
        if a.0 <= b.0 {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapEvent {
    Enter(PairKey),
    Stay(PairKey),
    Exit(PairKey),
}

/// Tracks the previous collection so transitions can be derived; consumers
/// must finish reading one batch of events before the next call.
#[derive(Default)]
pub struct OverlapTracker {
    previous: HashSet<PairKey>,
}

impl OverlapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, registry: &Registry) -> Vec<OverlapEvent> {
        let entities: Vec<Entity> = crate::ecs::e_view2::<CTransform, CPhysics>(registry);

        let mut current = HashSet::new();
        for i in 0..entities.len() {
            for j in (i + 1)..entities.len() {
                let a = entities[i];
                let b = entities[j];
                if boxes_overlap(registry, a, b) {
                    current.insert(PairKey::canonical(a, b));
                }
            }
        }

        let mut events = Vec::new();
        for key in &current {
            if self.previous.contains(key) {
                events.push(OverlapEvent::Stay(*key));
            } else {
                events.push(OverlapEvent::Enter(*key));
            }
        }
        for key in &self.previous {
            if !current.contains(key) {
                events.push(OverlapEvent::Exit(*key));
            }
        }

        self.previous = current;
        events
    }
}

fn boxes_overlap(registry: &Registry, a: Entity, b: Entity) -> bool {
    let (ta, pa) = (registry.get::<CTransform>(a), registry.get::<CPhysics>(a));
    let (tb, pb) = (registry.get::<CTransform>(b), registry.get::<CPhysics>(b));
    let box_a = Aabb::from_local(ta.position, pa.bb_min, pa.bb_max);
    let box_b = Aabb::from_local(tb.position, pb.bb_min, pb.bb_max);
    box_a.overlaps(&box_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn spawn(registry: &mut Registry, position: Vec3) -> Entity {
        let e = registry.create();
        registry.add(e, CTransform { position, ..Default::default() }).unwrap();
        registry.add(e, CPhysics::new(Vec3::splat(-0.5), Vec3::splat(0.5))).unwrap();
        e
    }

    #[test]
    fn enter_then_stay_then_exit() {
        let mut registry = Registry::new();
        let a = spawn(&mut registry, Vec3::ZERO);
        let b = spawn(&mut registry, Vec3::new(0.2, 0.0, 0.0));

        let mut tracker = OverlapTracker::new();
        let first = tracker.collect(&registry);
        assert_eq!(first, vec![OverlapEvent::Enter(PairKey::canonical(a, b))]);

        let second = tracker.collect(&registry);
        assert_eq!(second, vec![OverlapEvent::Stay(PairKey::canonical(a, b))]);

        registry.get_mut::<CTransform>(b).position = Vec3::new(10.0, 0.0, 0.0);
        let third = tracker.collect(&registry);
        assert_eq!(third, vec![OverlapEvent::Exit(PairKey::canonical(a, b))]);
    }
}
