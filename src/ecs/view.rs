//! Lazy conjunction filters over the `Registry`'s pools.
//!
//! A view drives iteration from the *smallest* candidate pool and skips
//! entities that lack the other required types. Structural mutation of the
//! view's own component types during iteration is undefined, matching the
//! source contract; mutating unrelated components is fine.

use super::entity::Entity;
use super::registry::Registry;

/// Iterates entities that have every `T` in `Ts`, yielding just the entity.
pub fn e_view<T: 'static>(registry: &Registry) -> impl Iterator<Item = Entity> + '_ {
    registry
        .pool_dyn::<T>()
        .map(|p| p.entities())
        .unwrap_or(&[])
        .iter()
        .copied()
}

/// Two-type entity-only conjunction, driven by whichever pool is smaller.
pub fn e_view2<A: 'static, B: 'static>(registry: &Registry) -> Vec<Entity> {
    let a_len = registry.pool_len::<A>();
    let b_len = registry.pool_len::<B>();
    let (driver, other_has): (&[Entity], &dyn Fn(Entity) -> bool) = if a_len <= b_len {
        (
            registry.pool_dyn::<A>().map(|p| p.entities()).unwrap_or(&[]),
            &|e| registry.has::<B>(e),
        )
    } else {
        (
            registry.pool_dyn::<B>().map(|p| p.entities()).unwrap_or(&[]),
            &|e| registry.has::<A>(e),
        )
    };
    driver.iter().copied().filter(|&e| other_has(e)).collect()
}

/// Three-type entity-only conjunction, driven by whichever of the three
/// pools is smallest.
pub fn e_view3<A: 'static, B: 'static, C: 'static>(registry: &Registry) -> Vec<Entity> {
    let a_len = registry.pool_len::<A>();
    let b_len = registry.pool_len::<B>();
    let c_len = registry.pool_len::<C>();

    if a_len <= b_len && a_len <= c_len {
        registry
            .pool_dyn::<A>()
            .map(|p| p.entities())
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|&e| registry.has::<B>(e) && registry.has::<C>(e))
            .collect()
    } else if b_len <= a_len && b_len <= c_len {
        registry
            .pool_dyn::<B>()
            .map(|p| p.entities())
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|&e| registry.has::<A>(e) && registry.has::<C>(e))
            .collect()
    } else {
        registry
            .pool_dyn::<C>()
            .map(|p| p.entities())
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|&e| registry.has::<A>(e) && registry.has::<B>(e))
            .collect()
    }
}

/// Read-only conjunction over two component types, driven by the smaller
/// pool; yields `(entity, &A, &B)`.
pub fn c_view2<'a, A: 'static, B: 'static>(registry: &'a Registry) -> Vec<(Entity, &'a A, &'a B)> {
    e_view2::<A, B>(registry)
        .into_iter()
        .filter_map(|e| Some((e, registry.try_get::<A>(e)?, registry.try_get::<B>(e)?)))
        .collect()
}

/// Mutable conjunction over two distinct component types. `A` and `B` are
/// always distinct pools stored in distinct heap allocations (the registry
/// never places two component types in one pool), so splitting a shared
/// `&Registry` into two independent mutable borrows here is sound; the
/// pool-level borrow checker can't see that on its own.
pub fn ec_view2_mut<'a, A: 'static, B: 'static>(
    registry: &'a mut Registry,
) -> Vec<(Entity, &'a mut A, &'a mut B)> {
    assert_ne!(
        std::any::TypeId::of::<A>(),
        std::any::TypeId::of::<B>(),
        "ec_view2_mut requires two distinct component types"
    );

    let entities = e_view2::<A, B>(registry);
    let registry_ptr: *mut Registry = registry;

    entities
        .into_iter()
        .filter_map(|e| unsafe {
            let a = (*registry_ptr).pool_dyn_mut::<A>()?.get_mut(e)?;
            let b = (*registry_ptr).pool_dyn_mut::<B>()?.get_mut(e)?;
            Some((e, a, b))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pos(f32);
    struct Vel(f32);
    struct Tag;

    #[test]
    fn e_view_yields_only_entities_with_component() {
        let mut reg = Registry::new();
        let a = reg.create();
        let b = reg.create();
        reg.add(a, Pos(0.0)).unwrap();
        let got: Vec<_> = e_view::<Pos>(&reg).collect();
        assert_eq!(got, vec![a]);
        assert!(!got.contains(&b));
    }

    #[test]
    fn e_view2_is_conjunction_not_union() {
        let mut reg = Registry::new();
        let both = reg.create();
        let pos_only = reg.create();
        reg.add(both, Pos(1.0)).unwrap();
        reg.add(both, Vel(1.0)).unwrap();
        reg.add(pos_only, Pos(2.0)).unwrap();

        let mut got = e_view2::<Pos, Vel>(&reg);
        got.sort_by_key(|e| e.0);
        assert_eq!(got, vec![both]);
    }

    #[test]
    fn e_view3_is_conjunction_driven_by_smallest_pool() {
        let mut reg = Registry::new();
        let all_three = reg.create();
        let pos_vel_only = reg.create();
        reg.add(all_three, Pos(1.0)).unwrap();
        reg.add(all_three, Vel(1.0)).unwrap();
        reg.add(all_three, Tag).unwrap();
        reg.add(pos_vel_only, Pos(2.0)).unwrap();
        reg.add(pos_vel_only, Vel(2.0)).unwrap();

        let mut got = e_view3::<Pos, Vel, Tag>(&reg);
        got.sort_by_key(|e| e.0);
        assert_eq!(got, vec![all_three]);
    }

    #[test]
    fn ec_view2_mut_allows_simultaneous_mutation() {
        let mut reg = Registry::new();
        let e = reg.create();
        reg.add(e, Pos(0.0)).unwrap();
        reg.add(e, Vel(5.0)).unwrap();

        for (_, pos, vel) in ec_view2_mut::<Pos, Vel>(&mut reg) {
            pos.0 += vel.0;
        }

        assert_eq!(reg.try_get::<Pos>(e).unwrap().0, 5.0);
    }

    #[test]
    fn view_skips_entities_missing_one_component() {
        let mut reg = Registry::new();
        let e = reg.create();
        reg.add(e, Pos(0.0)).unwrap();
        reg.add(e, Tag).unwrap();
        let view = c_view2::<Pos, Vel>(&reg);
        assert!(view.is_empty());
    }
}
