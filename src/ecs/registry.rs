use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};

use crate::error::{EngineError, EngineResult};

use super::entity::{Entity, EntityAllocator};
use super::pool::{ComponentPool, Pool};

/// Owns every component pool and tracks which pools reference each entity.
#[derive(Default)]
pub struct Registry {
    allocator: EntityAllocator,
    pools: HashMap<TypeId, Box<dyn Pool>>,
    entity_types: HashMap<Entity, HashSet<TypeId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            pools: HashMap::new(),
            entity_types: HashMap::new(),
        }
    }

    pub fn create(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entity_types.insert(entity, HashSet::new());
        entity
    }

    fn exists(&self, entity: Entity) -> bool {
        self.entity_types.contains_key(&entity)
    }

    /// Idempotent: destroying an already-destroyed (or never-created)
    /// entity is a no-op.
    pub fn destroy(&mut self, entity: Entity) {
        let Some(types) = self.entity_types.remove(&entity) else {
            return;
        };
        for type_id in types {
            if let Some(pool) = self.pools.get_mut(&type_id) {
                pool.remove(entity);
                if pool.is_empty() {
                    self.pools.remove(&type_id);
                }
            }
        }
        self.allocator.recycle(entity);
    }

    fn pool<T: 'static>(&self) -> Option<&ComponentPool<T>> {
        self.pools
            .get(&TypeId::of::<T>())
            .and_then(|p| p.as_any().downcast_ref::<ComponentPool<T>>())
    }

    fn pool_mut<T: 'static>(&mut self) -> &mut ComponentPool<T> {
        self.pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentPool::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
            .expect("pool type mismatch")
    }

    pub fn add<T: 'static>(&mut self, entity: Entity, value: T) -> EngineResult<()> {
        if !self.exists(entity) {
            return Err(EngineError::EntityDoesNotExist(entity));
        }
        if self.has::<T>(entity) {
            return Err(EngineError::ComponentAlreadyPresent(entity));
        }
        self.pool_mut::<T>().insert(entity, value);
        self.entity_types.get_mut(&entity).unwrap().insert(TypeId::of::<T>());
        Ok(())
    }

    /// No-op if the pool is absent or the entity isn't in it.
    pub fn remove<T: 'static>(&mut self, entity: Entity) {
        let type_id = TypeId::of::<T>();
        if let Some(pool) = self.pools.get_mut(&type_id) {
            if pool.remove(entity) {
                if let Some(types) = self.entity_types.get_mut(&entity) {
                    types.remove(&type_id);
                }
                if pool.is_empty() {
                    self.pools.remove(&type_id);
                }
            }
        }
    }

    pub fn try_get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        self.pool::<T>().and_then(|p| p.get(entity))
    }

    pub fn try_get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        self.pools
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
            .and_then(|p| p.get_mut(entity))
    }

    /// Panics when `entity` lacks `T` — this mirrors a programmer-error
    /// assertion, not a recoverable condition.
    pub fn get<T: 'static>(&self, entity: Entity) -> &T {
        self.try_get::<T>(entity)
            .unwrap_or_else(|| panic!("entity {entity:?} does not have component {}", std::any::type_name::<T>()))
    }

    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> &mut T {
        self.try_get_mut::<T>(entity)
            .unwrap_or_else(|| panic!("entity {entity:?} does not have component {}", std::any::type_name::<T>()))
    }

    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.pool::<T>().map(|p| p.get(entity).is_some()).unwrap_or(false)
    }

    pub fn pool_len<T: 'static>(&self) -> usize {
        self.pool::<T>().map(|p| p.len()).unwrap_or(0)
    }

    pub(super) fn pool_dyn<T: 'static>(&self) -> Option<&ComponentPool<T>> {
        self.pool::<T>()
    }

    pub(super) fn pool_dyn_mut<T: 'static>(&mut self) -> Option<&mut ComponentPool<T>> {
        self.pools
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_fails_for_nonexistent_entity() {
        let mut reg = Registry::new();
        let err = reg.add(Entity(999), 1u32).unwrap_err();
        assert!(matches!(err, EngineError::EntityDoesNotExist(_)));
    }

    #[test]
    fn add_fails_when_component_already_present() {
        let mut reg = Registry::new();
        let e = reg.create();
        reg.add(e, 1u32).unwrap();
        let err = reg.add(e, 2u32).unwrap_err();
        assert!(matches!(err, EngineError::ComponentAlreadyPresent(_)));
    }

    #[test]
    fn destroy_clears_all_pools_and_recycles() {
        let mut reg = Registry::new();
        let e = reg.create();
        reg.add(e, 1u32).unwrap();
        reg.add(e, "hi").unwrap();
        reg.destroy(e);
        assert!(!reg.has::<u32>(e));
        assert!(!reg.has::<&str>(e));

        let e2 = reg.create();
        assert_eq!(e, e2);
        assert!(!reg.has::<u32>(e2));
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut reg = Registry::new();
        let e = reg.create();
        reg.destroy(e);
        reg.destroy(e);
    }

    #[test]
    fn empty_pool_is_dropped() {
        let mut reg = Registry::new();
        let e = reg.create();
        reg.add(e, 1u32).unwrap();
        reg.remove::<u32>(e);
        assert_eq!(reg.pool_len::<u32>(), 0);
    }
}
