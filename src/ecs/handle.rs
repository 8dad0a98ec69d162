//! Single-owner RAII wrapper around an `Entity`. Dropping the handle destroys the entity; anything that
//! just wants to reference it without owning its lifetime holds the raw
//! `Entity` value instead.

use std::cell::RefCell;
use std::rc::Rc;

use super::entity::Entity;
use super::registry::Registry;

pub struct EntityHandle {
    entity: Entity,
    registry: Rc<RefCell<Registry>>,
}

impl EntityHandle {
    pub fn new(registry: Rc<RefCell<Registry>>) -> Self {
        let entity = registry.borrow_mut().create();
        Self { entity, registry }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl Drop for EntityHandle {
    fn drop(&mut self) {
        self.registry.borrow_mut().destroy(self.entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_destroys_the_entity() {
        let registry = Rc::new(RefCell::new(Registry::new()));
        let entity;
        {
            let handle = EntityHandle::new(Rc::clone(&registry));
            entity = handle.entity();
            registry.borrow_mut().add(entity, 1u32).unwrap();
            assert!(registry.borrow().has::<u32>(entity));
        }
        assert!(!registry.borrow().has::<u32>(entity));
    }
}
