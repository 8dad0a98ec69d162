//! Dense-storage entity/component registry and the views that iterate it.

pub mod components;
pub mod entity;
pub mod handle;
pub mod pool;
pub mod registry;
pub mod view;

pub use components::*;
pub use entity::{Entity, EntityAllocator};
pub use handle::EntityHandle;
pub use registry::Registry;
pub use view::{c_view2, e_view, e_view2, e_view3, ec_view2_mut};
