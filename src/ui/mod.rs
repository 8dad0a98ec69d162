//! Opaque UI context seam. `GameState::draw_ui` receives an `egui::Context`
//! directly; this module only defines the handful of overlay primitives the
//! core itself needs to surface (e.g. furnace/inventory open requests), not
//! the widget trees themselves — those stay with whichever state owns the
//! screen (REDESIGN FLAGS: prefer explicit ownership over a UI singleton).

use crate::ecs::Entity;

/// Raised by the interaction pipeline when a block entity should be shown;
/// a state's `draw_ui` consumes these to decide which panel to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOpenRequest {
    pub player: Entity,
    pub block_entity: Entity,
}

pub type Context = egui::Context;
