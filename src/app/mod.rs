//! Application entry point: wires the window (collaborator), fixed-step
//! clock, registry, state stack, and UI context into the per-frame
//! sequence every frame runs through.

pub mod play_state;

pub use play_state::PlayState;

use std::time::Duration;

use crate::state::{GameContext, StateStack};
use crate::time::FixedTimeStep;

/// Owns the clock and state stack; everything else (registry, level,
/// config, event bus) lives in `GameContext` so states and the systems they
/// run see one consistent set of borrows.
pub struct Application {
    pub ctx: GameContext,
    pub states: StateStack,
    clock: FixedTimeStep,
    max_frame_dt: Duration,
}

impl Application {
    pub fn new(ctx: GameContext, tick_rate: f32, max_frame_dt: Duration) -> Self {
        Self { ctx, states: StateStack::new(), clock: FixedTimeStep::new(tick_rate), max_frame_dt }
    }

    /// Runs exactly one iteration of the per-frame sequence. Step 8 (present/exit) is left to the caller, which owns
    /// the window event loop; `is_finished()` reports whether the stack has
    /// emptied. `advance`'s own wall-clock reading (not a caller-supplied
    /// delta) drives timing — only the clamp ceiling is configurable.
    pub fn run_frame(&mut self, ui: &egui::Context) {
        let dt = self.clock.advance(self.max_frame_dt);

        self.ctx.events.drain_deferred();

        if let Some(top) = self.states.top() {
            top.update(&mut self.ctx, dt);
        }

        while self.clock.try_advance_tick() {
            if let Some(top) = self.states.top() {
                top.fixed_update(&mut self.ctx, &self.clock);
            } else {
                break;
            }
        }

        if let Some(top) = self.states.top() {
            top.render(&mut self.ctx);
            top.draw_ui(&mut self.ctx, ui);
        }

        self.states.process_pending_changes(&mut self.ctx);
    }

    pub fn is_finished(&self) -> bool {
        self.states.is_empty()
    }
}
