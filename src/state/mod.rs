//! Game state stack. States are pushed/popped/switched via
//! queued intents so a state can safely request its own replacement mid
//! `Update` without invalidating the borrow currently iterating the stack.

use std::time::Duration;

use crate::config::Config;
use crate::ecs::Registry;
use crate::events::EventBus;
use crate::time::FixedTimeStep;
use crate::world::Level;

/// Everything a state needs that is not its own private fields. Threaded in
/// by `Application` rather than reached for through a global singleton
/// (REDESIGN FLAGS: "Global singletons").
pub struct GameContext {
    pub registry: Registry,
    pub level: Level,
    pub config: Config,
    pub events: EventBus,
}

/// Lifecycle + per-frame hooks a state implements. Only the top of the
/// stack ever receives these calls.
pub trait GameState {
    fn on_enter(&mut self, ctx: &mut GameContext) {
        let _ = ctx;
    }
    fn on_exit(&mut self, ctx: &mut GameContext) {
        let _ = ctx;
    }
    fn on_pause(&mut self, ctx: &mut GameContext) {
        let _ = ctx;
    }
    fn on_resume(&mut self, ctx: &mut GameContext) {
        let _ = ctx;
    }

    fn update(&mut self, ctx: &mut GameContext, dt: Duration) {
        let (_, _) = (ctx, dt);
    }

    /// `clock` carries the tick interval plus the running tick count
    /// systems need for grace-window bookkeeping (e.g. mining progress
    /// decay) beyond a bare tick duration.
    fn fixed_update(&mut self, ctx: &mut GameContext, clock: &FixedTimeStep) {
        let (_, _) = (ctx, clock);
    }
    fn render(&mut self, ctx: &mut GameContext) {
        let _ = ctx;
    }
    fn draw_ui(&mut self, ctx: &mut GameContext, ui: &egui::Context) {
        let (_, _) = (ctx, ui);
    }
}

enum PendingChange {
    Push(Box<dyn GameState>),
    Pop,
    Clear,
}

/// Owns the live stack of states plus the intents queued against it this
/// frame. `Switch<T>` is represented as `Pop` followed by `Push` queued in
/// that order.
#[derive(Default)]
pub struct StateStack {
    states: Vec<Box<dyn GameState>>,
    pending: Vec<PendingChange>,
}

impl StateStack {
    pub fn new() -> Self {
        Self { states: Vec::new(), pending: Vec::new() }
    }

    pub fn push(&mut self, state: Box<dyn GameState>) {
        self.pending.push(PendingChange::Push(state));
    }

    pub fn pop(&mut self) {
        self.pending.push(PendingChange::Pop);
    }

    pub fn switch(&mut self, state: Box<dyn GameState>) {
        self.pending.push(PendingChange::Pop);
        self.pending.push(PendingChange::Push(state));
    }

    pub fn clear(&mut self) {
        self.pending.push(PendingChange::Clear);
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn top(&mut self) -> Option<&mut Box<dyn GameState>> {
        self.states.last_mut()
    }

    /// Drains queued intents in FIFO order, applying `OnEnter`/`OnExit`/
    /// `OnPause`/`OnResume` as each one lands. Called once per frame, after
    /// `DrawUI`.
    pub fn process_pending_changes(&mut self, ctx: &mut GameContext) {
        let changes: Vec<PendingChange> = self.pending.drain(..).collect();
        for change in changes {
            match change {
                PendingChange::Push(mut state) => {
                    if let Some(current) = self.states.last_mut() {
                        current.on_pause(ctx);
                    }
                    state.on_enter(ctx);
                    self.states.push(state);
                }
                PendingChange::Pop => {
                    if let Some(mut state) = self.states.pop() {
                        state.on_exit(ctx);
                    }
                    if let Some(resumed) = self.states.last_mut() {
                        resumed.on_resume(ctx);
                    }
                }
                PendingChange::Clear => {
                    while let Some(mut state) = self.states.pop() {
                        state.on_exit(ctx);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum Event {
        Enter(u32),
        Exit(u32),
        Pause(u32),
        Resume(u32),
    }

    struct Recording {
        id: u32,
        log: Rc<RefCell<Vec<Event>>>,
    }

    impl GameState for Recording {
        fn on_enter(&mut self, _ctx: &mut GameContext) {
            self.log.borrow_mut().push(Event::Enter(self.id));
        }
        fn on_exit(&mut self, _ctx: &mut GameContext) {
            self.log.borrow_mut().push(Event::Exit(self.id));
        }
        fn on_pause(&mut self, _ctx: &mut GameContext) {
            self.log.borrow_mut().push(Event::Pause(self.id));
        }
        fn on_resume(&mut self, _ctx: &mut GameContext) {
            self.log.borrow_mut().push(Event::Resume(self.id));
        }
    }

    fn test_ctx() -> (GameContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = GameContext {
            registry: Registry::new(),
            level: Level::open(
                dir.path(),
                &crate::config::EngineConfig::default(),
                &crate::config::WorldGenConfig::default(),
                &crate::config::ChunkSysConfig { background_generation: false, ..Default::default() },
            ),
            config: Config::default(),
            events: EventBus::new(),
        };
        (ctx, dir)
    }

    #[test]
    fn push_calls_on_enter_and_pauses_previous_top() {
        let (mut ctx, _dir) = test_ctx();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = StateStack::new();

        stack.push(Box::new(Recording { id: 1, log: Rc::clone(&log) }));
        stack.process_pending_changes(&mut ctx);
        stack.push(Box::new(Recording { id: 2, log: Rc::clone(&log) }));
        stack.process_pending_changes(&mut ctx);

        assert_eq!(*log.borrow(), vec![Event::Enter(1), Event::Pause(1), Event::Enter(2)]);
    }

    #[test]
    fn pop_calls_on_exit_then_resumes_new_top() {
        let (mut ctx, _dir) = test_ctx();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = StateStack::new();

        stack.push(Box::new(Recording { id: 1, log: Rc::clone(&log) }));
        stack.push(Box::new(Recording { id: 2, log: Rc::clone(&log) }));
        stack.process_pending_changes(&mut ctx);
        log.borrow_mut().clear();

        stack.pop();
        stack.process_pending_changes(&mut ctx);

        assert_eq!(*log.borrow(), vec![Event::Exit(2), Event::Resume(1)]);
    }

    #[test]
    fn clear_pops_everything_with_on_exit_and_no_resume() {
        let (mut ctx, _dir) = test_ctx();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = StateStack::new();

        stack.push(Box::new(Recording { id: 1, log: Rc::clone(&log) }));
        stack.push(Box::new(Recording { id: 2, log: Rc::clone(&log) }));
        stack.process_pending_changes(&mut ctx);
        log.borrow_mut().clear();

        stack.clear();
        stack.process_pending_changes(&mut ctx);

        assert_eq!(*log.borrow(), vec![Event::Exit(2), Event::Exit(1)]);
        assert!(stack.is_empty());
    }

    #[test]
    fn switch_is_pop_then_push_in_queued_order() {
        let (mut ctx, _dir) = test_ctx();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = StateStack::new();

        stack.push(Box::new(Recording { id: 1, log: Rc::clone(&log) }));
        stack.process_pending_changes(&mut ctx);
        log.borrow_mut().clear();

        stack.switch(Box::new(Recording { id: 2, log: Rc::clone(&log) }));
        stack.process_pending_changes(&mut ctx);

        assert_eq!(*log.borrow(), vec![Event::Exit(1), Event::Enter(2)]);
    }
}
