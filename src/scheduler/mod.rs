//! Phase-ordered system scheduler. Systems declare a single
//! phase; the scheduler keeps them in a stably-sorted vector so intra-phase
//! order always matches insertion order.

use bitflags::bitflags;

use crate::ecs::Registry;
use crate::time::FixedTimeStep;
use crate::world::Level;

/// Strict execution order; `Input` always runs before `Intent`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Input,
    Intent,
    Simulation,
    LateSimulation,
    Presentation,
}

impl Phase {
    const ALL: [Phase; 5] = [
        Phase::Input,
        Phase::Intent,
        Phase::Simulation,
        Phase::LateSimulation,
        Phase::Presentation,
    ];

    fn bit(self) -> EnabledPhases {
        match self {
            Phase::Input => EnabledPhases::INPUT,
            Phase::Intent => EnabledPhases::INTENT,
            Phase::Simulation => EnabledPhases::SIMULATION,
            Phase::LateSimulation => EnabledPhases::LATE_SIMULATION,
            Phase::Presentation => EnabledPhases::PRESENTATION,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EnabledPhases: u8 {
        const INPUT = 1 << 0;
        const INTENT = 1 << 1;
        const SIMULATION = 1 << 2;
        const LATE_SIMULATION = 1 << 3;
        const PRESENTATION = 1 << 4;
    }
}

impl Default for EnabledPhases {
    fn default() -> Self {
        EnabledPhases::all()
    }
}

/// Per-tick/per-frame context threaded into every system invocation.
pub struct SystemContext<'a> {
    pub registry: &'a mut Registry,
    pub level: &'a mut Level,
    pub clock: &'a FixedTimeStep,
    pub dt: std::time::Duration,
}

/// Capability set `{Phase(), Tick(ctx)?, FixedTick(ctx)?}`.
/// Default methods are no-ops so a system only implements the cadences it
/// cares about.
pub trait System {
    fn phase(&self) -> Phase;

    #[allow(unused_variables)]
    fn tick(&mut self, ctx: &mut SystemContext) {}

    #[allow(unused_variables)]
    fn fixed_tick(&mut self, ctx: &mut SystemContext) {}
}

pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
    enabled: EnabledPhases,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self { systems: Vec::new(), enabled: EnabledPhases::default() }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `system` and re-sorts stably by phase, preserving relative
    /// insertion order within a phase.
    pub fn add(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
        self.systems.sort_by_key(|s| s.phase());
    }

    pub fn set_enabled_phases(&mut self, mask: EnabledPhases) {
        self.enabled = mask;
    }

    fn is_enabled(&self, phase: Phase) -> bool {
        self.enabled.contains(phase.bit())
    }

    pub fn tick_phase(&mut self, phase: Phase, ctx: &mut SystemContext) {
        if !self.is_enabled(phase) {
            return;
        }
        for system in &mut self.systems {
            if system.phase() == phase {
                system.tick(ctx);
            }
        }
    }

    pub fn fixed_tick_phase(&mut self, phase: Phase, ctx: &mut SystemContext) {
        if !self.is_enabled(phase) {
            return;
        }
        for system in &mut self.systems {
            if system.phase() == phase {
                system.fixed_tick(ctx);
            }
        }
    }

    /// Convenience driver that runs every phase in strict order for one
    /// cadence, respecting `enabled`.
    pub fn tick_all(&mut self, ctx: &mut SystemContext) {
        for phase in Phase::ALL {
            self.tick_phase(phase, ctx);
        }
    }

    pub fn fixed_tick_all(&mut self, ctx: &mut SystemContext) {
        for phase in Phase::ALL {
            self.fixed_tick_phase(phase, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        phase: Phase,
        label: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl System for Recorder {
        fn phase(&self) -> Phase {
            self.phase
        }

        fn fixed_tick(&mut self, _ctx: &mut SystemContext) {
            self.log.borrow_mut().push(self.label);
        }
    }

    #[test]
    fn phases_run_in_strict_order_insertion_order_within_phase() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add(Box::new(Recorder { phase: Phase::Simulation, label: "sim-a", log: Rc::clone(&log) }));
        scheduler.add(Box::new(Recorder { phase: Phase::Input, label: "input", log: Rc::clone(&log) }));
        scheduler.add(Box::new(Recorder { phase: Phase::Simulation, label: "sim-b", log: Rc::clone(&log) }));

        let mut registry = Registry::new();
        let dir = tempfile::tempdir().unwrap();
        let mut level = test_level(dir.path());
        let clock = FixedTimeStep::new(20.0);
        let mut ctx = SystemContext { registry: &mut registry, level: &mut level, clock: &clock, dt: std::time::Duration::ZERO };
        scheduler.fixed_tick_all(&mut ctx);

        assert_eq!(*log.borrow(), vec!["input", "sim-a", "sim-b"]);
    }

    #[test]
    fn disabled_phase_is_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add(Box::new(Recorder { phase: Phase::Simulation, label: "sim", log: Rc::clone(&log) }));
        scheduler.set_enabled_phases(EnabledPhases::all() & !EnabledPhases::SIMULATION);

        let mut registry = Registry::new();
        let dir = tempfile::tempdir().unwrap();
        let mut level = test_level(dir.path());
        let clock = FixedTimeStep::new(20.0);
        let mut ctx = SystemContext { registry: &mut registry, level: &mut level, clock: &clock, dt: std::time::Duration::ZERO };
        scheduler.fixed_tick_all(&mut ctx);

        assert!(log.borrow().is_empty());
    }

    fn test_level(dir: &std::path::Path) -> Level {
        Level::open(
            dir,
            &crate::config::EngineConfig::default(),
            &crate::config::WorldGenConfig::default(),
            &crate::config::ChunkSysConfig { background_generation: false, ..crate::config::ChunkSysConfig::default() },
        )
    }
}
