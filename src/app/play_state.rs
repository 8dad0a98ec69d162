//! Concrete in-game state: wires the interaction pipeline, physics, and
//! overlap broadphase into the scheduler and drives them once per fixed
//! tick.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use crate::ecs::{e_view, CPlayerTag, CTransform};
use crate::interaction::{
    BlockBreakSystem, BlockEntityInteractSystem, BlockHitSystem, BlockIntentSystem, BlockInteractionResource,
    BlockUseSystem, FurnaceSystem,
};
use crate::mesher::{mesh_section, NullAtlas};
use crate::physics::{step_physics, OverlapTracker};
use crate::render::{MeshHandle, MeshUploader, NoopMeshUploader};
use crate::scheduler::{Phase, Scheduler, System, SystemContext};
use crate::state::{GameContext, GameState};
use crate::time::FixedTimeStep;
use crate::world::pos::{ChunkPos, SECTIONS_PER_CHUNK};
use crate::world::Level;

struct PhysicsSystem;

impl System for PhysicsSystem {
    fn phase(&self) -> Phase {
        Phase::Simulation
    }

    fn fixed_tick(&mut self, ctx: &mut SystemContext) {
        let dt = ctx.clock.tick_interval().as_secs_f32();
        let players: HashSet<_> = e_view::<CPlayerTag>(ctx.registry).collect();
        step_physics(ctx.registry, ctx.level, dt, |entity| players.contains(&entity));
    }
}

/// Remeshes every section of a chunk once it carries `ChunkDirty::MESH`
/// and a section's last-built revision no longer matches the chunk's
/// current `mesh_revision`, then hands the result to a `MeshUploader` and
/// clears the chunk's mesh-dirty bit.
struct MeshRebuildSystem {
    atlas: NullAtlas,
    uploader: Box<dyn MeshUploader>,
    built_revision: HashMap<(ChunkPos, i32), u64>,
    handles: HashMap<(ChunkPos, i32), MeshHandle>,
}

impl MeshRebuildSystem {
    fn new(uploader: Box<dyn MeshUploader>) -> Self {
        Self { atlas: NullAtlas, uploader, built_revision: HashMap::new(), handles: HashMap::new() }
    }

    fn rebuild_chunk(&mut self, pos: ChunkPos, level: &Level) {
        let Some(chunk) = level.chunk(pos) else { return };
        let revision = chunk.mesh_revision();
        let registry = level.block_registry();

        for section in 0..SECTIONS_PER_CHUNK {
            let key = (pos, section);
            if self.built_revision.get(&key).copied() == Some(revision) {
                continue;
            }

            let mesh = mesh_section(chunk, section, level, registry, &self.atlas);
            if let Some(old) = self.handles.remove(&key) {
                self.uploader.free(old);
            }
            if !mesh.is_empty() {
                self.handles.insert(key, self.uploader.upload(&mesh));
            }
            self.built_revision.insert(key, revision);
        }
    }
}

impl System for MeshRebuildSystem {
    fn phase(&self) -> Phase {
        Phase::LateSimulation
    }

    fn fixed_tick(&mut self, ctx: &mut SystemContext) {
        for pos in ctx.level.chunks_needing_mesh_rebuild() {
            self.rebuild_chunk(pos, ctx.level);
            if let Some(chunk) = ctx.level.chunk_mut(pos) {
                chunk.clear_mesh_dirty();
            }
        }
    }
}

pub struct PlayState {
    scheduler: Scheduler,
    overlap: OverlapTracker,
}

impl PlayState {
    pub fn new() -> Self {
        let interaction = Rc::new(RefCell::new(BlockInteractionResource::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add(Box::new(PhysicsSystem));
        scheduler.add(Box::new(BlockIntentSystem::new(Rc::clone(&interaction))));
        scheduler.add(Box::new(BlockHitSystem::new(Rc::clone(&interaction))));
        scheduler.add(Box::new(BlockBreakSystem::new(Rc::clone(&interaction))));
        scheduler.add(Box::new(FurnaceSystem));
        scheduler.add(Box::new(BlockUseSystem::new(Rc::clone(&interaction))));
        scheduler.add(Box::new(BlockEntityInteractSystem::new(interaction)));
        scheduler.add(Box::new(MeshRebuildSystem::new(Box::new(NoopMeshUploader::new()))));
        Self { scheduler, overlap: OverlapTracker::new() }
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for PlayState {
    fn fixed_update(&mut self, ctx: &mut GameContext, clock: &FixedTimeStep) {
        for entity in e_view::<CTransform>(&ctx.registry).collect::<Vec<_>>() {
            ctx.registry.get_mut::<CTransform>(entity).snapshot_previous();
        }

        let mut sys_ctx =
            SystemContext { registry: &mut ctx.registry, level: &mut ctx.level, clock, dt: clock.tick_interval() };
        self.scheduler.fixed_tick_all(&mut sys_ctx);

        for event in self.overlap.collect(&ctx.registry) {
            ctx.events.publish_now(event);
        }
    }

    fn update(&mut self, ctx: &mut GameContext, dt: Duration) {
        ctx.level.update(dt);
    }
}
