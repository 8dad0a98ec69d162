//! The five block-interaction systems plus the furnace state machine.

use std::cell::RefCell;
use std::rc::Rc;

use glam::IVec3;
use log::trace;
use rand::Rng;

use crate::block::{registry as block_registry, BlockState};
use crate::ecs::{CBlockEntity, CBlockInteractor, CFurnace, CInventory, CItemDrop, CLocalPlayerTag, CMesh, CPhysics, CTransform, CVelocity, Entity};
use crate::raycast::{self, Ray};
use crate::scheduler::{Phase, System, SystemContext};
use crate::world::pos::WorldBlockPos;

use super::recipes;
use super::resource::{BlockBreak, BlockHit, BlockInteractionResource, BlockUse, OpenBlockEntity};

fn to_block_pos(v: IVec3) -> WorldBlockPos {
    WorldBlockPos::new(v.x, v.y, v.z)
}

pub struct BlockIntentSystem {
    resource: Rc<RefCell<BlockInteractionResource>>,
}

impl BlockIntentSystem {
    pub fn new(resource: Rc<RefCell<BlockInteractionResource>>) -> Self {
        Self { resource }
    }
}

impl System for BlockIntentSystem {
    fn phase(&self) -> Phase {
        Phase::Intent
    }

    fn fixed_tick(&mut self, ctx: &mut SystemContext) {
        let mut res = self.resource.borrow_mut();

        let players: Vec<Entity> = crate::ecs::e_view2::<CBlockInteractor, CLocalPlayerTag>(ctx.registry);

        for player in players {
            let camera_entity = ctx.registry.get::<CLocalPlayerTag>(player).camera_entity;
            let camera_transform = *ctx.registry.get::<CTransform>(camera_entity);
            let reach = ctx.registry.get::<CBlockInteractor>(player).reach;

            let forward = -glam::Vec3::Z;
            let rotated = glam::Quat::from_euler(
                glam::EulerRot::YXZ,
                camera_transform.rotation.y,
                camera_transform.rotation.x,
                camera_transform.rotation.z,
            ) * forward;

            let hit = raycast::cast(
                ctx.level,
                &Ray { origin: camera_transform.position, direction: rotated, max_distance: reach },
            );

            match hit {
                None => {
                    res.mining_state.entry(player).or_default().has_target = false;
                }
                Some(hit) => {
                    {
                        let mining = res.mining_state.entry(player).or_default();
                        if !mining.has_target || mining.target != hit.block {
                            mining.accumulated_ticks = 0;
                            mining.target = hit.block;
                            mining.has_target = true;
                        }
                    }

                    let interactor = *ctx.registry.get::<CBlockInteractor>(player);
                    if interactor.left_down {
                        res.hit_queue.push(BlockHit { player, pos: to_block_pos(hit.block) });
                    }
                    if interactor.right_down && !interactor.was_right_down {
                        res.use_queue.push(BlockUse { player, pos: to_block_pos(hit.block) });
                    }
                }
            }

            let interactor = ctx.registry.get_mut::<CBlockInteractor>(player);
            interactor.was_left_down = interactor.left_down;
            interactor.was_right_down = interactor.right_down;
        }
    }
}

pub struct BlockHitSystem {
    resource: Rc<RefCell<BlockInteractionResource>>,
}

impl BlockHitSystem {
    pub fn new(resource: Rc<RefCell<BlockInteractionResource>>) -> Self {
        Self { resource }
    }
}

impl System for BlockHitSystem {
    fn phase(&self) -> Phase {
        Phase::Simulation
    }

    fn fixed_tick(&mut self, ctx: &mut SystemContext) {
        let mut res = self.resource.borrow_mut();
        let current_tick = ctx.clock.tick_count();
        let events = std::mem::take(&mut res.hit_queue);
        let registry = ctx.level.block_registry();

        for event in events {
            let state = ctx.level.get_block(event.pos);
            let Some(def) = registry.get(state.id()) else { continue };

            if def.break_ticks == 0 {
                res.break_queue.push(BlockBreak { player: event.player, pos: event.pos });
                continue;
            }
            if def.break_ticks == crate::block::BREAK_TICKS_UNBREAKABLE {
                continue;
            }

            let target = IVec3::new(event.pos.x(), event.pos.y(), event.pos.z());
            let should_break = {
                let mining = res.mining_state.entry(event.player).or_default();
                if mining.has_target && mining.target == target {
                    mining.accumulated_ticks += 1;
                    mining.last_hit_tick = current_tick;
                    if mining.accumulated_ticks >= def.break_ticks {
                        mining.accumulated_ticks = 0;
                        true
                    } else {
                        false
                    }
                } else {
                    false
                }
            };
            if should_break {
                res.break_queue.push(BlockBreak { player: event.player, pos: event.pos });
            }
        }

        for state in res.mining_state.values_mut() {
            if state.last_hit_tick + 7 < current_tick {
                state.accumulated_ticks = 0;
            }
        }
    }
}

pub struct BlockBreakSystem {
    resource: Rc<RefCell<BlockInteractionResource>>,
}

impl BlockBreakSystem {
    pub fn new(resource: Rc<RefCell<BlockInteractionResource>>) -> Self {
        Self { resource }
    }
}

impl System for BlockBreakSystem {
    fn phase(&self) -> Phase {
        Phase::Simulation
    }

    fn fixed_tick(&mut self, ctx: &mut SystemContext) {
        let mut res = self.resource.borrow_mut();
        let events = std::mem::take(&mut res.break_queue);

        for event in events {
            let state = ctx.level.get_block(event.pos);
            if state.is_air() {
                continue;
            }

            let block_id = state.id();
            if let Some(def) = ctx.level.block_registry().get(block_id) {
                if let Some(on_broken) = def.on_broken {
                    on_broken(block_id);
                }
            }

            spawn_item_drop(ctx, block_id, event.pos);

            if let Some(block_entity) = res.block_entities.remove(&event.pos) {
                ctx.registry.destroy(block_entity);
            }

            ctx.level.set_block(event.pos, BlockState::AIR);

            let target = IVec3::new(event.pos.x(), event.pos.y(), event.pos.z());
            for state in res.mining_state.values_mut() {
                if state.has_target && state.target == target {
                    state.accumulated_ticks = 0;
                    state.has_target = false;
                }
            }
        }
    }
}

fn spawn_item_drop(ctx: &mut SystemContext, block_id: crate::block::BlockId, pos: WorldBlockPos) {
    let mut rng = rand::thread_rng();
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let horiz_speed = rng.gen_range(1.0..2.0);
    let up_speed = rng.gen_range(2.0..5.0);
    let velocity = glam::Vec3::new(angle.cos() * horiz_speed, up_speed, angle.sin() * horiz_speed);

    let entity = ctx.registry.create();
    let position = glam::Vec3::new(pos.x() as f32 + 0.5, pos.y() as f32 + 0.5, pos.z() as f32 + 0.5);
    ctx.registry.add(entity, CTransform { position, ..Default::default() }).unwrap();
    ctx.registry.add(entity, CVelocity { velocity }).unwrap();
    ctx.registry
        .add(entity, CItemDrop { block_id, ticks_remaining: 20 * 60 * 5, max_ticks: 20 * 60 * 5 })
        .unwrap();
    ctx.registry.add(entity, CPhysics::new(glam::Vec3::splat(-0.15), glam::Vec3::splat(0.15))).unwrap();
    ctx.registry.add(entity, CMesh { mesh_ref: block_id.0 as u64 }).unwrap();
}

pub struct BlockUseSystem {
    resource: Rc<RefCell<BlockInteractionResource>>,
}

impl BlockUseSystem {
    pub fn new(resource: Rc<RefCell<BlockInteractionResource>>) -> Self {
        Self { resource }
    }
}

impl System for BlockUseSystem {
    fn phase(&self) -> Phase {
        Phase::LateSimulation
    }

    fn fixed_tick(&mut self, ctx: &mut SystemContext) {
        let mut res = self.resource.borrow_mut();
        let events = std::mem::take(&mut res.use_queue);

        for event in events {
            let state = ctx.level.get_block(event.pos);
            if state.is_air() {
                continue;
            }

            let block_id = state.id();
            let Some(def) = ctx.level.block_registry().get(block_id).cloned() else { continue };

            if def.has_block_entity {
                let block_entity = *res.block_entities.entry(event.pos).or_insert_with(|| {
                    let entity = ctx.registry.create();
                    ctx.registry.add(entity, CBlockEntity { pos: event.pos, block_id }).unwrap();
                    if block_id == block_registry::FURNACE {
                        ctx.registry.add(entity, CFurnace::default()).unwrap();
                        ctx.registry.add(entity, CInventory::new(3)).unwrap();
                    }
                    entity
                });
                res.open_queue.push(OpenBlockEntity { player: event.player, block_entity });
            } else if def.openable {
                let new_state = state.with_orientation(state.orientation().next());
                ctx.level.set_block(event.pos, new_state);
            }
        }
    }
}

/// Dispatch to UI is a rendering collaborator; this system only drains the
/// queue so it does not grow unbounded.
pub struct BlockEntityInteractSystem {
    resource: Rc<RefCell<BlockInteractionResource>>,
}

impl BlockEntityInteractSystem {
    pub fn new(resource: Rc<RefCell<BlockInteractionResource>>) -> Self {
        Self { resource }
    }
}

impl System for BlockEntityInteractSystem {
    fn phase(&self) -> Phase {
        Phase::Presentation
    }

    fn tick(&mut self, ctx: &mut SystemContext) {
        let mut res = self.resource.borrow_mut();
        let events = std::mem::take(&mut res.open_queue);
        for event in events {
            if !ctx.registry.has::<CFurnace>(event.block_entity) && !ctx.registry.has::<CInventory>(event.block_entity) {
                continue;
            }
            trace!("dispatching block entity UI for player {:?}", event.player);
        }
    }
}

pub struct FurnaceSystem;

impl System for FurnaceSystem {
    fn phase(&self) -> Phase {
        Phase::Simulation
    }

    fn fixed_tick(&mut self, ctx: &mut SystemContext) {
        for entity in crate::ecs::e_view2::<CFurnace, CInventory>(ctx.registry) {
            let mut furnace = *ctx.registry.get::<CFurnace>(entity);
            let mut inventory = ctx.registry.get::<CInventory>(entity).clone();
            if inventory.slots.len() < 3 {
                continue;
            }

            if furnace.burn_ticks_remaining == 0 {
                let fuel = inventory.slots[1];
                let ticks = recipes::fuel_ticks(fuel.item);
                if fuel.count > 0 && ticks > 0 {
                    inventory.slots[1].count -= 1;
                    furnace.burn_ticks_remaining = ticks;
                }
            } else {
                furnace.burn_ticks_remaining -= 1;
            }

            let burning = furnace.burn_ticks_remaining > 0;
            let input = inventory.slots[0];
            let Some(output_item) = (if input.count > 0 { recipes::smelt_output(input.item) } else { None }) else {
                furnace.cook_ticks = 0;
                *ctx.registry.get_mut::<CFurnace>(entity) = furnace;
                *ctx.registry.get_mut::<CInventory>(entity) = inventory;
                continue;
            };

            if !burning {
                *ctx.registry.get_mut::<CFurnace>(entity) = furnace;
                *ctx.registry.get_mut::<CInventory>(entity) = inventory;
                continue;
            }

            furnace.cook_ticks += 1;
            let output_slot = inventory.slots[2];
            let output_ready = output_slot.count == 0 || output_slot.item == output_item;

            if furnace.cook_ticks >= recipes::COOK_TICKS_REQUIRED && output_ready {
                inventory.slots[0].count -= 1;
                inventory.slots[2] = crate::ecs::ItemStack { item: output_item, count: output_slot.count + 1 };
                furnace.cook_ticks = 0;
            }

            *ctx.registry.get_mut::<CFurnace>(entity) = furnace;
            *ctx.registry.get_mut::<CInventory>(entity) = inventory;
        }
    }
}
