//! Snapshot builder: queries the world and produces an `ArenaSnapshot`.
//!
//! Read-only; never modifies the world. Masks are excluded — renderers pull
//! those through the engine's accessors.

use hecs::{Entity, World};

use warbots_core::components::{Chassis, Nameplate, PowerCore, WeaponMounts};
use warbots_core::constants::{LASER_PORT, MISSILE_PORT};
use warbots_core::enums::GameState;
use warbots_core::events::SoundRequests;
use warbots_core::state::{ArenaSnapshot, RobotView, WeaponView};

use crate::projectile::Projectile;

/// Build the complete scalar snapshot for the current tick.
pub fn build_snapshot(
    world: &World,
    live: &[Entity],
    destroyed: &[Entity],
    weapons: &[Entity],
    state: GameState,
    tick: u64,
    sounds: &SoundRequests,
) -> ArenaSnapshot {
    ArenaSnapshot {
        state,
        tick,
        robots: live.iter().filter_map(|&e| robot_view(world, e)).collect(),
        destroyed: destroyed
            .iter()
            .filter_map(|&e| robot_view(world, e))
            .collect(),
        weapons: weapons.iter().filter_map(|&e| weapon_view(world, e)).collect(),
        sounds: sounds.pending(),
    }
}

fn robot_view(world: &World, entity: Entity) -> Option<RobotView> {
    let chassis = world.get::<&Chassis>(entity).ok()?;
    let core = world.get::<&PowerCore>(entity).ok()?;
    let mounts = world.get::<&WeaponMounts>(entity).ok()?;
    let plate = world.get::<&Nameplate>(entity).ok()?;

    Some(RobotView {
        name: plate.name.clone(),
        number: plate.number,
        color: plate.color,
        x: chassis.pos.x,
        y: chassis.pos.y,
        heading: chassis.heading,
        left_tread: chassis.left_tread,
        right_tread: chassis.right_tread,
        shields: core.shields,
        structure: core.structure as i32,
        laser_energy: mounts.mounts[LASER_PORT].charge_energy,
        missile_energy: mounts.mounts[MISSILE_PORT].charge_energy,
        turbo: chassis.turbo_ticks > 0,
        status: plate.status.clone(),
    })
}

fn weapon_view(world: &World, entity: Entity) -> Option<WeaponView> {
    let proj = world.get::<&Projectile>(entity).ok()?;
    Some(WeaponView {
        kind: proj.kind,
        x: proj.pos.x,
        y: proj.pos.y,
        heading: proj.heading,
        energy: proj.energy,
    })
}
