//! Damage application and robot destruction.
//!
//! Runs after all collisions have banked their damage. Shields above the
//! leak threshold absorb everything; below it, a growing fraction leaks
//! straight through to the generator structure, and whatever the shields
//! cannot hold spills through as well. A robot whose structure reaches zero
//! explodes: its masks are cleared, its sensors die, and it migrates from
//! the live roster to the destroyed roster. Destroyed robots are kept until
//! engine teardown and never revived.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use warbots_core::components::{BodyMask, Chassis, Nameplate, PowerCore, SensorSuite};
use warbots_core::constants::SHIELDS_LEAK_THRESHOLD;
use warbots_core::enums::SoundId;
use warbots_core::events::SoundRequests;

use crate::particles::ParticleField;

/// Drain every live robot's damage bank and migrate the destroyed.
pub fn run(
    world: &mut World,
    live: &mut Vec<Entity>,
    destroyed: &mut Vec<Entity>,
    sounds: &mut SoundRequests,
    particles: &mut ParticleField,
    rng: &mut ChaCha8Rng,
) {
    let mut exploded: Vec<Entity> = Vec::new();

    for &entity in live.iter() {
        let Ok((chassis, core, suite, body)) = world.query_one_mut::<(
            &Chassis,
            &mut PowerCore,
            &mut SensorSuite,
            &mut BodyMask,
        )>(entity) else {
            continue;
        };

        let damage = core.damage_bank;
        core.damage_bank = 0.0;
        if damage <= 0.0 {
            continue;
        }

        let leak_ratio = if core.shields > SHIELDS_LEAK_THRESHOLD {
            0.0
        } else {
            1.0 - core.shields / SHIELDS_LEAK_THRESHOLD
        };

        let mut internal = damage * leak_ratio;
        let external = damage - internal;

        if external > core.shields {
            // Shields overwhelmed: the spill joins the leaked portion.
            internal += external - core.shields;
            core.shields = 0.0;
        } else {
            core.shields -= external;
        }

        core.structure -= internal;

        if core.structure <= 0.0 {
            core.structure = 0.0;
            sounds.request(SoundId::RobotExplode);
            let pos = chassis.pos;
            particles.explosion_burst(pos, rng);

            // A dead robot must vanish from every collision and sensing
            // query: blank its masks and kill its sensors.
            body.mask.clear();
            for sensor in suite.slots.iter_mut().flatten() {
                sensor.on = false;
                sensor.powered = false;
                sensor.data = -1;
                if let Some(mask) = &mut sensor.mask {
                    mask.clear();
                }
            }
            exploded.push(entity);
        }
    }

    if !exploded.is_empty() {
        live.retain(|entity| !exploded.contains(entity));
        for entity in exploded {
            if let Ok(plate) = world.get::<&Nameplate>(entity) {
                tracing::info!(name = %plate.name, "robot destroyed");
            }
            destroyed.push(entity);
        }
    }
}
