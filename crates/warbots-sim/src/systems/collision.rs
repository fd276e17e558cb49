//! Collision resolution: robots against the walls and each other, and
//! in-flight weapons against robots and the walls.
//!
//! Robot collisions run before weapon collisions every tick. Weapon hits are
//! pixel-perfect mask overlaps; robot-to-robot contact is a shield-disc
//! distance test with an impulse exchange.

use glam::DVec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use warbots_core::components::{BodyMask, Chassis, PowerCore, SensorSuite};
use warbots_core::constants::*;
use warbots_core::enums::SoundId;
use warbots_core::events::SoundRequests;
use warbots_core::types::{screen_x, screen_y};
use warbots_mask::overlap;

use crate::particles::ParticleField;
use crate::projectile::Projectile;

/// Keep every robot inside the arena and resolve robot-to-robot contact.
pub fn robots(
    world: &mut World,
    live: &[Entity],
    sounds: &mut SoundRequests,
    particles: &mut ParticleField,
    rng: &mut ChaCha8Rng,
) {
    clamp_to_walls(world, live);
    shield_contacts(world, live, sounds, particles, rng);
}

/// Clamp each robot's centre so its shield disc stays inside the arena,
/// recording a wall bump on any clamp.
fn clamp_to_walls(world: &mut World, live: &[Entity]) {
    let x_max = ARENA_WIDTH_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM;
    let y_max = ARENA_HEIGHT_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM;

    for &entity in live {
        let Ok((chassis, suite)) =
            world.query_one_mut::<(&mut Chassis, &mut SensorSuite)>(entity)
        else {
            continue;
        };
        let mut hit_wall = false;

        if chassis.pos.x < SHIELD_RAD_CM {
            chassis.pos.x = SHIELD_RAD_CM;
            hit_wall = true;
        } else if chassis.pos.x > x_max {
            chassis.pos.x = x_max;
            hit_wall = true;
        }
        if chassis.pos.y < SHIELD_RAD_CM {
            chassis.pos.y = SHIELD_RAD_CM;
            hit_wall = true;
        } else if chassis.pos.y > y_max {
            chassis.pos.y = y_max;
            hit_wall = true;
        }

        if hit_wall {
            suite.bump_register |= BUMP_WALL;
        }
    }
}

/// Pairwise shield-disc test over the live roster. Crossing shields shove
/// both robots apart with an impulse, bank damage on both, and set both
/// robot bump bits.
fn shield_contacts(
    world: &mut World,
    live: &[Entity],
    sounds: &mut SoundRequests,
    particles: &mut ParticleField,
    rng: &mut ChaCha8Rng,
) {
    for i in 0..live.len() {
        for j in i + 1..live.len() {
            let first = live[i];
            let second = live[j];

            let (pos_a, pos_b) = {
                let Ok(a) = world.get::<&Chassis>(first) else { continue };
                let Ok(b) = world.get::<&Chassis>(second) else { continue };
                (a.pos, b.pos)
            };

            let delta = pos_a - pos_b;
            let dist = delta.length();
            if dist == 0.0 {
                panic!(
                    "two robots occupy exactly the same point; \
                     the collision response is undefined"
                );
            }
            if dist >= SHIELD_RAD_CM * 2.0 {
                continue;
            }

            sounds.request(SoundId::RobotsCollide);
            particles.shield_cross_burst(pos_b + delta / 2.0, rng);

            // Angle of the displacement from the second robot to the first;
            // the first is pushed along it, the second the opposite way.
            let mut away = (delta.x / dist).acos();
            if delta.y < 0.0 {
                away = std::f64::consts::TAU - away;
            }
            let away_deg = away.to_degrees();

            apply_shove(world, first, away_deg);
            apply_shove(world, second, away_deg + 180.0);
        }
    }
}

fn apply_shove(world: &mut World, entity: Entity, heading_deg: f64) {
    let Ok((chassis, core, suite)) =
        world.query_one_mut::<(&mut Chassis, &mut PowerCore, &mut SensorSuite)>(entity)
    else {
        return;
    };
    chassis.impulse_speed = SHIELD_CROSS_SPEED;
    chassis.impulse_heading = heading_deg;
    core.damage_bank += SHIELD_CROSS_DAMAGE;
    suite.bump_register |= BUMP_ROBOT;
}

/// Test every in-flight weapon against the robots and the walls, resolving
/// impacts: direct damage and bump on the victim, splash on bystanders, an
/// impact sound and burst, and removal of the weapon in the same tick.
pub fn weapons(
    world: &mut World,
    live: &[Entity],
    weapons: &mut Vec<Entity>,
    sounds: &mut SoundRequests,
    particles: &mut ParticleField,
    rng: &mut ChaCha8Rng,
) {
    let mut surviving = Vec::with_capacity(weapons.len());

    for &weapon in weapons.iter() {
        let mut direct_hit: Option<Entity> = None;
        let mut hit_wall = false;

        {
            let Ok(proj) = world.get::<&Projectile>(weapon) else {
                continue;
            };
            let wx = screen_x(proj.pos.x) - proj.mask.width() / 2;
            let wy = screen_y(proj.pos.y) - proj.mask.height() / 2;

            for &robot in live {
                if robot == proj.owner {
                    continue;
                }
                let Ok(chassis) = world.get::<&Chassis>(robot) else { continue };
                let Ok(body) = world.get::<&BodyMask>(robot) else { continue };
                let rx = screen_x(chassis.pos.x) - SHIELD_BMP_SZ / 2;
                let ry = screen_y(chassis.pos.y) - SHIELD_BMP_SZ / 2;
                if overlap(&body.mask, rx, ry, &proj.mask, wx, wy) {
                    direct_hit = Some(robot);
                    break;
                }
            }

            if wx < 0
                || wx + proj.mask.width() - 1 > ARENA_WIDTH_PX - 1
                || wy < 0
                || wy + proj.mask.height() - 1 > ARENA_HEIGHT_PX - 1
            {
                hit_wall = true;
            }
        }

        if direct_hit.is_none() && !hit_wall {
            surviving.push(weapon);
            continue;
        }

        let (kind, owner, impact_pos, energy, splash_range, splash_damage, bump, impact_sound) = {
            let Ok(proj) = world.get::<&Projectile>(weapon) else {
                continue;
            };
            (
                proj.kind,
                proj.owner,
                proj.pos,
                proj.energy,
                proj.splash_range,
                proj.splash_damage,
                proj.bump_value,
                proj.impact_sound,
            )
        };

        if let Some(victim) = direct_hit {
            if let Ok((core, suite)) =
                world.query_one_mut::<(&mut PowerCore, &mut SensorSuite)>(victim)
            {
                core.damage_bank += energy;
                suite.bump_register |= bump;
            }
        }

        sounds.request(impact_sound);
        particles.weapon_burst(kind, impact_pos, rng);
        splash(world, live, impact_pos, splash_range, splash_damage, direct_hit, owner);

        let _ = world.despawn(weapon);
    }

    *weapons = surviving;
}

/// Bank splash damage on every robot within range of the impact point,
/// except the direct victim (already paying full price) and the owner.
fn splash(
    world: &mut World,
    live: &[Entity],
    impact: DVec2,
    range: f64,
    damage: f64,
    direct_hit: Option<Entity>,
    owner: Entity,
) {
    if damage <= 0.0 {
        return;
    }
    for &robot in live {
        if Some(robot) == direct_hit || robot == owner {
            continue;
        }
        let in_range = match world.get::<&Chassis>(robot) {
            Ok(chassis) => chassis.pos.distance(impact) < range,
            Err(_) => false,
        };
        if in_range {
            if let Ok(core) = world.query_one_mut::<&mut PowerCore>(robot) {
                core.damage_bank += damage;
            }
        }
    }
}
