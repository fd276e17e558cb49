//! Generator energy distribution.
//!
//! Each tick, each robot's generator produces a pool proportional to its
//! remaining structure. The pool is offered to the four systems in the
//! robot's priority order: capacitive systems (shields and the two weapon
//! charges) draw up to their requested rate and bank `used / CALCS_PER_MIN`,
//! while the sensor pass walks the ports in creation order and powers each
//! on-sensor only while the running cost still fits the pool. The walk stops
//! once the pool goes negative, so low-priority systems starve first and
//! sensor brownouts are deterministic.

use hecs::{Entity, World};

use warbots_core::components::{PowerCore, SensorSuite, WeaponMounts, WeaponSystem};
use warbots_core::constants::*;
use warbots_core::enums::{SensorKind, SystemKind};

/// Run the energy pass for every live robot.
pub fn run(world: &mut World, live: &[Entity]) {
    for &entity in live {
        let Ok((core, suite, mounts)) =
            world.query_one_mut::<(&mut PowerCore, &mut SensorSuite, &mut WeaponMounts)>(entity)
        else {
            continue;
        };

        let mut pool = core.generator_output();
        for kind in core.priorities {
            let used = match kind {
                SystemKind::Shields => {
                    if core.shields >= MAX_SHIELD_ENERGY {
                        0.0
                    } else {
                        let used = (core.shield_charge_rate as f64).min(pool);
                        core.shields =
                            (core.shields + used / CALCS_PER_MIN as f64).min(MAX_SHIELD_ENERGY);
                        used
                    }
                }
                SystemKind::Sensors => {
                    let mut used = 0.0;
                    for sensor in suite.slots.iter_mut().flatten() {
                        if !sensor.on {
                            continue;
                        }
                        used += match sensor.kind {
                            SensorKind::Radar => RADAR_SENSOR_ENERGY_COST,
                            SensorKind::Range => RANGE_SENSOR_ENERGY_COST,
                        };
                        sensor.powered = used <= pool;
                    }
                    used
                }
                SystemKind::Lasers => charge_mount(&mut mounts.mounts[LASER_PORT], pool),
                SystemKind::Missiles => charge_mount(&mut mounts.mounts[MISSILE_PORT], pool),
            };

            pool -= used;
            if pool < 0.0 {
                break;
            }
        }
    }
}

/// Charge one weapon mount from the pool; returns the energy drawn.
fn charge_mount(mount: &mut WeaponSystem, pool: f64) -> f64 {
    if mount.charge_energy >= mount.max_energy {
        return 0.0;
    }
    let used = (mount.charge_rate as f64).min(pool);
    mount.charge_energy = (mount.charge_energy + used / CALCS_PER_MIN as f64).min(mount.max_energy);
    used
}
