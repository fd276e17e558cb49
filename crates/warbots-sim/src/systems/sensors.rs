//! Sensor sampling: radar fan overlap and range-sensor ray casts.
//!
//! Runs after the radar fans have been rasterised for the tick. Sensors that
//! are off or unpowered read -1; a powered radar reads 1 when its fan mask
//! overlaps any other live robot's body mask, and a powered range sensor
//! reads the cm distance to the first obstruction along its bearing, or its
//! configured range when the ray runs clear.

use glam::IVec2;
use hecs::{Entity, World};

use warbots_core::components::{BodyMask, Chassis, Sensor, SensorSuite};
use warbots_core::constants::*;
use warbots_core::enums::SensorKind;
use warbots_core::types::{screen_x, screen_y};
use warbots_mask::{overlap, walk_line};

/// Refresh every live robot's sensor data for this tick.
pub fn run(world: &mut World, live: &[Entity]) {
    let mut samples: Vec<(Entity, usize, i32)> = Vec::new();

    for &entity in live {
        let Ok(chassis) = world.get::<&Chassis>(entity) else {
            continue;
        };
        let Ok(suite) = world.get::<&SensorSuite>(entity) else {
            continue;
        };
        for (port, slot) in suite.slots.iter().enumerate() {
            let Some(sensor) = slot else { continue };
            if !sensor.on || !sensor.powered {
                samples.push((entity, port, -1));
                continue;
            }
            let data = match sensor.kind {
                SensorKind::Radar => radar_contact(world, live, entity, &chassis, sensor),
                SensorKind::Range => range_reading(world, live, entity, &chassis, sensor),
            };
            samples.push((entity, port, data));
        }
    }

    for (entity, port, data) in samples {
        if let Ok(mut suite) = world.get::<&mut SensorSuite>(entity) {
            if let Some(sensor) = &mut suite.slots[port] {
                sensor.data = data;
            }
        }
    }
}

/// 1 if the fan mask overlaps any other live robot's body mask, else 0.
fn radar_contact(
    world: &World,
    live: &[Entity],
    own: Entity,
    chassis: &Chassis,
    sensor: &Sensor,
) -> i32 {
    let Some(fan) = &sensor.mask else { return 0 };
    let fan_x = screen_x(chassis.pos.x) - sensor.draw_offset.x;
    let fan_y = screen_y(chassis.pos.y) - sensor.draw_offset.y;

    for &other in live {
        if other == own {
            continue;
        }
        let Ok(other_chassis) = world.get::<&Chassis>(other) else {
            continue;
        };
        let Ok(other_body) = world.get::<&BodyMask>(other) else {
            continue;
        };
        let rx = screen_x(other_chassis.pos.x) - SHIELD_BMP_SZ / 2;
        let ry = screen_y(other_chassis.pos.y) - SHIELD_BMP_SZ / 2;
        if overlap(&other_body.mask, rx, ry, fan, fan_x, fan_y) {
            return 1;
        }
    }
    0
}

/// Walk the ray to the sensor's range; the first pixel outside the arena or
/// inside another robot's mask ends it. Returns the cm distance to that
/// pixel, or the configured range if the walk completes.
fn range_reading(
    world: &World,
    live: &[Entity],
    own: Entity,
    chassis: &Chassis,
    sensor: &Sensor,
) -> i32 {
    let bearing = (chassis.heading - sensor.angle as f64).to_radians();
    let reach = (sensor.range * PX_PER_CM) as f64;
    let x0 = screen_x(chassis.pos.x);
    let y0 = screen_y(chassis.pos.y);
    let x1 = (x0 as f64 + bearing.cos() * reach) as i32;
    let y1 = (y0 as f64 - bearing.sin() * reach) as i32;

    let hit = walk_line(IVec2::new(x0, y0), IVec2::new(x1, y1), |p| {
        if p.x < 0 || p.y < 0 || p.x > ARENA_WIDTH_PX - 1 || p.y > ARENA_HEIGHT_PX - 1 {
            return true;
        }
        for &other in live {
            if other == own {
                continue;
            }
            let Ok(other_chassis) = world.get::<&Chassis>(other) else {
                continue;
            };
            let Ok(other_body) = world.get::<&BodyMask>(other) else {
                continue;
            };
            let rx = screen_x(other_chassis.pos.x) - SHIELD_BMP_SZ / 2;
            let ry = screen_y(other_chassis.pos.y) - SHIELD_BMP_SZ / 2;
            if other_body.mask.get(p.x - rx, p.y - ry).is_some() {
                return true;
            }
        }
        false
    });

    match hit {
        Some(p) => {
            let dx = (x0 - p.x) as f64;
            let dy = (y0 - p.y) as f64;
            ((dx * dx + dy * dy).sqrt() / PX_PER_CM as f64) as i32
        }
        None => sensor.range,
    }
}
