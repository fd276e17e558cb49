//! Mask rasterisation: chassis bodies, oriented projectiles, radar fans.
//!
//! Masks are the collision truth, so these routines run before any collision
//! or sensing query in the tick (bodies before robot collisions, fans before
//! the sensor pass). Each raster is cached against the heading it was drawn
//! at and skipped while the robot holds its bearing.

use glam::IVec2;
use hecs::{Entity, World};
use warbots_mask::{Color, Mask};

use warbots_core::components::{BodyMask, Chassis, Nameplate, Sensor, SensorSuite};
use warbots_core::constants::*;
use warbots_core::enums::{SensorKind, WeaponKind};
use warbots_core::types::wrap_degrees;

/// Convert a simulation heading to the clockwise screen rotation that points
/// an upright sprite along it.
fn screen_rotation(heading: f64) -> f64 {
    wrap_degrees(90.0 - heading)
}

/// The stock chassis artwork: a round hull with a forward barrel, drawn
/// upright (pointing to the top of the sprite).
pub fn default_chassis_glyph(color: Color) -> Mask {
    let mut glyph = Mask::new(33, 33);
    glyph.fill_disc(16, 16, 11, Some(color));
    glyph.fill_rect(15, 1, 17, 10, Some(color));
    glyph
}

/// Oriented sprite for a freshly fired weapon.
pub fn weapon_mask(kind: WeaponKind, heading: f64) -> Mask {
    let rotation = screen_rotation(heading);
    match kind {
        WeaponKind::Laser => {
            let red = Some(Color::rgb(255, 0, 0));
            let mut bolt = Mask::new(LASER_BMP_SZ, LASER_BMP_SZ);
            bolt.fill_rect(4, 2, 6, 8, red);
            bolt.draw_line(5, 1, 5, 9, red);
            bolt.rotated(rotation)
        }
        WeaponKind::Missile => {
            let grey = Some(Color::rgb(200, 200, 200));
            let mut missile = Mask::new(MISSILE_BMP_SZ, MISSILE_BMP_SZ);
            missile.fill_rect(6, 4, 10, 14, grey);
            missile.fill_rect(7, 1, 9, 3, grey);
            missile.rotated(rotation)
        }
    }
}

/// Re-rasterise every live robot's body mask from its current heading.
pub fn refresh_body_masks(world: &mut World, live: &[Entity]) {
    for &entity in live {
        let Ok((chassis, plate, body)) =
            world.query_one_mut::<(&Chassis, &Nameplate, &mut BodyMask)>(entity)
        else {
            continue;
        };
        if body.rastered_heading == Some(chassis.heading) {
            continue;
        }
        compose_body(body, chassis.heading, plate.color);
        body.rastered_heading = Some(chassis.heading);
    }
}

/// Shield ring plus the rotated chassis glyph, centred in the sprite.
fn compose_body(body: &mut BodyMask, heading: f64, color: Color) {
    let glyph = body.glyph.rotated(screen_rotation(heading));
    let centre = SHIELD_BMP_SZ / 2;
    body.mask.clear();
    body.mask.fill_disc(centre, centre, SHIELD_RAD_PX, Some(color));
    body.mask
        .fill_disc(centre, centre, SHIELD_RAD_PX - SHIELD_THICK_PX, None);
    let off_x = centre - (glyph.width() - 1) / 2;
    let off_y = centre - (glyph.height() - 1) / 2;
    body.mask.blit(&glyph, off_x, off_y);
}

/// Re-rasterise the radar fans of every live robot whose heading changed.
///
/// Every radar slot is drawn, on or off, so a fan switched on between the
/// raster and the sensor pass never carries a stale shape.
pub fn refresh_radar_masks(world: &mut World, live: &[Entity]) {
    let mut work = Mask::new(RADAR_WORK_IMG_PX, RADAR_WORK_IMG_PX);
    for &entity in live {
        let Ok((chassis, plate, suite)) =
            world.query_one_mut::<(&Chassis, &Nameplate, &mut SensorSuite)>(entity)
        else {
            continue;
        };
        for sensor in suite.slots.iter_mut().flatten() {
            if sensor.kind != SensorKind::Radar {
                continue;
            }
            if sensor.rastered_heading == Some(chassis.heading) {
                continue;
            }
            raster_radar_fan(&mut work, sensor, chassis.heading, plate.color);
            sensor.rastered_heading = Some(chassis.heading);
        }
    }
}

/// Draw one radar fan and crop it onto the sensor.
///
/// The pipeline: clear the working raster, fill a disc to the configured
/// range, erase the two radials bounding the arc, flood the non-fan portion
/// back to transparent from a point just behind the fan, then crop the fixed
/// window that contains the arc and record where the robot centre sits in it.
fn raster_radar_fan(work: &mut Mask, sensor: &mut Sensor, heading: f64, color: Color) {
    work.clear();

    let centre = RADAR_WORK_IMG_PX / 2;
    let range_px = sensor.range * PX_PER_CM;
    let start_angle = heading - sensor.angle as f64;
    let end_angle = start_angle - sensor.width as f64;
    let behind_angle = start_angle - sensor.width as f64 / 2.0 + 180.0;

    work.fill_disc(centre, centre, range_px, Some(color));

    let start_rad = start_angle.to_radians();
    let edge_x1 = (centre as f64 * start_rad.cos()) as i32;
    let edge_y1 = (centre as f64 * start_rad.sin()) as i32;
    work.draw_line(centre, centre, centre + edge_x1, centre - edge_y1, None);

    let end_rad = end_angle.to_radians();
    let edge_x2 = (centre as f64 * end_rad.cos()) as i32;
    let edge_y2 = (centre as f64 * end_rad.sin()) as i32;
    work.draw_line(centre, centre, centre + edge_x2, centre - edge_y2, None);

    let behind_rad = behind_angle.to_radians();
    let seed_x = (10.0 * behind_rad.cos()) as i32;
    let seed_y = (10.0 * behind_rad.sin()) as i32;
    work.flood_fill(centre + seed_x, centre - seed_y, None);

    // Crop window: bounded by the arc's three defining points, except when
    // the curved edge faces squarely left or up, where the curve bulges past
    // all of them and the window pins to the raster edge instead.
    let arc_x1 = (centre as f64 + range_px as f64 * start_rad.cos()) as i32;
    let arc_y1 = (centre as f64 - range_px as f64 * start_rad.sin()) as i32;
    let arc_x2 = (centre as f64 + range_px as f64 * end_rad.cos()) as i32;
    let arc_y2 = (centre as f64 - range_px as f64 * end_rad.sin()) as i32;
    let x_min = centre.min(arc_x1).min(arc_x2);
    let y_min = centre.min(arc_y1).min(arc_y2);

    let start_norm = wrap_degrees(start_angle);
    let left = if start_norm > 180.0 && start_norm < 225.0 {
        1
    } else {
        x_min + 1
    };
    let top = if start_norm > 90.0 && start_norm < 135.0 {
        1
    } else {
        y_min + 1
    };

    let mask = sensor
        .mask
        .get_or_insert_with(|| Mask::new(RADAR_IMAGE_PX, RADAR_IMAGE_PX));
    mask.copy_window(work, left, top);
    sensor.draw_offset = IVec2::new(RADAR_IMAGE_PX - left + 1, RADAR_IMAGE_PX - top + 1);
}
