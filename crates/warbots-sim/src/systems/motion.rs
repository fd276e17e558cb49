//! Robot motion: impulse decay plus differential-drive integration.
//!
//! Two phases per tick, in two passes over the roster. The impulse phase
//! applies and decays any externally imparted push (collision recoil). The
//! tread phase converts the commanded tread speeds — plus the turbo bonus
//! while a boost burns — into either a straight translation, a pivot around
//! a stopped tread, or an arc around the instantaneous centre of rotation on
//! the line through both treads.

use glam::DVec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use warbots_core::components::Chassis;
use warbots_core::constants::*;
use warbots_core::types::{heading_vec, wrap_degrees};

use crate::particles::ParticleField;

/// Run both motion phases for every live robot.
pub fn run(world: &mut World, live: &[Entity], particles: &mut ParticleField, rng: &mut ChaCha8Rng) {
    for &entity in live {
        let Ok(chassis) = world.query_one_mut::<&mut Chassis>(entity) else {
            continue;
        };
        if chassis.impulse_speed != 0.0 {
            let dist = chassis.impulse_speed / CALCS_PER_SEC as f64;
            chassis.pos += dist * heading_vec(chassis.impulse_heading);
            chassis.impulse_speed =
                (chassis.impulse_speed - FRIC_SLOW_RATE / CALCS_PER_SEC as f64).max(0.0);
        }
    }

    for &entity in live {
        let Ok(chassis) = world.query_one_mut::<&mut Chassis>(entity) else {
            continue;
        };

        let (left_speed, right_speed) = if chassis.turbo_ticks > 0 {
            chassis.turbo_ticks -= 1;
            let pos = chassis.pos;
            particles.turbo_wash(pos, rng);
            (
                chassis.left_tread + TURBO_SPEED_BONUS,
                chassis.right_tread + TURBO_SPEED_BONUS,
            )
        } else {
            (chassis.left_tread, chassis.right_tread)
        };

        let left_dist = MAX_SPEED_CM_S * left_speed as f64 / (100.0 * CALCS_PER_SEC as f64);
        let right_dist = MAX_SPEED_CM_S * right_speed as f64 / (100.0 * CALCS_PER_SEC as f64);

        if left_speed == right_speed {
            // Equal speeds: pure translation along the heading.
            chassis.pos += left_dist * heading_vec(chassis.heading);
            continue;
        }

        // The other two cases move along a circle. Each picks the radius
        // from the circle centre to the tread midpoint, the angle swept
        // around that circle this tick, and the starting polar angle of the
        // midpoint as seen from the centre.
        let (mid_radius, rot_angle, start_angle) = if right_speed == 0 {
            // Pivot around the stopped right tread; the midpoint orbits at
            // half the tread separation.
            (
                TREAD_DISTANCE_CM / 2.0,
                -left_dist * 360.0 / (2.0 * std::f64::consts::PI * TREAD_DISTANCE_CM),
                chassis.heading + 90.0,
            )
        } else if left_speed == 0 {
            (
                TREAD_DISTANCE_CM / 2.0,
                right_dist * 360.0 / (2.0 * std::f64::consts::PI * TREAD_DISTANCE_CM),
                chassis.heading + 270.0,
            )
        } else if left_speed.abs() > right_speed.abs() {
            // Both treads moving, left dominant: the centre sits beyond the
            // right (inner) tread.
            let inner_radius = right_dist * TREAD_DISTANCE_CM / (left_dist - right_dist);
            (
                inner_radius + TREAD_DISTANCE_CM / 2.0,
                -right_dist * 360.0 / (2.0 * std::f64::consts::PI * inner_radius),
                chassis.heading + 90.0,
            )
        } else {
            let inner_radius = left_dist * TREAD_DISTANCE_CM / (right_dist - left_dist);
            (
                inner_radius + TREAD_DISTANCE_CM / 2.0,
                left_dist * 360.0 / (2.0 * std::f64::consts::PI * inner_radius),
                chassis.heading + 270.0,
            )
        };

        // Place the midpoint on the circle, sweep it by the rotation angle,
        // and apply the chord as a displacement.
        let start_rad = start_angle.to_radians();
        let x = mid_radius * start_rad.cos();
        let y = mid_radius * start_rad.sin();
        let rot_rad = rot_angle.to_radians();
        let u = x * rot_rad.cos() - y * rot_rad.sin();
        let v = y * rot_rad.cos() + x * rot_rad.sin();
        chassis.pos += DVec2::new(u - x, v - y);
        chassis.heading = wrap_degrees(chassis.heading + rot_angle);
    }
}
