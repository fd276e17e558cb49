//! A twin-beam radar gunner.

use warbots_core::constants::MIN_LASER_ENERGY;
use warbots_core::enums::{SensorKind, SystemKind, WeaponKind};
use warbots_sim::{Api, Bot};

/// Patrols the corners until a radar beam lights up, then turns onto the
/// contact and fires the laser once both beams agree it is dead ahead.
///
/// The two beams are mounted slightly off-centre on either side of the nose,
/// so "both see it" brackets the target inside the laser line.
pub struct Sweeper {
    waypoint: usize,
}

/// Corner circuit, a shield-width off the walls.
const WAYPOINTS: [(f64, f64); 4] = [(30.0, 30.0), (345.0, 345.0), (30.0, 345.0), (345.0, 30.0)];

impl Sweeper {
    pub fn new() -> Self {
        Self { waypoint: 0 }
    }
}

impl Default for Sweeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Bot for Sweeper {
    fn configure(&mut self, api: &mut Api<'_>) {
        api.add_sensor(0, SensorKind::Radar, -15, 12, 100);
        api.add_sensor(1, SensorKind::Radar, 3, 12, 100);
    }

    fn actions(&mut self, api: &mut Api<'_>, _elapsed_ms: u32) {
        api.set_system_charge_rate(SystemKind::Shields, 400);
        api.set_system_charge_rate(SystemKind::Lasers, 500);

        let port = api.get_sensor(0) == 1;
        let starboard = api.get_sensor(1) == 1;

        if port && starboard {
            api.set_motor_speeds(0, 0);
            api.set_status_message("firing");
            if api.get_system_energy(SystemKind::Lasers) >= MIN_LASER_ENERGY {
                api.fire_weapon(WeaponKind::Laser, 0);
            }
            return;
        }
        if port {
            api.set_motor_speeds(-20, 20);
            api.set_status_message("tracking port");
            return;
        }
        if starboard {
            api.set_motor_speeds(20, -20);
            api.set_status_message("tracking starboard");
            return;
        }

        // Nothing on the scopes: keep walking the corner circuit.
        let Some(fix) = api.gps() else {
            api.set_motor_speeds(50, 50);
            return;
        };
        let (tx, ty) = WAYPOINTS[self.waypoint];
        let dx = tx - fix.x;
        let dy = ty - fix.y;
        if (dx * dx + dy * dy).sqrt() < 10.0 {
            self.waypoint = (self.waypoint + 1) % WAYPOINTS.len();
        }

        let desired = dy.atan2(dx).to_degrees().rem_euclid(360.0);
        let mut error = desired - fix.heading;
        if error > 180.0 {
            error -= 360.0;
        } else if error < -180.0 {
            error += 360.0;
        }

        if error.abs() < 2.5 {
            api.set_motor_speeds(100, 100);
        } else if error < 0.0 {
            api.set_motor_speeds(100, 60);
        } else {
            api.set_motor_speeds(60, 100);
        }
        api.set_status_message(&format!("waypoint {}", self.waypoint));
    }
}
