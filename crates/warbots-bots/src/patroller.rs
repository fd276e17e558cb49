//! A rangefinder-and-missiles prowler.

use warbots_core::constants::{BUMP_MISSILE, BUMP_WALL, MIN_MISSILE_ENERGY};
use warbots_core::enums::{SensorKind, SystemKind, WeaponKind};
use warbots_sim::{Api, Bot};

/// Arcs around the floor on uneven treads. Anything the rangefinder picks
/// up inside missile distance gets a missile; hitting a wall triggers a
/// blind come-about, and taking a missile hit triggers the turbo boost.
pub struct Patroller {
    turns_left: u32,
}

impl Patroller {
    pub fn new() -> Self {
        Self { turns_left: 0 }
    }
}

impl Default for Patroller {
    fn default() -> Self {
        Self::new()
    }
}

impl Bot for Patroller {
    fn configure(&mut self, api: &mut Api<'_>) {
        api.add_sensor(0, SensorKind::Range, 0, 0, 0);
        api.set_system_charge_priorities([
            SystemKind::Missiles,
            SystemKind::Shields,
            SystemKind::Sensors,
            SystemKind::Lasers,
        ]);
    }

    fn actions(&mut self, api: &mut Api<'_>, _elapsed_ms: u32) {
        api.set_system_charge_rate(SystemKind::Missiles, 600);
        api.set_system_charge_rate(SystemKind::Shields, 300);

        let bump = api.get_bump_info();
        if bump & BUMP_MISSILE != 0 {
            api.turbo_boost();
        }
        if bump & BUMP_WALL != 0 {
            self.turns_left = 2;
        }

        if self.turns_left > 0 {
            self.turns_left -= 1;
            api.set_motor_speeds(-70, 70);
            api.set_status_message("coming about");
            return;
        }

        let contact = api.get_sensor(0);
        if (0..100).contains(&contact) {
            if api.get_system_energy(SystemKind::Missiles) >= MIN_MISSILE_ENERGY {
                api.fire_weapon(WeaponKind::Missile, 0);
                api.set_status_message("missile away");
            } else {
                api.set_status_message("tube charging");
            }
            // Jink while the tube recharges.
            api.set_motor_speeds(40, 100);
        } else {
            api.set_motor_speeds(100, 85);
            api.set_status_message("prowling");
        }
    }
}
