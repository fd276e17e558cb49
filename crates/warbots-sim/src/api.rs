//! The agent contract: the [`Bot`] callbacks and the [`Api`] dispatch
//! context.
//!
//! Exactly one robot is addressable for the duration of one callback; every
//! `Api` operation implicitly refers to it. Agents receive only values —
//! sensor samples, GPS fixes, bump bits, message payloads — never references
//! into the kernel. Operation refusals (not enough energy, bad port, bad
//! aim) come back as statuses; contract violations (setup-only calls during
//! the fight, oversized strings) abort the match with a message.

use hecs::Entity;
use rand::Rng;

use warbots_core::components::{
    Chassis, Mailbox, Nameplate, PowerCore, Sensor, SensorSuite, WeaponMounts,
};
use warbots_core::constants::*;
use warbots_core::enums::{GameState, SensorKind, SoundId, SystemKind, WeaponKind};
use warbots_core::types::{wrap_degrees, GpsFix};

use crate::engine::Engine;
use crate::masks;
use crate::projectile::Projectile;

/// A robot's decision routine.
///
/// `configure` runs once, during registration, while the match is still in
/// setup; it is the only place `add_sensor` may be called. `actions` runs
/// every order period with the milliseconds elapsed since the previous call.
/// Both must return promptly: the engine never pre-empts agent code, so an
/// agent that loops forever hangs the simulator.
pub trait Bot {
    fn configure(&mut self, _api: &mut Api<'_>) {}

    fn actions(&mut self, api: &mut Api<'_>, elapsed_ms: u32);
}

/// The dispatch context handed to agent callbacks: the engine plus the one
/// robot currently giving orders.
pub struct Api<'a> {
    engine: &'a mut Engine,
    robot: Entity,
}

impl<'a> Api<'a> {
    pub(crate) fn new(engine: &'a mut Engine, robot: Entity) -> Self {
        Self { engine, robot }
    }

    fn robot_name(&self) -> String {
        self.engine
            .world
            .get::<&Nameplate>(self.robot)
            .map(|plate| plate.name.clone())
            .unwrap_or_default()
    }

    // --- Drive ---

    /// Command the tread speeds, each silently clamped to [-100, 100].
    pub fn set_motor_speeds(&mut self, left: i32, right: i32) {
        if let Ok(chassis) = self.engine.world.query_one_mut::<&mut Chassis>(self.robot) {
            chassis.left_tread = left.clamp(-100, 100);
            chassis.right_tread = right.clamp(-100, 100);
        }
    }

    /// Fire the turbo boost if the shields can pay for it. A fresh boost
    /// discards whatever remained of a previous one.
    pub fn turbo_boost(&mut self) -> bool {
        let engine = &mut *self.engine;
        let Ok((chassis, core)) = engine
            .world
            .query_one_mut::<(&mut Chassis, &mut PowerCore)>(self.robot)
        else {
            return false;
        };
        if core.shields > TURBO_COST {
            core.shields -= TURBO_COST;
            chassis.turbo_ticks = TURBO_TIME_SECS * CALCS_PER_SEC;
            engine.sounds.request(SoundId::TurboBoost);
            true
        } else {
            false
        }
    }

    pub fn is_turbo_on(&self) -> bool {
        self.engine
            .world
            .get::<&Chassis>(self.robot)
            .map(|chassis| chassis.turbo_ticks > 0)
            .unwrap_or(false)
    }

    // --- Positioning ---

    /// Buy a position fix with shield energy. Fails with no state change
    /// when the shields cannot cover the cost.
    pub fn gps(&mut self) -> Option<GpsFix> {
        let Ok((chassis, core)) = self
            .engine
            .world
            .query_one_mut::<(&Chassis, &mut PowerCore)>(self.robot)
        else {
            return None;
        };
        if core.shields > GPS_COST {
            core.shields -= GPS_COST;
            Some(GpsFix {
                x: chassis.pos.x,
                y: chassis.pos.y,
                heading: chassis.heading,
            })
        } else {
            None
        }
    }

    // --- Sensors ---

    /// Install a sensor on an empty port. Setup-only; refuses bad ports,
    /// occupied ports, and out-of-bounds radar geometry.
    pub fn add_sensor(
        &mut self,
        port: usize,
        kind: SensorKind,
        angle: i32,
        width: i32,
        range: i32,
    ) -> bool {
        if self.engine.state != GameState::Setup {
            panic!(
                "{} called add_sensor() after setup; sensors can only be \
                 installed while the match is being configured",
                self.robot_name()
            );
        }
        if port >= MAX_SENSORS {
            return false;
        }
        let angle = angle.rem_euclid(360);
        let sensor = match kind {
            SensorKind::Radar => {
                if width < MIN_RADAR_ARC_DEG || width > MAX_RADAR_ARC_DEG {
                    return false;
                }
                if range < RADAR_MIN_RANGE_CM || range > RADAR_MAX_RANGE_CM {
                    return false;
                }
                Sensor::radar(angle, width, range)
            }
            SensorKind::Range => Sensor::range(angle),
        };
        let Ok(suite) = self
            .engine
            .world
            .query_one_mut::<&mut SensorSuite>(self.robot)
        else {
            return false;
        };
        if suite.slots[port].is_some() {
            return false;
        }
        suite.slots[port] = Some(sensor);
        true
    }

    /// Last sample of the sensor on `port`; -1 when the port is invalid or
    /// the sensor is absent, off, or unpowered.
    pub fn get_sensor(&self, port: usize) -> i32 {
        if port >= MAX_SENSORS {
            return -1;
        }
        let Ok(suite) = self.engine.world.get::<&SensorSuite>(self.robot) else {
            return -1;
        };
        match &suite.slots[port] {
            Some(sensor) if sensor.on && sensor.powered => sensor.data,
            _ => -1,
        }
    }

    /// Switch a sensor on or off. Off-sensors draw no energy.
    pub fn set_sensor_status(&mut self, port: usize, on: bool) {
        if port >= MAX_SENSORS {
            return;
        }
        if let Ok(suite) = self
            .engine
            .world
            .query_one_mut::<&mut SensorSuite>(self.robot)
        {
            if let Some(sensor) = &mut suite.slots[port] {
                sensor.on = on;
            }
        }
    }

    /// Accumulated bump bits since the last read; reading clears them.
    pub fn get_bump_info(&mut self) -> u8 {
        let Ok(suite) = self
            .engine
            .world
            .query_one_mut::<&mut SensorSuite>(self.robot)
        else {
            return BUMP_NONE;
        };
        let bumped = suite.bump_register;
        suite.bump_register = BUMP_NONE;
        bumped
    }

    // --- Weapons ---

    /// Fire a weapon at `aim` degrees off the body forward (normalised into
    /// (-360, 360)). Fails on a bad aim; failing on an under-min charge
    /// additionally dumps the charge as a penalty.
    pub fn fire_weapon(&mut self, kind: WeaponKind, aim: i32) -> bool {
        let engine = &mut *self.engine;
        let aim = aim % 360;

        let (projectile, firing_sound) = {
            let Ok((chassis, mounts)) = engine
                .world
                .query_one_mut::<(&Chassis, &mut WeaponMounts)>(self.robot)
            else {
                return false;
            };
            let mount = mounts.mount_mut(kind);
            if aim < -mount.max_angle || aim > mount.max_angle {
                return false;
            }
            if mount.charge_energy < mount.min_energy {
                // Pulling the trigger under-charged wastes the charge.
                mount.charge_energy = 0.0;
                return false;
            }

            let heading = wrap_degrees(chassis.heading - aim as f64);
            let projectile = Projectile {
                kind,
                owner: self.robot,
                pos: chassis.pos,
                heading,
                speed: mount.speed,
                energy: mount.charge_energy * (1.0 + mount.bonus_energy),
                splash_range: mount.splash_range,
                splash_damage: mount.splash_damage,
                bump_value: mount.bump_value,
                impact_sound: mount.impact_sound,
                mask: masks::weapon_mask(kind, heading),
            };
            let firing_sound = mount.firing_sound;
            mount.charge_energy = 0.0;
            (projectile, firing_sound)
        };

        tracing::debug!(?kind, energy = projectile.energy, "weapon fired");
        let entity = engine.world.spawn((projectile,));
        engine.weapons.push(entity);
        engine.sounds.request(firing_sound);
        true
    }

    // --- Energy ---

    /// Current stored energy of a capacitive system; -1 for the sensor
    /// system, which stores nothing.
    pub fn get_system_energy(&self, kind: SystemKind) -> f64 {
        match kind {
            SystemKind::Shields => self
                .engine
                .world
                .get::<&PowerCore>(self.robot)
                .map(|core| core.shields)
                .unwrap_or(-1.0),
            SystemKind::Lasers | SystemKind::Missiles => self
                .engine
                .world
                .get::<&WeaponMounts>(self.robot)
                .map(|mounts| {
                    let port = if kind == SystemKind::Lasers {
                        LASER_PORT
                    } else {
                        MISSILE_PORT
                    };
                    mounts.mounts[port].charge_energy
                })
                .unwrap_or(-1.0),
            SystemKind::Sensors => -1.0,
        }
    }

    /// Request a charge rate in units/min, clamped at 0 and the per-kind
    /// maximum. Sensors have fixed costs and no rate.
    pub fn set_system_charge_rate(&mut self, kind: SystemKind, rate: i32) {
        let rate = rate.max(0);
        match kind {
            SystemKind::Shields => {
                if let Ok(core) = self.engine.world.query_one_mut::<&mut PowerCore>(self.robot) {
                    core.shield_charge_rate = rate.min(MAX_SHIELD_CHARGE_RATE);
                }
            }
            SystemKind::Lasers => {
                if let Ok(mounts) = self
                    .engine
                    .world
                    .query_one_mut::<&mut WeaponMounts>(self.robot)
                {
                    mounts.mounts[LASER_PORT].charge_rate = rate.min(MAX_LASER_CHARGE_RATE);
                }
            }
            SystemKind::Missiles => {
                if let Ok(mounts) = self
                    .engine
                    .world
                    .query_one_mut::<&mut WeaponMounts>(self.robot)
                {
                    mounts.mounts[MISSILE_PORT].charge_rate = rate.min(MAX_MISSILE_CHARGE_RATE);
                }
            }
            SystemKind::Sensors => {}
        }
    }

    /// Replace the energy priority order. The argument must be a permutation
    /// of the four system kinds; otherwise nothing changes and `false` comes
    /// back.
    pub fn set_system_charge_priorities(
        &mut self,
        priorities: [SystemKind; NUM_ENERGY_SYSTEMS],
    ) -> bool {
        for i in 0..NUM_ENERGY_SYSTEMS {
            for j in i + 1..NUM_ENERGY_SYSTEMS {
                if priorities[i] == priorities[j] {
                    return false;
                }
            }
        }
        match self.engine.world.query_one_mut::<&mut PowerCore>(self.robot) {
            Ok(core) => {
                core.priorities = priorities;
                true
            }
            Err(_) => false,
        }
    }

    /// Remaining generator structure.
    pub fn generator_structure(&self) -> i32 {
        self.engine
            .world
            .get::<&PowerCore>(self.robot)
            .map(|core| core.structure as i32)
            .unwrap_or(0)
    }

    /// Current generator output in units/min.
    pub fn generator_output(&self) -> i32 {
        self.engine
            .world
            .get::<&PowerCore>(self.robot)
            .map(|core| core.generator_output() as i32)
            .unwrap_or(0)
    }

    // --- Messaging & status ---

    /// Queue a 32-bit payload for a live robot by name. Best effort: false
    /// when no live robot carries the name.
    pub fn send_message(&mut self, recipient: &str, data: i32) -> bool {
        if recipient.len() > MAX_NAME_LEN {
            panic!(
                "{} passed a recipient name longer than {} bytes to send_message()",
                self.robot_name(),
                MAX_NAME_LEN
            );
        }
        let engine = &mut *self.engine;
        let target = engine.live.iter().copied().find(|&entity| {
            engine
                .world
                .get::<&Nameplate>(entity)
                .map(|plate| plate.name == recipient)
                .unwrap_or(false)
        });
        match target {
            Some(entity) => match engine.world.query_one_mut::<&mut Mailbox>(entity) {
                Ok(mailbox) => {
                    mailbox.queue.push_back(data);
                    true
                }
                Err(_) => false,
            },
            None => false,
        }
    }

    /// Pop the oldest message from this robot's mailbox.
    pub fn get_message(&mut self) -> Option<i32> {
        self.engine
            .world
            .query_one_mut::<&mut Mailbox>(self.robot)
            .ok()?
            .queue
            .pop_front()
    }

    /// Set the status message shown next to the robot.
    pub fn set_status_message(&mut self, message: &str) {
        if message.len() >= STATUS_MSG_LEN {
            panic!(
                "{} set a status message that does not fit in {} bytes",
                self.robot_name(),
                STATUS_MSG_LEN
            );
        }
        if let Ok(plate) = self.engine.world.query_one_mut::<&mut Nameplate>(self.robot) {
            plate.status = message.to_string();
        }
    }

    /// A uniformly random value in [0, upper) from the match RNG, so agent
    /// randomness stays reproducible under the match seed.
    pub fn random(&mut self, upper: f64) -> f64 {
        self.engine.rng.gen::<f64>() * upper
    }
}
