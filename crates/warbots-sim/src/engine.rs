//! Simulation engine — the core of the match.
//!
//! `Engine` owns the hecs world plus the ordered rosters that make iteration
//! deterministic: `live` (registration order), `destroyed` (destruction
//! order), and `weapons` (fire order). Systems never iterate ECS queries
//! directly; they walk these vectors, so allocation order inside hecs can
//! never leak into observable behaviour.
//!
//! One call to [`Engine::tick`] runs one calculation step: energy, motion,
//! body masks, robot collisions, weapon flight, weapon collisions, damage,
//! radar masks, sensors, particles — in that order, always — and every
//! `ORDER_FREQ`-th step finishes by dispatching the agent callbacks.

use std::collections::HashMap;

use glam::DVec2;
use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use warbots_core::components::{
    BodyMask, Chassis, Mailbox, Nameplate, PowerCore, SensorSuite, WeaponMounts,
};
use warbots_core::constants::*;
use warbots_core::enums::{GameState, RobotColor, SoundId};
use warbots_core::events::SoundRequests;
use warbots_core::state::ArenaSnapshot;
use warbots_core::types::wrap_degrees;
use warbots_mask::Mask;

use crate::api::{Api, Bot};
use crate::masks;
use crate::particles::{Particle, ParticleField};
use crate::systems;

/// Configuration for starting a new match.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed + same bots = same match.
    pub seed: u64,
    /// Whether to produce particle data for renderers. Headless runs can
    /// switch it off and skip the work entirely.
    pub emit_particles: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            emit_particles: true,
        }
    }
}

/// Failures surfaced to the embedding during match setup. These indicate an
/// unusable configuration; the expected host response is to report the
/// message and exit.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("robots can only be registered during setup")]
    NotInSetup,
    #[error("the roster already holds the maximum number of robots")]
    RosterFull,
    #[error("robot name `{name}` is longer than {max} bytes")]
    NameTooLong { name: String, max: usize },
    #[error("no clear spot found for a robot after {attempts} attempts")]
    NoRoom { attempts: u32 },
}

/// The simulation engine. Owns all robots, weapons, sensors, and masks;
/// agents and renderers only ever see values or short-lived borrows.
pub struct Engine {
    pub(crate) world: World,
    pub(crate) state: GameState,
    ticks: u64,
    calcs_until_orders: u32,
    pub(crate) live: Vec<Entity>,
    pub(crate) destroyed: Vec<Entity>,
    pub(crate) weapons: Vec<Entity>,
    bots: HashMap<Entity, Box<dyn Bot>>,
    pub(crate) sounds: SoundRequests,
    pub(crate) particles: ParticleField,
    pub(crate) rng: ChaCha8Rng,
}

impl Engine {
    /// Create an engine in the setup state.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            state: GameState::Setup,
            ticks: 0,
            calcs_until_orders: 0,
            live: Vec::new(),
            destroyed: Vec::new(),
            weapons: Vec::new(),
            bots: HashMap::new(),
            sounds: SoundRequests::new(),
            particles: ParticleField::new(config.emit_particles),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    // --- Setup ---

    /// Register a robot. Setup-only. `position`/`heading` of `None` pick a
    /// clear random spot and a random bearing. The bot's `configure`
    /// callback runs before this returns, with the new robot current.
    pub fn register_robot(
        &mut self,
        name: &str,
        color: RobotColor,
        mut bot: Box<dyn Bot>,
        chassis_glyph: Option<Mask>,
        position: Option<DVec2>,
        heading: Option<f64>,
    ) -> Result<Entity, SetupError> {
        if self.state != GameState::Setup {
            return Err(SetupError::NotInSetup);
        }
        if self.live.len() >= MAX_ROBOTS {
            return Err(SetupError::RosterFull);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(SetupError::NameTooLong {
                name: name.to_string(),
                max: MAX_NAME_LEN,
            });
        }

        let number = self.live.len();
        let rgb = color.rgb();
        let pos = match position {
            Some(p) => p,
            None => self.choose_random_location(None)?,
        };
        let heading = match heading {
            Some(h) => wrap_degrees(h),
            None => self.rng.gen::<f64>() * 360.0,
        };
        let glyph = chassis_glyph.unwrap_or_else(|| masks::default_chassis_glyph(rgb));

        let entity = self.world.spawn((
            Chassis::new(pos, heading),
            PowerCore::new(),
            SensorSuite::default(),
            WeaponMounts::new(),
            Mailbox::default(),
            Nameplate {
                name: name.to_string(),
                number,
                color: rgb,
                status: String::new(),
            },
            BodyMask::new(glyph),
        ));
        self.live.push(entity);
        tracing::info!(name, number, "robot registered");

        {
            let mut api = Api::new(self, entity);
            bot.configure(&mut api);
        }
        self.bots.insert(entity, bot);
        Ok(entity)
    }

    /// Setup → Fighting. Ignored from any other state.
    pub fn start_fight(&mut self) {
        if self.state == GameState::Setup {
            self.state = GameState::Fighting;
            self.sounds.request(SoundId::FightStart);
            tracing::info!(robots = self.live.len(), "fight started");
        }
    }

    /// Fighting → Over. Ignored from any other state. A match never ends on
    /// its own; this is the host's call.
    pub fn end_fight(&mut self) {
        if self.state == GameState::Fighting {
            self.state = GameState::Over;
            tracing::info!(tick = self.ticks, "fight over");
        }
    }

    /// Re-randomise every live robot's position and heading.
    pub fn scatter_robots(&mut self) -> Result<(), SetupError> {
        for i in 0..self.live.len() {
            let entity = self.live[i];
            let pos = self.choose_random_location(Some(entity))?;
            let heading = self.rng.gen::<f64>() * 360.0;
            if let Ok(chassis) = self.world.query_one_mut::<&mut Chassis>(entity) {
                chassis.pos = pos;
                chassis.heading = heading;
            }
        }
        Ok(())
    }

    /// Pick a spot whose shield disc clears every other placed robot by the
    /// minimum spacing, or give up after the attempt budget.
    fn choose_random_location(&mut self, exclude: Option<Entity>) -> Result<DVec2, SetupError> {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let x = SHIELD_RAD_CM + self.rng.gen::<f64>() * (ARENA_WIDTH_CM - SHIELD_RAD_CM * 2.0);
            let y = SHIELD_RAD_CM + self.rng.gen::<f64>() * (ARENA_HEIGHT_CM - SHIELD_RAD_CM * 2.0);
            let candidate = DVec2::new(x, y);

            let clear = self.live.iter().all(|&other| {
                if Some(other) == exclude {
                    return true;
                }
                match self.world.get::<&Chassis>(other) {
                    Ok(chassis) => {
                        chassis.pos.distance(candidate) >= SHIELD_RAD_CM * 2.0 + MIN_RANDOM_DIST_CM
                    }
                    Err(_) => true,
                }
            });
            if clear {
                return Ok(candidate);
            }
        }
        Err(SetupError::NoRoom {
            attempts: PLACEMENT_ATTEMPTS,
        })
    }

    // --- The tick loop ---

    /// Advance the simulation by one calculation step. Does nothing unless
    /// the match is in the fighting state.
    pub fn tick(&mut self) {
        if self.state != GameState::Fighting {
            return;
        }

        // The subsystem order is fixed and observable: a weapon fired during
        // agent dispatch at the end of step N first moves in step N+1, and
        // damage banked by any collision lands before the sensors sample.
        systems::energy::run(&mut self.world, &self.live);
        systems::motion::run(&mut self.world, &self.live, &mut self.particles, &mut self.rng);
        masks::refresh_body_masks(&mut self.world, &self.live);
        systems::collision::robots(
            &mut self.world,
            &self.live,
            &mut self.sounds,
            &mut self.particles,
            &mut self.rng,
        );
        systems::weapons::run(&mut self.world, &self.weapons, &mut self.particles, &mut self.rng);
        systems::collision::weapons(
            &mut self.world,
            &self.live,
            &mut self.weapons,
            &mut self.sounds,
            &mut self.particles,
            &mut self.rng,
        );
        systems::damage::run(
            &mut self.world,
            &mut self.live,
            &mut self.destroyed,
            &mut self.sounds,
            &mut self.particles,
            &mut self.rng,
        );
        masks::refresh_radar_masks(&mut self.world, &self.live);
        systems::sensors::run(&mut self.world, &self.live);
        self.particles.advance();

        self.ticks += 1;
        self.calcs_until_orders += 1;
        if self.calcs_until_orders == ORDER_FREQ {
            self.calcs_until_orders = 0;
            self.dispatch_orders();
        }
    }

    /// Call each live robot's actions callback, in registration order, with
    /// that robot current.
    fn dispatch_orders(&mut self) {
        let roster = self.live.clone();
        for entity in roster {
            if !self.live.contains(&entity) {
                continue;
            }
            let Some(mut bot) = self.bots.remove(&entity) else {
                continue;
            };
            {
                let mut api = Api::new(self, entity);
                bot.actions(&mut api, TURN_TIME_MS);
            }
            self.bots.insert(entity, bot);
        }
    }

    // --- Read access for hosts and renderers ---

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Completed simulation steps.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Live robots, in registration order.
    pub fn live_robots(&self) -> &[Entity] {
        &self.live
    }

    /// Destroyed robots, in destruction order. Kept until teardown.
    pub fn destroyed_robots(&self) -> &[Entity] {
        &self.destroyed
    }

    /// In-flight weapons, in fire order.
    pub fn weapons_in_flight(&self) -> &[Entity] {
        &self.weapons
    }

    pub fn sound_requests(&self) -> &SoundRequests {
        &self.sounds
    }

    /// Mutable access for the mixer, which clears the flags it has played.
    pub fn sound_requests_mut(&mut self) -> &mut SoundRequests {
        &mut self.sounds
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.all()
    }

    /// A robot's current body mask (also its visual sprite).
    pub fn body_mask(&self, robot: Entity) -> Option<hecs::Ref<'_, BodyMask>> {
        self.world.get::<&BodyMask>(robot).ok()
    }

    /// A robot's sensor suite: fan masks, draw offsets, on/powered flags.
    pub fn sensor_suite(&self, robot: Entity) -> Option<hecs::Ref<'_, SensorSuite>> {
        self.world.get::<&SensorSuite>(robot).ok()
    }

    /// Look up a live robot by name.
    pub fn find_robot(&self, name: &str) -> Option<Entity> {
        self.live.iter().copied().find(|&entity| {
            self.world
                .get::<&Nameplate>(entity)
                .map(|plate| plate.name == name)
                .unwrap_or(false)
        })
    }

    /// Scalar state of everything, for displays and determinism checks.
    pub fn snapshot(&self) -> ArenaSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.live,
            &self.destroyed,
            &self.weapons,
            self.state,
            self.ticks,
            &self.sounds,
        )
    }

    // --- Test access ---

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
