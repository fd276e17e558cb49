//! ECS components for robot entities.
//!
//! Components are plain data; the subsystem functions in the sim crate hold
//! all the behaviour. A robot entity carries one of each of these.

use std::collections::VecDeque;

use glam::{DVec2, IVec2};
use warbots_mask::{Color, Mask};

use crate::constants::*;
use crate::enums::{SensorKind, SoundId, SystemKind, WeaponKind};

/// Drive state: where the robot is and how its treads are commanded.
#[derive(Debug, Clone)]
pub struct Chassis {
    /// Centre position in cm.
    pub pos: DVec2,
    /// Heading in degrees, [0, 360).
    pub heading: f64,
    /// Left tread command, [-100, 100] percent of max speed.
    pub left_tread: i32,
    /// Right tread command, [-100, 100].
    pub right_tread: i32,
    /// Heading of the externally applied push, degrees.
    pub impulse_heading: f64,
    /// Speed of the externally applied push (cm/s); decays by friction.
    pub impulse_speed: f64,
    /// Remaining turbo boost, in ticks.
    pub turbo_ticks: u32,
}

impl Chassis {
    pub fn new(pos: DVec2, heading: f64) -> Self {
        Self {
            pos,
            heading,
            left_tread: 0,
            right_tread: 0,
            impulse_heading: 0.0,
            impulse_speed: 0.0,
            turbo_ticks: 0,
        }
    }
}

/// Generator, shield capacitor, and the damage bank.
#[derive(Debug, Clone)]
pub struct PowerCore {
    /// Shield capacitor energy, [0, MAX_SHIELD_ENERGY].
    pub shields: f64,
    /// Requested shield charge rate, units/min.
    pub shield_charge_rate: i32,
    /// Generator structure; the robot is destroyed at 0.
    pub structure: f64,
    /// Damage waiting to be applied at the end of the tick.
    pub damage_bank: f64,
    /// Energy allocation order, a permutation of the four system kinds.
    pub priorities: [SystemKind; NUM_ENERGY_SYSTEMS],
}

impl PowerCore {
    pub fn new() -> Self {
        Self {
            shields: START_SHIELD_ENERGY,
            shield_charge_rate: 0,
            structure: MAX_GENERATOR_STRUCTURE,
            damage_bank: 0.0,
            priorities: SystemKind::DEFAULT_PRIORITIES,
        }
    }

    /// Current generator output in units/min, scaled by remaining structure.
    pub fn generator_output(&self) -> f64 {
        self.structure * GENERATOR_CAPACITY / MAX_GENERATOR_STRUCTURE
    }
}

impl Default for PowerCore {
    fn default() -> Self {
        Self::new()
    }
}

/// One installed sensor.
#[derive(Debug, Clone)]
pub struct Sensor {
    pub kind: SensorKind,
    /// Mount angle relative to the body forward, degrees.
    pub angle: i32,
    /// Fan width in degrees (radar only).
    pub width: i32,
    /// Detection range in cm.
    pub range: i32,
    /// Agent-controlled on/off.
    pub on: bool,
    /// Engine-controlled: whether the energy pass powered it this tick.
    pub powered: bool,
    /// Last sample; -1 when off or unpowered.
    pub data: i32,
    /// Offset of the robot centre inside `mask` (radar only); the fan is
    /// drawn on screen at robot-centre − offset.
    pub draw_offset: IVec2,
    /// The fan mask (radar only).
    pub mask: Option<Mask>,
    /// Heading the fan was last rasterised at, to skip redundant rasters.
    pub rastered_heading: Option<f64>,
}

impl Sensor {
    pub fn radar(angle: i32, width: i32, range: i32) -> Self {
        Self {
            kind: SensorKind::Radar,
            angle,
            width,
            range,
            on: true,
            powered: false,
            data: -1,
            draw_offset: IVec2::ZERO,
            mask: Some(Mask::new(RADAR_IMAGE_PX, RADAR_IMAGE_PX)),
            rastered_heading: None,
        }
    }

    pub fn range(angle: i32) -> Self {
        Self {
            kind: SensorKind::Range,
            angle,
            width: 0,
            range: RANGE_MAX_RANGE_CM,
            on: true,
            powered: false,
            data: -1,
            draw_offset: IVec2::ZERO,
            mask: None,
            rastered_heading: None,
        }
    }
}

/// The sensor ports plus the free bump register.
#[derive(Debug, Clone, Default)]
pub struct SensorSuite {
    pub slots: [Option<Sensor>; MAX_SENSORS],
    /// Collision sources observed since the last read; cleared on read.
    pub bump_register: u8,
}

/// A weapon system mounted on the robot, accumulating charge until fired.
#[derive(Debug, Clone)]
pub struct WeaponSystem {
    pub kind: WeaponKind,
    /// Maximum aim angle off the body forward, degrees.
    pub max_angle: i32,
    /// Minimum charge required to fire.
    pub min_energy: f64,
    /// Charge cap.
    pub max_energy: f64,
    /// Bonus multiplier applied to the charge at fire time.
    pub bonus_energy: f64,
    pub splash_range: f64,
    pub splash_damage: f64,
    /// Projectile speed, cm/s.
    pub speed: f64,
    /// Requested charge rate, units/min.
    pub charge_rate: i32,
    /// Charge accumulated so far.
    pub charge_energy: f64,
    /// Bit recorded in the victim's bump register on impact.
    pub bump_value: u8,
    pub firing_sound: SoundId,
    pub impact_sound: SoundId,
}

impl WeaponSystem {
    pub fn laser() -> Self {
        Self {
            kind: WeaponKind::Laser,
            max_angle: LASER_MAX_ANGLE,
            min_energy: MIN_LASER_ENERGY,
            max_energy: MAX_LASER_ENERGY,
            bonus_energy: LASER_ENERGY_BONUS,
            splash_range: LASER_SPLASH_RANGE_CM,
            splash_damage: LASER_SPLASH_DAMAGE,
            speed: LASER_SPEED_CM_S,
            charge_rate: 0,
            charge_energy: 0.0,
            bump_value: BUMP_LASER,
            firing_sound: SoundId::LaserFire,
            impact_sound: SoundId::LaserHit,
        }
    }

    pub fn missile() -> Self {
        Self {
            kind: WeaponKind::Missile,
            max_angle: MISSILE_MAX_ANGLE,
            min_energy: MIN_MISSILE_ENERGY,
            max_energy: MAX_MISSILE_ENERGY,
            bonus_energy: MISSILE_ENERGY_BONUS,
            splash_range: MISSILE_SPLASH_RANGE_CM,
            splash_damage: MISSILE_SPLASH_DAMAGE,
            speed: MISSILE_SPEED_CM_S,
            charge_rate: 0,
            charge_energy: 0.0,
            bump_value: BUMP_MISSILE,
            firing_sound: SoundId::MissileFire,
            impact_sound: SoundId::MissileHit,
        }
    }
}

/// Both weapon mounts, indexed by `MISSILE_PORT` and `LASER_PORT`.
#[derive(Debug, Clone)]
pub struct WeaponMounts {
    pub mounts: [WeaponSystem; MAX_WEAPONS],
}

impl WeaponMounts {
    pub fn new() -> Self {
        Self {
            mounts: [WeaponSystem::missile(), WeaponSystem::laser()],
        }
    }

    pub fn mount(&self, kind: WeaponKind) -> &WeaponSystem {
        match kind {
            WeaponKind::Missile => &self.mounts[MISSILE_PORT],
            WeaponKind::Laser => &self.mounts[LASER_PORT],
        }
    }

    pub fn mount_mut(&mut self, kind: WeaponKind) -> &mut WeaponSystem {
        match kind {
            WeaponKind::Missile => &mut self.mounts[MISSILE_PORT],
            WeaponKind::Laser => &mut self.mounts[LASER_PORT],
        }
    }
}

impl Default for WeaponMounts {
    fn default() -> Self {
        Self::new()
    }
}

/// FIFO of 32-bit payloads addressed to this robot by name.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    pub queue: VecDeque<i32>,
}

/// Identity and display state.
#[derive(Debug, Clone)]
pub struct Nameplate {
    pub name: String,
    /// Registration index, used for display ordering.
    pub number: usize,
    pub color: Color,
    /// Agent-set status message, ≤ STATUS_MSG_LEN bytes.
    pub status: String,
}

/// The robot's collision mask and the upright chassis glyph it is composed
/// from. The mask is re-rasterised whenever the heading changes, before any
/// collision query runs.
#[derive(Debug, Clone)]
pub struct BodyMask {
    pub mask: Mask,
    /// Upright (heading 90°) chassis artwork, default or custom.
    pub glyph: Mask,
    /// Heading the mask was last rasterised at.
    pub rastered_heading: Option<f64>,
}

impl BodyMask {
    pub fn new(glyph: Mask) -> Self {
        Self {
            mask: Mask::new(SHIELD_BMP_SZ, SHIELD_BMP_SZ),
            glyph,
            rastered_heading: None,
        }
    }
}
