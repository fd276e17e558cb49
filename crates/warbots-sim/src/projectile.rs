//! The in-flight weapon component.
//!
//! A `Projectile` is born from a charged weapon mount at fire time and lives
//! as its own entity on the weapon roster until it hits a robot or the wall,
//! in the same tick as the impact.

use glam::DVec2;
use hecs::Entity;
use warbots_mask::Mask;

use warbots_core::enums::{SoundId, WeaponKind};

/// A weapon in ballistic flight.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub kind: WeaponKind,
    /// The robot that fired this weapon. It is never hit by it, directly or
    /// by splash.
    pub owner: Entity,
    /// Centre position in cm.
    pub pos: DVec2,
    /// Flight heading in degrees, [0, 360).
    pub heading: f64,
    /// Speed in cm/s.
    pub speed: f64,
    /// Energy delivered on a direct hit: charge × (1 + bonus), fixed at
    /// fire time.
    pub energy: f64,
    pub splash_range: f64,
    pub splash_damage: f64,
    /// Bit recorded in the victim's bump register.
    pub bump_value: u8,
    pub impact_sound: SoundId,
    /// Oriented sprite mask, rasterised once at fire time.
    pub mask: Mask,
}
