//! Arena snapshot — the scalar visible state, rebuilt after each tick.
//!
//! Snapshots cover everything a textual display or a determinism check
//! needs. Masks are deliberately absent; renderers read those through the
//! engine's accessors at frame time.

use serde::{Deserialize, Serialize};
use warbots_mask::Color;

use crate::enums::{GameState, SoundId, WeaponKind};

/// Complete scalar state of the arena at the end of a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub state: GameState,
    pub tick: u64,
    /// Live robots in registration order.
    pub robots: Vec<RobotView>,
    /// Destroyed robots in destruction order.
    pub destroyed: Vec<RobotView>,
    /// In-flight weapons in fire order.
    pub weapons: Vec<WeaponView>,
    /// Sound requests pending at snapshot time.
    pub sounds: Vec<SoundId>,
}

/// One robot's visible state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotView {
    pub name: String,
    pub number: usize,
    pub color: Color,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub left_tread: i32,
    pub right_tread: i32,
    pub shields: f64,
    pub structure: i32,
    pub laser_energy: f64,
    pub missile_energy: f64,
    pub turbo: bool,
    pub status: String,
}

/// One in-flight weapon's visible state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub energy: f64,
}
