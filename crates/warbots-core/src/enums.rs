//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};
use warbots_mask::Color;

/// Robot hull colours available at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Turquoise,
    White,
}

impl RobotColor {
    /// The RGB value drawn into masks of this colour.
    pub fn rgb(self) -> Color {
        match self {
            RobotColor::Red => Color::rgb(255, 0, 0),
            RobotColor::Green => Color::rgb(0, 255, 0),
            RobotColor::Blue => Color::rgb(0, 0, 255),
            RobotColor::Yellow => Color::rgb(255, 255, 0),
            RobotColor::Purple => Color::rgb(255, 0, 240),
            RobotColor::Turquoise => Color::rgb(0, 255, 255),
            RobotColor::White => Color::rgb(255, 255, 255),
        }
    }
}

/// Sensor hardware kinds an agent can install during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    /// Fan-shaped proximity detector; reads 1 when another robot is inside
    /// the fan, 0 otherwise.
    Radar,
    /// Single-ray rangefinder; reads the cm distance to the first
    /// obstruction, or its maximum range.
    Range,
}

/// Weapon kinds. Each robot carries one mount of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Missile,
    Laser,
}

/// The four energy systems competing for the generator pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    Shields,
    Sensors,
    Lasers,
    Missiles,
}

impl SystemKind {
    /// Default charge priority order.
    pub const DEFAULT_PRIORITIES: [SystemKind; 4] = [
        SystemKind::Shields,
        SystemKind::Sensors,
        SystemKind::Lasers,
        SystemKind::Missiles,
    ];
}

/// Top-level match state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Accepting robot registration and sensor installs.
    #[default]
    Setup,
    /// The tick loop is running.
    Fighting,
    /// Drained; the host has ended the match.
    Over,
}

/// Sound-effect identifiers the kernel can request from the mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundId {
    LaserFire,
    LaserHit,
    MissileFire,
    MissileHit,
    FightStart,
    RobotsCollide,
    RobotExplode,
    TurboBoost,
}

impl SoundId {
    pub const COUNT: usize = 8;

    pub const ALL: [SoundId; SoundId::COUNT] = [
        SoundId::LaserFire,
        SoundId::LaserHit,
        SoundId::MissileFire,
        SoundId::MissileHit,
        SoundId::FightStart,
        SoundId::RobotsCollide,
        SoundId::RobotExplode,
        SoundId::TurboBoost,
    ];

    /// Stable index into the request-flag array.
    pub fn index(self) -> usize {
        match self {
            SoundId::LaserFire => 0,
            SoundId::LaserHit => 1,
            SoundId::MissileFire => 2,
            SoundId::MissileHit => 3,
            SoundId::FightStart => 4,
            SoundId::RobotsCollide => 5,
            SoundId::RobotExplode => 6,
            SoundId::TurboBoost => 7,
        }
    }
}
