//! The WARBOTS simulation kernel.
//!
//! `Engine` owns the hecs ECS world, the live/destroyed/weapon rosters, the
//! sound-request flags, and the particle field, and advances everything at a
//! fixed calculation rate. Agent code plugs in through the [`Bot`] trait and
//! drives its robot through the [`Api`] dispatch context. Completely headless
//! (no window, sound, or file I/O), enabling deterministic testing: the same
//! seed and the same bots produce the same match.

pub mod api;
pub mod clock;
pub mod engine;
pub mod masks;
pub mod particles;
pub mod projectile;
pub mod systems;

pub use api::{Api, Bot};
pub use engine::{Engine, SetupError, SimConfig};

#[cfg(test)]
mod tests;
