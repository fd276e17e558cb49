//! Simulation subsystems, one per module, each a free `run` function over
//! the world and the ordered rosters. The engine calls them in a fixed order
//! every tick; that order is part of the observable contract.

pub mod collision;
pub mod damage;
pub mod energy;
pub mod motion;
pub mod sensors;
pub mod snapshot;
pub mod weapons;
