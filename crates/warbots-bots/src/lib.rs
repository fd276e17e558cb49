//! Sample decision routines for the arena.
//!
//! Two stock opponents: [`Sweeper`] hunts with a pair of radar beams and a
//! laser, [`Patroller`] prowls the floor with its rangefinder and missiles.
//! Both are deliberately simple; they exist to exercise the agent operation
//! set and to give new bots something to lose to.

mod patroller;
mod sweeper;

pub use patroller::Patroller;
pub use sweeper::Sweeper;
