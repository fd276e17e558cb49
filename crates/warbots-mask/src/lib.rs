//! Pixel-mask geometry primitives for the arena.
//!
//! A [`Mask`] is a small grid of transparent-or-coloured cells. Masks are the
//! collision truth of the simulation: robots, projectiles, and radar fans are
//! all rasterised into masks, and every "did these touch?" question is
//! answered by [`overlap`] (bounding-box reject, then a pixel walk over the
//! smaller sprite) or by [`walk_line`] (a Bresenham walk with an early-exit
//! predicate). No rendering happens here; renderers may blit the same masks.

pub mod line;
pub mod mask;
mod raster;

pub use line::walk_line;
pub use mask::{overlap, Color, Mask};
