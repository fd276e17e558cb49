//! Fundamental geometric and coordinate types.
//!
//! Simulation space is centimetres with the origin at the bottom-left and
//! headings in standard-math degrees (0° = +x, counter-clockwise positive).
//! Mask space is screen pixels with y growing downward. The conversion
//! helpers here truncate the way the collision pipeline expects, so every
//! subsystem lands sprites on the same pixels.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{ARENA_HEIGHT_PX, PX_PER_CM};

/// Normalise an angle in degrees into [0, 360).
pub fn wrap_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Unit vector for a heading in degrees, in simulation coordinates.
pub fn heading_vec(heading_deg: f64) -> DVec2 {
    let radians = heading_deg.to_radians();
    DVec2::new(radians.cos(), radians.sin())
}

/// Simulation x (cm) to screen x (px), truncating.
pub fn screen_x(x_cm: f64) -> i32 {
    (x_cm * PX_PER_CM as f64) as i32
}

/// Simulation y (cm) to screen y (px). Screen y is inverted, and the
/// truncation happens after the inversion.
pub fn screen_y(y_cm: f64) -> i32 {
    (ARENA_HEIGHT_PX as f64 - y_cm * PX_PER_CM as f64) as i32
}

/// A positioning snapshot handed to agents that pay for a GPS query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    /// Centre x in cm.
    pub x: f64,
    /// Centre y in cm.
    pub y: f64,
    /// Heading in degrees, [0, 360).
    pub heading: f64,
}
