//! Bresenham line walking with an early-exit predicate.

use glam::IVec2;

/// Walk every grid point on the line from `from` to `to` (inclusive), in
/// order, calling `hit` at each point. Returns the first point for which
/// `hit` is true, or `None` if the walk completes.
///
/// The ray-cast sensors use this to find the nearest obstruction along a
/// bearing; the raster code uses it with an always-false predicate to draw.
pub fn walk_line(from: IVec2, to: IVec2, mut hit: impl FnMut(IVec2) -> bool) -> Option<IVec2> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = from;

    loop {
        if hit(p) {
            return Some(p);
        }
        if p == to {
            return None;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
}
