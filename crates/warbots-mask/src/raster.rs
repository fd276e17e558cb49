//! Drawing primitives on masks: discs, lines, flood fill, rotation, crops.
//!
//! These mirror the small set of bitmap operations the sprite pipelines
//! need: a filled disc plus two erased radials plus a flood fill builds a
//! radar fan; a rotation builds an oriented chassis or projectile sprite.

use crate::mask::{Color, Mask};

impl Mask {
    /// Fill a disc of radius `r` centred on (cx, cy).
    pub fn fill_disc(&mut self, cx: i32, cy: i32, r: i32, cell: Option<Color>) {
        let r2 = r * r;
        for y in (cy - r).max(0)..=(cy + r).min(self.height() - 1) {
            for x in (cx - r).max(0)..=(cx + r).min(self.width() - 1) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r2 {
                    self.set(x, y, cell);
                }
            }
        }
    }

    /// Fill an axis-aligned rectangle, inclusive of both corners.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, cell: Option<Color>) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.set(x, y, cell);
            }
        }
    }

    /// Bresenham line from (x0, y0) to (x1, y1), writing `cell` along it.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, cell: Option<Color>) {
        crate::line::walk_line(glam::IVec2::new(x0, y0), glam::IVec2::new(x1, y1), |p| {
            self.set(p.x, p.y, cell);
            false
        });
    }

    /// Flood fill (4-connected) the region containing (x, y) with `cell`.
    /// A seed outside the grid, or whose region is already `cell`, is a no-op.
    pub fn flood_fill(&mut self, x: i32, y: i32, cell: Option<Color>) {
        if !self.in_bounds(x, y) {
            return;
        }
        let target = self.get(x, y);
        if target == cell {
            return;
        }
        let mut stack = vec![(x, y)];
        while let Some((px, py)) = stack.pop() {
            if !self.in_bounds(px, py) || self.get(px, py) != target {
                continue;
            }
            self.set(px, py, cell);
            stack.push((px - 1, py));
            stack.push((px + 1, py));
            stack.push((px, py - 1));
            stack.push((px, py + 1));
        }
    }

    /// Sprite-draw `src` onto `self` with its top-left at (dx, dy):
    /// opaque cells overwrite, transparent cells leave the target alone.
    pub fn blit(&mut self, src: &Mask, dx: i32, dy: i32) {
        for y in 0..src.height() {
            for x in 0..src.width() {
                if let Some(c) = src.get(x, y) {
                    self.set(dx + x, dy + y, Some(c));
                }
            }
        }
    }

    /// Copy a `self.width() × self.height()` window of `src`, whose top-left
    /// sits at (left, top) in `src`, into `self`. Transparent cells copy too;
    /// out-of-range source cells read transparent.
    pub fn copy_window(&mut self, src: &Mask, left: i32, top: i32) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set(x, y, src.get(left + x, top + y));
            }
        }
    }

    /// The mask rotated clockwise on screen by `degrees`, about its centre.
    ///
    /// Inverse nearest-neighbour mapping into a same-size mask; cells that
    /// map outside the source read transparent. Good enough for the small
    /// sprites this engine rotates.
    pub fn rotated(&self, degrees: f64) -> Mask {
        let mut out = Mask::new(self.width(), self.height());
        let cx = (self.width() - 1) as f64 / 2.0;
        let cy = (self.height() - 1) as f64 / 2.0;
        let rad = degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        for y in 0..out.height() {
            for x in 0..out.width() {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                // Screen coordinates have y down, so this is the clockwise
                // inverse map.
                let sx = (dx * cos + dy * sin + cx).round() as i32;
                let sy = (-dx * sin + dy * cos + cy).round() as i32;
                out.set(x, y, self.get(sx, sy));
            }
        }
        out
    }
}
