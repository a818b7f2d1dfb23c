//! Hot pixels, and the registry that keeps at most one of them per grid cell.
//!
//! A hot pixel is the grid cell around a grid point that some vertex or some
//! intersection point rounds to. Snap rounding forces every segment that
//! passes through a hot pixel to pass through the pixel's center.

use std::collections::HashMap;

use crate::{
    geom::Point,
    num::{orientation_xy, Orientation},
    precision::PrecisionModel,
};

// Half the width of a pixel, in grid units.
const HALF: f64 = 0.5;

/// The grid cell around a grid point.
///
/// In grid units, the pixel centered at `(cx, cy)` is the half-open square
/// `[cx - 1/2, cx + 1/2) x [cy - 1/2, cy + 1/2)`: its left and bottom sides
/// belong to it, but its top and right sides belong to its neighbors. That
/// way, every point in the plane belongs to exactly one pixel, namely the
/// one centered at the point's rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HotPixel {
    center: Point,
    // The center, in grid units. These are integers.
    hpx: f64,
    hpy: f64,
    precision: PrecisionModel,
}

impl HotPixel {
    /// Creates the hot pixel centered at `center`, which should already be
    /// rounded to `precision`.
    pub fn new(center: Point, precision: &PrecisionModel) -> Self {
        debug_assert_eq!(precision.round(center), center);
        HotPixel {
            center,
            hpx: precision.grid_index(center.x),
            hpy: precision.grid_index(center.y),
            precision: *precision,
        }
    }

    /// The center of this pixel, which is a grid point.
    pub fn center(&self) -> Point {
        self.center
    }

    /// The precision model that determines our size.
    pub fn precision(&self) -> &PrecisionModel {
        &self.precision
    }

    /// Does `p` belong to this pixel?
    pub fn contains(&self, p: Point) -> bool {
        self.precision.grid_index(p.x) == self.hpx && self.precision.grid_index(p.y) == self.hpy
    }

    /// The corners of this pixel, in the original (unscaled) coordinates.
    ///
    /// These are in counter-clockwise order, starting from the bottom left.
    pub fn corners(&self) -> [Point; 4] {
        let half = self.precision.grid_size() / 2.0;
        let Point { x, y } = self.center;
        [
            Point::new(x - half, y - half),
            Point::new(x + half, y - half),
            Point::new(x + half, y + half),
            Point::new(x - half, y + half),
        ]
    }

    /// Does the closed segment from `p0` to `p1` meet this pixel?
    ///
    /// The segment is given in original coordinates; we scale it to grid units
    /// and then do all the side tests exactly.
    pub fn intersects(&self, p0: Point, p1: Point) -> bool {
        let pm = &self.precision;
        let (mut px, mut py) = (pm.to_grid(p0.x), pm.to_grid(p0.y));
        let (mut qx, mut qy) = (pm.to_grid(p1.x), pm.to_grid(p1.y));
        // Orient the segment left to right.
        if px > qx {
            std::mem::swap(&mut px, &mut qx);
            std::mem::swap(&mut py, &mut qy);
        }
        self.intersects_scaled(px, py, qx, qy)
    }

    fn intersects_scaled(&self, px: f64, py: f64, qx: f64, qy: f64) -> bool {
        let min_x = self.hpx - HALF;
        let max_x = self.hpx + HALF;
        let min_y = self.hpy - HALF;
        let max_y = self.hpy + HALF;

        // Envelope rejection. The right and top sides are open, so touching
        // them from outside doesn't count.
        if px.min(qx) >= max_x || px.max(qx) < min_x {
            return false;
        }
        if py.min(qy) >= max_y || py.max(qy) < min_y {
            return false;
        }

        // An axis-parallel segment whose envelope meets the pixel (with the
        // open sides accounted for above) must meet the pixel.
        if px == qx || py == qy {
            return true;
        }

        let orient = |x, y| orientation_xy(px, py, qx, qy, x, y);

        // If the segment passes exactly through a corner, whether it enters the
        // pixel depends on which way it's heading. Recall that px < qx.
        let upper_left = orient(min_x, max_y);
        if upper_left == Orientation::Collinear {
            // Heading up-right, it only grazes the (open) top-left corner.
            return py > qy;
        }
        let upper_right = orient(max_x, max_y);
        if upper_right == Orientation::Collinear {
            // Heading down-right, it only grazes the (open) top-right corner.
            return py < qy;
        }
        // Crossing the top side.
        if upper_left != upper_right {
            return true;
        }
        let lower_left = orient(min_x, min_y);
        if lower_left == Orientation::Collinear {
            // The bottom-left corner is the only corner in the pixel.
            return true;
        }
        // Crossing the left side.
        if lower_left != upper_left {
            return true;
        }
        let lower_right = orient(max_x, min_y);
        if lower_right == Orientation::Collinear {
            // Heading up-right, it only grazes the (open) bottom-right corner.
            return py > qy;
        }
        // Crossing the bottom side, or the right side.
        lower_left != lower_right || lower_right != upper_right
    }
}

/// All the hot pixels of one snap-rounding run, keyed by their centers.
///
/// Pixels are remembered in the order they were first requested, so the
/// snapshot (and everything downstream of it) is deterministic.
#[derive(Clone, Debug)]
pub struct HotPixelRegistry {
    precision: PrecisionModel,
    pixels: Vec<HotPixel>,
    by_center: HashMap<Point, usize>,
}

impl HotPixelRegistry {
    /// An empty registry for pixels of the given precision.
    pub fn new(precision: PrecisionModel) -> Self {
        HotPixelRegistry {
            precision,
            pixels: Vec::new(),
            by_center: HashMap::new(),
        }
    }

    /// Returns the hot pixel centered at `center`, creating it if necessary.
    ///
    /// `center` must already be rounded.
    pub fn get_or_create(&mut self, center: Point) -> &HotPixel {
        let idx = match self.by_center.entry(center) {
            std::collections::hash_map::Entry::Occupied(e) => *e.get(),
            std::collections::hash_map::Entry::Vacant(e) => {
                self.pixels.push(HotPixel::new(center, &self.precision));
                *e.insert(self.pixels.len() - 1)
            }
        };
        &self.pixels[idx]
    }

    /// Returns the hot pixel centered at `center`, if there is one.
    pub fn get(&self, center: Point) -> Option<&HotPixel> {
        self.by_center.get(&center).map(|&idx| &self.pixels[idx])
    }

    /// The number of distinct hot pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Are there no hot pixels yet?
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Freezes the registry into a list of pixels, in first-seen order.
    pub fn snapshot(self) -> Vec<HotPixel> {
        self.pixels
    }
}
