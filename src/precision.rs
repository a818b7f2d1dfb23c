//! Fixed-precision grids.

use crate::{geom::Point, Error};

/// A uniform grid of representable coordinates.
///
/// The grid has spacing `1 / scale` in both directions, and contains the
/// origin. Rounding sends a coordinate to the nearest grid point, with ties
/// going up (towards positive infinity).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrecisionModel {
    scale: f64,
    // Set when the grid was given by a size larger than 1, in which case we
    // round by dividing by this instead of multiplying by `scale`. That keeps
    // the rounded coordinates exact multiples of the grid size.
    grid_size: Option<f64>,
}

/// Rounds to the nearest integer, with ties going up.
///
/// This isn't `(x + 0.5).floor()`, because the addition can round up:
/// `0.49999999999999994 + 0.5 == 1.0`.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

impl PrecisionModel {
    /// A grid with `scale` grid points per unit.
    ///
    /// For example, a scale of `100.0` rounds to two decimal places, and a
    /// scale of `1.0` rounds to integers.
    pub fn from_scale(scale: f64) -> Result<Self, Error> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidScale(scale));
        }
        Ok(PrecisionModel {
            scale,
            grid_size: None,
        })
    }

    /// A grid whose points are `size` apart.
    pub fn from_grid_size(size: f64) -> Result<Self, Error> {
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::InvalidScale(size));
        }
        if size > 1.0 {
            Ok(PrecisionModel {
                scale: 1.0 / size,
                grid_size: Some(size),
            })
        } else {
            Ok(PrecisionModel {
                scale: 1.0 / size,
                grid_size: None,
            })
        }
    }

    /// The number of grid points per unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The distance between adjacent grid points.
    pub fn grid_size(&self) -> f64 {
        self.grid_size.unwrap_or(1.0 / self.scale)
    }

    /// Converts an ordinate to grid units, where grid points are at the integers.
    ///
    /// The result is not rounded.
    pub fn to_grid(&self, v: f64) -> f64 {
        match self.grid_size {
            Some(size) => v / size,
            None => v * self.scale,
        }
    }

    /// The grid-unit index of the grid point nearest to `v`.
    pub fn grid_index(&self, v: f64) -> f64 {
        round_half_up(self.to_grid(v))
    }

    /// Rounds a single ordinate to the grid.
    pub fn make_precise(&self, v: f64) -> f64 {
        match self.grid_size {
            Some(size) => round_half_up(v / size) * size,
            None => round_half_up(v * self.scale) / self.scale,
        }
    }

    /// Rounds a point to the grid.
    pub fn round(&self, p: Point) -> Point {
        Point::new(self.make_precise(p.x), self.make_precise(p.y))
    }

    /// Rounds a sequence of points to the grid, dropping any rounded point that
    /// is equal to the one before it.
    pub fn round_chain(&self, points: &[Point]) -> Vec<Point> {
        let mut ret: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            let p = self.round(*p);
            if ret.last() != Some(&p) {
                ret.push(p);
            }
        }
        ret
    }
}
