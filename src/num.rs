//! Numerical helpers: a cheap total order on `f64`, and exact orientation tests.

use std::hash::Hash;

use malachite::Rational;

use crate::geom::Point;

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this
/// one just treats incomparable values as equal -- it doesn't order NaNs, nor
/// does it guard against them on construction. All of our coordinates are
/// checked to be finite before they get here.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl Hash for CheapOrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

// Now comes the fishy stuff.
impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

/// Converts a finite float to an exact rational.
///
/// Panics on infinities and NaNs; callers are expected to have rejected them
/// already.
pub fn to_exact(x: f64) -> Rational {
    x.try_into().unwrap()
}

/// Which side of a directed line a point lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The point is to the left of the line (counter-clockwise turn).
    CounterClockwise,
    /// The point is to the right of the line (clockwise turn).
    Clockwise,
    /// The three points are collinear.
    Collinear,
}

impl Orientation {
    fn from_sign(sign: std::cmp::Ordering) -> Self {
        match sign {
            std::cmp::Ordering::Greater => Orientation::CounterClockwise,
            std::cmp::Ordering::Less => Orientation::Clockwise,
            std::cmp::Ordering::Equal => Orientation::Collinear,
        }
    }

    /// Are the two orientations strictly on opposite sides?
    pub fn opposes(self, other: Orientation) -> bool {
        matches!(
            (self, other),
            (Orientation::Clockwise, Orientation::CounterClockwise)
                | (Orientation::CounterClockwise, Orientation::Clockwise)
        )
    }
}

// Relative error bound for the floating-point determinant below, from
// Shewchuk's "Adaptive Precision Floating-Point Arithmetic".
const CCW_ERR_BOUND: f64 = (3.0 + 16.0 * f64::EPSILON) * f64::EPSILON;

/// The orientation of `c` relative to the directed line from `a` to `b`.
///
/// This is exact. The floating-point determinant is used when its sign is
/// certain, and otherwise we redo the computation with rationals.
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    orientation_xy(a.x, a.y, b.x, b.y, c.x, c.y)
}

/// Like [`orientation`], but taking raw coordinates.
pub fn orientation_xy(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> Orientation {
    let left = (bx - ax) * (cy - ay);
    let right = (by - ay) * (cx - ax);
    let det = left - right;
    let bound = CCW_ERR_BOUND * (left.abs() + right.abs());
    if det > bound {
        return Orientation::CounterClockwise;
    } else if -det > bound {
        return Orientation::Clockwise;
    }

    // TODO: an adaptive stage (Shewchuk's B and C bounds) would avoid most of
    // these allocations in nearly-degenerate inputs.
    let ax = to_exact(ax);
    let ay = to_exact(ay);
    let left = (to_exact(bx) - &ax) * (to_exact(cy) - &ay);
    let right = (to_exact(by) - &ay) * (to_exact(cx) - &ax);
    Orientation::from_sign(left.cmp(&right))
}
