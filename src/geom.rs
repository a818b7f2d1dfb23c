//! Geometric primitives, like points and segments.

use std::hash::{Hash, Hasher};

use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Equality is exact coordinate equality (so `-0.0` and `0.0` are the same
/// ordinate), and hashing agrees with it. Points are sorted by `y` and then by
/// `x`; this order has no geometric meaning, but it's handy when we need a
/// deterministic order.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Vertical coordinate.
    pub y: f64,
    /// Horizontal component.
    pub x: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.y),
            CheapOrderedFloat::from(self.x),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.y),
                CheapOrderedFloat::from(other.x),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

// `-0.0 == 0.0` but their bits differ, so hash a normalized zero.
fn ordinate_bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ordinate_bits(self.x).hash(state);
        ordinate_bits(self.y).hash(state);
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    ///
    /// Note that the `x` coordinate comes first. This might be a tiny bit
    /// confusing because we're sorting by `y` coordinate first, but `(x, y)` is
    /// the only sane order (prove me wrong).
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// The dot product of `self - origin` and `dir`.
    pub(crate) fn dot_from(&self, origin: &Point, dir_x: f64, dir_y: f64) -> f64 {
        (self.x - origin.x) * dir_x + (self.y - origin.y) * dir_y
    }

    /// Convert to a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// A line segment, in chain order: `p0` comes before `p1` in the chain it belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// The starting point.
    pub p0: Point,
    /// The ending point.
    pub p1: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Segment { p0, p1 } = self;
        write!(f, "{p0:?} -- {p1:?}")
    }
}

impl Segment {
    /// Create a new segment.
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    /// The smallest horizontal position.
    pub fn min_x(&self) -> f64 {
        self.p0.x.min(self.p1.x)
    }

    /// The largest horizontal position.
    pub fn max_x(&self) -> f64 {
        self.p0.x.max(self.p1.x)
    }

    /// The smallest vertical position.
    pub fn min_y(&self) -> f64 {
        self.p0.y.min(self.p1.y)
    }

    /// The largest vertical position.
    pub fn max_y(&self) -> f64 {
        self.p0.y.max(self.p1.y)
    }

    /// Is `p` one of our endpoints?
    pub fn is_endpoint(&self, p: &Point) -> bool {
        self.p0 == *p || self.p1 == *p
    }

    /// Does our bounding box contain `p` (boundary included)?
    pub fn envelope_contains(&self, p: &Point) -> bool {
        (self.min_x()..=self.max_x()).contains(&p.x) && (self.min_y()..=self.max_y()).contains(&p.y)
    }

    /// Do our bounding box and `other`'s bounding box intersect (boundaries included)?
    pub fn envelope_intersects(&self, other: &Segment) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }

    /// Convert to a `kurbo` line.
    pub fn to_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.p0.to_kurbo(), self.p1.to_kurbo())
    }
}
