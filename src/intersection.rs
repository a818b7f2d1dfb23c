//! Robust intersection of two line segments.
//!
//! The decision of *whether* two segments intersect, and how (crossing,
//! touching at an endpoint, overlapping), is made with exact orientation
//! tests. Only the location of a proper crossing is computed with floating
//! point, and that location is clamped to lie in both segments' bounding
//! boxes.

use arrayvec::ArrayVec;

use crate::{
    geom::{Point, Segment},
    num::{orientation, Orientation},
};

/// The result of intersecting two segments.
#[derive(Clone, Debug, PartialEq)]
pub enum LineIntersection {
    /// The segments don't meet.
    None,
    /// The segments meet in a single point.
    Point {
        /// Where they meet.
        point: Point,
        /// True if the segments cross at a point that is in the interior of both
        /// of them.
        proper: bool,
    },
    /// The segments are collinear and overlap along a segment; these are the
    /// endpoints of the overlap.
    Collinear(ArrayVec<Point, 2>),
}

impl LineIntersection {
    /// Do the segments meet at all?
    pub fn has_intersection(&self) -> bool {
        !matches!(self, LineIntersection::None)
    }

    /// Is this a crossing in the interior of both segments?
    pub fn is_proper(&self) -> bool {
        matches!(self, LineIntersection::Point { proper: true, .. })
    }

    /// The intersection points: none, one, or the two ends of an overlap.
    pub fn points(&self) -> ArrayVec<Point, 2> {
        match self {
            LineIntersection::None => ArrayVec::new(),
            LineIntersection::Point { point, .. } => std::iter::once(*point).collect(),
            LineIntersection::Collinear(pts) => pts.clone(),
        }
    }

    /// Is some intersection point in the interior of one of the segments?
    ///
    /// Two segments that only share an endpoint (like consecutive segments of a
    /// chain) don't have an interior intersection. `s` and `t` must be the
    /// segments that produced this intersection.
    pub fn is_interior(&self, s: &Segment, t: &Segment) -> bool {
        self.points()
            .iter()
            .any(|p| !s.is_endpoint(p) || !t.is_endpoint(p))
    }
}

/// Computes the intersection of the closed segments `s` and `t`.
pub fn intersect(s: &Segment, t: &Segment) -> LineIntersection {
    if !s.envelope_intersects(t) {
        return LineIntersection::None;
    }

    let (p0, p1) = (s.p0, s.p1);
    let (q0, q1) = (t.p0, t.p1);

    let pq0 = orientation(p0, p1, q0);
    let pq1 = orientation(p0, p1, q1);
    // Both ends of `t` strictly on the same side of `s`.
    if pq0 == pq1 && pq0 != Orientation::Collinear {
        return LineIntersection::None;
    }

    let qp0 = orientation(q0, q1, p0);
    let qp1 = orientation(q0, q1, p1);
    if qp0 == qp1 && qp0 != Orientation::Collinear {
        return LineIntersection::None;
    }

    let collinear = pq0 == Orientation::Collinear
        && pq1 == Orientation::Collinear
        && qp0 == Orientation::Collinear
        && qp1 == Orientation::Collinear;
    if collinear {
        return collinear_intersection(s, t);
    }

    if [pq0, pq1, qp0, qp1].contains(&Orientation::Collinear) {
        // They touch, and the touching point is an endpoint of at least one of
        // them. Prefer reporting a shared endpoint exactly.
        let point = if p0 == q0 || p0 == q1 {
            p0
        } else if p1 == q0 || p1 == q1 {
            p1
        } else if pq0 == Orientation::Collinear {
            q0
        } else if pq1 == Orientation::Collinear {
            q1
        } else if qp0 == Orientation::Collinear {
            p0
        } else {
            p1
        };
        return LineIntersection::Point {
            point,
            proper: false,
        };
    }

    LineIntersection::Point {
        point: crossing_point(s, t),
        proper: true,
    }
}

// The overlap of two collinear segments.
fn collinear_intersection(s: &Segment, t: &Segment) -> LineIntersection {
    let (p0, p1) = (s.p0, s.p1);
    let (q0, q1) = (t.p0, t.p1);

    let s_has_q0 = s.envelope_contains(&q0);
    let s_has_q1 = s.envelope_contains(&q1);
    let t_has_p0 = t.envelope_contains(&p0);
    let t_has_p1 = t.envelope_contains(&p1);

    let overlap = |a: Point, b: Point| {
        if a == b {
            LineIntersection::Point {
                point: a,
                proper: false,
            }
        } else {
            LineIntersection::Collinear([a, b].into())
        }
    };

    if s_has_q0 && s_has_q1 {
        overlap(q0, q1)
    } else if t_has_p0 && t_has_p1 {
        overlap(p0, p1)
    } else if s_has_q0 && t_has_p0 {
        overlap(q0, p0)
    } else if s_has_q0 && t_has_p1 {
        overlap(q0, p1)
    } else if s_has_q1 && t_has_p0 {
        overlap(q1, p0)
    } else if s_has_q1 && t_has_p1 {
        overlap(q1, p1)
    } else {
        LineIntersection::None
    }
}

// Where two properly crossing segments cross.
//
// We translate everything so that the middle of the bounding boxes' overlap is
// at the origin, which keeps the magnitudes (and so the cancellation) small,
// and then intersect the lines in homogeneous coordinates.
fn crossing_point(s: &Segment, t: &Segment) -> Point {
    let min_x = s.min_x().max(t.min_x());
    let max_x = s.max_x().min(t.max_x());
    let min_y = s.min_y().max(t.min_y());
    let max_y = s.max_y().min(t.max_y());
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    let (p0x, p0y) = (s.p0.x - mid_x, s.p0.y - mid_y);
    let (p1x, p1y) = (s.p1.x - mid_x, s.p1.y - mid_y);
    let (q0x, q0y) = (t.p0.x - mid_x, t.p0.y - mid_y);
    let (q1x, q1y) = (t.p1.x - mid_x, t.p1.y - mid_y);

    let (pa, pb, pc) = (p0y - p1y, p1x - p0x, p0x * p1y - p1x * p0y);
    let (qa, qb, qc) = (q0y - q1y, q1x - q0x, q0x * q1y - q1x * q0y);

    let x = pb * qc - qb * pc;
    let y = qa * pc - pa * qc;
    let w = pa * qb - qa * pb;

    let (x, y) = if w != 0.0 && (x / w).is_finite() && (y / w).is_finite() {
        (x / w + mid_x, y / w + mid_y)
    } else {
        (mid_x, mid_y)
    };

    // The true crossing is in the overlap of the bounding boxes, so make sure
    // the approximation is too.
    Point::new(x.clamp(min_x, max_x), y.clamp(min_y, max_y))
}
