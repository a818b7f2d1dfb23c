//! Checking that an arrangement of chains is fully noded.

use crate::{
    chain::{Chain, ChainVec, NodedChain, SegmentRef},
    geom::{Point, Segment},
    intersection::intersect,
    noder::{IndexedNoder, SegmentIntersector},
};

/// Two segments meet somewhere other than at a shared vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodingError {
    /// One of the segments.
    pub a: SegmentRef,
    /// The other segment.
    pub b: SegmentRef,
    /// A point where they meet.
    pub point: Point,
}

impl std::fmt::Display for NodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "segments {:?} and {:?} intersect at {:?}, which isn't a vertex of both",
            self.a, self.b, self.point
        )
    }
}

impl std::error::Error for NodingError {}

/// Looks for an interior intersection, and stops at the first one.
#[derive(Clone, Debug, Default)]
pub struct InteriorIntersectionDetector {
    found: Option<NodingError>,
}

impl InteriorIntersectionDetector {
    /// The interior intersection we found, if any.
    pub fn found(&self) -> Option<&NodingError> {
        self.found.as_ref()
    }
}

impl SegmentIntersector for InteriorIntersectionDetector {
    fn process_intersections(
        &mut self,
        a: SegmentRef,
        seg_a: &Segment,
        b: SegmentRef,
        seg_b: &Segment,
        _nodes: &mut Vec<(SegmentRef, Point)>,
    ) {
        if a == b || self.found.is_some() {
            return;
        }
        let int = intersect(seg_a, seg_b);
        if let Some(point) = int
            .points()
            .into_iter()
            .find(|p| !seg_a.is_endpoint(p) || !seg_b.is_endpoint(p))
        {
            self.found = Some(NodingError { a, b, point });
        }
    }

    fn is_done(&self) -> bool {
        self.found.is_some()
    }
}

/// Checks that no two segments of `chains` meet except at shared vertices.
///
/// Consecutive segments of a chain share a vertex, and that's fine; so is a
/// vertex of one chain lying on a vertex of another.
pub fn check_noding<T>(chains: &[Chain<T>]) -> Result<(), NodingError> {
    let mut noded: ChainVec<_> = chains
        .iter()
        .map(|c| NodedChain::new(c.points.clone(), ()))
        .collect();
    let mut noder = IndexedNoder::new(InteriorIntersectionDetector::default());
    noder.compute_nodes(&mut noded);
    match noder.intersector().found() {
        Some(err) => Err(*err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainIdx;

    fn chain(pts: &[(f64, f64)]) -> Chain<()> {
        Chain::new(pts.iter().map(|&p| p.into()).collect(), ())
    }

    #[test]
    fn crossing_is_reported() {
        let chains = [
            chain(&[(0.0, 0.0), (10.0, 10.0)]),
            chain(&[(0.0, 10.0), (10.0, 0.0)]),
        ];
        let err = check_noding(&chains).unwrap_err();
        assert_eq!(
            err,
            NodingError {
                a: SegmentRef {
                    chain: ChainIdx(0),
                    seg: 0
                },
                b: SegmentRef {
                    chain: ChainIdx(1),
                    seg: 0
                },
                point: Point::new(5.0, 5.0),
            }
        );
        assert_eq!(
            err.to_string(),
            "segments c_0.s_0 and c_1.s_0 intersect at (5.0, 5.0), which isn't a vertex of both"
        );
    }

    #[test]
    fn shared_vertices_are_fine() {
        let chains = [
            chain(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]),
            chain(&[(0.0, 10.0), (5.0, 5.0)]),
            chain(&[(5.0, 5.0), (10.0, 0.0)]),
        ];
        assert_eq!(check_noding(&chains), Ok(()));
    }

    #[test]
    fn t_junction_is_reported() {
        let chains = [
            chain(&[(0.0, 0.0), (10.0, 0.0)]),
            chain(&[(5.0, 0.0), (5.0, 5.0)]),
        ];
        assert_eq!(check_noding(&chains).unwrap_err().point, Point::new(5.0, 0.0));
    }

    #[test]
    fn detector_stops_at_first() {
        let mut chains: ChainVec<_> = [
            chain(&[(0.0, 0.0), (10.0, 10.0)]),
            chain(&[(0.0, 10.0), (10.0, 0.0)]),
            chain(&[(0.0, 5.0), (10.0, 5.0)]),
        ]
        .iter()
        .map(NodedChain::from_chain)
        .collect();
        let mut noder = IndexedNoder::new(InteriorIntersectionDetector::default());
        noder.compute_nodes(&mut chains);
        assert!(noder.intersector().is_done());
        assert_eq!(noder.intersector().found().unwrap().point, Point::new(5.0, 5.0));
        // A detector never asks for nodes.
        assert!(chains.iter().all(|(_, c)| c.nodes().is_empty()));
    }

    #[test]
    fn self_overlap_is_reported() {
        // Doubling back along the same line.
        let chains = [chain(&[(0.0, 0.0), (10.0, 0.0), (5.0, 0.0)])];
        assert!(check_noding(&chains).is_err());
    }
}
