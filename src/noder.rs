//! Noding: finding where chains intersect, and breaking them there.
//!
//! The [`IndexedNoder`] puts the bounding box of every segment into an R*-tree
//! and joins the tree with itself to find the pairs of segments that might
//! intersect. What to do with each candidate pair is up to a
//! [`SegmentIntersector`].

use rstar::{primitives::GeomWithData, primitives::Rectangle, RTree};

use crate::{
    chain::{Chain, ChainVec, NodedChain, SegmentRef},
    geom::{Point, Segment},
    intersection::intersect,
};

/// Something that computes a noded arrangement of chains.
pub trait Noder<T> {
    /// Computes the nodes of `chains`, replacing the results of any previous
    /// call.
    fn compute_nodes(&mut self, chains: &[Chain<T>]);

    /// The chains from the last call to [`Noder::compute_nodes`], broken at
    /// all of their nodes.
    fn noded_substrings(&self) -> Vec<Chain<T>>;
}

/// Examines pairs of segments that might intersect.
pub trait SegmentIntersector {
    /// Examines the segments `a` and `b`, whose coordinates are `seg_a` and
    /// `seg_b`.
    ///
    /// Any points where the chains should be broken go in `nodes`. They get
    /// added to the chains after all pairs have been examined.
    fn process_intersections(
        &mut self,
        a: SegmentRef,
        seg_a: &Segment,
        b: SegmentRef,
        seg_b: &Segment,
        nodes: &mut Vec<(SegmentRef, Point)>,
    );

    /// Returns true if we've seen enough and the noder can stop early.
    fn is_done(&self) -> bool {
        false
    }
}

type SegmentEnvelope = GeomWithData<Rectangle<[f64; 2]>, SegmentRef>;

fn envelope(seg_ref: SegmentRef, seg: &Segment) -> SegmentEnvelope {
    GeomWithData::new(
        Rectangle::from_corners([seg.min_x(), seg.min_y()], [seg.max_x(), seg.max_y()]),
        seg_ref,
    )
}

/// Finds candidate pairs of segments with a spatial index, and passes them to
/// a [`SegmentIntersector`].
#[derive(Debug)]
pub struct IndexedNoder<I> {
    intersector: I,
}

impl<I: SegmentIntersector> IndexedNoder<I> {
    /// Creates a noder that feeds `intersector`.
    pub fn new(intersector: I) -> Self {
        IndexedNoder { intersector }
    }

    /// The intersector, with whatever it has collected.
    pub fn intersector(&self) -> &I {
        &self.intersector
    }

    /// Consumes the noder, returning the intersector.
    pub fn into_intersector(self) -> I {
        self.intersector
    }

    /// Runs the intersector on every pair of segments (including pairs from
    /// the same chain, and each segment paired with itself) whose bounding
    /// boxes meet. The nodes that it reports are added to `chains`.
    ///
    /// Each unordered pair is examined once, in a deterministic order.
    pub fn compute_nodes<T>(&mut self, chains: &mut ChainVec<NodedChain<T>>) {
        let envelopes = chains
            .iter()
            .flat_map(|(chain, c)| {
                c.segments()
                    .enumerate()
                    .map(move |(seg, s)| envelope(SegmentRef { chain, seg }, &s))
            })
            .collect();
        let tree = RTree::bulk_load(envelopes);

        let mut nodes = Vec::new();
        for (a, b) in tree.intersection_candidates_with_other_tree(&tree) {
            if self.intersector.is_done() {
                break;
            }
            let (a, b) = (a.data, b.data);
            if a > b {
                continue;
            }
            let seg_a = chains[a.chain].segment(a.seg);
            let seg_b = chains[b.chain].segment(b.seg);
            self.intersector
                .process_intersections(a, &seg_a, b, &seg_b, &mut nodes);
        }

        for (seg_ref, p) in nodes {
            chains[seg_ref.chain].add_intersection(p, seg_ref.seg);
        }
    }
}

/// Records every interior intersection, and reports it as a node on both
/// segments.
///
/// An intersection is interior if it isn't just a shared endpoint; see
/// [`LineIntersection::is_interior`](crate::intersection::LineIntersection::is_interior).
#[derive(Clone, Debug, Default)]
pub struct InteriorIntersectionFinder {
    intersections: Vec<Point>,
}

impl InteriorIntersectionFinder {
    /// Consumes this finder, returning its intersections in the order they
    /// were found.
    ///
    /// The same point can appear more than once, if more than two segments
    /// meet there.
    pub fn into_intersections(self) -> Vec<Point> {
        self.intersections
    }
}

impl SegmentIntersector for InteriorIntersectionFinder {
    fn process_intersections(
        &mut self,
        a: SegmentRef,
        seg_a: &Segment,
        b: SegmentRef,
        seg_b: &Segment,
        nodes: &mut Vec<(SegmentRef, Point)>,
    ) {
        if a == b {
            return;
        }
        let int = intersect(seg_a, seg_b);
        if !int.is_interior(seg_a, seg_b) {
            return;
        }
        for p in int.points() {
            self.intersections.push(p);
            nodes.push((a, p));
            nodes.push((b, p));
        }
    }
}

/// Nodes chains at full precision, without rounding anything.
///
/// The nodes are computed in floating point, so the output can contain
/// segments that cross without sharing a vertex. Use
/// [`SnapRounder`](crate::SnapRounder) to avoid that.
#[derive(Clone, Debug, Default)]
pub struct FullPrecisionNoder<T> {
    chains: ChainVec<NodedChain<T>>,
    intersections: Vec<Point>,
}

impl<T> FullPrecisionNoder<T> {
    /// Creates a noder.
    pub fn new() -> Self {
        FullPrecisionNoder {
            chains: ChainVec::default(),
            intersections: Vec::new(),
        }
    }

    /// The interior intersections found in the last run.
    pub fn interior_intersections(&self) -> &[Point] {
        &self.intersections
    }
}

impl<T: Clone> Noder<T> for FullPrecisionNoder<T> {
    fn compute_nodes(&mut self, chains: &[Chain<T>]) {
        self.chains = chains.iter().map(NodedChain::from_chain).collect();
        let mut noder = IndexedNoder::new(InteriorIntersectionFinder::default());
        noder.compute_nodes(&mut self.chains);
        self.intersections = noder.into_intersector().into_intersections();
    }

    fn noded_substrings(&self) -> Vec<Chain<T>> {
        NodedChain::split_all(self.chains.as_slice())
    }
}
