//! Segment chains, both as input/output and in the mutable form used while noding.
//!
//! A [`Chain`] is a polyline together with some caller-supplied context that
//! we carry along without looking at. Noding works on [`NodedChain`]s, which
//! collect nodes (points where the chain must be broken) in an append-only
//! log. Once all the nodes are known, [`NodedChain::split`] breaks the chain
//! at every node and hands back plain chains again.

use crate::{
    geom::{Point, Segment},
    num::CheapOrderedFloat,
};

/// A polyline with some attached context.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Chain<T> {
    /// The vertices, in order.
    pub points: Vec<Point>,
    /// Whatever the caller wants to remember about this chain.
    pub data: T,
}

impl<T> Chain<T> {
    /// Creates a new chain.
    pub fn new(points: Vec<Point>, data: T) -> Self {
        Chain { points, data }
    }
}

/// A chain index.
///
/// Chains are identified by their position in the list of chains being
/// noded.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ChainIdx(pub usize);

/// A vector indexed by [`ChainIdx`].
#[derive(Clone, PartialEq)]
pub struct ChainVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(ChainVec, ChainIdx, "c");

/// Identifies a single segment: the `seg`th segment of chain `chain`.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SegmentRef {
    /// The chain.
    pub chain: ChainIdx,
    /// The index of the segment within the chain. Segment `i` runs from
    /// point `i` to point `i + 1`.
    pub seg: usize,
}

impl std::fmt::Debug for SegmentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}.s_{}", self.chain, self.seg)
    }
}

/// A point where a chain needs to be broken.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Node {
    /// The location of the node.
    pub point: Point,
    /// The segment that the node belongs to. A node equal to the start of its
    /// segment is the same as that vertex.
    pub segment: usize,
}

/// A chain that is in the process of being noded.
#[derive(Clone, Debug, PartialEq)]
pub struct NodedChain<T> {
    points: Vec<Point>,
    data: T,
    nodes: Vec<Node>,
}

impl<T: Clone> NodedChain<T> {
    /// Starts noding a copy of `chain`, with the same context.
    pub fn from_chain(chain: &Chain<T>) -> Self {
        NodedChain::new(chain.points.clone(), chain.data.clone())
    }

    /// Breaks this chain at all of its nodes.
    ///
    /// Every piece carries a clone of our context. The pieces start and end
    /// at nodes (and the ends of the chain count as nodes). A chain with all
    /// of its nodes and vertices at the same place produces nothing.
    pub fn split(&self) -> Vec<Chain<T>> {
        let mut ret = Vec::new();
        let mut current = Vec::new();
        for (p, is_node) in self.merged() {
            current.push(p);
            if is_node && current.len() > 1 {
                let piece = std::mem::replace(&mut current, vec![p]);
                ret.push(Chain::new(piece, self.data.clone()));
            }
        }
        ret
    }

    /// Splits all the chains, returning their pieces in order.
    pub fn split_all<'a>(chains: impl IntoIterator<Item = &'a NodedChain<T>>) -> Vec<Chain<T>>
    where
        T: 'a,
    {
        chains.into_iter().flat_map(NodedChain::split).collect()
    }
}

impl<T> NodedChain<T> {
    /// Starts noding the chain with the given points and context.
    pub fn new(points: Vec<Point>, data: T) -> Self {
        NodedChain {
            points,
            data,
            nodes: Vec::new(),
        }
    }

    /// The original vertices, without any nodes.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The context.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The nodes that have been added so far, in the order they were added.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The number of segments in this chain.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// The `idx`th segment, from vertex `idx` to vertex `idx + 1`.
    pub fn segment(&self, idx: usize) -> Segment {
        Segment::new(self.points[idx], self.points[idx + 1])
    }

    /// Iterates over the segments of this chain, in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    /// Records that the chain needs to be broken at `point`, which lies on
    /// (or, after rounding, near) segment number `segment`.
    ///
    /// A node that coincides with the end of its segment is recorded on the
    /// next segment instead, so that it sorts together with that vertex.
    pub fn add_intersection(&mut self, point: Point, segment: usize) {
        debug_assert!(segment < self.points.len());
        let mut segment = segment;
        let next = segment + 1;
        if next < self.points.len() && self.points[next] == point {
            segment = next;
        }
        self.nodes.push(Node { point, segment });
    }

    /// The vertices with all the nodes merged in.
    ///
    /// Within each segment, nodes are ordered by their distance along the
    /// segment. Consecutive repeated points are removed.
    pub fn noded_points(&self) -> Vec<Point> {
        self.merged().into_iter().map(|(p, _)| p).collect()
    }

    // Where a node sits along its segment, for sorting.
    fn position(&self, node: &Node) -> f64 {
        match self.points.get(node.segment + 1) {
            Some(end) => {
                let start = &self.points[node.segment];
                node.point
                    .dot_from(start, end.x - start.x, end.y - start.y)
            }
            // A node on the final vertex.
            None => 0.0,
        }
    }

    // The vertices and nodes, in order along the chain and without consecutive
    // repeats. Each point is flagged if we should split there.
    fn merged(&self) -> Vec<(Point, bool)> {
        let mut nodes = self.nodes.clone();
        nodes.sort_by_cached_key(|n| {
            (
                n.segment,
                CheapOrderedFloat::from(self.position(n)),
                n.point,
            )
        });
        let mut nodes = nodes.into_iter().peekable();

        let mut ret: Vec<(Point, bool)> = Vec::with_capacity(self.points.len() + self.nodes.len());
        let mut push = |p: Point, is_node: bool| match ret.last_mut() {
            Some((last, last_is_node)) if *last == p => *last_is_node |= is_node,
            _ => ret.push((p, is_node)),
        };

        let last = self.points.len().saturating_sub(1);
        for (i, p) in self.points.iter().enumerate() {
            push(*p, i == 0 || i == last);
            while let Some(n) = nodes.next_if(|n| n.segment == i) {
                push(n.point, true);
            }
        }
        ret
    }
}
