//! Snap rounding.
//!
//! Snap rounding nodes a collection of chains and rounds them to a grid, in
//! such a way that the rounded chains only meet at their vertices. It goes
//! like this:
//!
//! 1. Find all the interior intersections between the input chains, at full
//!    precision.
//! 2. Every grid cell containing an intersection or an input vertex is a
//!    *hot pixel*.
//! 3. Round every chain to the grid. Then, wherever an original (unrounded)
//!    segment passes through a hot pixel, the rounded chain gets a node at
//!    the pixel's center.
//!
//! Step 3 tests every segment against every hot pixel, so it takes time
//! proportional to the number of segments times the number of hot pixels.

use crate::{
    chain::{Chain, ChainVec, NodedChain},
    geom::Point,
    hot_pixel::{HotPixel, HotPixelRegistry},
    noder::{IndexedNoder, InteriorIntersectionFinder, Noder},
    precision::PrecisionModel,
    Error,
};

/// Finds all the interior intersections between `chains`, at full precision.
///
/// Each intersection is also added as a node to the chains that meet there.
/// The returned points can contain duplicates.
pub fn find_interior_intersections<T>(chains: &mut ChainVec<NodedChain<T>>) -> Vec<Point> {
    let mut noder = IndexedNoder::new(InteriorIntersectionFinder::default());
    noder.compute_nodes(chains);
    noder.into_intersector().into_intersections()
}

/// A [`Noder`] that snap-rounds its output to a fixed grid.
///
/// Each call to [`Noder::compute_nodes`] starts from scratch. The results of
/// the most recent call are available from [`Noder::noded_substrings`] and
/// the accessors here.
#[derive(Clone, Debug)]
pub struct SnapRounder<T> {
    precision: PrecisionModel,
    intersections: Vec<Point>,
    hot_pixels: Vec<HotPixel>,
    snapped: Vec<NodedChain<T>>,
    #[cfg(feature = "debug-svg")]
    input: Vec<Vec<Point>>,
}

impl<T: Clone> SnapRounder<T> {
    /// Creates a snap rounder for the given grid.
    pub fn new(precision: PrecisionModel) -> Self {
        SnapRounder {
            precision,
            intersections: Vec::new(),
            hot_pixels: Vec::new(),
            snapped: Vec::new(),
            #[cfg(feature = "debug-svg")]
            input: Vec::new(),
        }
    }

    /// The grid that we round to.
    pub fn precision_model(&self) -> &PrecisionModel {
        &self.precision
    }

    /// The hot pixels of the last run, in the order they were discovered:
    /// first the ones containing intersections, then the ones containing
    /// input vertices.
    pub fn hot_pixels(&self) -> &[HotPixel] {
        &self.hot_pixels
    }

    /// The full-precision interior intersections of the last run's input.
    pub fn interior_intersections(&self) -> &[Point] {
        &self.intersections
    }

    /// The rounded chains of the last run, with their nodes but before
    /// splitting. Chains that collapsed to a single point are omitted.
    pub fn snapped_chains(&self) -> &[NodedChain<T>] {
        &self.snapped
    }

    /// Snaps the vertices of `chains` to each other, without rounding.
    ///
    /// This is not supported, and always fails.
    #[deprecated(note = "vertex-only snapping is not supported; use `compute_nodes` instead")]
    pub fn compute_vertex_snaps(&mut self, chains: &[Chain<T>]) -> Result<(), Error> {
        let _ = chains;
        Err(Error::Unsupported("vertex-only snap rounding"))
    }

    // Rounds a single chain and adds nodes at the hot pixels it passes through.
    //
    // Returns `None` if the chain collapses to a single point.
    fn snap_chain(&self, chain: &NodedChain<T>) -> Option<NodedChain<T>> {
        let pts = chain.noded_points();
        let pts_round = self.precision.round_chain(&pts);
        if pts_round.len() <= 1 {
            return None;
        }

        let mut snapped = NodedChain::new(pts_round, chain.data().clone());
        // The segment of `snapped` that the current segment of `pts` rounds to.
        let mut cursor = 0;
        for w in pts.windows(2) {
            let (p0, p1) = (w[0], w[1]);
            if self.precision.round(p1) == snapped.points()[cursor] {
                // This segment rounded to a point.
                continue;
            }
            for hp in &self.hot_pixels {
                if hp.intersects(p0, p1) {
                    snapped.add_intersection(hp.center(), cursor);
                }
            }
            cursor += 1;
        }
        Some(snapped)
    }

    /// Draws the last run: the input chains faintly, the hot pixels as
    /// squares, and the snapped chains with their nodes.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self) -> svg::Document {
        use svg::node::element::{path::Data, Circle, Path, Rectangle};

        let corners: Vec<Point> = self.hot_pixels.iter().flat_map(|hp| hp.corners()).collect();
        let mut bbox: Option<kurbo::Rect> = None;
        for p in self.input.iter().flatten().chain(&corners) {
            let p = p.to_kurbo();
            bbox = Some(match bbox {
                Some(b) => b.union_pt(p),
                None => kurbo::Rect::from_points(p, p),
            });
        }
        let Some(bbox) = bbox else {
            return svg::Document::new();
        };

        let grid = self.precision.grid_size();
        let bbox = bbox.inflate(grid, grid);
        let stroke_width = grid.min(bbox.width().max(bbox.height()) / 512.0) / 4.0;
        let mut document = svg::Document::new().set(
            "viewBox",
            (bbox.x0, bbox.y0, bbox.width(), bbox.height()),
        );

        let polyline = |pts: &[Point]| {
            let mut data = Data::new();
            if let Some((first, rest)) = pts.split_first() {
                data = data.move_to((first.x, first.y));
                for p in rest {
                    data = data.line_to((p.x, p.y));
                }
            }
            Path::new()
                .set("stroke-width", stroke_width)
                .set("stroke-linecap", "round")
                .set("stroke-linejoin", "round")
                .set("fill", "none")
                .set("d", data)
        };

        for hp in &self.hot_pixels {
            let [ll, _, ur, _] = hp.corners();
            document = document.add(
                Rectangle::new()
                    .set("x", ll.x)
                    .set("y", ll.y)
                    .set("width", ur.x - ll.x)
                    .set("height", ur.y - ll.y)
                    .set("fill", "orange")
                    .set("opacity", 0.3),
            );
        }

        for c in &self.input {
            document = document.add(polyline(c).set("stroke", "black").set("opacity", 0.2));
        }

        for c in &self.snapped {
            document = document.add(polyline(&c.noded_points()).set("stroke", "blue"));
            for n in c.nodes() {
                document = document.add(
                    Circle::new()
                        .set("cx", n.point.x)
                        .set("cy", n.point.y)
                        .set("r", 2.0 * stroke_width)
                        .set("fill", "red"),
                );
            }
        }

        document
    }
}

impl<T: Clone> Noder<T> for SnapRounder<T> {
    fn compute_nodes(&mut self, chains: &[Chain<T>]) {
        debug_assert!(chains.iter().all(|c| c.points.len() >= 2));

        let mut noded: ChainVec<NodedChain<T>> = chains.iter().map(NodedChain::from_chain).collect();
        self.intersections = find_interior_intersections(&mut noded);

        let mut registry = HotPixelRegistry::new(self.precision);
        for p in &self.intersections {
            registry.get_or_create(self.precision.round(*p));
        }
        // The original vertices, not the noded ones: the nodes are intersections,
        // and we've seen those already.
        for c in chains {
            for p in &c.points {
                registry.get_or_create(self.precision.round(*p));
            }
        }
        self.hot_pixels = registry.snapshot();

        self.snapped = noded
            .into_iter()
            .filter_map(|c| self.snap_chain(&c))
            .collect();

        #[cfg(feature = "debug-svg")]
        {
            self.input = chains.iter().map(|c| c.points.clone()).collect();
        }

        #[cfg(feature = "slow-asserts")]
        {
            if let Err(e) = crate::validate::check_noding(&self.noded_substrings()) {
                panic!("snap rounding produced an unnoded arrangement: {e}");
            }
        }
    }

    fn noded_substrings(&self) -> Vec<Chain<T>> {
        NodedChain::split_all(&self.snapped)
    }
}

/// Property tests, shared between unit tests and fuzzing.
#[cfg(any(test, feature = "arbitrary"))]
pub mod arbtests {
    use arbitrary::Unstructured;

    use super::*;
    use crate::validate::check_noding;

    /// Snap-rounds some arbitrary chains, and checks that the output is fully
    /// noded and that every input vertex has a hot pixel.
    pub fn snap_round_is_noded(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let precision = crate::arbitrary::precision(u)?;
        let chains = crate::arbitrary::chains(20.0, u)?;

        let mut rounder = SnapRounder::new(precision);
        rounder.compute_nodes(&chains);
        let output = rounder.noded_substrings();
        if let Err(e) = check_noding(&output) {
            panic!("{e}\ninput: {chains:?}\noutput: {output:?}");
        }

        for p in chains.iter().flat_map(|c| &c.points) {
            let center = precision.round(*p);
            assert!(rounder.hot_pixels().iter().any(|hp| hp.center() == center));
        }
        for p in output.iter().flat_map(|c| &c.points) {
            assert_eq!(precision.round(*p), *p);
        }
        Ok(())
    }

    /// Checks that a segment always meets the pixels containing its endpoints.
    pub fn segment_meets_endpoint_pixels(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let precision = crate::arbitrary::precision(u)?;
        let p0 = crate::arbitrary::point(100.0, u)?;
        let p1 = crate::arbitrary::another_point(p0, 100.0, u)?;
        for p in [p0, p1] {
            let hp = HotPixel::new(precision.round(p), &precision);
            assert!(hp.contains(p));
            assert!(hp.intersects(p0, p1), "{p0:?} -- {p1:?} misses {hp:?}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::chain::Node;
    use crate::num::tests::Reasonable;
    use crate::validate::check_noding;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn chain<T>(pts: &[(f64, f64)], data: T) -> Chain<T> {
        Chain::new(pts.iter().map(|&q| q.into()).collect(), data)
    }

    fn unit() -> PrecisionModel {
        PrecisionModel::from_scale(1.0).unwrap()
    }

    fn run<T: Clone>(chains: &[Chain<T>]) -> (SnapRounder<T>, Vec<Chain<T>>) {
        let mut rounder = SnapRounder::new(unit());
        rounder.compute_nodes(chains);
        let out = rounder.noded_substrings();
        (rounder, out)
    }

    fn points<T>(chains: &[Chain<T>]) -> Vec<Vec<Point>> {
        chains.iter().map(|c| c.points.clone()).collect()
    }

    #[test]
    fn crossing() {
        let (rounder, out) = run(&[
            chain(&[(0.0, 0.0), (10.0, 10.0)], 'a'),
            chain(&[(0.0, 10.0), (10.0, 0.0)], 'b'),
        ]);
        assert_eq!(rounder.interior_intersections(), &[p(5.0, 5.0)]);
        assert_eq!(rounder.hot_pixels()[0].center(), p(5.0, 5.0));
        assert_eq!(rounder.hot_pixels().len(), 5);
        insta::assert_compact_debug_snapshot!(
            points(&out),
            @"[[(0.0, 0.0), (5.0, 5.0)], [(5.0, 5.0), (10.0, 10.0)], [(0.0, 10.0), (5.0, 5.0)], [(5.0, 5.0), (10.0, 0.0)]]"
        );
        let data: String = out.iter().map(|c| c.data).collect();
        assert_eq!(data, "aabb");
    }

    #[test]
    fn collapse() {
        let (rounder, out) = run(&[chain(&[(0.1, 0.1), (0.4, 0.4)], ())]);
        assert!(out.is_empty());
        assert!(rounder.snapped_chains().is_empty());
        // The vertices still made a hot pixel.
        assert_eq!(rounder.hot_pixels().len(), 1);
        assert_eq!(rounder.hot_pixels()[0].center(), p(0.0, 0.0));
    }

    #[test]
    fn collapse_among_others() {
        let (_, out) = run(&[
            chain(&[(0.0, 3.0), (4.0, 3.0)], 0),
            chain(&[(0.1, 0.1), (0.4, 0.4)], 1),
            chain(&[(0.0, 5.0), (4.0, 5.0)], 2),
        ]);
        let data: Vec<_> = out.iter().map(|c| c.data).collect();
        assert_eq!(data, vec![0, 2]);
    }

    #[test]
    fn touching_at_endpoint() {
        let input = [
            chain(&[(0.0, 0.0), (5.0, 0.0)], 0),
            chain(&[(5.0, 0.0), (5.0, 5.0)], 1),
        ];
        let (rounder, out) = run(&input);
        assert!(rounder.interior_intersections().is_empty());
        assert_eq!(out, input);
    }

    #[test]
    fn collinear_vertices() {
        let input = [chain(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)], ())];
        let (rounder, out) = run(&input);
        assert_eq!(rounder.snapped_chains()[0].points(), &input[0].points[..]);
        // Every vertex is a hot pixel, and a segment meets the pixels of its
        // own endpoints, so the middle vertex becomes a node.
        insta::assert_compact_debug_snapshot!(
            points(&out),
            @"[[(0.0, 0.0), (1.0, 1.0)], [(1.0, 1.0), (2.0, 2.0)]]"
        );
    }

    #[test]
    fn short_segment_rounds_away() {
        // The second segment rounds to the single point (5, 0), so the
        // crossing on the third segment lands on the snapped chain's second
        // segment.
        let (rounder, out) = run(&[
            chain(&[(0.0, 0.0), (5.0, 0.0), (5.2, 0.2), (10.0, 0.2)], 0),
            chain(&[(7.3, -3.0), (7.3, 3.0)], 1),
        ]);
        let snapped = &rounder.snapped_chains()[0];
        assert_eq!(
            snapped.points(),
            &[p(0.0, 0.0), p(5.0, 0.0), p(7.0, 0.0), p(10.0, 0.0)]
        );
        assert!(snapped.nodes().contains(&Node {
            point: p(7.0, 0.0),
            segment: 2
        }));
        insta::assert_compact_debug_snapshot!(
            points(&out),
            @"[[(0.0, 0.0), (5.0, 0.0)], [(5.0, 0.0), (7.0, 0.0)], [(7.0, 0.0), (10.0, 0.0)], [(7.0, -3.0), (7.0, 0.0)], [(7.0, 0.0), (7.0, 3.0)]]"
        );
    }

    #[test]
    fn passing_through_pixel() {
        // The second chain passes through the pixel of the first chain's
        // start, without touching the first chain.
        let (rounder, out) = run(&[
            chain(&[(5.3, 5.4), (5.3, 9.0)], 0),
            chain(&[(0.0, 10.0), (10.0, 0.4)], 1),
        ]);
        assert!(rounder.interior_intersections().is_empty());
        assert_eq!(out.iter().filter(|c| c.data == 1).count(), 2);
        assert!(out
            .iter()
            .filter(|c| c.data == 1)
            .all(|c| c.points.contains(&p(5.0, 5.0))));
        assert_eq!(check_noding(&out), Ok(()));
    }

    #[test]
    fn coarse_grid() {
        let mut rounder = SnapRounder::new(PrecisionModel::from_grid_size(10.0).unwrap());
        rounder.compute_nodes(&[
            chain(&[(0.0, 0.0), (100.0, 100.0)], ()),
            chain(&[(0.0, 100.0), (100.0, 0.0)], ()),
            chain(&[(52.0, 0.0), (48.0, 100.0)], ()),
        ]);
        let out = rounder.noded_substrings();
        for c in &out {
            for q in &c.points {
                assert_eq!(q.x % 10.0, 0.0);
                assert_eq!(q.y % 10.0, 0.0);
            }
        }
        assert_eq!(check_noding(&out), Ok(()));
    }

    #[test]
    fn reruns_start_fresh() {
        let mut rounder = SnapRounder::new(unit());
        rounder.compute_nodes(&[
            chain(&[(0.0, 0.0), (10.0, 10.0)], ()),
            chain(&[(0.0, 10.0), (10.0, 0.0)], ()),
        ]);
        rounder.compute_nodes(&[chain(&[(0.0, 0.0), (3.0, 0.0)], ())]);
        assert!(rounder.interior_intersections().is_empty());
        assert_eq!(rounder.hot_pixels().len(), 2);
        assert_eq!(rounder.noded_substrings().len(), 1);
    }

    #[test]
    #[allow(deprecated)]
    fn vertex_snaps_unsupported() {
        let mut rounder = SnapRounder::new(unit());
        let input = [chain(&[(0.0, 0.0), (1.0, 1.0)], ())];
        assert_matches!(
            rounder.compute_vertex_snaps(&input),
            Err(Error::Unsupported(_))
        );
        // Nothing was computed.
        assert!(rounder.hot_pixels().is_empty());
        assert!(rounder.noded_substrings().is_empty());
    }

    #[test]
    fn arbtest_snap_round_is_noded() {
        arbtest::arbtest(arbtests::snap_round_is_noded);
    }

    #[test]
    fn arbtest_segment_meets_endpoint_pixels() {
        arbtest::arbtest(arbtests::segment_meets_endpoint_pixels);
    }

    fn reasonable_chains() -> impl Strategy<Value = Vec<Chain<usize>>> {
        prop::collection::vec(prop::collection::vec(Point::reasonable(), 2..5), 1..5).prop_map(
            |cs| {
                cs.into_iter()
                    .enumerate()
                    .map(|(i, pts)| Chain::new(pts, i))
                    .collect()
            },
        )
    }

    proptest! {
    #[test]
    fn pixel_coverage(chains in reasonable_chains()) {
        let pm = PrecisionModel::from_scale(1e-4).unwrap();
        let mut rounder = SnapRounder::new(pm);
        rounder.compute_nodes(&chains);
        let centers: std::collections::HashSet<_> =
            rounder.hot_pixels().iter().map(HotPixel::center).collect();
        prop_assert_eq!(centers.len(), rounder.hot_pixels().len());
        for q in chains.iter().flat_map(|c| &c.points).chain(rounder.interior_intersections()) {
            prop_assert!(centers.contains(&pm.round(*q)));
        }
    }

    #[test]
    fn no_crossings_and_context_kept(chains in reasonable_chains()) {
        let pm = PrecisionModel::from_scale(1.0 / 1024.0).unwrap();
        let mut rounder = SnapRounder::new(pm);
        rounder.compute_nodes(&chains);
        let out = rounder.noded_substrings();
        prop_assert_eq!(check_noding(&out), Ok(()));

        // Each output chain comes from an input chain that didn't collapse, and
        // the pieces come out in input order.
        let mut data: Vec<_> = out.iter().map(|c| c.data).collect();
        prop_assert!(data.windows(2).all(|w| w[0] <= w[1]));
        data.dedup();
        let survivors: Vec<_> = rounder.snapped_chains().iter().map(|c| *c.data()).collect();
        prop_assert_eq!(data, survivors);
    }

    #[test]
    fn deterministic(chains in reasonable_chains()) {
        let mut a = SnapRounder::new(unit());
        let mut b = SnapRounder::new(unit());
        a.compute_nodes(&chains);
        b.compute_nodes(&chains);
        prop_assert_eq!(a.hot_pixels(), b.hot_pixels());
        prop_assert_eq!(a.noded_substrings(), b.noded_substrings());
    }

    #[test]
    fn two_point_collapse(q in Point::reasonable(), dx in 0.0..0.4, dy in 0.0..0.4) {
        let pm = unit();
        let start = pm.round(q);
        let end = p(start.x + dx, start.y + dy);
        let mut rounder = SnapRounder::new(pm);
        rounder.compute_nodes(&[Chain::new(vec![start, end], ())]);
        prop_assert!(rounder.noded_substrings().is_empty());
    }
    }
}
