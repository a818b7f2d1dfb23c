//! Utilities for generating examples, benchmarks, and test cases.

use crate::{Chain, Point};

type Chains = Vec<Chain<usize>>;

fn tag(chains: Vec<Vec<Point>>) -> Chains {
    chains
        .into_iter()
        .enumerate()
        .map(|(i, pts)| Chain::new(pts, i))
        .collect()
}

/// Generate `n` nearly-horizontal lines and `n` nearly-vertical lines, all
/// crossing one another.
///
/// The lines are spaced `spacing` apart, and tilted by `slant` over their
/// length so that the crossings don't land exactly on grid points.
pub fn crossing_grid(n: usize, spacing: f64, slant: f64) -> Chains {
    let len = spacing * (n + 1) as f64;
    let mut ret = Vec::new();
    for i in 1..=n {
        let off = i as f64 * spacing;
        ret.push(vec![Point::new(0.0, off), Point::new(len, off + slant)]);
        ret.push(vec![Point::new(off, 0.0), Point::new(off + slant, len)]);
    }
    tag(ret)
}

/// Generate `n` segments through (almost) the same point, like the spokes of
/// a wheel.
///
/// The spokes have length `2 * radius` and are centered at `center`, so they
/// all cross within a single grid cell.
pub fn star(n: usize, center: Point, radius: f64) -> Chains {
    let ret = (0..n)
        .map(|i| {
            let theta = std::f64::consts::PI * i as f64 / n as f64;
            let (s, c) = theta.sin_cos();
            // Perturb the center a little, so that the spokes have lots of
            // distinct pairwise intersections.
            let eps = 1e-3 * i as f64;
            vec![
                Point::new(center.x - radius * c + eps, center.y - radius * s),
                Point::new(center.x + radius * c, center.y + radius * s - eps),
            ]
        })
        .collect();
    tag(ret)
}

/// Generate `n` zigzags that pass close to, but don't touch, each other's
/// vertices.
///
/// Each zigzag has `teeth` teeth. Zigzag `i` is shifted up by
/// `i * (1.0 + gap)`, so adjacent ones come within `gap` of each other.
pub fn near_misses(n: usize, teeth: usize, gap: f64) -> Chains {
    let ret = (0..n)
        .map(|i| {
            let y0 = i as f64 * (1.0 + gap);
            (0..=2 * teeth)
                .map(|j| {
                    let y = if j % 2 == 0 { y0 } else { y0 + 1.0 };
                    Point::new(j as f64 * 0.5, y)
                })
                .collect()
        })
        .collect();
    tag(ret)
}
