#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod chain;
mod geom;
pub mod hot_pixel;
pub mod intersection;
pub mod noder;
pub mod num;
mod precision;
pub mod snap_round;
pub mod validate;

#[cfg(feature = "generators")]
pub mod generators;

pub use chain::{Chain, NodedChain};
pub use geom::{Point, Segment};
pub use hot_pixel::HotPixel;
pub use noder::Noder;
pub use precision::PrecisionModel;
pub use snap_round::SnapRounder;

#[derive(Clone, Copy, Debug, PartialEq)]
/// The input was faulty, or asked for something we can't do.
pub enum Error {
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
    /// The grid scale (or grid size) wasn't a finite, positive number.
    InvalidScale(f64),
    /// One of the input chains had fewer than two points.
    TooFewPoints {
        /// The index of the offending chain.
        chain: usize,
    },
    /// The requested operation isn't supported.
    Unsupported(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "one of the inputs was infinite"),
            Error::NaN => write!(f, "one of the inputs had a NaN"),
            Error::InvalidScale(s) => write!(f, "invalid grid scale {s}"),
            Error::TooFewPoints { chain } => {
                write!(f, "input chain {chain} has fewer than two points")
            }
            Error::Unsupported(what) => write!(f, "unsupported: {what}"),
        }
    }
}

impl std::error::Error for Error {}

/// Snap-rounds a collection of chains onto the grid of `precision`.
///
/// The output chains have all their vertices on the grid, and they only meet
/// one another at vertices. Each output chain is a piece of one input chain
/// and carries a clone of its `data`. Chains that round to a single point
/// are dropped.
pub fn snap_round<T: Clone>(
    chains: &[Chain<T>],
    precision: PrecisionModel,
) -> Result<Vec<Chain<T>>, Error> {
    for (idx, c) in chains.iter().enumerate() {
        if c.points.len() < 2 {
            return Err(Error::TooFewPoints { chain: idx });
        }
        if let Some(p) = c.points.iter().find(|p| !p.is_finite()) {
            return Err(if p.x.is_nan() || p.y.is_nan() {
                Error::NaN
            } else {
                Error::Infinity
            });
        }
    }

    let mut rounder = SnapRounder::new(precision);
    rounder.compute_nodes(chains);
    #[cfg(feature = "debug-svg")]
    {
        svg::save("out.svg", &rounder.dump_svg()).unwrap();
    }
    Ok(rounder.noded_substrings())
}
