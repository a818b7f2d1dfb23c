//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::{Chain, Point, PrecisionModel};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a float in some range, but give it a chance to be close to another
/// float, or to lie exactly on a grid line or halfway between two grid lines.
fn another_float_in_range(
    orig: f64,
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    match u.int_in_range(0..=3u8)? {
        0 => {
            let ulps: i32 = u.int_in_range(-32..=32)?;
            let scale = 1.0f64 + ulps as f64 * f64::EPSILON;
            Ok((orig * scale).clamp(start, end))
        }
        1 => Ok(orig.round().clamp(start, end)),
        2 => Ok((orig.floor() + 0.5).clamp(start, end)),
        _ => float_in_range(start, end, u),
    }
}

/// Generate a point with coordinates in `[-size, size]`.
pub fn point(size: f64, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        float_in_range(-size, size, u)?,
        float_in_range(-size, size, u)?,
    ))
}

/// Generate a point with coordinates in `[-size, size]`, with a good chance
/// of being related to `orig`: sharing a coordinate with it, nearly sharing
/// one, or lying on a nearby grid line (for the unit grid).
pub fn another_point(
    orig: Point,
    size: f64,
    u: &mut Unstructured<'_>,
) -> Result<Point, arbitrary::Error> {
    let x = another_float_in_range(orig.x, -size, size, u)?;
    let y = another_float_in_range(orig.y, -size, size, u)?;
    Ok(Point::new(x, y))
}

/// Generate a chain of at least two points, with coordinates in `[-size, size]`.
pub fn chain(size: f64, u: &mut Unstructured<'_>) -> Result<Vec<Point>, arbitrary::Error> {
    let len = u.int_in_range(2..=8usize)?;
    let mut ret = vec![point(size, u)?];
    while ret.len() < len {
        let prev = ret[ret.len() - 1];
        ret.push(another_point(prev, size, u)?);
    }
    Ok(ret)
}

/// Generate a handful of chains, each tagged with its index.
pub fn chains(size: f64, u: &mut Unstructured<'_>) -> Result<Vec<Chain<usize>>, arbitrary::Error> {
    let count = u.int_in_range(1..=6usize)?;
    (0..count)
        .map(|i| Ok(Chain::new(chain(size, u)?, i)))
        .collect()
}

/// Generate a precision model whose scale is a power of two, so that
/// converting to grid units is exact.
pub fn precision(u: &mut Unstructured<'_>) -> Result<PrecisionModel, arbitrary::Error> {
    let exp = u.int_in_range(-3..=3i32)?;
    PrecisionModel::from_scale(2.0f64.powi(exp)).map_err(|_| arbitrary::Error::IncorrectFormat)
}
