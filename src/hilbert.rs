//! Conversions between [Hilbert curve](https://en.wikipedia.org/wiki/Hilbert_curve) indices and
//! points of an N-dimensional lattice, after John Skilling's
//! [Programming the Hilbert Curve](https://doi.org/10.1063/1.1751381).
//!
//! A curve of `dims` dimensions and depth `p` visits every point of the hypercube `[0, 2^p)^dims`
//! exactly once, and consecutive indices visit adjacent points.  For example, in two dimensions
//! with `p = 3`, index 36 is the point `(4, 6)`:
//!
//! ```
//! use hilbert_axes::{coordinates_to_index, index_to_coordinates};
//!
//! assert_eq!(index_to_coordinates(36, 3, 2)?, vec![4, 6]);
//! assert_eq!(coordinates_to_index(&[4, 6], 3, 2)?, 36);
//! # Ok::<(), hilbert_axes::DomainError>(())
//! ```

mod decode;
mod encode;
mod transpose;

use crate::error::{DomainError, Result};
use crate::order::Points;

use std::fmt::{self, Display, Formatter};
use std::ops::{Bound, RangeBounds};

/// The widest supported index, in bits.
pub const MAX_INDEX_BITS: u32 = u128::BITS;

/// The deepest supported curve, i.e. the widest coordinate in bits.
pub const MAX_DEPTH: u32 = u64::BITS;

/// One step of the "excess work" correction, at bit plane `q` of register `i`: invert the low
/// bits of register 0 if register `i` has bit `q` set, otherwise exchange the low bits of the two.
fn untangle(x: &mut [u64], i: usize, q: u64) {
    let p = q - 1;
    if x[i] & q != 0 {
        // Invert
        x[0] ^= p;
    } else {
        // Exchange
        let t = (x[0] ^ x[i]) & p;
        x[0] ^= t;
        x[i] ^= t;
    }
}

/// The shape of a Hilbert curve: its number of dimensions and its depth (number of iterations).
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct HilbertCurve {
    dims: usize,
    depth: u32,
}

impl HilbertCurve {
    /// Create a curve through `[0, 2^depth)^dims`.
    ///
    /// Fails with [DomainError::InvalidParameter] if either parameter is zero, if `depth` exceeds
    /// [MAX_DEPTH], or if `dims * depth` exceeds [MAX_INDEX_BITS].
    pub fn new(dims: usize, depth: u32) -> Result<Self> {
        let bits = u32::try_from(dims).ok().and_then(|n| n.checked_mul(depth));

        let fits = |bits| dims > 0 && depth > 0 && depth <= MAX_DEPTH && bits <= MAX_INDEX_BITS;

        match bits {
            Some(bits) if fits(bits) => Ok(Self { dims, depth }),
            _ => {
                log::debug!("rejected curve parameters dims = {}, depth = {}", dims, depth);
                Err(DomainError::InvalidParameter { dims, depth })
            }
        }
    }

    /// The number of dimensions.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The number of iterations.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The number of bits in an index, `dims * depth`.
    pub fn index_bits(&self) -> u32 {
        self.dims as u32 * self.depth
    }

    /// The side length of the hypercube, `2^depth`.
    pub fn side(&self) -> u128 {
        1 << self.depth
    }

    /// The largest coordinate along any axis, `2^depth - 1`.
    pub fn max_coordinate(&self) -> u64 {
        u64::MAX >> (u64::BITS - self.depth)
    }

    /// The largest curve index, `2^(dims * depth) - 1`.
    pub fn max_index(&self) -> u128 {
        u128::MAX >> (u128::BITS - self.index_bits())
    }

    /// The number of points on the curve, or `None` if that doesn't fit in a `u128`.
    pub fn len(&self) -> Option<u128> {
        1u128.checked_shl(self.index_bits())
    }

    /// Check that `index` lies on this curve.
    fn check_index(&self, index: u128) -> Result<()> {
        let max = self.max_index();
        if index > max {
            log::debug!("rejected index {} on {}", index, self);
            Err(DomainError::index(index, max))
        } else {
            Ok(())
        }
    }

    /// Check that `point` has one in-range coordinate per axis.
    fn check_point(&self, point: &[u64]) -> Result<()> {
        if point.len() != self.dims {
            log::debug!("rejected {}-dimensional point on {}", point.len(), self);
            return Err(DomainError::ShapeMismatch {
                expected: self.dims,
                actual: point.len(),
            });
        }

        let max = self.max_coordinate();
        match point.iter().position(|&x| x > max) {
            Some(axis) => {
                log::debug!("rejected point {:?} on {}", point, self);
                Err(DomainError::coordinate(axis, point[axis], max))
            }
            None => Ok(()),
        }
    }

    /// The point at `index`, which must already be known to lie on the curve.
    pub(crate) fn point_unchecked(&self, index: u128) -> Vec<u64> {
        let x = transpose::pack(index, self.depth, self.dims);
        decode::transpose_to_axes(x, self.depth)
    }

    /// The index of `point`, which must already be known to lie in the hypercube.
    pub(crate) fn index_unchecked(&self, point: &[u64]) -> u128 {
        let x = encode::axes_to_transpose(point.to_vec(), self.depth);
        transpose::unpack(&x, self.depth)
    }

    /// Compute the point visited at `index` along the curve.
    pub fn point(&self, index: u128) -> Result<Vec<u64>> {
        self.check_index(index)?;
        let point = self.point_unchecked(index);
        log::trace!("{} -> {:?}", index, point);
        Ok(point)
    }

    /// Compute the index along the curve at which `point` is visited.
    pub fn index(&self, point: &[u64]) -> Result<u128> {
        self.check_point(point)?;
        let index = self.index_unchecked(point);
        log::trace!("{:?} -> {}", point, index);
        Ok(index)
    }

    /// Iterate over every point of the curve, in curve order.
    pub fn points(&self) -> Points {
        Points::new(*self, 0..=self.max_index())
    }

    /// Iterate over the points visited by a range of indices, in curve order.
    ///
    /// Every explicit bound must lie on the curve (an excluded end may be one past the last
    /// index), even if the range is empty; otherwise this fails with
    /// [DomainError::IndexOutOfRange].
    pub fn points_in<R: RangeBounds<u128>>(&self, range: R) -> Result<Points> {
        let max = self.max_index();

        let start = match range.start_bound() {
            Bound::Included(&i) => {
                self.check_index(i)?;
                Some(i)
            }
            Bound::Excluded(&i) => {
                self.check_index(i)?;
                i.checked_add(1)
            }
            Bound::Unbounded => Some(0),
        };
        let end = match range.end_bound() {
            Bound::Included(&i) => {
                self.check_index(i)?;
                Some(i)
            }
            Bound::Excluded(&i) => {
                if i > 0 && i - 1 > max {
                    log::debug!("rejected range end {} on {}", i, self);
                    return Err(DomainError::index(i, max));
                }
                i.checked_sub(1)
            }
            Bound::Unbounded => Some(max),
        };

        match (start, end) {
            (Some(start), Some(end)) if start <= end => Ok(Points::new(*self, start..=end)),
            // Empty range
            _ => Ok(Points::empty(*self)),
        }
    }

    /// Parse a decimal curve index.
    ///
    /// Anything that is not a non-negative integer no greater than [max_index](Self::max_index),
    /// including `"-1"`, is reported as [DomainError::IndexOutOfRange].
    pub fn parse_index(&self, text: &str) -> Result<u128> {
        let text = text.trim();
        let max = self.max_index();

        let index = text
            .parse::<u128>()
            .map_err(|_| DomainError::index(text, max))?;

        self.check_index(index)?;
        Ok(index)
    }

    /// Parse a point given as comma- or space-separated decimal coordinates.
    pub fn parse_point(&self, text: &str) -> Result<Vec<u64>> {
        let fields: Vec<_> = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if fields.len() != self.dims {
            return Err(DomainError::ShapeMismatch {
                expected: self.dims,
                actual: fields.len(),
            });
        }

        let max = self.max_coordinate();
        let point = fields
            .iter()
            .enumerate()
            .map(|(axis, s)| s.parse().map_err(|_| DomainError::coordinate(axis, s, max)))
            .collect::<Result<Vec<u64>>>()?;

        self.check_point(&point)?;
        Ok(point)
    }
}

impl Display for HilbertCurve {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}D order-{} Hilbert curve", self.dims, self.depth)
    }
}

/// Compute the coordinates visited at `index` along the `dims`-dimensional Hilbert curve with
/// `depth` iterations.
pub fn index_to_coordinates(index: u128, depth: u32, dims: usize) -> Result<Vec<u64>> {
    HilbertCurve::new(dims, depth)?.point(index)
}

/// Compute the index at which the `dims`-dimensional Hilbert curve with `depth` iterations
/// visits `coordinates`.
pub fn coordinates_to_index(coordinates: &[u64], depth: u32, dims: usize) -> Result<u128> {
    HilbertCurve::new(dims, depth)?.index(coordinates)
}
