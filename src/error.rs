//! Errors reported when a conversion is given values outside the curve.

/// A rejected input to one of the curve conversions.
///
/// Every variant is raised before any bit of the input is transformed, so a failed call has no
/// partial result.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DomainError {
    /// The curve index is negative, unparseable, or not below `2^(dims * depth)`.
    #[display("curve index {index} is out of range [0, {max}]")]
    IndexOutOfRange { index: String, max: u128 },

    /// A coordinate component is not below `2^depth`.
    #[display("coordinate {value} on axis {axis} is out of range [0, {max}]")]
    CoordinateOutOfRange { axis: usize, value: String, max: u64 },

    /// The dimension count or depth is zero, or the curve does not fit the supported widths.
    #[display("invalid curve parameters: dims = {dims}, depth = {depth}")]
    InvalidParameter { dims: usize, depth: u32 },

    /// A coordinate sequence does not have one component per axis.
    #[display("expected {expected} coordinates, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl DomainError {
    /// Reject a curve index.
    pub fn index(index: impl ToString, max: u128) -> Self {
        Self::IndexOutOfRange {
            index: index.to_string(),
            max,
        }
    }

    /// Reject a coordinate component.
    pub fn coordinate(axis: usize, value: impl ToString, max: u64) -> Self {
        Self::CoordinateOutOfRange {
            axis,
            value: value.to_string(),
            max,
        }
    }
}

/// Result type for curve conversions.
pub type Result<T> = std::result::Result<T, DomainError>;
