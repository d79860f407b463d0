//! Conversion between distances along an N-dimensional Hilbert curve and the lattice points they
//! visit.
//!
//! See [HilbertCurve] for the curve itself, and [order] for traversing and sorting points in curve
//! order.

pub mod error;
pub mod hilbert;
pub mod order;

pub use crate::error::{DomainError, Result};
pub use crate::hilbert::{coordinates_to_index, index_to_coordinates, HilbertCurve};
