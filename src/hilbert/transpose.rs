//! The "transpose" packing of a Hilbert index, from John Skilling's
//! [Programming the Hilbert Curve](https://doi.org/10.1063/1.1751381).
//!
//! An index of `dims * depth` bits is dealt out to `dims` registers of `depth` bits each, one bit
//! per register per iteration level, with the first iteration in the high bits:
//!
//! ```text
//!     15-bit index  A B C D E F G H I J K L M N O  (dims = 3, depth = 5)
//!
//!     X[0] = A D G J M
//!     X[1] = B E H K N
//!     X[2] = C F I L O
//!            high  low
//! ```

/// Per-axis bit registers, one `depth`-bit value per dimension.
pub type Transpose = Vec<u64>;

/// The position in the index of bit `bit` of register `axis`.
fn index_bit(bit: u32, axis: usize, dims: usize) -> u32 {
    bit * dims as u32 + (dims - 1 - axis) as u32
}

/// Deal the bits of `index` out into `dims` registers of `depth` bits.
///
/// `index` must already be known to fit in `dims * depth` bits.
pub fn pack(index: u128, depth: u32, dims: usize) -> Transpose {
    debug_assert!(dims as u32 * depth <= u128::BITS);
    debug_assert!(dims as u32 * depth == u128::BITS || index >> (dims as u32 * depth) == 0);

    let mut x = vec![0; dims];
    for bit in 0..depth {
        for (axis, reg) in x.iter_mut().enumerate() {
            let b = (index >> index_bit(bit, axis, dims)) & 1;
            *reg |= (b as u64) << bit;
        }
    }
    x
}

/// Gather `depth`-bit registers back into a single index.  The inverse of [pack].
pub fn unpack(x: &[u64], depth: u32) -> u128 {
    let dims = x.len();

    let mut index = 0;
    for bit in 0..depth {
        for (axis, reg) in x.iter().enumerate() {
            let b = (reg >> bit) & 1;
            index |= (b as u128) << index_bit(bit, axis, dims);
        }
    }
    index
}
