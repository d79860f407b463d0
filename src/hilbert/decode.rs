//! Transpose to axes (Skilling's `TransposetoAxes`).

use super::transpose::Transpose;
use super::untangle;

/// Turn the transpose of a Hilbert index into the coordinates it visits.
///
/// Every register of `x` must hold at most `depth` bits; so does every coordinate returned.
pub fn transpose_to_axes(mut x: Transpose, depth: u32) -> Vec<u64> {
    let dims = x.len();
    debug_assert!(dims > 0);

    // Gray decode by H ^ (H/2), across the registers
    let t = x[dims - 1] >> 1;
    for i in (1..dims).rev() {
        x[i] ^= x[i - 1];
    }
    x[0] ^= t;

    // Undo excess work
    for bit in 1..depth {
        let q = 1 << bit;
        for i in (0..dims).rev() {
            untangle(&mut x, i, q);
        }
    }

    x
}
