//! Axes to transpose (Skilling's `AxestoTranspose`).

use super::transpose::Transpose;
use super::untangle;

/// Turn coordinates into the transpose of their Hilbert index.  The inverse of
/// [transpose_to_axes](super::decode::transpose_to_axes).
pub fn axes_to_transpose(mut x: Vec<u64>, depth: u32) -> Transpose {
    let dims = x.len();
    debug_assert!(dims > 0);

    // Inverse undo
    for bit in (1..depth).rev() {
        let q = 1 << bit;
        for i in 0..dims {
            untangle(&mut x, i, q);
        }
    }

    // Gray encode
    for i in 1..dims {
        x[i] ^= x[i - 1];
    }
    let mut t = 0;
    for bit in (1..depth).rev() {
        let q = 1 << bit;
        if x[dims - 1] & q != 0 {
            t ^= q - 1;
        }
    }
    for reg in &mut x {
        *reg ^= t;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::hilbert::decode::transpose_to_axes;
    use crate::hilbert::transpose::{pack, unpack};

    use rand::prelude::*;
    use rand_pcg::Pcg64;

    fn index(point: &[u64], depth: u32) -> u128 {
        unpack(&axes_to_transpose(point.to_vec(), depth), depth)
    }

    #[test]
    fn test_figure() {
        assert_eq!(index(&[4, 6], 3), 36);
        assert_eq!(index(&[0, 0], 3), 0);
        assert_eq!(index(&[7, 0], 3), 63);
    }

    #[test]
    fn test_cube() {
        assert_eq!(axes_to_transpose(vec![1, 1, 1], 1), vec![1, 0, 1]);
        assert_eq!(index(&[1, 1, 1], 1), 5);
        assert_eq!(index(&[1, 0, 0], 1), 7);
    }

    #[test]
    fn test_wide() {
        assert_eq!(index(&[u64::MAX, 0], 64), u128::MAX);
        assert_eq!(
            index(&[128_373_325_523, 113_364_412_026], 64),
            12_345_678_901_234_567_890_123
        );
    }

    #[test]
    fn test_inverts_decode() {
        let mut rng = Pcg64::seed_from_u64(0x5eed);
        for _ in 0..1000 {
            let dims = rng.gen_range(1..=6);
            let depth = rng.gen_range(1..=(128 / dims as u32).min(64));
            let max = u64::MAX >> (64 - depth);
            let point: Vec<u64> = (0..dims).map(|_| rng.gen_range(0..=max)).collect();

            let x = axes_to_transpose(point.clone(), depth);
            assert!(x.iter().all(|&r| r <= max));
            assert_eq!(transpose_to_axes(x.clone(), depth), point);
            assert_eq!(pack(unpack(&x, depth), depth, dims), x);
        }
    }
}
