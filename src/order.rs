//! Visiting and sorting points in Hilbert curve order.

use crate::error::Result;
use crate::hilbert::HilbertCurve;

use std::iter::FusedIterator;
use std::ops::RangeInclusive;

/// An iterator over `(index, point)` pairs along a [HilbertCurve].
#[derive(Clone, Debug)]
pub struct Points {
    curve: HilbertCurve,
    indices: RangeInclusive<u128>,
}

impl Points {
    /// Iterate over `indices`, which must all lie on the curve.
    pub(crate) fn new(curve: HilbertCurve, indices: RangeInclusive<u128>) -> Self {
        debug_assert!(indices.is_empty() || *indices.end() <= curve.max_index());
        Self { curve, indices }
    }

    /// An iterator that yields nothing.
    pub(crate) fn empty(curve: HilbertCurve) -> Self {
        Self::new(curve, 1..=0)
    }

    /// The curve being traversed.
    pub fn curve(&self) -> HilbertCurve {
        self.curve
    }
}

impl Iterator for Points {
    type Item = (u128, Vec<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        Some((index, self.curve.point_unchecked(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl DoubleEndedIterator for Points {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.indices.next_back()?;
        Some((index, self.curve.point_unchecked(index)))
    }
}

impl FusedIterator for Points {}

/// The Manhattan (L1) distance between two points.
pub fn manhattan(a: &[u64], b: &[u64]) -> u64 {
    a.iter().zip(b).map(|(x, y)| x.abs_diff(*y)).sum()
}

/// Sort items by the Hilbert index of the point each one is keyed on.
///
/// If any key is not a point of `curve`, the error for the first such item is returned and
/// `items` is left untouched.  Items with equal keys keep their relative order.
pub fn sort_by_hilbert_key<T, F>(
    curve: &HilbertCurve,
    items: &mut Vec<T>,
    mut key: F,
) -> Result<()>
where
    F: FnMut(&T) -> &[u64],
{
    let keys = items
        .iter()
        .map(|item| curve.index(key(item)))
        .collect::<Result<Vec<_>>>()?;

    let mut keyed: Vec<_> = keys.into_iter().zip(items.drain(..)).collect();
    keyed.sort_by_key(|(k, _)| *k);
    items.extend(keyed.into_iter().map(|(_, item)| item));

    Ok(())
}

/// Sort points into Hilbert curve order.
pub fn hilbert_sort(curve: &HilbertCurve, points: &mut Vec<Vec<u64>>) -> Result<()> {
    sort_by_hilbert_key(curve, points, |p| p.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::DomainError;

    use rand::prelude::*;

    #[test]
    fn test_points() {
        let curve = HilbertCurve::new(2, 1).unwrap();
        let points: Vec<_> = curve.points().collect();
        assert_eq!(
            points,
            vec![
                (0, vec![0, 0]),
                (1, vec![0, 1]),
                (2, vec![1, 1]),
                (3, vec![1, 0]),
            ]
        );

        let reversed: Vec<_> = curve.points().rev().map(|(i, _)| i).collect();
        assert_eq!(reversed, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_points_in() {
        let curve = HilbertCurve::new(2, 3).unwrap();

        let points: Vec<_> = curve.points_in(35..38).unwrap().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], (36, vec![4, 6]));

        assert_eq!(curve.points_in(60..).unwrap().count(), 4);
        assert_eq!(curve.points_in(..=0).unwrap().size_hint(), (1, Some(1)));
        assert_eq!(curve.points_in(5..5).unwrap().next(), None);
        assert_eq!(
            curve.points_in(60..=64).map(|p| p.count()),
            Err(DomainError::index(64, 63))
        );

        // Explicit bounds must lie on the curve, even when the range would be empty
        assert_eq!(curve.points_in(63..).unwrap().count(), 1);
        assert_eq!(curve.points_in(..64).unwrap().count(), 64);
        assert_eq!(curve.points_in(64..).map(|p| p.count()), Err(DomainError::index(64, 63)));
        assert_eq!(curve.points_in(65..).map(|p| p.count()), Err(DomainError::index(65, 63)));
        assert_eq!(
            curve.points_in(100..=200).map(|p| p.count()),
            Err(DomainError::index(100, 63))
        );
        assert_eq!(curve.points_in(..65).map(|p| p.count()), Err(DomainError::index(65, 63)));
        assert_eq!(curve.points_in(..0).unwrap().count(), 0);

        let mut points = curve.points_in(62..).unwrap();
        assert!(points.next().is_some());
        assert!(points.next().is_some());
        assert!(points.next().is_none());
        assert!(points.next().is_none());
    }

    #[test]
    fn test_wide_points() {
        let curve = HilbertCurve::new(2, 64).unwrap();
        let last: Vec<_> = curve.points().rev().take(2).collect();
        assert_eq!(last[0], (u128::MAX, vec![u64::MAX, 0]));
        assert_eq!(manhattan(&last[0].1, &last[1].1), 1);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(&[0, 0], &[0, 0]), 0);
        assert_eq!(manhattan(&[4, 6], &[7, 2]), 7);
        assert_eq!(manhattan(&[u64::MAX], &[0]), u64::MAX);
    }

    #[test]
    fn test_hilbert_sort() {
        let curve = HilbertCurve::new(3, 2).unwrap();
        let mut points: Vec<_> = curve.points().map(|(_, p)| p).collect();
        let sorted = points.clone();

        points.shuffle(&mut rand::thread_rng());
        hilbert_sort(&curve, &mut points).unwrap();
        assert_eq!(points, sorted);
    }

    #[test]
    fn test_sort_by_key() {
        let curve = HilbertCurve::new(2, 3).unwrap();
        let mut items = vec![("c", vec![7, 0]), ("a", vec![0, 0]), ("b", vec![4, 6])];
        sort_by_hilbert_key(&curve, &mut items, |(_, p)| p.as_slice()).unwrap();

        let names: Vec<_> = items.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_rejects() {
        let curve = HilbertCurve::new(2, 3).unwrap();
        let mut points = vec![vec![7, 0], vec![8, 0], vec![0, 0, 0]];
        let before = points.clone();

        assert_eq!(
            hilbert_sort(&curve, &mut points),
            Err(DomainError::coordinate(0, 8, 7))
        );
        assert_eq!(points, before);
    }
}
