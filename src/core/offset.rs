//! Relative cell offsets used to walk the grid.

/// A relative cell offset `(di, dj)`: `di` along x, `dj` along y.
pub type Offset = (i64, i64);

/// Named offset patterns.
pub struct TraversalOffset;

impl TraversalOffset {
    /// The full Moore neighbourhood of a cell.
    pub const EIGHT_NEIGHBOURS: [Offset; 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];

    /// Right, up-right, up and up-left.
    ///
    /// For every pair of adjacent cells exactly one of them reaches the other through this
    /// pattern, so scanning a cell together with these four visits each adjacent pair once.
    pub const HALF_NEIGHBOURS: [Offset; 4] = [(1, 0), (1, 1), (0, 1), (-1, 1)];

    /// All offsets in `[-rings, rings]²` except `(0, 0)`.
    pub fn moore(rings: usize) -> Vec<Offset> {
        if rings == 1 {
            return Self::EIGHT_NEIGHBOURS.to_vec();
        }
        let k = rings as i64;
        let mut out = Vec::with_capacity((2 * rings + 1).pow(2).saturating_sub(1));
        for dj in -k..=k {
            for di in -k..=k {
                if (di, dj) != (0, 0) {
                    out.push((di, dj));
                }
            }
        }
        out
    }

    /// The half of [`moore`](Self::moore) with `dj > 0`, or `dj == 0` and `di > 0`.
    ///
    /// Exactly one of `o` and `-o` is present for every offset `o` in `moore(rings)`.
    pub fn half(rings: usize) -> Vec<Offset> {
        if rings == 1 {
            return Self::HALF_NEIGHBOURS.to_vec();
        }
        Self::moore(rings)
            .into_iter()
            .filter(|&(di, dj)| dj > 0 || (dj == 0 && di > 0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn half_is_a_half_of_moore() {
        for rings in 1..=4 {
            let moore: HashSet<Offset> = TraversalOffset::moore(rings).into_iter().collect();
            let half: HashSet<Offset> = TraversalOffset::half(rings).into_iter().collect();
            assert_eq!(half.len() * 2, moore.len());
            for &(di, dj) in &moore {
                let forward = half.contains(&(di, dj));
                let backward = half.contains(&(-di, -dj));
                assert!(forward ^ backward, "({di}, {dj}) covered {forward}/{backward}");
            }
        }
    }

    #[test]
    fn single_ring_matches_named_patterns() {
        let mut generic: Vec<Offset> = TraversalOffset::moore(2)
            .into_iter()
            .filter(|&(di, dj)| di.abs() <= 1 && dj.abs() <= 1)
            .collect();
        let mut eight = TraversalOffset::EIGHT_NEIGHBOURS.to_vec();
        generic.sort();
        eight.sort();
        assert_eq!(generic, eight);

        let mut half = TraversalOffset::half(1);
        half.sort();
        let mut expected = vec![(1, 0), (1, 1), (0, 1), (-1, 1)];
        expected.sort();
        assert_eq!(half, expected);
    }

    #[test]
    fn moore_ring_sizes() {
        assert_eq!(TraversalOffset::moore(1).len(), 8);
        assert_eq!(TraversalOffset::moore(2).len(), 24);
        assert_eq!(TraversalOffset::half(3).len(), 24);
    }
}
