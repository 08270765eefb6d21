// SPDX-License-Identifier: Apache-2.0

//! Edge classification of a 3x3 pixel neighbourhood.
//!
//! Neighbours are numbered row-major:
//!
//! ```text
//!   0 | 1 | 2
//!  ---+---+---
//!   3 | 4 | 5
//!  ---+---+---
//!   6 | 7 | 8
//! ```
//!
//! A `Case` packs 12 edge comparisons into a `u16`: bit `i` is set when the
//! two pixels of `EDGES[i]` differ. The first four edges cross the diamond
//! around the centre, the remaining eight are the star edges from the centre
//! to each neighbour.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const EDGE_COUNT: usize = 12;
pub const CASE_COUNT: usize = 1 << EDGE_COUNT;

pub const CENTER: u8 = 4;

/// Canonical edge order; every pair is sorted.
pub const EDGES: [(u8, u8); EDGE_COUNT] = [
    (1, 5),
    (5, 7),
    (3, 7),
    (1, 3),
    (0, 4),
    (1, 4),
    (2, 4),
    (3, 4),
    (4, 5),
    (4, 6),
    (4, 7),
    (4, 8),
];

/// Returns the index of the unordered pair `(a, b)` in `EDGES`.
pub fn edge_index(a: u8, b: u8) -> Option<usize> {
    let key = if a <= b { (a, b) } else { (b, a) };
    EDGES.iter().position(|&edge| edge == key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Case(pub u16);

impl Case {
    pub const FLAT: Case = Case(0);

    /// All 4096 cases in ascending order.
    pub fn all() -> impl DoubleEndedIterator<Item = Case> + ExactSizeIterator {
        (0..CASE_COUNT as u16).map(Case)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn bit(self, edge: usize) -> bool {
        debug_assert!(edge < EDGE_COUNT);
        (self.0 >> edge) & 1 != 0
    }

    #[inline]
    pub fn with_edge_flipped(self, edge: usize) -> Case {
        debug_assert!(edge < EDGE_COUNT);
        Case(self.0 ^ (1 << edge))
    }

    #[inline]
    pub fn masked(self, mask: u16) -> u16 {
        self.0 & mask
    }

    /// Binary rendering, most significant edge first, in groups of four.
    pub fn to_grouped_binary(self) -> String {
        let bits = format!("{:012b}", self.0);
        bits.as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.to_grouped_binary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_sorted_and_unique() {
        for (i, &(a, b)) in EDGES.iter().enumerate() {
            assert!(a < b, "edge {i} not sorted");
            assert_eq!(edge_index(a, b), Some(i));
            assert_eq!(edge_index(b, a), Some(i));
        }
    }

    #[test]
    fn test_every_edge_touches_centre_or_crosses_diamond() {
        for &(a, b) in &EDGES[4..] {
            assert!(a == CENTER || b == CENTER);
        }
        for &(a, b) in &EDGES[..4] {
            assert!(a != CENTER && b != CENTER);
        }
    }

    #[test]
    fn test_non_edge_pair_has_no_index() {
        assert_eq!(edge_index(0, 1), None);
        assert_eq!(edge_index(2, 6), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Case(0x0A0).to_string(), "160 (0000 1010 0000)");
        assert_eq!(Case(4095).to_grouped_binary(), "1111 1111 1111");
    }

    #[test]
    fn test_all_covers_domain() {
        let all: Vec<Case> = Case::all().collect();
        assert_eq!(all.len(), CASE_COUNT);
        assert_eq!(all[0], Case::FLAT);
        assert_eq!(all[CASE_COUNT - 1], Case(0xFFF));
    }
}
