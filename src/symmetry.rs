// SPDX-License-Identifier: Apache-2.0

//! Symmetries of the 3x3 neighbourhood and their action on cases.
//!
//! A `Perm<N>` is an index permutation with the same convention as
//! `weights::permute`: `perm[i]` is the source index that lands at position
//! `i`. `NeighbourPerm` acts on the 9 neighbour positions, `CasePerm` on the
//! 12 edge bits of a `Case`. A neighbour permutation that maps canonical
//! edges onto canonical edges (the mirrors and rotations of the square)
//! induces a case permutation; `Symmetry` carries both halves together.

use crate::case::{Case, EDGE_COUNT, EDGES, edge_index};
use crate::hq_error::{HqError, HqResult};
use crate::weights::Weights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Perm<const N: usize>([u8; N]);

pub type NeighbourPerm = Perm<9>;
pub type CasePerm = Perm<EDGE_COUNT>;
/// Permutation of the 4 top-left quadrant neighbours (0, 1, 3, 4).
pub type QuadrantPerm = Perm<4>;

impl<const N: usize> Perm<N> {
    pub fn identity() -> Self {
        Self(std::array::from_fn(|i| i as u8))
    }

    /// Validates that `indices` is a bijection on `0..N`.
    pub fn new(indices: [u8; N]) -> HqResult<Self> {
        let mut seen = [false; N];
        for &index in &indices {
            let index = index as usize;
            if index >= N || seen[index] {
                return Err(HqError::NotAPermutation {
                    indices: indices.to_vec(),
                });
            }
            seen[index] = true;
        }
        Ok(Self(indices))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.0[i] as usize
    }

    /// Entry `i` of the result is `seq[self[i]]`.
    pub fn apply<T: Copy>(&self, seq: &[T; N]) -> [T; N] {
        std::array::from_fn(|i| seq[self.get(i)])
    }

    /// Returns `self ∘ inner`: applying the result equals applying `self`
    /// first and `inner` second.
    pub fn compose(&self, inner: &Self) -> Self {
        Self(std::array::from_fn(|i| self.0[inner.get(i)]))
    }

    pub fn inverse(&self) -> Self {
        let mut inv = [0u8; N];
        for (i, &p) in self.0.iter().enumerate() {
            inv[p as usize] = i as u8;
        }
        Self(inv)
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &p)| i == p as usize)
    }
}

impl CasePerm {
    /// Bit `j` of the result is bit `self[j]` of `case`.
    pub fn apply_case(&self, case: Case) -> Case {
        let bits = (0..EDGE_COUNT).fold(0u16, |acc, j| {
            acc | (u16::from(case.bit(self.get(j))) << j)
        });
        Case(bits)
    }
}

/// Identity of the 3x3 grid.
pub const NEIGHBOURS_ID: NeighbourPerm = Perm([0, 1, 2, 3, 4, 5, 6, 7, 8]);
/// Left-right mirror.
pub const NEIGHBOURS_LR: NeighbourPerm = Perm([2, 1, 0, 5, 4, 3, 8, 7, 6]);
/// Top-bottom mirror.
pub const NEIGHBOURS_TB: NeighbourPerm = Perm([6, 7, 8, 3, 4, 5, 0, 1, 2]);
/// Mirror in the main diagonal (transpose); swaps top and left neighbours.
pub const NEIGHBOURS_DIAGONAL: NeighbourPerm = Perm([0, 3, 6, 1, 4, 7, 2, 5, 8]);

/// Swaps the top and left slots of a quadrant weight tuple, the quadrant
/// counterpart of `NEIGHBOURS_DIAGONAL`.
pub const QUADRANT_DIAGONAL: QuadrantPerm = Perm([0, 2, 1, 3]);

/// Maps each canonical edge `(a, b)` to the index of `(perm[a], perm[b])`.
///
/// Fails when `perm` sends some edge to a pair that is not a canonical edge,
/// i.e. when it is not a symmetry of the square.
pub fn compute_case_permutation(perm: &NeighbourPerm) -> HqResult<CasePerm> {
    let mut out = [0u8; EDGE_COUNT];
    for (slot, &(n1, n2)) in out.iter_mut().zip(EDGES.iter()) {
        let a = perm.0[n1 as usize];
        let b = perm.0[n2 as usize];
        let index = edge_index(a, b).ok_or(HqError::UnknownEdge(a.min(b), a.max(b)))?;
        *slot = index as u8;
    }
    Perm::new(out)
}

/// A neighbourhood symmetry together with its induced case permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symmetry {
    pub neighbours: NeighbourPerm,
    pub cases: CasePerm,
}

impl Symmetry {
    pub fn from_neighbours(neighbours: NeighbourPerm) -> HqResult<Self> {
        let cases = compute_case_permutation(&neighbours)?;
        Ok(Self { neighbours, cases })
    }

    pub fn identity() -> Self {
        Self {
            neighbours: Perm::identity(),
            cases: Perm::identity(),
        }
    }

    pub fn diagonal() -> HqResult<Self> {
        Self::from_neighbours(NEIGHBOURS_DIAGONAL)
    }

    pub fn compose(&self, inner: &Self) -> HqResult<Self> {
        Self::from_neighbours(self.neighbours.compose(&inner.neighbours))
    }

    pub fn inverse(&self) -> HqResult<Self> {
        Self::from_neighbours(self.neighbours.inverse())
    }

    pub fn apply_case(&self, case: Case) -> Case {
        self.cases.apply_case(case)
    }

    pub fn apply_weights(&self, weights: &Weights) -> HqResult<Weights> {
        weights.permuted(self.neighbours.as_slice())
    }
}

/// The four reflections used to rebuild a full sub-pixel grid from its
/// top-left quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirror {
    Identity,
    LeftRight,
    TopBottom,
    Both,
}

impl Mirror {
    pub const ALL: [Mirror; 4] = [
        Mirror::Identity,
        Mirror::LeftRight,
        Mirror::TopBottom,
        Mirror::Both,
    ];

    pub fn from_flips(flip_x: bool, flip_y: bool) -> Self {
        match (flip_x, flip_y) {
            (false, false) => Mirror::Identity,
            (true, false) => Mirror::LeftRight,
            (false, true) => Mirror::TopBottom,
            (true, true) => Mirror::Both,
        }
    }

    pub fn neighbour_perm(self) -> NeighbourPerm {
        match self {
            Mirror::Identity => NEIGHBOURS_ID,
            Mirror::LeftRight => NEIGHBOURS_LR,
            Mirror::TopBottom => NEIGHBOURS_TB,
            Mirror::Both => NEIGHBOURS_LR.compose(&NEIGHBOURS_TB),
        }
    }

    pub fn symmetry(self) -> HqResult<Symmetry> {
        Symmetry::from_neighbours(self.neighbour_perm())
    }
}
