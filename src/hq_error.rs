// SPDX-License-Identifier: Apache-2.0

//! Precondition violations raised while building, reshaping or comparing
//! weight tables.
//!
//! Every variant means a generator or the symmetry logic is wrong; callers
//! propagate these with `?` and the driver aborts on the first one.

use thiserror::Error;

use crate::case::Case;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HqError {
    #[error("weights {weights:?}: neighbour {neighbour} is outside the top-left quadrant")]
    OutsideQuadrantSupport { neighbour: usize, weights: Vec<u32> },

    #[error("case {case}: reduced weights {got:?} do not form the expected multiset {expected:?}")]
    UnexpectedWeightMultiset {
        case: Case,
        got: Vec<u32>,
        expected: Vec<u32>,
    },

    #[error("zoom mismatch: {lhs} vs {rhs}")]
    ZoomMismatch { lhs: usize, rhs: usize },

    #[error("cannot permute {seq_len} entries with a permutation of length {perm_len}")]
    PermutationLength { seq_len: usize, perm_len: usize },

    #[error("{indices:?} is not a permutation of 0..{}", .indices.len())]
    NotAPermutation { indices: Vec<u8> },

    #[error("neighbour pair ({0}, {1}) is not a canonical edge")]
    UnknownEdge(u8, u8),

    #[error("edge index {0} is out of range")]
    EdgeOutOfRange(usize),

    #[error("{sub_pixels} sub-pixels per case is not the square of a zoom factor")]
    NotSquare { sub_pixels: usize },

    #[error("table has {got} cases, expected {expected}")]
    WrongCaseCount { got: usize, expected: usize },

    #[error("case {case}: expected {expected} sub-pixels, got {got}")]
    SubPixelCount {
        case: Case,
        expected: usize,
        got: usize,
    },

    #[error("weights {weights:?} have {} entries, expected {expected}", .weights.len())]
    WeightsLength { weights: Vec<u32>, expected: usize },

    #[error("weights {weights:?} sum past u32::MAX")]
    WeightSumOverflow { weights: Vec<u32> },

    #[error("weights {weights:?} sum to zero and cannot be rescaled")]
    ZeroWeightSum { weights: Vec<u32> },

    #[error("case {case}: weight components {components:?} exceed the total {total}")]
    WeightOverflow {
        case: Case,
        components: Vec<u32>,
        total: u32,
    },

    #[error("edge diagram cell {cell} already holds '{old}', cannot draw '{new}'")]
    GlyphConflict { cell: usize, old: char, new: char },
}

pub type HqResult<T> = Result<T, HqError>;
