// SPDX-License-Identifier: Apache-2.0

//! Blend weight tuples.
//!
//! A `Weights` value holds one non-negative integer per candidate source
//! colour: 9 entries in full form (row-major 3x3 neighbourhood, index 4 is the
//! centre pixel) and 4 entries in top-left quadrant form (neighbours 0, 1, 3,
//! 4). Only the ratio between entries matters; tuples are usually kept in
//! lowest terms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hq_error::{HqError, HqResult};

/// Total that classifier components are completed to.
pub const WEIGHT_TOTAL: u32 = 16;

/// Common normalization used when summing finer sub-pixels into a coarser one.
pub const CONVERSION_TOTAL: u32 = 256;

/// Reorders `seq` so that entry `i` of the result is `seq[perm[i]]`.
pub fn permute<T: Copy>(seq: &[T], perm: &[u8]) -> HqResult<Vec<T>> {
    if seq.len() != perm.len() {
        return Err(HqError::PermutationLength {
            seq_len: seq.len(),
            perm_len: perm.len(),
        });
    }
    perm.iter()
        .map(|&index| {
            seq.get(index as usize)
                .copied()
                .ok_or_else(|| HqError::NotAPermutation {
                    indices: perm.to_vec(),
                })
        })
        .collect()
}

pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(pub Vec<u32>);

impl Weights {
    pub fn new(weights: impl Into<Vec<u32>>) -> Self {
        Self(weights.into())
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn get(&self, index: usize) -> u32 {
        self.0[index]
    }

    /// Total of all entries; fails instead of wrapping past `u32::MAX`.
    pub fn sum(&self) -> HqResult<u32> {
        self.0
            .iter()
            .try_fold(0u32, |acc, &w| acc.checked_add(w))
            .ok_or_else(|| HqError::WeightSumOverflow {
                weights: self.0.clone(),
            })
    }

    /// Fails unless the tuple has exactly `expected` entries.
    pub fn expect_len(&self, expected: usize) -> HqResult<()> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(HqError::WeightsLength {
                weights: self.0.clone(),
                expected,
            })
        }
    }

    /// Reduces the tuple to lowest terms by dividing out the common GCD.
    ///
    /// An all-zero tuple is returned unchanged.
    pub fn simplified(&self) -> Self {
        let divisor = self.0.iter().fold(0, |acc, &w| gcd(acc, w));
        if divisor <= 1 {
            return self.clone();
        }
        Self(self.0.iter().map(|w| w / divisor).collect())
    }

    /// Rescales the tuple so that it sums to `new_sum`, preserving the ratio.
    ///
    /// When `new_sum` is not an exact multiple, every entry is floored and
    /// the shortfall goes to the entries with the largest remainders (lower
    /// index first on ties), so the result always sums to `new_sum`.
    pub fn scaled_to(&self, new_sum: u32) -> HqResult<Self> {
        let old_sum = self.sum()?;
        if old_sum == 0 {
            return Err(HqError::ZeroWeightSum {
                weights: self.0.clone(),
            });
        }
        let products: Vec<u64> = self
            .0
            .iter()
            .map(|&w| u64::from(w) * u64::from(new_sum))
            .collect();
        let old_sum = u64::from(old_sum);
        let mut scaled: Vec<u32> = products.iter().map(|p| (p / old_sum) as u32).collect();
        let mut shortfall = new_sum - scaled.iter().sum::<u32>();
        if shortfall > 0 {
            let mut order: Vec<usize> = (0..products.len()).collect();
            order.sort_by_key(|&i| (std::cmp::Reverse(products[i] % old_sum), i));
            for i in order {
                if shortfall == 0 {
                    break;
                }
                scaled[i] += 1;
                shortfall -= 1;
            }
        }
        Ok(Self(scaled))
    }

    pub fn permuted(&self, perm: &[u8]) -> HqResult<Self> {
        permute(&self.0, perm).map(Self)
    }
}

impl From<Vec<u32>> for Weights {
    fn from(weights: Vec<u32>) -> Self {
        Self(weights)
    }
}

impl<const N: usize> From<[u32; N]> for Weights {
    fn from(weights: [u32; N]) -> Self {
        Self(weights.to_vec())
    }
}

/// Right-aligned columns, three characters per weight.
impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_weight_row(f, &self.0)
    }
}

pub(crate) fn format_weight_row(f: &mut impl fmt::Write, weights: &[u32]) -> fmt::Result {
    for (i, w) in weights.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{:3}", w)?;
    }
    Ok(())
}
